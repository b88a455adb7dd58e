//! Directory entities
//!
//! Profiles and projects are the two searchable entity kinds. They are
//! modeled as a closed tagged union with shared accessors so the fusion and
//! reranking stages stay entity-agnostic.

use serde::{Deserialize, Serialize};

/// Kind of searchable entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    Profile,
    Project,
}

impl EntityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Profile => "profile",
            Self::Project => "project",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "profile" => Some(Self::Profile),
            "project" => Some(Self::Project),
            _ => None,
        }
    }
}

/// Stable identity of an entity across both retrievers
pub type EntityKey = (EntityType, i64);

/// Availability flags on a profile
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Availability {
    /// Open to being hired
    pub hire: bool,
    /// Open to collaboration
    pub collaborate: bool,
    /// Currently hiring
    pub hiring: bool,
}

/// A person's published profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: i64,
    pub handle: String,
    pub display_name: String,
    #[serde(default)]
    pub headline: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub availability: Availability,
    pub active: bool,
    pub updated_at: String,
}

/// A published project
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: i64,
    pub owner_id: i64,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub oneliner: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub media: Vec<String>,
    pub active: bool,
    pub updated_at: String,
}

/// Tagged union over the two entity kinds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SearchableEntity {
    Profile(Profile),
    Project(Project),
}

impl SearchableEntity {
    pub fn id(&self) -> i64 {
        match self {
            Self::Profile(p) => p.id,
            Self::Project(p) => p.id,
        }
    }

    pub fn entity_type(&self) -> EntityType {
        match self {
            Self::Profile(_) => EntityType::Profile,
            Self::Project(_) => EntityType::Project,
        }
    }

    pub fn key(&self) -> EntityKey {
        (self.entity_type(), self.id())
    }

    pub fn updated_at(&self) -> &str {
        match self {
            Self::Profile(p) => &p.updated_at,
            Self::Project(p) => &p.updated_at,
        }
    }

    /// Display name used for name ordering and terminal output
    pub fn name(&self) -> &str {
        match self {
            Self::Profile(p) => &p.display_name,
            Self::Project(p) => &p.name,
        }
    }

    /// Flattened text representation used for embedding and reranking
    pub fn searchable_text(&self) -> String {
        match self {
            Self::Profile(p) => {
                let mut parts = vec![p.display_name.clone()];
                if let Some(ref h) = p.headline {
                    parts.push(h.clone());
                }
                if let Some(ref l) = p.location {
                    parts.push(l.clone());
                }
                if !p.skills.is_empty() {
                    parts.push(p.skills.join(", "));
                }
                if !p.interests.is_empty() {
                    parts.push(p.interests.join(", "));
                }
                if let Some(ref b) = p.bio {
                    parts.push(b.clone());
                }
                parts.join(". ")
            }
            Self::Project(p) => {
                let mut parts = vec![p.name.clone()];
                if let Some(ref o) = p.oneliner {
                    parts.push(o.clone());
                }
                if let Some(ref d) = p.description {
                    parts.push(d.clone());
                }
                parts.join(". ")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_profile() -> Profile {
        Profile {
            id: 7,
            handle: "ada".into(),
            display_name: "Ada Lovelace".into(),
            headline: Some("Engine programmer".into()),
            bio: Some("First programmer.".into()),
            skills: vec!["math".into(), "compilers".into()],
            interests: vec!["music".into()],
            location: Some("London, UK".into()),
            availability: Availability {
                hire: true,
                ..Default::default()
            },
            active: true,
            updated_at: "2024-01-01T00:00:00Z".into(),
        }
    }

    #[test]
    fn test_entity_accessors() {
        let entity = SearchableEntity::Profile(sample_profile());
        assert_eq!(entity.id(), 7);
        assert_eq!(entity.entity_type(), EntityType::Profile);
        assert_eq!(entity.key(), (EntityType::Profile, 7));
        assert_eq!(entity.name(), "Ada Lovelace");
    }

    #[test]
    fn test_searchable_text_includes_structured_fields() {
        let entity = SearchableEntity::Profile(sample_profile());
        let text = entity.searchable_text();
        assert!(text.contains("math, compilers"));
        assert!(text.contains("London"));
        assert!(text.contains("First programmer."));
    }

    #[test]
    fn test_entity_type_roundtrip() {
        assert_eq!(EntityType::parse("profile"), Some(EntityType::Profile));
        assert_eq!(EntityType::parse("project"), Some(EntityType::Project));
        assert_eq!(EntityType::parse("page"), None);
        assert_eq!(EntityType::Project.as_str(), "project");
    }
}
