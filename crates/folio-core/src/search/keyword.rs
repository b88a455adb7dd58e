//! Keyword retrieval over structured entity fields
//!
//! Lexical matching of parsed entities and raw query tokens, weighted by
//! field: skills and interests count more than location or headline, which
//! count more than free text. Entities with no matching term are excluded,
//! so this stage still works when the parse came back with low confidence —
//! raw token overlap alone can produce hits.

use crate::db::Database;
use crate::error::Result;
use crate::model::{EntityType, Profile, Project};

/// Weight of a term hit in skills or interests
const STRUCTURED_WEIGHT: f64 = 3.0;
/// Weight of a term hit in location, headline, name or oneliner
const TITLE_WEIGHT: f64 = 2.0;
/// Weight of a term hit in bio or description
const TEXT_WEIGHT: f64 = 1.0;

/// Retrieve entities whose fields match at least one term, ordered by
/// descending match score, ties by id ascending.
pub fn keyword_retrieve(
    db: &Database,
    terms: &[String],
    entity_type: EntityType,
    limit: usize,
) -> Result<Vec<(i64, f64)>> {
    if terms.is_empty() {
        return Ok(Vec::new());
    }

    let mut hits: Vec<(i64, f64)> = match entity_type {
        EntityType::Profile => db
            .list_active_profiles()?
            .iter()
            .map(|p| (p.id, score_profile(terms, p)))
            .filter(|(_, score)| *score > 0.0)
            .collect(),
        EntityType::Project => db
            .list_active_projects()?
            .iter()
            .map(|p| (p.id, score_project(terms, p)))
            .filter(|(_, score)| *score > 0.0)
            .collect(),
    };

    hits.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.0.cmp(&b.0))
    });
    hits.truncate(limit);
    Ok(hits)
}

fn list_matches(term: &str, values: &[String]) -> bool {
    values.iter().any(|v| v.to_lowercase() == term)
}

fn text_matches(term: &str, value: Option<&str>) -> bool {
    value
        .map(|v| v.to_lowercase().contains(term))
        .unwrap_or(false)
}

/// Weighted match score for a profile. Terms are expected lowercased.
pub fn score_profile(terms: &[String], profile: &Profile) -> f64 {
    let mut score = 0.0;
    for term in terms {
        if list_matches(term, &profile.skills) {
            score += STRUCTURED_WEIGHT;
        }
        if list_matches(term, &profile.interests) {
            score += STRUCTURED_WEIGHT;
        }
        if text_matches(term, profile.location.as_deref()) {
            score += TITLE_WEIGHT;
        }
        if text_matches(term, profile.headline.as_deref()) {
            score += TITLE_WEIGHT;
        }
        if text_matches(term, Some(&profile.display_name)) {
            score += TITLE_WEIGHT;
        }
        if text_matches(term, profile.bio.as_deref()) {
            score += TEXT_WEIGHT;
        }
    }
    score
}

/// Weighted match score for a project. Terms are expected lowercased.
pub fn score_project(terms: &[String], project: &Project) -> f64 {
    let mut score = 0.0;
    for term in terms {
        if text_matches(term, Some(&project.name)) {
            score += TITLE_WEIGHT;
        }
        if text_matches(term, project.oneliner.as_deref()) {
            score += TITLE_WEIGHT;
        }
        if text_matches(term, project.description.as_deref()) {
            score += TEXT_WEIGHT;
        }
    }
    score
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Availability;

    fn profile(skills: &[&str], location: Option<&str>, bio: Option<&str>) -> Profile {
        Profile {
            id: 1,
            handle: "h".into(),
            display_name: "Test".into(),
            headline: None,
            bio: bio.map(String::from),
            skills: skills.iter().map(|s| s.to_string()).collect(),
            interests: vec![],
            location: location.map(String::from),
            availability: Availability::default(),
            active: true,
            updated_at: "2024-01-01T00:00:00Z".into(),
        }
    }

    #[test]
    fn test_structured_fields_outweigh_free_text() {
        let terms = vec!["rust".to_string()];
        let by_skill = profile(&["rust"], None, None);
        let by_bio = profile(&[], None, Some("I write rust sometimes"));
        assert!(score_profile(&terms, &by_skill) > score_profile(&terms, &by_bio));
    }

    #[test]
    fn test_location_substring_match() {
        let terms = vec!["berlin".to_string()];
        let p = profile(&[], Some("Berlin, Germany"), None);
        assert_eq!(score_profile(&terms, &p), TITLE_WEIGHT);
    }

    #[test]
    fn test_zero_match_excluded() {
        let db = Database::open_in_memory().unwrap();
        db.initialize().unwrap();
        db.insert_profile(&crate::db::NewProfile {
            handle: "a".into(),
            display_name: "Someone Else".into(),
            headline: None,
            bio: None,
            skills: vec!["cooking".into()],
            interests: vec![],
            location: None,
            availability: Availability::default(),
        })
        .unwrap();

        let hits =
            keyword_retrieve(&db, &["kubernetes".to_string()], EntityType::Profile, 10).unwrap();
        assert!(hits.is_empty());
    }

    #[test]
    fn test_empty_terms_yield_no_hits() {
        let db = Database::open_in_memory().unwrap();
        db.initialize().unwrap();
        let hits = keyword_retrieve(&db, &[], EntityType::Profile, 10).unwrap();
        assert!(hits.is_empty());
    }

    #[test]
    fn test_deterministic_tie_break_by_id() {
        let db = Database::open_in_memory().unwrap();
        db.initialize().unwrap();
        for handle in ["b1", "b2"] {
            db.insert_profile(&crate::db::NewProfile {
                handle: handle.into(),
                display_name: "Dev".into(),
                headline: None,
                bio: None,
                skills: vec!["rust".into()],
                interests: vec![],
                location: None,
                availability: Availability::default(),
            })
            .unwrap();
        }
        let hits = keyword_retrieve(&db, &["rust".to_string()], EntityType::Profile, 10).unwrap();
        assert_eq!(hits.len(), 2);
        assert!(hits[0].0 < hits[1].0);
    }
}
