//! Project-only search and browse
//!
//! Thin wrapper over the shared pipeline that fixes the entity kind to
//! projects and adds the orderings the project gallery needs, including a
//! random shuffle that bypasses scoring entirely.

use crate::db::{Database, ProjectOrder};
use crate::llm::ParsedQuery;
use crate::model::{EntityType, SearchableEntity};
use crate::search::{
    hybrid_search, SearchContext, SearchMethod, SearchOptions, SearchResponse, SearchResultItem,
    SearchTiming, SortOrder,
};
use serde::{Deserialize, Serialize};

/// Orderings for the project gallery
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectSort {
    Relevance,
    Recent,
    Featured,
    Name,
    /// Fresh shuffle on every request; never scored
    Random,
}

/// Options for project search and browse
#[derive(Debug, Clone)]
pub struct ProjectSearchOptions {
    pub page: usize,
    pub limit: usize,
    pub sort: ProjectSort,
    /// Minimum cosine similarity for vector hits
    pub threshold: f32,
    pub enable_reranking: bool,
}

impl Default for ProjectSearchOptions {
    fn default() -> Self {
        Self {
            page: 1,
            limit: 20,
            sort: ProjectSort::Relevance,
            threshold: 0.4,
            enable_reranking: false,
        }
    }
}

impl ProjectSearchOptions {
    fn as_search_options(&self) -> SearchOptions {
        SearchOptions {
            page: self.page,
            limit: self.limit,
            sort: match self.sort {
                ProjectSort::Recent => SortOrder::Recent,
                ProjectSort::Name => SortOrder::Name,
                ProjectSort::Featured => SortOrder::Featured,
                ProjectSort::Relevance | ProjectSort::Random => SortOrder::Relevance,
            },
            entity_types: vec![EntityType::Project],
            enable_reranking: self.enable_reranking,
            threshold: Some(self.threshold),
            ..Default::default()
        }
    }
}

/// Search projects. Empty queries and random ordering skip the pipeline
/// and list directly.
pub async fn search_projects(
    db: &Database,
    query: &str,
    options: &ProjectSearchOptions,
    ctx: &SearchContext,
) -> SearchResponse {
    if query.trim().is_empty() || options.sort == ProjectSort::Random {
        ctx.stats.record_browse(0);
        return browse_projects(db, options);
    }

    hybrid_search(db, query, &options.as_search_options(), ctx).await
}

/// List active projects in the requested order
pub fn browse_projects(db: &Database, options: &ProjectSearchOptions) -> SearchResponse {
    match try_browse_projects(db, options) {
        Ok(response) => response,
        Err(e) => {
            tracing::warn!("project browse failed: {}", e);
            SearchResponse {
                results: Vec::new(),
                total_count: 0,
                timing: SearchTiming::default(),
                parsed_query: ParsedQuery::browse(),
            }
        }
    }
}

fn try_browse_projects(
    db: &Database,
    options: &ProjectSearchOptions,
) -> crate::error::Result<SearchResponse> {
    let order = match options.sort {
        ProjectSort::Featured => ProjectOrder::Featured,
        ProjectSort::Name => ProjectOrder::Name,
        ProjectSort::Random => ProjectOrder::Random,
        ProjectSort::Relevance | ProjectSort::Recent => ProjectOrder::Recent,
    };
    let offset = options.page.saturating_sub(1) * options.limit;
    let total_count = db.count_active_projects()?;
    let results = db
        .browse_projects_page(order, options.limit, offset)?
        .into_iter()
        .enumerate()
        .map(|(i, project)| SearchResultItem {
            entity: SearchableEntity::Project(project),
            score: 0.0,
            method: SearchMethod::Browse,
            rank: offset + i + 1,
        })
        .collect();

    Ok(SearchResponse {
        results,
        total_count,
        timing: SearchTiming::default(),
        parsed_query: ParsedQuery::browse(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SearchConfig;
    use crate::db::{NewProfile, NewProject};
    use crate::model::Availability;

    fn seeded_db() -> Database {
        let db = Database::open_in_memory().unwrap();
        db.initialize().unwrap();
        let owner = db
            .insert_profile(&NewProfile {
                handle: "o".into(),
                display_name: "Owner".into(),
                headline: None,
                bio: None,
                skills: vec![],
                interests: vec![],
                location: None,
                availability: Availability::default(),
            })
            .unwrap();
        for (slug, featured) in [("alpha", false), ("beta", true), ("gamma", false)] {
            db.insert_project(&NewProject {
                owner_id: owner,
                name: slug.to_uppercase(),
                slug: slug.into(),
                oneliner: None,
                description: None,
                featured,
                url: None,
                media: vec![],
            })
            .unwrap();
        }
        db
    }

    #[test]
    fn test_browse_featured_first() {
        let db = seeded_db();
        let options = ProjectSearchOptions {
            sort: ProjectSort::Featured,
            ..Default::default()
        };
        let response = browse_projects(&db, &options);
        assert_eq!(response.results[0].entity.name(), "BETA");
        assert_eq!(response.total_count, 3);
    }

    #[tokio::test]
    async fn test_random_sort_bypasses_pipeline() {
        let db = seeded_db();
        let ctx = SearchContext::offline(SearchConfig::default(), "m");
        let options = ProjectSearchOptions {
            sort: ProjectSort::Random,
            ..Default::default()
        };

        let response = search_projects(&db, "alpha", &options, &ctx).await;
        assert_eq!(response.results.len(), 3);
        assert!(response
            .results
            .iter()
            .all(|r| r.method == SearchMethod::Browse));
    }

    #[test]
    fn test_browse_pagination_offsets_ranks() {
        let db = seeded_db();
        let options = ProjectSearchOptions {
            page: 2,
            limit: 2,
            sort: ProjectSort::Name,
            ..Default::default()
        };
        let response = browse_projects(&db, &options);
        assert_eq!(response.results.len(), 1);
        assert_eq!(response.results[0].rank, 3);
        assert_eq!(response.total_count, 3);
    }
}
