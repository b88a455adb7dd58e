//! Hybrid search engine
//!
//! Provides:
//! - Vector similarity retrieval over stored entity embeddings
//! - Weighted keyword retrieval over structured entity fields
//! - Score fusion with deterministic ordering
//! - Optional reranking and a fallback browse listing

mod diagnostics;
mod fusion;
mod keyword;
mod orchestrator;
mod projects;
mod stats;
mod vector;

pub use diagnostics::{
    find_most_similar, generate_embeddings, rerank_documents, EmbeddingBatch, SimilarDocument,
};
pub use fusion::{fuse, FusedCandidate};
pub use keyword::keyword_retrieve;
pub use orchestrator::{
    browse_listing, embedding_stats, hybrid_search, initialize_search, SearchContext,
};
pub use projects::{browse_projects, search_projects, ProjectSearchOptions, ProjectSort};
pub use stats::{SearchStats, SearchStatsSnapshot};
pub use vector::vector_retrieve;

use crate::llm::ParsedQuery;
use crate::model::{EntityType, SearchableEntity};
use serde::{Deserialize, Serialize};

/// Sort orders for directory search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Fused relevance order; behaves as `Recent` when no query was parsed
    Relevance,
    Recent,
    Name,
    /// Featured entities first, fused relevance within each group
    Featured,
}

/// Search options
#[derive(Debug, Clone)]
pub struct SearchOptions {
    /// Cap on fused candidates considered for the result set
    pub max_results: usize,
    /// Page number (1-based)
    pub page: usize,
    /// Page size
    pub limit: usize,
    /// Result ordering
    pub sort: SortOrder,
    /// Entity kinds to search
    pub entity_types: Vec<EntityType>,
    /// Run the rerank stage on the fused head
    pub enable_reranking: bool,
    /// Minimum cosine similarity; `None` uses the per-type configured default
    pub threshold: Option<f32>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            max_results: 50,
            page: 1,
            limit: 20,
            sort: SortOrder::Relevance,
            entity_types: vec![EntityType::Profile, EntityType::Project],
            enable_reranking: false,
            threshold: None,
        }
    }
}

/// Provenance of a search result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMethod {
    Vector,
    Keyword,
    Hybrid,
    Rerank,
    /// Non-query listing (empty query or fallback)
    Browse,
}

/// One ranked entity in a search response
#[derive(Debug, Clone, Serialize)]
pub struct SearchResultItem {
    #[serde(flatten)]
    pub entity: SearchableEntity,
    pub score: f64,
    pub method: SearchMethod,
    pub rank: usize,
}

/// Per-stage wall-clock timing in milliseconds
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct SearchTiming {
    pub parse: u64,
    pub vector: u64,
    pub keyword: u64,
    pub reranking: u64,
    pub total: u64,
}

/// The orchestrator's answer: always valid, degradation is signalled through
/// zeroed timing and a low-confidence parsed query, never through errors.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResponse {
    pub results: Vec<SearchResultItem>,
    pub total_count: usize,
    pub timing: SearchTiming,
    pub parsed_query: ParsedQuery,
}
