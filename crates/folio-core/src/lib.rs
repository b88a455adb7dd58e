//! Folio Core Library
//!
//! Core functionality for the folio directory: people publish profiles and
//! projects, and retrieval turns free-text queries into ranked listings.
//!
//! # Features
//! - Hybrid search combining vector similarity and weighted keyword matching
//! - LLM-powered query understanding with a deterministic heuristic fallback
//! - Optional cross-encoder style reranking of the fused candidate set
//! - Graceful degradation: every failure path ends in a browse listing,
//!   never an error surfaced to the caller

pub mod config;
pub mod db;
pub mod error;
pub mod llm;
pub mod model;
pub mod search;

pub use config::{Config, LlmServiceConfig, SearchConfig};
pub use db::{Database, EmbeddingAction, EmbeddingStats, NewProfile, NewProject};
pub use error::{Error, FolioError, Result};
pub use llm::{
    heuristic_parse, ChatMessage, Embedder, HeuristicQueryParser, HttpEmbedder, HttpQueryParser,
    HttpReranker, InferenceClient, LLMClient, MetricsSnapshot, ParsedQuery, QueryIntent,
    QueryParser, RerankDocument, RerankResult, Reranker,
};
pub use model::{Availability, EntityKey, EntityType, Profile, Project, SearchableEntity};
pub use search::{
    browse_projects, embedding_stats, find_most_similar, generate_embeddings, hybrid_search,
    initialize_search, rerank_documents, search_projects, ProjectSearchOptions, ProjectSort,
    SearchContext, SearchMethod, SearchOptions, SearchResponse, SearchResultItem, SearchStats,
    SearchTiming, SortOrder,
};

/// Default embedding dimensions when the provider does not report them
pub const DEFAULT_EMBEDDING_DIMENSIONS: usize = 1024;

/// Default config directory name
pub const CONFIG_DIR_NAME: &str = "folio";

/// Default data directory name
pub const DATA_DIR_NAME: &str = "folio";
