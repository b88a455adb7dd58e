//! LLM integration
//!
//! Traits and HTTP implementations for the three external services the
//! search engine depends on:
//! - Embedding generation (validated, retried)
//! - Query parsing (structured output with heuristic fallback)
//! - Reranking (skippable, never fatal)

mod client;
mod http_embedder;
mod http_query_parser;
mod http_reranker;
pub mod query_parser;
pub mod schema;
mod traits;

pub use client::{ChatMessage, InferenceClient, LLMClient, MetricsSnapshot};
pub use http_embedder::HttpEmbedder;
pub use http_query_parser::HttpQueryParser;
pub use http_reranker::HttpReranker;
pub use query_parser::{
    heuristic_parse, tokenize, HeuristicQueryParser, ParsedQuery, QueryIntent,
    HEURISTIC_CONFIDENCE,
};
pub use schema::ResponseSchema;
pub use traits::{Embedder, QueryParser, RerankDocument, RerankResult, Reranker};
