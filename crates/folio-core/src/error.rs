//! Error types for folio

use thiserror::Error;

/// Result type alias using FolioError
pub type Result<T> = std::result::Result<T, FolioError>;

/// Error type alias for convenience
pub type Error = FolioError;

/// Exit codes for CLI
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL_ERROR: i32 = 1;
    pub const NOT_FOUND: i32 = 2;
    pub const INVALID_INPUT: i32 = 3;
}

/// Main error type for folio
///
/// Search-stage variants (`QueryParse`, `EmbeddingProvider`,
/// `VectorRetrieval`, `KeywordRetrieval`, `Rerank`) are non-fatal inside the
/// orchestrator: each degrades its own stage. `AggregateFailure` marks the
/// point where retrieval as a whole cannot proceed and the pipeline falls
/// back to a browse listing.
#[derive(Debug, Error)]
pub enum FolioError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Entity not found: {0}")]
    EntityNotFound(String),

    #[error("Query parse error: {0}")]
    QueryParse(String),

    #[error("Embedding provider error: {0}")]
    EmbeddingProvider(String),

    #[error("Vector retrieval error: {0}")]
    VectorRetrieval(String),

    #[error("Keyword retrieval error: {0}")]
    KeywordRetrieval(String),

    #[error("Rerank error: {0}")]
    Rerank(String),

    #[error("Aggregate retrieval failure: {0}")]
    AggregateFailure(String),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("External service error: {0}")]
    ExternalError(String),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl FolioError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::EntityNotFound(_) => exit_codes::NOT_FOUND,
            Self::InvalidInput(_) | Self::Config(_) => exit_codes::INVALID_INPUT,
            _ => exit_codes::GENERAL_ERROR,
        }
    }
}
