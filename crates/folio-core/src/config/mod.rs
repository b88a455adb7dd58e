//! Configuration management

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// LLM service configuration for external inference
    #[serde(default)]
    pub llm_service: LlmServiceConfig,

    /// Search engine tuning
    #[serde(default)]
    pub search: SearchConfig,
}

/// LLM service configuration for external inference
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmServiceConfig {
    /// Base URL of the LLM service for chat/completions (query parsing, reranking)
    pub url: String,

    /// Model name for chat completions
    #[serde(default = "default_chat_model")]
    pub model: String,

    /// Base URL for embeddings service (can be different from LLM URL)
    #[serde(default)]
    pub embedding_url: Option<String>,

    /// Model name for embeddings
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,

    /// Embedding dimensions (fixed per model)
    #[serde(default)]
    pub embedding_dimensions: Option<usize>,

    /// API key (optional, for authenticated services)
    #[serde(default)]
    pub api_key: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl LlmServiceConfig {
    /// Get the embeddings URL (falls back to main URL if not specified)
    pub fn embeddings_url(&self) -> &str {
        self.embedding_url.as_deref().unwrap_or(&self.url)
    }
}

impl Default for LlmServiceConfig {
    fn default() -> Self {
        Self {
            url: std::env::var("FOLIO_LLM_URL")
                .unwrap_or_else(|_| "http://localhost:8000".to_string()),
            model: default_chat_model(),
            embedding_url: std::env::var("FOLIO_EMBEDDING_URL").ok(),
            embedding_model: default_embedding_model(),
            embedding_dimensions: std::env::var("FOLIO_EMBEDDING_DIMS")
                .ok()
                .and_then(|s| s.parse().ok()),
            api_key: std::env::var("FOLIO_LLM_API_KEY").ok(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_chat_model() -> String {
    std::env::var("FOLIO_LLM_MODEL")
        .unwrap_or_else(|_| "meta-llama/Llama-3.1-8B-Instruct".to_string())
}

fn default_embedding_model() -> String {
    std::env::var("FOLIO_EMBEDDING_MODEL").unwrap_or_else(|_| "BAAI/bge-large-en-v1.5".to_string())
}

fn default_timeout() -> u64 {
    30
}

/// Search engine tuning
///
/// Fusion weights and thresholds are configuration constants, not computed
/// per request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Weight of the normalized vector similarity in the composite score
    #[serde(default = "default_vector_weight")]
    pub vector_weight: f64,

    /// Weight of the normalized keyword score in the composite score
    #[serde(default = "default_keyword_weight")]
    pub keyword_weight: f64,

    /// Boost added to featured projects
    #[serde(default = "default_boost")]
    pub featured_boost: f64,

    /// Boost added when availability flags match the parsed intent
    #[serde(default = "default_boost")]
    pub availability_boost: f64,

    /// Minimum cosine similarity for profile vector hits
    #[serde(default = "default_profile_threshold")]
    pub profile_threshold: f32,

    /// Minimum cosine similarity for project vector hits
    #[serde(default = "default_project_threshold")]
    pub project_threshold: f32,

    /// Maximum fused candidates sent to the reranker
    #[serde(default = "default_rerank_candidates")]
    pub rerank_candidates: usize,

    /// Timeout applied to each external call (parse, embed, rerank)
    #[serde(default = "default_stage_timeout")]
    pub stage_timeout_secs: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            vector_weight: default_vector_weight(),
            keyword_weight: default_keyword_weight(),
            featured_boost: default_boost(),
            availability_boost: default_boost(),
            profile_threshold: default_profile_threshold(),
            project_threshold: default_project_threshold(),
            rerank_candidates: default_rerank_candidates(),
            stage_timeout_secs: default_stage_timeout(),
        }
    }
}

fn default_vector_weight() -> f64 {
    0.6
}

fn default_keyword_weight() -> f64 {
    0.4
}

fn default_boost() -> f64 {
    0.05
}

fn default_profile_threshold() -> f32 {
    0.25
}

fn default_project_threshold() -> f32 {
    0.4
}

fn default_rerank_candidates() -> usize {
    20
}

fn default_stage_timeout() -> u64 {
    10
}

impl Config {
    /// Load config from default path
    pub fn load() -> Result<Self> {
        let path = Self::default_path();
        if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            let config: Config = serde_yaml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Save config to default path
    pub fn save(&self) -> Result<()> {
        let path = Self::default_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get default config path
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(crate::CONFIG_DIR_NAME)
            .join("config.yml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_config_defaults() {
        let cfg = SearchConfig::default();
        assert!((cfg.vector_weight + cfg.keyword_weight - 1.0).abs() < 1e-9);
        assert!(cfg.project_threshold > cfg.profile_threshold);
    }

    #[test]
    fn test_config_roundtrip_yaml() {
        let cfg = Config::default();
        let yaml = serde_yaml::to_string(&cfg).unwrap();
        let back: Config = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(back.search.rerank_candidates, cfg.search.rerank_candidates);
    }
}
