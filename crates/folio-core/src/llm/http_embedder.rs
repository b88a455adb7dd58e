//! HTTP-based embedder with response validation and bounded retry
//!
//! An all-zero response vector is a provider malfunction, not a valid
//! embedding; it is treated as retryable, the same as a transport error.

use super::{Embedder, LLMClient};
use crate::config::LlmServiceConfig;
use crate::db::is_zero_vector;
use crate::error::{FolioError, Result};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// Attempts per batch, including the first
const MAX_ATTEMPTS: u32 = 3;

/// Base delay for exponential backoff
const BACKOFF_BASE_MS: u64 = 100;

/// Embedder that uses an external HTTP service (vLLM, OpenAI, etc.)
pub struct HttpEmbedder {
    client: Arc<dyn LLMClient>,
}

impl HttpEmbedder {
    /// Create from LLM client
    pub fn new(client: Arc<dyn LLMClient>) -> Self {
        Self { client }
    }

    /// Create from configuration
    pub fn from_config(config: LlmServiceConfig) -> Result<Self> {
        let client = super::InferenceClient::new(config)?;
        Ok(Self {
            client: Arc::new(client),
        })
    }

    /// Create from environment variables
    pub fn from_env() -> Result<Self> {
        let client = super::InferenceClient::from_env()?;
        Ok(Self {
            client: Arc::new(client),
        })
    }

    /// Reject malformed provider responses so they trigger a retry
    fn validate(&self, texts: &[String], vectors: &[Vec<f32>]) -> Result<()> {
        if vectors.len() != texts.len() {
            return Err(FolioError::EmbeddingProvider(format!(
                "provider returned {} embeddings for {} inputs",
                vectors.len(),
                texts.len()
            )));
        }
        let expected = vectors.first().map(|v| v.len()).unwrap_or(0);
        for (i, vector) in vectors.iter().enumerate() {
            if vector.len() != expected {
                return Err(FolioError::EmbeddingProvider(format!(
                    "embedding {} has length {}, expected {}",
                    i,
                    vector.len(),
                    expected
                )));
            }
            if is_zero_vector(vector) {
                return Err(FolioError::EmbeddingProvider(format!(
                    "provider returned all-zero embedding for input {}",
                    i
                )));
            }
        }
        Ok(())
    }
}

#[async_trait]
impl Embedder for HttpEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let results = self.embed_batch(&[text.to_string()]).await?;
        results
            .into_iter()
            .next()
            .ok_or_else(|| FolioError::EmbeddingProvider("No embedding returned".to_string()))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let mut last_error = None;
        for attempt in 0..MAX_ATTEMPTS {
            if attempt > 0 {
                let delay = Duration::from_millis(BACKOFF_BASE_MS << (attempt - 1));
                tracing::debug!(
                    "Retrying embedding batch (attempt {}/{}) after {:?}",
                    attempt + 1,
                    MAX_ATTEMPTS,
                    delay
                );
                tokio::time::sleep(delay).await;
            }

            match self.client.embed_batch(texts).await {
                Ok(vectors) => match self.validate(texts, &vectors) {
                    Ok(()) => return Ok(vectors),
                    Err(e) => {
                        tracing::warn!("Embedding response rejected: {}", e);
                        last_error = Some(e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Embedding request failed: {}", e);
                    last_error = Some(e);
                }
            }
        }

        Err(FolioError::EmbeddingProvider(format!(
            "embedding failed after {} attempts: {}",
            MAX_ATTEMPTS,
            last_error
                .map(|e| e.to_string())
                .unwrap_or_else(|| "unknown error".to_string())
        )))
    }

    fn dimensions(&self) -> usize {
        self.client.embedding_dimensions()
    }

    fn model_name(&self) -> &str {
        self.client.embedding_model()
    }
}
