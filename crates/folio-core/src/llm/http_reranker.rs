//! HTTP-based reranker using an external LLM service
//!
//! Cross-encoder style scoring of (query, candidate text) pairs. Unparseable
//! responses are reported as errors so the orchestrator skips the stage and
//! keeps the fused order; uniform fill-in scores would perturb the order
//! without adding information.

use super::schema;
use super::{ChatMessage, LLMClient, RerankDocument, RerankResult, Reranker};
use crate::config::LlmServiceConfig;
use crate::error::{FolioError, Result};
use async_trait::async_trait;
use std::sync::Arc;

/// Maximum documents per rerank call, to bound prompt size
const MAX_RERANK_DOCS: usize = 20;

/// Per-document text budget in the prompt
const DOC_TEXT_BUDGET: usize = 200;

/// Reranker using external HTTP LLM service
pub struct HttpReranker {
    client: Arc<dyn LLMClient>,
}

impl HttpReranker {
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
}

#[async_trait]
impl Reranker for HttpReranker {
    async fn rerank(&self, query: &str, documents: &[RerankDocument]) -> Result<Vec<RerankResult>> {
        if documents.is_empty() {
            return Ok(vec![]);
        }

        let docs_to_rerank = if documents.len() > MAX_RERANK_DOCS {
            &documents[..MAX_RERANK_DOCS]
        } else {
            documents
        };

        let schema = schema::schema("rerank")
            .ok_or_else(|| FolioError::Rerank("rerank schema missing".to_string()))?;

        let messages = vec![
            ChatMessage::system(schema.system_prompt),
            ChatMessage::user(build_reranking_prompt(query, docs_to_rerank)),
        ];

        let response = self.client.chat_completion(messages).await?;
        parse_reranking_response(&response, docs_to_rerank)
    }

    fn model_name(&self) -> &str {
        self.client.model_name()
    }
}

fn build_reranking_prompt(query: &str, documents: &[RerankDocument]) -> String {
    let mut prompt = format!("Q: \"{}\"\nDocs:\n", query);

    for (idx, doc) in documents.iter().enumerate() {
        let text: String = doc.text.chars().take(DOC_TEXT_BUDGET).collect();
        prompt.push_str(&format!("[{}] {}\n", idx, text));
    }

    prompt.push_str("\nScore each doc 0-1 for relevance. JSON:\n{\"scores\":[...]}\n");
    prompt
}

fn parse_reranking_response(
    response: &str,
    documents: &[RerankDocument],
) -> Result<Vec<RerankResult>> {
    let json_str = match (response.find('{'), response.rfind('}')) {
        (Some(start), Some(end)) if end > start => &response[start..=end],
        _ => {
            return Err(FolioError::Rerank(
                "no JSON object in rerank response".to_string(),
            ))
        }
    };

    let parsed_json: serde_json::Value = serde_json::from_str(json_str)
        .map_err(|e| FolioError::Rerank(format!("JSON parse error: {}", e)))?;

    let scores = parsed_json["scores"]
        .as_array()
        .ok_or_else(|| FolioError::Rerank("missing scores array".to_string()))?;

    // Scores map to documents by index, in input order
    Ok(documents
        .iter()
        .enumerate()
        .map(|(idx, doc)| {
            let score = scores
                .get(idx)
                .and_then(|v| v.as_f64())
                .unwrap_or(0.0)
                .clamp(0.0, 1.0);
            RerankResult {
                id: doc.id.clone(),
                score,
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn docs(n: usize) -> Vec<RerankDocument> {
        (0..n)
            .map(|i| RerankDocument {
                id: format!("profile:{}", i),
                text: format!("candidate {}", i),
            })
            .collect()
    }

    #[test]
    fn test_scores_map_by_index() {
        let documents = docs(3);
        let results =
            parse_reranking_response(r#"{"scores": [0.9, 0.1, 0.5]}"#, &documents).unwrap();
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].id, "profile:0");
        assert!((results[0].score - 0.9).abs() < 1e-9);
        assert!((results[2].score - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_no_new_ids_introduced() {
        let documents = docs(2);
        let results =
            parse_reranking_response(r#"{"scores": [0.2, 0.8, 0.6, 0.4]}"#, &documents).unwrap();
        assert_eq!(results.len(), 2);
        for r in &results {
            assert!(documents.iter().any(|d| d.id == r.id));
        }
    }

    #[test]
    fn test_unparseable_response_is_error() {
        let documents = docs(2);
        let err = parse_reranking_response("no json here", &documents).unwrap_err();
        assert!(matches!(err, FolioError::Rerank(_)));
    }

    #[test]
    fn test_out_of_range_scores_clamped() {
        let documents = docs(2);
        let results =
            parse_reranking_response(r#"{"scores": [1.7, -0.4]}"#, &documents).unwrap();
        assert_eq!(results[0].score, 1.0);
        assert_eq!(results[1].score, 0.0);
    }

    #[test]
    fn test_prompt_truncates_long_documents() {
        let long_doc = vec![RerankDocument {
            id: "p:1".into(),
            text: "x".repeat(5000),
        }];
        let prompt = build_reranking_prompt("query", &long_doc);
        assert!(prompt.len() < 1000);
    }
}
