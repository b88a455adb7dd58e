//! HTTP-based query parser using an external LLM service
//!
//! One structured-output call per non-empty query; any provider failure
//! falls back to the deterministic heuristic. `parse` never fails.

use super::query_parser::{heuristic_parse, ParsedQuery, QueryIntent};
use super::schema::{self, ResponseSchema};
use super::{ChatMessage, LLMClient, QueryParser};
use crate::config::LlmServiceConfig;
use crate::error::{FolioError, Result};
use async_trait::async_trait;
use std::sync::Arc;

/// Query parser backed by an external chat-completion service
pub struct HttpQueryParser {
    client: Arc<dyn LLMClient>,
}

impl HttpQueryParser {
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

    async fn parse_with_llm(&self, query: &str) -> Result<ParsedQuery> {
        let schema = schema::schema("query_parse")
            .ok_or_else(|| FolioError::Llm("query_parse schema missing".to_string()))?;

        let messages = vec![
            ChatMessage::system(schema.system_prompt),
            ChatMessage::user(build_parse_prompt(query, schema)),
        ];

        let response = self.client.chat_completion(messages).await?;
        parse_query_response(&response)
    }
}

#[async_trait]
impl QueryParser for HttpQueryParser {
    async fn parse(&self, query: &str) -> ParsedQuery {
        if query.trim().is_empty() {
            return ParsedQuery::browse();
        }

        match self.parse_with_llm(query).await {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("LLM query parse failed: {}, using heuristic fallback", e);
                heuristic_parse(query)
            }
        }
    }
}

fn build_parse_prompt(query: &str, schema: &ResponseSchema) -> String {
    format!(
        r#"Parse this directory search query:

Query: "{}"

The response must satisfy this JSON schema:
{}

Examples:
Input: "AI developers in Berlin who like music"
Output: {{"intent": "profile_search", "locations": ["Berlin"], "skills": ["ai"], "interests": ["music"], "companies": [], "confidence": 0.92}}

Input: "open source audio projects"
Output: {{"intent": "project_search", "locations": [], "skills": ["audio"], "interests": [], "companies": [], "confidence": 0.88}}

Now parse the query above. Output only JSON:"#,
        query, schema.json_schema
    )
}

fn parse_query_response(response: &str) -> Result<ParsedQuery> {
    // Extract JSON from the response (handles markdown fences and extra text)
    let json_str = match (response.find('{'), response.rfind('}')) {
        (Some(start), Some(end)) if end > start => &response[start..=end],
        _ => {
            return Err(FolioError::QueryParse(
                "no JSON object in LLM response".to_string(),
            ))
        }
    };

    let parsed_json: serde_json::Value = serde_json::from_str(json_str)
        .map_err(|e| FolioError::QueryParse(format!("JSON parse error: {}", e)))?;

    let intent = match parsed_json["intent"].as_str() {
        Some("profile_search") => QueryIntent::ProfileSearch,
        Some("project_search") => QueryIntent::ProjectSearch,
        Some("browse") => QueryIntent::Browse,
        _ => QueryIntent::Mixed,
    };

    let strings = |key: &str| -> Vec<String> {
        parsed_json[key]
            .as_array()
            .map(|arr| {
                arr.iter()
                    .filter_map(|v| v.as_str())
                    .map(|s| s.to_string())
                    .collect()
            })
            .unwrap_or_default()
    };

    let confidence = parsed_json["confidence"].as_f64().unwrap_or(0.5) as f32;

    Ok(ParsedQuery {
        intent,
        locations: strings("locations"),
        skills: strings("skills"),
        interests: strings("interests"),
        companies: strings("companies"),
        confidence: confidence.clamp(0.0, 1.0),
    })
}
