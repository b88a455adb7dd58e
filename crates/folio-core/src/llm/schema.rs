//! Static registry of structured-output response schemas
//!
//! Schemas are versioned compile-time constants selected by key. Nothing in
//! this crate ever builds a validator from runtime-supplied schema text.

/// A named, versioned response schema for structured LLM output
#[derive(Debug, Clone, Copy)]
pub struct ResponseSchema {
    pub key: &'static str,
    pub version: u32,
    /// System prompt establishing the output contract
    pub system_prompt: &'static str,
    /// JSON schema the response must satisfy, serialized
    pub json_schema: &'static str,
}

/// Query parse schema, v1
pub const QUERY_PARSE_V1: ResponseSchema = ResponseSchema {
    key: "query_parse",
    version: 1,
    system_prompt: "You are a search query parser for a directory of people and projects. \
         Extract structured information from user queries. Output ONLY valid JSON with these \
         fields: intent (profile_search/project_search/mixed/browse), locations (array of \
         strings), skills (array), interests (array), companies (array), confidence (0.0-1.0).",
    json_schema: r#"{
  "type": "object",
  "properties": {
    "intent": {"type": "string", "enum": ["profile_search", "project_search", "mixed", "browse"]},
    "locations": {"type": "array", "items": {"type": "string"}},
    "skills": {"type": "array", "items": {"type": "string"}},
    "interests": {"type": "array", "items": {"type": "string"}},
    "companies": {"type": "array", "items": {"type": "string"}},
    "confidence": {"type": "number", "minimum": 0.0, "maximum": 1.0}
  },
  "required": ["intent", "confidence"]
}"#,
};

/// Rerank scoring schema, v1
pub const RERANK_V1: ResponseSchema = ResponseSchema {
    key: "rerank",
    version: 1,
    system_prompt: "Score document relevance to the query. Output ONLY JSON: \
         {\"scores\": [0.0-1.0, ...]} with one score per document, in input order.",
    json_schema: r#"{
  "type": "object",
  "properties": {
    "scores": {"type": "array", "items": {"type": "number", "minimum": 0.0, "maximum": 1.0}}
  },
  "required": ["scores"]
}"#,
};

static SCHEMAS: &[&ResponseSchema] = &[&QUERY_PARSE_V1, &RERANK_V1];

/// Look up a schema by key (latest version)
pub fn schema(key: &str) -> Option<&'static ResponseSchema> {
    SCHEMAS
        .iter()
        .filter(|s| s.key == key)
        .max_by_key(|s| s.version)
        .copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_lookup() {
        assert_eq!(schema("query_parse").unwrap().version, 1);
        assert_eq!(schema("rerank").unwrap().key, "rerank");
        assert!(schema("freeform").is_none());
    }

    #[test]
    fn test_schemas_are_valid_json() {
        for s in SCHEMAS {
            let parsed: serde_json::Value = serde_json::from_str(s.json_schema).unwrap();
            assert!(parsed.get("type").is_some(), "schema {} missing type", s.key);
        }
    }
}
