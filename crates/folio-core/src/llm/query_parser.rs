//! Parsed query types and the deterministic heuristic parser
//!
//! The heuristic is the fallback behind `HttpQueryParser` and the whole
//! parser when no LLM service is configured: lowercase tokenization plus
//! membership tests against known skill, location, interest, and company
//! vocabularies.

use crate::llm::traits::QueryParser;
use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Confidence assigned to heuristic parses
pub const HEURISTIC_CONFIDENCE: f32 = 0.3;

/// High-level purpose of a query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryIntent {
    ProfileSearch,
    ProjectSearch,
    Mixed,
    Browse,
}

/// Structured intent and entities extracted from a raw query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedQuery {
    pub intent: QueryIntent,
    #[serde(default)]
    pub locations: Vec<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default)]
    pub companies: Vec<String>,
    pub confidence: f32,
}

impl ParsedQuery {
    /// Parse of an empty or whitespace-only query
    pub fn browse() -> Self {
        Self {
            intent: QueryIntent::Browse,
            locations: Vec::new(),
            skills: Vec::new(),
            interests: Vec::new(),
            companies: Vec::new(),
            confidence: 0.0,
        }
    }

    /// Union of all extracted entity strings, lowercased
    pub fn entity_terms(&self) -> Vec<String> {
        self.locations
            .iter()
            .chain(&self.skills)
            .chain(&self.interests)
            .chain(&self.companies)
            .map(|s| s.to_lowercase())
            .collect()
    }
}

/// Common English stop words removed from natural language queries
const STOP_WORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "by", "for", "from", "has", "have", "he", "in",
    "is", "it", "its", "of", "on", "that", "the", "to", "was", "will", "with", "does", "do",
    "did", "can", "could", "should", "would", "what", "where", "when", "why", "how", "who",
    "which", "this", "these", "those", "there", "here", "like", "likes", "looking",
];

lazy_static! {
    static ref TOKEN_RE: Regex = Regex::new(r"[a-z0-9+#]+").unwrap();

    static ref KNOWN_SKILLS: HashSet<&'static str> = [
        "ai", "ml", "rust", "python", "typescript", "javascript", "go", "java", "c++", "c#",
        "react", "vue", "svelte", "node", "swift", "kotlin", "sql", "devops", "kubernetes",
        "design", "ux", "figma", "embedded", "android", "ios", "data", "backend", "frontend",
        "fullstack", "security", "blockchain", "graphics", "audio", "gamedev",
    ]
    .into_iter()
    .collect();

    static ref KNOWN_LOCATIONS: HashSet<&'static str> = [
        "berlin", "london", "paris", "amsterdam", "madrid", "barcelona", "lisbon", "zurich",
        "munich", "hamburg", "vienna", "stockholm", "copenhagen", "oslo", "helsinki", "dublin",
        "new york", "san francisco", "los angeles", "seattle", "austin", "boston", "chicago",
        "toronto", "vancouver", "tokyo", "seoul", "singapore", "sydney", "melbourne", "remote",
    ]
    .into_iter()
    .collect();

    static ref KNOWN_INTERESTS: HashSet<&'static str> = [
        "music", "art", "photography", "climbing", "cycling", "running", "gaming", "cooking",
        "writing", "film", "travel", "chess", "synthesizers", "hiking", "coffee", "typography",
    ]
    .into_iter()
    .collect();

    static ref KNOWN_COMPANIES: HashSet<&'static str> = [
        "google", "meta", "amazon", "microsoft", "apple", "openai", "anthropic", "netflix",
        "spotify", "stripe", "shopify", "github", "figma", "vercel", "mozilla",
    ]
    .into_iter()
    .collect();
}

/// Lowercase tokens with stop words removed
pub fn tokenize(query: &str) -> Vec<String> {
    let lower = query.to_lowercase();
    TOKEN_RE
        .find_iter(&lower)
        .map(|m| m.as_str().to_string())
        .filter(|t| !STOP_WORDS.contains(&t.as_str()))
        .collect()
}

/// Unigrams plus adjacent bigrams, for multi-word vocabulary entries
fn ngrams(tokens: &[String]) -> Vec<String> {
    let mut grams: Vec<String> = tokens.to_vec();
    for pair in tokens.windows(2) {
        grams.push(format!("{} {}", pair[0], pair[1]));
    }
    grams
}

/// Deterministic fallback parser
///
/// Always yields `intent = Mixed` at a fixed low confidence for non-empty
/// input; the orchestrator widens entity types on `Mixed`, which is the safe
/// degradation when real intent is unknown.
pub fn heuristic_parse(query: &str) -> ParsedQuery {
    if query.trim().is_empty() {
        return ParsedQuery::browse();
    }

    let tokens = tokenize(query);
    let grams = ngrams(&tokens);

    let mut parsed = ParsedQuery {
        intent: QueryIntent::Mixed,
        locations: Vec::new(),
        skills: Vec::new(),
        interests: Vec::new(),
        companies: Vec::new(),
        confidence: HEURISTIC_CONFIDENCE,
    };

    for gram in &grams {
        let g = gram.as_str();
        if KNOWN_LOCATIONS.contains(g) && !parsed.locations.iter().any(|x| x == g) {
            parsed.locations.push(gram.clone());
        }
        if KNOWN_SKILLS.contains(g) && !parsed.skills.iter().any(|x| x == g) {
            parsed.skills.push(gram.clone());
        }
        if KNOWN_INTERESTS.contains(g) && !parsed.interests.iter().any(|x| x == g) {
            parsed.interests.push(gram.clone());
        }
        if KNOWN_COMPANIES.contains(g) && !parsed.companies.iter().any(|x| x == g) {
            parsed.companies.push(gram.clone());
        }
    }

    parsed
}

/// Parser that only ever runs the heuristic. Used when no LLM service is
/// configured, and as a deterministic stand-in for tests.
pub struct HeuristicQueryParser;

#[async_trait]
impl QueryParser for HeuristicQueryParser {
    async fn parse(&self, query: &str) -> ParsedQuery {
        heuristic_parse(query)
    }
}
