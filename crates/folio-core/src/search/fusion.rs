//! Score fusion
//!
//! Merges vector and keyword hits into one ordered candidate list with a
//! composite score and provenance tag. Ordering is fully deterministic:
//! equal composite scores fall back to (entity type, id) ascending, so the
//! same inputs always produce the same output.

use crate::config::SearchConfig;
use crate::llm::{ParsedQuery, QueryIntent};
use crate::model::{EntityKey, SearchableEntity};
use crate::search::SearchMethod;
use std::collections::HashMap;

/// A merged candidate with composite score and provenance
#[derive(Debug, Clone)]
pub struct FusedCandidate {
    pub key: EntityKey,
    pub score: f64,
    pub method: SearchMethod,
}

/// Min-max normalize one source's scores to [0, 1].
///
/// Empty input maps to an empty map; a degenerate range (singleton set or
/// all-equal scores) maps every present entry to 1.0.
fn normalize(hits: &[(EntityKey, f64)]) -> HashMap<EntityKey, f64> {
    if hits.is_empty() {
        return HashMap::new();
    }
    let min = hits.iter().map(|(_, s)| *s).fold(f64::INFINITY, f64::min);
    let max = hits
        .iter()
        .map(|(_, s)| *s)
        .fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;

    hits.iter()
        .map(|(key, score)| {
            let norm = if range > f64::EPSILON {
                (score - min) / range
            } else {
                1.0
            };
            (*key, norm)
        })
        .collect()
}

/// Fixed boost for featured projects and availability flags matching the
/// parsed intent.
fn boost(entity: &SearchableEntity, parsed: &ParsedQuery, config: &SearchConfig) -> f64 {
    match entity {
        SearchableEntity::Project(p) => {
            if p.featured {
                config.featured_boost
            } else {
                0.0
            }
        }
        SearchableEntity::Profile(p) => {
            let matches_intent = match parsed.intent {
                QueryIntent::ProfileSearch => p.availability.hire,
                QueryIntent::Mixed => p.availability.hire || p.availability.collaborate,
                QueryIntent::ProjectSearch | QueryIntent::Browse => false,
            };
            if matches_intent {
                config.availability_boost
            } else {
                0.0
            }
        }
    }
}

/// Merge and rescore candidates from both retrievers.
///
/// `entities` supplies the candidate entities for boost computation; ids
/// absent from it (deleted between retrieval and fetch) are dropped.
pub fn fuse(
    vector_hits: &[(EntityKey, f64)],
    keyword_hits: &[(EntityKey, f64)],
    entities: &HashMap<EntityKey, SearchableEntity>,
    parsed: &ParsedQuery,
    config: &SearchConfig,
) -> Vec<FusedCandidate> {
    let norm_vector = normalize(vector_hits);
    let norm_keyword = normalize(keyword_hits);

    let mut keys: Vec<EntityKey> = norm_vector.keys().chain(norm_keyword.keys()).copied().collect();
    keys.sort();
    keys.dedup();

    let mut fused: Vec<FusedCandidate> = keys
        .into_iter()
        .filter_map(|key| {
            let entity = entities.get(&key)?;
            let v = norm_vector.get(&key);
            let k = norm_keyword.get(&key);
            let method = match (v.is_some(), k.is_some()) {
                (true, true) => SearchMethod::Hybrid,
                (true, false) => SearchMethod::Vector,
                (false, true) => SearchMethod::Keyword,
                (false, false) => unreachable!("key came from one of the sources"),
            };
            let score = config.vector_weight * v.copied().unwrap_or(0.0)
                + config.keyword_weight * k.copied().unwrap_or(0.0)
                + boost(entity, parsed, config);
            Some(FusedCandidate { key, score, method })
        })
        .collect();

    fused.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.key.cmp(&b.key))
    });

    fused
}
