//! Search orchestrator
//!
//! Runs the full pipeline: parse and embed concurrently, retrieve from both
//! sources concurrently, fuse, optionally rerank, then sort and paginate. The entry point
//! never returns an error; every stage failure degrades to a smaller
//! pipeline, bottoming out at a plain browse listing.

use crate::config::{Config, SearchConfig};
use crate::db::{Database, EmbeddingStats};
use crate::error::Result;
use crate::llm::{
    heuristic_parse, tokenize, Embedder, HttpEmbedder, HttpQueryParser, HttpReranker,
    InferenceClient, LLMClient, ParsedQuery, QueryParser, RerankDocument, Reranker,
};
use crate::model::{EntityKey, EntityType, SearchableEntity};
use crate::search::vector::{load_entity_vectors, score_vectors};
use crate::search::{
    fuse, keyword_retrieve, FusedCandidate, SearchMethod, SearchOptions, SearchResponse,
    SearchResultItem, SearchStats, SearchTiming, SortOrder,
};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Shared handles for one search deployment
///
/// Any of the three services may be absent; the orchestrator skips the
/// stages it has no client for.
pub struct SearchContext {
    pub embedder: Option<Arc<dyn Embedder>>,
    pub query_parser: Option<Arc<dyn QueryParser>>,
    pub reranker: Option<Arc<dyn Reranker>>,
    pub config: SearchConfig,
    pub stats: Arc<SearchStats>,
    /// Model whose stored embeddings the vector stage reads
    pub embedding_model: String,
}

impl SearchContext {
    /// Context with no external services; every search degrades to keyword
    /// retrieval or browse.
    pub fn offline(config: SearchConfig, embedding_model: impl Into<String>) -> Self {
        Self {
            embedder: None,
            query_parser: None,
            reranker: None,
            config,
            stats: Arc::new(SearchStats::new()),
            embedding_model: embedding_model.into(),
        }
    }

    fn stage_timeout(&self) -> Duration {
        Duration::from_secs(self.config.stage_timeout_secs)
    }
}

/// Build a fully wired context from configuration, sharing one HTTP client
/// across the embedder, query parser, and reranker.
pub fn initialize_search(config: &Config) -> Result<SearchContext> {
    let client: Arc<dyn LLMClient> = Arc::new(InferenceClient::new(config.llm_service.clone())?);
    Ok(SearchContext {
        embedding_model: config.llm_service.embedding_model.clone(),
        embedder: Some(Arc::new(HttpEmbedder::new(client.clone()))),
        query_parser: Some(Arc::new(HttpQueryParser::new(client.clone()))),
        reranker: Some(Arc::new(HttpReranker::new(client))),
        config: config.search.clone(),
        stats: Arc::new(SearchStats::new()),
    })
}

/// Embedding inventory for the model this context searches with
pub fn embedding_stats(db: &Database, ctx: &SearchContext) -> Result<EmbeddingStats> {
    db.embedding_stats(&ctx.embedding_model)
}

/// Execute a search. Infallible: failures degrade the pipeline and are
/// visible in the response (method tags, timing, parse confidence), never
/// as errors.
pub async fn hybrid_search(
    db: &Database,
    query: &str,
    options: &SearchOptions,
    ctx: &SearchContext,
) -> SearchResponse {
    let trimmed = query.trim();

    // Empty query is a listing request, not a failed search. No external
    // calls, no timing.
    if trimmed.is_empty() {
        ctx.stats.record_browse(0);
        return browse_listing(db, options);
    }

    let started = Instant::now();

    // Without any stored vectors the pipeline cannot beat a plain listing
    let stored = db
        .embedding_stats(&ctx.embedding_model)
        .map(|s| s.total_embeddings)
        .unwrap_or(0);
    if stored == 0 {
        tracing::debug!("no stored embeddings for {}, browsing", ctx.embedding_model);
        let mut response = browse_listing(db, options);
        response.timing.total = started.elapsed().as_millis() as u64;
        ctx.stats.record_browse(response.timing.total);
        return response;
    }

    // Parse and embed both only need the raw query, so they run side by side
    let ((parsed, parse_ms), (query_vector, _embed_ms)) =
        tokio::join!(parse_stage(trimmed, ctx), embed_stage(trimmed, ctx));

    let mut vector_hits: Vec<(EntityKey, f64)> = Vec::new();
    let mut keyword_hits: Vec<(EntityKey, f64)> = Vec::new();
    let mut vector_failed = false;
    let mut keyword_failed = false;

    let mut terms = parsed.entity_terms();
    for token in tokenize(trimmed) {
        if !terms.contains(&token) {
            terms.push(token);
        }
    }

    // Both retrievers run concurrently: the shared connection serves the
    // reads serially, then cosine scoring moves to the blocking pool while
    // the keyword stage queries. Joined below before fusion.
    let vector_started = Instant::now();
    let mut scoring = None;
    if let Some(ref qv) = query_vector {
        let mut batches = Vec::new();
        for entity_type in &options.entity_types {
            let threshold = options.threshold.unwrap_or(match entity_type {
                EntityType::Profile => ctx.config.profile_threshold,
                EntityType::Project => ctx.config.project_threshold,
            });
            match load_entity_vectors(db, *entity_type, &ctx.embedding_model) {
                Ok(stored) => batches.push((*entity_type, threshold, stored)),
                Err(e) => {
                    tracing::warn!("vector retrieval failed for {}: {}", entity_type.as_str(), e);
                    vector_failed = true;
                }
            }
        }
        let qv = qv.clone();
        let limit = options.max_results;
        scoring = Some(tokio::task::spawn_blocking(move || {
            let mut hits: Vec<(EntityKey, f64)> = Vec::new();
            for (entity_type, threshold, stored) in batches {
                hits.extend(
                    score_vectors(&qv, stored, threshold, limit)
                        .into_iter()
                        .map(|(id, s)| ((entity_type, id), s)),
                );
            }
            hits
        }));
    }

    let keyword_started = Instant::now();
    for entity_type in &options.entity_types {
        match keyword_retrieve(db, &terms, *entity_type, options.max_results) {
            Ok(hits) => {
                keyword_hits.extend(hits.into_iter().map(|(id, s)| ((*entity_type, id), s)))
            }
            Err(e) => {
                tracing::warn!("keyword retrieval failed for {}: {}", entity_type.as_str(), e);
                keyword_failed = true;
            }
        }
    }
    let keyword_ms = keyword_started.elapsed().as_millis() as u64;

    if let Some(job) = scoring {
        match job.await {
            Ok(hits) => vector_hits = hits,
            Err(e) => {
                tracing::warn!("vector scoring task failed: {}", e);
                vector_failed = true;
            }
        }
    }
    let vector_ms = if query_vector.is_some() {
        vector_started.elapsed().as_millis() as u64
    } else {
        0
    };

    let vector_usable = query_vector.is_some() && !vector_failed;
    if !vector_usable || keyword_failed {
        ctx.stats.record_degraded();
    }
    if !vector_usable && keyword_failed {
        tracing::warn!("both retrieval stages failed, falling back to browse");
        let mut response = browse_listing(db, options);
        response.timing.total = started.elapsed().as_millis() as u64;
        ctx.stats.record_browse(response.timing.total);
        return response;
    }

    let entities = match fetch_entities(db, &vector_hits, &keyword_hits) {
        Ok(map) => map,
        Err(e) => {
            tracing::warn!("candidate fetch failed, falling back to browse: {}", e);
            let mut response = browse_listing(db, options);
            response.timing.total = started.elapsed().as_millis() as u64;
            ctx.stats.record_browse(response.timing.total);
            return response;
        }
    };

    let mut fused = fuse(&vector_hits, &keyword_hits, &entities, &parsed, &ctx.config);
    fused.truncate(options.max_results);

    let mut rerank_ms = 0;
    // A single candidate has nothing to reorder
    if options.enable_reranking && fused.len() > 1 {
        if let Some(ref reranker) = ctx.reranker {
            let rerank_started = Instant::now();
            rerank_stage(trimmed, &mut fused, &entities, reranker.as_ref(), ctx).await;
            rerank_ms = rerank_started.elapsed().as_millis() as u64;
        }
    }

    let total_count = fused.len();

    let mut ordered: Vec<(FusedCandidate, SearchableEntity)> = fused
        .into_iter()
        .filter_map(|c| entities.get(&c.key).cloned().map(|e| (c, e)))
        .collect();
    sort_candidates(&mut ordered, options.sort);

    let offset = options.page.saturating_sub(1) * options.limit;
    let results = ordered
        .into_iter()
        .skip(offset)
        .take(options.limit)
        .enumerate()
        .map(|(i, (candidate, entity))| SearchResultItem {
            entity,
            score: candidate.score,
            method: candidate.method,
            rank: offset + i + 1,
        })
        .collect();

    let total_ms = started.elapsed().as_millis() as u64;
    ctx.stats.record_hybrid(total_ms);

    SearchResponse {
        results,
        total_count,
        timing: SearchTiming {
            parse: parse_ms,
            vector: vector_ms,
            keyword: keyword_ms,
            reranking: rerank_ms,
            total: total_ms,
        },
        parsed_query: parsed,
    }
}

async fn parse_stage(query: &str, ctx: &SearchContext) -> (ParsedQuery, u64) {
    let started = Instant::now();
    let parsed = match ctx.query_parser {
        Some(ref parser) => {
            match tokio::time::timeout(ctx.stage_timeout(), parser.parse(query)).await {
                Ok(parsed) => parsed,
                Err(_) => {
                    tracing::warn!("query parse timed out, using heuristics");
                    heuristic_parse(query)
                }
            }
        }
        None => heuristic_parse(query),
    };
    (parsed, started.elapsed().as_millis() as u64)
}

async fn embed_stage(query: &str, ctx: &SearchContext) -> (Option<Vec<f32>>, u64) {
    let started = Instant::now();
    let vector = match ctx.embedder {
        Some(ref embedder) => {
            match tokio::time::timeout(ctx.stage_timeout(), embedder.embed(query)).await {
                Ok(Ok(vector)) => Some(vector),
                Ok(Err(e)) => {
                    tracing::warn!("query embedding failed: {}", e);
                    None
                }
                Err(_) => {
                    tracing::warn!("query embedding timed out");
                    None
                }
            }
        }
        None => None,
    };
    (vector, started.elapsed().as_millis() as u64)
}

fn fetch_entities(
    db: &Database,
    vector_hits: &[(EntityKey, f64)],
    keyword_hits: &[(EntityKey, f64)],
) -> Result<HashMap<EntityKey, SearchableEntity>> {
    let mut profile_ids = Vec::new();
    let mut project_ids = Vec::new();
    for (key, _) in vector_hits.iter().chain(keyword_hits) {
        match key.0 {
            EntityType::Profile => profile_ids.push(key.1),
            EntityType::Project => project_ids.push(key.1),
        }
    }
    profile_ids.sort_unstable();
    profile_ids.dedup();
    project_ids.sort_unstable();
    project_ids.dedup();

    let mut entities = HashMap::new();
    for profile in db.get_profiles_by_ids(&profile_ids)? {
        entities.insert(
            (EntityType::Profile, profile.id),
            SearchableEntity::Profile(profile),
        );
    }
    for project in db.get_projects_by_ids(&project_ids)? {
        entities.insert(
            (EntityType::Project, project.id),
            SearchableEntity::Project(project),
        );
    }
    Ok(entities)
}

/// Reorder the fused head using the reranker. Never introduces candidates
/// the retrievers did not surface; on any failure the fused order stands.
async fn rerank_stage(
    query: &str,
    fused: &mut Vec<FusedCandidate>,
    entities: &HashMap<EntityKey, SearchableEntity>,
    reranker: &dyn Reranker,
    ctx: &SearchContext,
) {
    let head_len = fused.len().min(ctx.config.rerank_candidates);
    let documents: Vec<RerankDocument> = fused[..head_len]
        .iter()
        .filter_map(|c| {
            entities.get(&c.key).map(|e| RerankDocument {
                id: doc_id(&c.key),
                text: e.searchable_text(),
            })
        })
        .collect();

    let scores: HashMap<String, f64> =
        match tokio::time::timeout(ctx.stage_timeout(), reranker.rerank(query, &documents)).await {
            Ok(Ok(results)) => results.into_iter().map(|r| (r.id, r.score)).collect(),
            Ok(Err(e)) => {
                tracing::warn!("rerank failed, keeping fused order: {}", e);
                ctx.stats.record_rerank_failure();
                return;
            }
            Err(_) => {
                tracing::warn!("rerank timed out, keeping fused order");
                ctx.stats.record_rerank_failure();
                return;
            }
        };

    let tail = fused.split_off(head_len);
    let (mut scored, mut unscored): (Vec<FusedCandidate>, Vec<FusedCandidate>) = fused
        .drain(..)
        .partition(|c| scores.contains_key(&doc_id(&c.key)));

    for candidate in &mut scored {
        candidate.score = scores[&doc_id(&candidate.key)];
        candidate.method = SearchMethod::Rerank;
    }
    scored.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.key.cmp(&b.key))
    });

    // Candidates the reranker skipped keep their fused position after the
    // reranked block
    fused.extend(scored);
    fused.append(&mut unscored);
    fused.extend(tail);
}

fn doc_id(key: &EntityKey) -> String {
    format!("{}:{}", key.0.as_str(), key.1)
}

fn sort_candidates(items: &mut [(FusedCandidate, SearchableEntity)], sort: SortOrder) {
    match sort {
        // Fused order is already by descending relevance
        SortOrder::Relevance => {}
        SortOrder::Recent => items.sort_by(|a, b| {
            b.1.updated_at()
                .cmp(a.1.updated_at())
                .then_with(|| a.0.key.cmp(&b.0.key))
        }),
        SortOrder::Name => items.sort_by(|a, b| {
            a.1.name()
                .to_lowercase()
                .cmp(&b.1.name().to_lowercase())
                .then_with(|| a.0.key.cmp(&b.0.key))
        }),
        // Stable partition over the whole candidate set, before pagination,
        // so a low-scoring featured entity still reaches the first page
        SortOrder::Featured => items.sort_by_key(|(_, entity)| match entity {
            SearchableEntity::Project(p) => !p.featured,
            SearchableEntity::Profile(_) => true,
        }),
    }
}

/// Non-query listing: most recently updated (or alphabetical) active
/// entities, paginated. Also the bottom of the degradation ladder, so db
/// errors yield an empty page rather than propagating.
pub fn browse_listing(db: &Database, options: &SearchOptions) -> SearchResponse {
    match try_browse(db, options) {
        Ok(response) => response,
        Err(e) => {
            tracing::warn!("browse listing failed: {}", e);
            SearchResponse {
                results: Vec::new(),
                total_count: 0,
                timing: SearchTiming::default(),
                parsed_query: ParsedQuery::browse(),
            }
        }
    }
}

fn try_browse(db: &Database, options: &SearchOptions) -> Result<SearchResponse> {
    let by_name = matches!(options.sort, SortOrder::Name);
    // Over-fetch per type so the merged slice is exact
    let fetch = options.page.saturating_mul(options.limit);

    let mut entities: Vec<SearchableEntity> = Vec::new();
    let mut total_count = 0;
    for entity_type in &options.entity_types {
        match entity_type {
            EntityType::Profile => {
                total_count += db.count_active_profiles()?;
                entities.extend(
                    db.browse_profiles(by_name, fetch, 0)?
                        .into_iter()
                        .map(SearchableEntity::Profile),
                );
            }
            EntityType::Project => {
                total_count += db.count_active_projects()?;
                let order = if by_name {
                    crate::db::ProjectOrder::Name
                } else {
                    crate::db::ProjectOrder::Recent
                };
                entities.extend(
                    db.browse_projects_page(order, fetch, 0)?
                        .into_iter()
                        .map(SearchableEntity::Project),
                );
            }
        }
    }

    if by_name {
        entities.sort_by(|a, b| {
            a.name()
                .to_lowercase()
                .cmp(&b.name().to_lowercase())
                .then_with(|| a.key().cmp(&b.key()))
        });
    } else {
        entities.sort_by(|a, b| {
            b.updated_at()
                .cmp(a.updated_at())
                .then_with(|| a.key().cmp(&b.key()))
        });
    }

    let offset = options.page.saturating_sub(1) * options.limit;
    let results = entities
        .into_iter()
        .skip(offset)
        .take(options.limit)
        .enumerate()
        .map(|(i, entity)| SearchResultItem {
            entity,
            score: 0.0,
            method: SearchMethod::Browse,
            rank: offset + i + 1,
        })
        .collect();

    Ok(SearchResponse {
        results,
        total_count,
        timing: SearchTiming::default(),
        parsed_query: ParsedQuery::browse(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::NewProfile;
    use crate::model::Availability;

    fn seeded_db(count: usize) -> Database {
        let db = Database::open_in_memory().unwrap();
        db.initialize().unwrap();
        for i in 0..count {
            db.insert_profile(&NewProfile {
                handle: format!("u{i}"),
                display_name: format!("User {i:02}"),
                headline: None,
                bio: None,
                skills: vec![],
                interests: vec![],
                location: None,
                availability: Availability::default(),
            })
            .unwrap();
        }
        db
    }

    #[tokio::test]
    async fn test_empty_query_browses_with_zero_timing() {
        let db = seeded_db(3);
        let ctx = SearchContext::offline(SearchConfig::default(), "m");
        let options = SearchOptions {
            entity_types: vec![EntityType::Profile],
            ..Default::default()
        };

        let response = hybrid_search(&db, "   ", &options, &ctx).await;
        assert_eq!(response.total_count, 3);
        assert_eq!(response.timing.total, 0);
        assert!(response
            .results
            .iter()
            .all(|r| r.method == SearchMethod::Browse));
        assert_eq!(ctx.stats.snapshot().browse_listings, 1);
    }

    #[tokio::test]
    async fn test_no_embeddings_falls_back_to_browse() {
        let db = seeded_db(2);
        let ctx = SearchContext::offline(SearchConfig::default(), "m");
        let options = SearchOptions {
            entity_types: vec![EntityType::Profile],
            ..Default::default()
        };

        let response = hybrid_search(&db, "rust berlin", &options, &ctx).await;
        assert_eq!(response.total_count, 2);
        assert!(response
            .results
            .iter()
            .all(|r| r.method == SearchMethod::Browse));
    }

    #[test]
    fn test_browse_pagination_ranks_continue() {
        let db = seeded_db(5);
        let options = SearchOptions {
            entity_types: vec![EntityType::Profile],
            page: 2,
            limit: 2,
            ..Default::default()
        };

        let response = browse_listing(&db, &options);
        assert_eq!(response.total_count, 5);
        assert_eq!(response.results.len(), 2);
        assert_eq!(response.results[0].rank, 3);
        assert_eq!(response.results[1].rank, 4);
    }

    #[test]
    fn test_browse_name_order() {
        let db = seeded_db(3);
        let options = SearchOptions {
            entity_types: vec![EntityType::Profile],
            sort: SortOrder::Name,
            ..Default::default()
        };

        let response = browse_listing(&db, &options);
        let names: Vec<&str> = response.results.iter().map(|r| r.entity.name()).collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
    }
}
