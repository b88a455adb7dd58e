//! Diagnostic operations for exercising the external services directly,
//! outside the search pipeline. Unlike the orchestrator these propagate
//! errors, since the caller is debugging the services themselves.

use crate::db::cosine_similarity;
use crate::error::Result;
use crate::llm::{Embedder, RerankDocument, RerankResult, Reranker};
use serde::Serialize;

/// Raw embedder output for a batch of texts
#[derive(Debug, Clone, Serialize)]
pub struct EmbeddingBatch {
    pub model: String,
    pub dimensions: usize,
    pub embeddings: Vec<Vec<f32>>,
}

/// A document scored against a query embedding
#[derive(Debug, Clone, Serialize)]
pub struct SimilarDocument {
    /// Position in the input document list
    pub index: usize,
    pub text: String,
    pub score: f64,
}

/// Embed a batch of texts and return the validated vectors
pub async fn generate_embeddings(embedder: &dyn Embedder, texts: &[String]) -> Result<EmbeddingBatch> {
    let embeddings = embedder.embed_batch(texts).await?;
    let dimensions = embeddings
        .first()
        .map(|v| v.len())
        .unwrap_or_else(|| embedder.dimensions());
    Ok(EmbeddingBatch {
        model: embedder.model_name().to_string(),
        dimensions,
        embeddings,
    })
}

/// Embed the query and every document, then rank documents by cosine
/// similarity. Documents below the threshold are dropped.
pub async fn find_most_similar(
    embedder: &dyn Embedder,
    query: &str,
    documents: &[String],
    top_k: usize,
    threshold: f32,
) -> Result<Vec<SimilarDocument>> {
    if documents.is_empty() {
        return Ok(Vec::new());
    }

    let query_vector = embedder.embed(query).await?;
    let doc_vectors = embedder.embed_batch(documents).await?;

    let mut scored: Vec<SimilarDocument> = doc_vectors
        .iter()
        .enumerate()
        .map(|(index, vector)| SimilarDocument {
            index,
            text: documents[index].clone(),
            score: cosine_similarity(&query_vector, vector) as f64,
        })
        .filter(|d| d.score >= threshold as f64)
        .collect();

    scored.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.index.cmp(&b.index))
    });
    scored.truncate(top_k);
    Ok(scored)
}

/// Rerank free-form documents, returning at most `top_k` results in
/// descending score order
pub async fn rerank_documents(
    reranker: &dyn Reranker,
    query: &str,
    documents: &[String],
    top_k: usize,
) -> Result<Vec<RerankResult>> {
    let docs: Vec<RerankDocument> = documents
        .iter()
        .enumerate()
        .map(|(i, text)| RerankDocument {
            id: i.to_string(),
            text: text.clone(),
        })
        .collect();

    let mut results = reranker.rerank(query, &docs).await?;
    results.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.id.cmp(&b.id))
    });
    results.truncate(top_k);
    Ok(results)
}
