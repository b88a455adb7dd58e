//! Diagnostic commands that call the external services directly

use crate::app::{EmbeddingArgs, OutputFormat, RerankArgs, SimilarArgs};
use anyhow::Result;
use folio_core::{
    find_most_similar, generate_embeddings, rerank_documents, Config, HttpEmbedder, HttpReranker,
};

pub async fn run_similar(args: SimilarArgs, config: &Config, format: OutputFormat) -> Result<()> {
    let embedder = HttpEmbedder::from_config(config.llm_service.clone())?;
    let hits = find_most_similar(
        &embedder,
        &args.query,
        &args.documents,
        args.top_k,
        args.threshold,
    )
    .await?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&hits)?),
        OutputFormat::Cli => {
            if hits.is_empty() {
                println!("No documents above threshold.");
            }
            for hit in &hits {
                println!("{:.4}  [{}] {}", hit.score, hit.index, hit.text);
            }
        }
    }
    Ok(())
}

pub async fn run_rerank(args: RerankArgs, config: &Config, format: OutputFormat) -> Result<()> {
    let reranker = HttpReranker::from_config(config.llm_service.clone())?;
    let results = rerank_documents(&reranker, &args.query, &args.documents, args.top_k).await?;

    match format {
        OutputFormat::Json => {
            let rows: Vec<serde_json::Value> = results
                .iter()
                .map(|r| serde_json::json!({ "id": r.id, "score": r.score }))
                .collect();
            println!("{}", serde_json::to_string_pretty(&rows)?);
        }
        OutputFormat::Cli => {
            for result in &results {
                println!("{:.4}  [{}]", result.score, result.id);
            }
        }
    }
    Ok(())
}

pub async fn run_embedding(args: EmbeddingArgs, config: &Config, format: OutputFormat) -> Result<()> {
    let embedder = HttpEmbedder::from_config(config.llm_service.clone())?;
    let batch = generate_embeddings(&embedder, &args.texts).await?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&batch)?),
        OutputFormat::Cli => {
            println!("model: {}  dimensions: {}", batch.model, batch.dimensions);
            for (text, vector) in args.texts.iter().zip(&batch.embeddings) {
                let head: Vec<String> = vector.iter().take(8).map(|v| format!("{v:.4}")).collect();
                println!("{}: [{}, ...]", text, head.join(", "));
            }
        }
    }
    Ok(())
}
