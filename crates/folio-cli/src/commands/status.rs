//! Status command

use crate::app::OutputFormat;
use anyhow::Result;
use folio_core::{Config, Database};
use serde::Serialize;

#[derive(Serialize)]
struct StatusReport {
    profiles: usize,
    projects: usize,
    embedding_model: String,
    embeddings: folio_core::EmbeddingStats,
}

pub fn run(db: &Database, config: &Config, format: OutputFormat) -> Result<()> {
    let model = config.llm_service.embedding_model.clone();
    let report = StatusReport {
        profiles: db.count_active_profiles()?,
        projects: db.count_active_projects()?,
        embeddings: db.embedding_stats(&model)?,
        embedding_model: model,
    };

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Cli => {
            println!("Profiles:        {}", report.profiles);
            println!("Projects:        {}", report.projects);
            println!();
            println!("Embeddings ({}):", report.embedding_model);
            println!("  Profiles:      {}", report.embeddings.profile_embeddings);
            println!("  Projects:      {}", report.embeddings.project_embeddings);
            println!("  Pending:       {}", report.embeddings.pending);
        }
    }
    Ok(())
}
