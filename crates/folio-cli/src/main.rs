//! Folio CLI
//!
//! Hybrid search over a directory of people and their projects.

use anyhow::Result;
use clap::Parser;
use folio_core::{Config, Database};

mod app;
mod commands;
mod output;

use app::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let cli = Cli::parse();

    // Open database (use FOLIO_DB env var if set, otherwise use default)
    let db_path = std::env::var("FOLIO_DB")
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|_| Database::default_path());
    let db = Database::open(&db_path)?;
    db.initialize()?;

    let config = Config::load()?;

    match cli.command {
        Commands::Search(args) => commands::search::run(args, &db, &config, cli.format).await,
        Commands::Projects(args) => commands::projects::run(args, &db, &config, cli.format).await,
        Commands::Seed(args) => commands::seed::run(args, &db),
        Commands::Embed(args) => commands::embed::run(args, &db, &config).await,
        Commands::Status => commands::status::run(&db, &config, cli.format),
        Commands::Init => commands::init::run(&config, &db_path),
        Commands::Similar(args) => commands::diag::run_similar(args, &config, cli.format).await,
        Commands::Rerank(args) => commands::diag::run_rerank(args, &config, cli.format).await,
        Commands::Embedding(args) => commands::diag::run_embedding(args, &config, cli.format).await,
    }
}
