//! CLI argument definitions

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "folio")]
#[command(
    author,
    version,
    about = "Hybrid search over a directory of people and their projects"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format
    #[arg(long, global = true, value_enum, default_value = "cli")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Search profiles and projects
    Search(SearchArgs),

    /// Search or browse projects only
    Projects(ProjectArgs),

    /// Load profiles and projects from a JSON file
    Seed(SeedArgs),

    /// Generate embeddings for entities that need them
    Embed(EmbedArgs),

    /// Show directory and embedding status
    Status,

    /// Write the default configuration file
    Init,

    /// Rank ad-hoc documents against a query by embedding similarity
    Similar(SimilarArgs),

    /// Rerank ad-hoc documents with the LLM service
    Rerank(RerankArgs),

    /// Print raw embeddings for texts
    Embedding(EmbeddingArgs),
}

#[derive(Args)]
pub struct SearchArgs {
    /// Search query; empty lists the directory
    pub query: Vec<String>,

    /// Entity kinds to search
    #[arg(long, value_enum, default_value = "all")]
    pub kind: EntityKind,

    /// Result ordering
    #[arg(long, value_enum, default_value = "relevance")]
    pub sort: SortArg,

    /// Page number (1-based)
    #[arg(long, default_value = "1")]
    pub page: usize,

    /// Results per page
    #[arg(short = 'n', long, default_value = "20")]
    pub limit: usize,

    /// Minimum cosine similarity for vector hits
    #[arg(long)]
    pub threshold: Option<f32>,

    /// Rerank the top candidates with the LLM service
    #[arg(long)]
    pub rerank: bool,
}

#[derive(Args)]
pub struct ProjectArgs {
    /// Search query; empty browses the gallery
    pub query: Vec<String>,

    /// Result ordering
    #[arg(long, value_enum, default_value = "relevance")]
    pub sort: ProjectSortArg,

    /// Page number (1-based)
    #[arg(long, default_value = "1")]
    pub page: usize,

    /// Results per page
    #[arg(short = 'n', long, default_value = "20")]
    pub limit: usize,

    /// Minimum cosine similarity for vector hits
    #[arg(long, default_value = "0.4")]
    pub threshold: f32,

    /// Rerank the top candidates with the LLM service
    #[arg(long)]
    pub rerank: bool,
}

#[derive(Args)]
pub struct SeedArgs {
    /// JSON file with "profiles" and "projects" arrays
    pub file: PathBuf,
}

#[derive(Args)]
pub struct EmbedArgs {
    /// Re-embed every active entity, not just pending ones
    #[arg(short, long)]
    pub force: bool,

    /// Texts per provider request
    #[arg(long, default_value = "16")]
    pub batch_size: usize,
}

#[derive(Args)]
pub struct SimilarArgs {
    /// Query text
    pub query: String,

    /// Documents to rank
    pub documents: Vec<String>,

    /// Maximum results
    #[arg(short = 'k', long, default_value = "5")]
    pub top_k: usize,

    /// Minimum similarity
    #[arg(long, default_value = "0")]
    pub threshold: f32,
}

#[derive(Args)]
pub struct RerankArgs {
    /// Query text
    pub query: String,

    /// Documents to rerank
    pub documents: Vec<String>,

    /// Maximum results
    #[arg(short = 'k', long, default_value = "5")]
    pub top_k: usize,
}

#[derive(Args)]
pub struct EmbeddingArgs {
    /// Texts to embed
    pub texts: Vec<String>,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Cli,
    Json,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EntityKind {
    All,
    Profiles,
    Projects,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortArg {
    Relevance,
    Recent,
    Name,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ProjectSortArg {
    Relevance,
    Recent,
    Featured,
    Name,
    Random,
}
