//! Init command: write the default configuration

use anyhow::Result;
use folio_core::Config;
use std::path::Path;

pub fn run(config: &Config, db_path: &Path) -> Result<()> {
    let config_path = Config::default_path();
    if config_path.exists() {
        println!("Config already exists at {}", config_path.display());
    } else {
        config.save()?;
        println!("Wrote config to {}", config_path.display());
    }
    println!("Database at {}", db_path.display());
    println!("LLM service: {}", config.llm_service.url);
    println!("Embedding model: {}", config.llm_service.embedding_model);
    Ok(())
}
