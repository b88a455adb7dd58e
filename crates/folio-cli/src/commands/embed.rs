//! Embed command: generate and store entity embeddings

use crate::app::EmbedArgs;
use anyhow::Result;
use folio_core::{
    Config, Database, Embedder, EntityType, HttpEmbedder, SearchableEntity,
};

pub async fn run(args: EmbedArgs, db: &Database, config: &Config) -> Result<()> {
    let embedder = HttpEmbedder::from_config(config.llm_service.clone())?;
    let model = embedder.model_name().to_string();

    let targets: Vec<(EntityType, i64)> = if args.force {
        let mut all = Vec::new();
        all.extend(
            db.list_active_profiles()?
                .iter()
                .map(|p| (EntityType::Profile, p.id)),
        );
        all.extend(
            db.list_active_projects()?
                .iter()
                .map(|p| (EntityType::Project, p.id)),
        );
        all
    } else {
        db.pending_embeddings(&model)?
    };

    if targets.is_empty() {
        println!("Nothing to embed.");
        return Ok(());
    }
    println!("Embedding {} entities with {}", targets.len(), model);

    let mut embedded = 0;
    for chunk in targets.chunks(args.batch_size.max(1)) {
        let mut keys = Vec::with_capacity(chunk.len());
        let mut texts = Vec::with_capacity(chunk.len());
        for (entity_type, id) in chunk {
            let entity = match entity_type {
                EntityType::Profile => db.get_profile(*id)?.map(SearchableEntity::Profile),
                EntityType::Project => db.get_project(*id)?.map(SearchableEntity::Project),
            };
            if let Some(entity) = entity {
                keys.push((*entity_type, *id));
                texts.push(entity.searchable_text());
            }
        }
        if texts.is_empty() {
            continue;
        }

        let vectors = embedder.embed_batch(&texts).await?;
        for ((entity_type, id), vector) in keys.iter().zip(&vectors) {
            db.upsert_embedding(*entity_type, *id, &model, vector)?;
            embedded += 1;
        }
        println!("  {}/{}", embedded, targets.len());
    }

    let removed = db.cleanup_orphaned_embeddings()?;
    if removed > 0 {
        println!("Removed {} orphaned embeddings", removed);
    }
    println!("Done: {} embeddings stored", embedded);
    Ok(())
}
