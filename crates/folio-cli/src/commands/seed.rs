//! Seed command: load directory content from a JSON file
//!
//! Stands in for the CRUD service that owns entity writes in production.
//! Every insert is logged so the embed command can pick the entities up.

use crate::app::SeedArgs;
use anyhow::{Context, Result};
use folio_core::{Database, EmbeddingAction, NewProfile, NewProject};
use serde::Deserialize;

#[derive(Deserialize)]
struct SeedFile {
    #[serde(default)]
    profiles: Vec<NewProfile>,
    #[serde(default)]
    projects: Vec<SeedProject>,
}

/// Project entry referencing its owner by handle instead of row id
#[derive(Deserialize)]
struct SeedProject {
    pub owner: String,
    #[serde(flatten)]
    pub fields: SeedProjectFields,
}

#[derive(Deserialize)]
struct SeedProjectFields {
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub oneliner: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub media: Vec<String>,
}

pub fn run(args: SeedArgs, db: &Database) -> Result<()> {
    let content = std::fs::read_to_string(&args.file)
        .with_context(|| format!("reading {}", args.file.display()))?;
    let seed: SeedFile = serde_json::from_str(&content)
        .with_context(|| format!("parsing {}", args.file.display()))?;

    let mut handles = std::collections::HashMap::new();
    let mut profile_count = 0;
    for profile in &seed.profiles {
        let id = db.insert_profile(profile)?;
        db.log_embedding_action(folio_core::EntityType::Profile, id, EmbeddingAction::Created)?;
        handles.insert(profile.handle.clone(), id);
        profile_count += 1;
    }

    let mut project_count = 0;
    for project in &seed.projects {
        let owner_id = *handles
            .get(&project.owner)
            .with_context(|| format!("unknown owner handle '{}'", project.owner))?;
        let id = db.insert_project(&NewProject {
            owner_id,
            name: project.fields.name.clone(),
            slug: project.fields.slug.clone(),
            oneliner: project.fields.oneliner.clone(),
            description: project.fields.description.clone(),
            featured: project.fields.featured,
            url: project.fields.url.clone(),
            media: project.fields.media.clone(),
        })?;
        db.log_embedding_action(folio_core::EntityType::Project, id, EmbeddingAction::Created)?;
        project_count += 1;
    }

    println!("Seeded {} profiles, {} projects", profile_count, project_count);
    Ok(())
}
