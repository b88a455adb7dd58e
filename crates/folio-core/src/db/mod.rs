//! Database layer for folio
//!
//! SQLite-backed storage for profiles, projects, and embeddings. The search
//! engine treats this layer as read-only; entity writes come from the seed
//! path emulating the external CRUD collaborator.

mod profiles;
mod projects;
mod schema;
pub mod vectors;

pub use profiles::NewProfile;
pub use projects::{NewProject, ProjectOrder};
pub use schema::Database;
pub use vectors::{cosine_similarity, is_zero_vector, EmbeddingAction, EmbeddingStats};

use std::path::PathBuf;

impl Database {
    /// Get the default database path
    pub fn default_path() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(crate::DATA_DIR_NAME)
            .join("directory.sqlite")
    }
}
