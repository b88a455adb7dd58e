//! Embedding storage
//!
//! Stores entity embeddings as little-endian f32 BLOBs and computes cosine
//! similarity in Rust. An all-zero vector is a provider malfunction and is
//! rejected at this boundary, on both write and read.

use super::Database;
use crate::error::{FolioError, Result};
use crate::model::EntityType;
use chrono::Utc;
use rusqlite::params;

/// Action recorded in the embedding audit log
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingAction {
    Created,
    Updated,
    Deleted,
}

impl EmbeddingAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Updated => "updated",
            Self::Deleted => "deleted",
        }
    }
}

/// Embedding inventory, used to decide whether hybrid search is viable
#[derive(Debug, Clone, Copy, Default, serde::Serialize)]
pub struct EmbeddingStats {
    pub total_embeddings: usize,
    pub profile_embeddings: usize,
    pub project_embeddings: usize,
    pub pending: usize,
}

impl Database {
    /// Store an embedding for an entity, replacing any previous one for the
    /// same model. Rejects all-zero vectors.
    pub fn upsert_embedding(
        &self,
        entity_type: EntityType,
        entity_id: i64,
        model: &str,
        vector: &[f32],
    ) -> Result<()> {
        if is_zero_vector(vector) {
            return Err(FolioError::EmbeddingProvider(format!(
                "refusing to store all-zero vector for {}:{}",
                entity_type.as_str(),
                entity_id
            )));
        }
        if let Some(dims) = self.get_model_dimensions(model)? {
            if dims != vector.len() {
                return Err(FolioError::EmbeddingProvider(format!(
                    "vector length {} does not match registered dimensions {} for {}",
                    vector.len(),
                    dims,
                    model
                )));
            }
        } else {
            self.register_model(model, vector.len())?;
        }

        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT OR REPLACE INTO embeddings (entity_type, entity_id, model, vector, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                entity_type.as_str(),
                entity_id,
                model,
                embedding_to_bytes(vector),
                now
            ],
        )?;
        Ok(())
    }

    /// Fetch one stored embedding
    pub fn get_embedding(
        &self,
        entity_type: EntityType,
        entity_id: i64,
        model: &str,
    ) -> Result<Option<Vec<f32>>> {
        let result = self.conn.query_row(
            "SELECT vector FROM embeddings
             WHERE entity_type = ?1 AND entity_id = ?2 AND model = ?3",
            params![entity_type.as_str(), entity_id, model],
            |row| {
                let bytes: Vec<u8> = row.get(0)?;
                Ok(bytes_to_embedding(&bytes))
            },
        );
        match result {
            Ok(v) if is_zero_vector(&v) => Ok(None),
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// All embeddings for active entities of one type, with the entity's
    /// `updated_at` for recency tie-breaks
    pub fn get_embeddings_for_type(
        &self,
        entity_type: EntityType,
        model: &str,
    ) -> Result<Vec<(i64, Vec<f32>, String)>> {
        let sql = match entity_type {
            EntityType::Profile => {
                "SELECT e.entity_id, e.vector, p.updated_at
                 FROM embeddings e
                 JOIN profiles p ON p.id = e.entity_id AND p.active = 1
                 WHERE e.entity_type = 'profile' AND e.model = ?1"
            }
            EntityType::Project => {
                "SELECT e.entity_id, e.vector, p.updated_at
                 FROM embeddings e
                 JOIN projects p ON p.id = e.entity_id AND p.active = 1
                 WHERE e.entity_type = 'project' AND e.model = ?1"
            }
        };
        let mut stmt = self.conn.prepare(sql)?;
        let results = stmt
            .query_map(params![model], |row| {
                let bytes: Vec<u8> = row.get(1)?;
                Ok((row.get(0)?, bytes_to_embedding(&bytes), row.get(2)?))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        // A stored zero vector is never trusted
        Ok(results
            .into_iter()
            .filter(|(_, v, _)| !is_zero_vector(v))
            .collect())
    }

    /// Append an audit entry. Called by the CRUD side after entity writes.
    pub fn log_embedding_action(
        &self,
        entity_type: EntityType,
        entity_id: i64,
        action: EmbeddingAction,
    ) -> Result<()> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO embedding_log (entity_type, entity_id, action, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![entity_type.as_str(), entity_id, action.as_str(), now],
        )?;
        Ok(())
    }

    /// Active entities whose embedding is missing or stale relative to the
    /// audit log. Drives out-of-band recomputation.
    pub fn pending_embeddings(&self, model: &str) -> Result<Vec<(EntityType, i64)>> {
        let mut pending = Vec::new();
        for entity_type in [EntityType::Profile, EntityType::Project] {
            let table = match entity_type {
                EntityType::Profile => "profiles",
                EntityType::Project => "projects",
            };
            let sql = format!(
                "SELECT t.id FROM {table} t
                 LEFT JOIN embeddings e
                     ON e.entity_type = ?1 AND e.entity_id = t.id AND e.model = ?2
                 WHERE t.active = 1 AND (
                     e.entity_id IS NULL OR EXISTS (
                         SELECT 1 FROM embedding_log l
                         WHERE l.entity_type = ?1 AND l.entity_id = t.id
                           AND l.created_at > e.created_at
                     )
                 )
                 ORDER BY t.id"
            );
            let mut stmt = self.conn.prepare(&sql)?;
            let ids = stmt
                .query_map(params![entity_type.as_str(), model], |row| row.get::<_, i64>(0))?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            pending.extend(ids.into_iter().map(|id| (entity_type, id)));
        }
        Ok(pending)
    }

    /// Count of entities needing embedding work
    pub fn count_pending_embeddings(&self, model: &str) -> Result<usize> {
        Ok(self.pending_embeddings(model)?.len())
    }

    /// Embedding inventory across entity types
    pub fn embedding_stats(&self, model: &str) -> Result<EmbeddingStats> {
        let count_for = |entity_type: &str| -> Result<usize> {
            let count: i64 = self.conn.query_row(
                "SELECT COUNT(*) FROM embeddings WHERE entity_type = ?1 AND model = ?2",
                params![entity_type, model],
                |row| row.get(0),
            )?;
            Ok(count as usize)
        };
        let profile_embeddings = count_for("profile")?;
        let project_embeddings = count_for("project")?;
        Ok(EmbeddingStats {
            total_embeddings: profile_embeddings + project_embeddings,
            profile_embeddings,
            project_embeddings,
            pending: self.count_pending_embeddings(model)?,
        })
    }

    /// Remove embeddings for an entity (admin cleanup after hard deletes)
    pub fn delete_embeddings_for(&self, entity_type: EntityType, entity_id: i64) -> Result<usize> {
        let rows = self.conn.execute(
            "DELETE FROM embeddings WHERE entity_type = ?1 AND entity_id = ?2",
            params![entity_type.as_str(), entity_id],
        )?;
        Ok(rows)
    }

    /// Drop embeddings whose entity is gone or inactive
    pub fn cleanup_orphaned_embeddings(&self) -> Result<usize> {
        let rows = self.conn.execute(
            "DELETE FROM embeddings WHERE
                (entity_type = 'profile' AND entity_id NOT IN
                    (SELECT id FROM profiles WHERE active = 1))
             OR (entity_type = 'project' AND entity_id NOT IN
                    (SELECT id FROM projects WHERE active = 1))",
            [],
        )?;
        Ok(rows)
    }

    /// Register model with its dimensions
    pub fn register_model(&self, model: &str, dimensions: usize) -> Result<()> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO model_metadata (model, dimensions, created_at, last_used_at)
             VALUES (?1, ?2, ?3, ?3)
             ON CONFLICT(model) DO UPDATE SET last_used_at = ?3",
            params![model, dimensions as i64, now],
        )?;
        Ok(())
    }

    /// Get stored model dimensions
    pub fn get_model_dimensions(&self, model: &str) -> Result<Option<usize>> {
        let result = self.conn.query_row(
            "SELECT dimensions FROM model_metadata WHERE model = ?1",
            params![model],
            |row| row.get::<_, i64>(0),
        );
        match result {
            Ok(dims) => Ok(Some(dims as usize)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

/// True when every component is exactly zero
pub fn is_zero_vector(v: &[f32]) -> bool {
    v.iter().all(|c| *c == 0.0)
}

/// Convert f32 embedding to bytes (little-endian)
pub fn embedding_to_bytes(embedding: &[f32]) -> Vec<u8> {
    embedding.iter().flat_map(|f| f.to_le_bytes()).collect()
}

/// Convert bytes to f32 embedding
pub fn bytes_to_embedding(bytes: &[u8]) -> Vec<f32> {
    bytes
        .chunks_exact(4)
        .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect()
}

/// Compute cosine similarity between two embeddings
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a * norm_b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::NewProfile;
    use crate::model::Availability;

    fn db_with_profile() -> Database {
        let db = Database::open_in_memory().unwrap();
        db.initialize().unwrap();
        db.insert_profile(&NewProfile {
            handle: "p1".into(),
            display_name: "P One".into(),
            headline: None,
            bio: None,
            skills: vec![],
            interests: vec![],
            location: None,
            availability: Availability::default(),
        })
        .unwrap();
        db
    }

    #[test]
    fn test_zero_vector_rejected_on_write() {
        let db = db_with_profile();
        let err = db
            .upsert_embedding(EntityType::Profile, 1, "m", &[0.0, 0.0, 0.0])
            .unwrap_err();
        assert!(matches!(err, FolioError::EmbeddingProvider(_)));
        assert!(db.get_embedding(EntityType::Profile, 1, "m").unwrap().is_none());
    }

    #[test]
    fn test_dimension_mismatch_rejected() {
        let db = db_with_profile();
        db.upsert_embedding(EntityType::Profile, 1, "m", &[1.0, 0.0])
            .unwrap();
        let err = db
            .upsert_embedding(EntityType::Profile, 1, "m", &[1.0, 0.0, 0.5])
            .unwrap_err();
        assert!(matches!(err, FolioError::EmbeddingProvider(_)));
        assert_eq!(db.get_model_dimensions("m").unwrap(), Some(2));
    }

    #[test]
    fn test_pending_tracks_log_staleness() {
        let db = db_with_profile();
        db.log_embedding_action(EntityType::Profile, 1, EmbeddingAction::Created)
            .unwrap();
        assert_eq!(db.count_pending_embeddings("m").unwrap(), 1);

        db.upsert_embedding(EntityType::Profile, 1, "m", &[0.5, 0.5])
            .unwrap();
        assert_eq!(db.count_pending_embeddings("m").unwrap(), 0);

        // A later edit makes the stored embedding stale again. The log entry
        // must postdate the embedding row, so nudge the embedding back.
        db.conn
            .execute(
                "UPDATE embeddings SET created_at = '2000-01-01T00:00:00Z'",
                [],
            )
            .unwrap();
        db.log_embedding_action(EntityType::Profile, 1, EmbeddingAction::Updated)
            .unwrap();
        assert_eq!(db.count_pending_embeddings("m").unwrap(), 1);
    }

    #[test]
    fn test_embedding_stats() {
        let db = db_with_profile();
        db.upsert_embedding(EntityType::Profile, 1, "m", &[1.0, 0.0])
            .unwrap();
        let stats = db.embedding_stats("m").unwrap();
        assert_eq!(stats.total_embeddings, 1);
        assert_eq!(stats.profile_embeddings, 1);
        assert_eq!(stats.project_embeddings, 0);
    }

    #[test]
    fn test_embedding_roundtrip() {
        let original = vec![1.0f32, 2.0, 3.0, -1.5];
        let bytes = embedding_to_bytes(&original);
        let restored = bytes_to_embedding(&bytes);
        assert_eq!(original, restored);
    }

    #[test]
    fn test_cosine_similarity_identical() {
        let a = vec![1.0, 0.0, 0.0];
        let b = vec![1.0, 0.0, 0.0];
        let sim = cosine_similarity(&a, &b);
        assert!((sim - 1.0).abs() < 0.0001);
    }

    #[test]
    fn test_cosine_similarity_orthogonal() {
        let a = vec![1.0, 0.0, 0.0];
        let b = vec![0.0, 1.0, 0.0];
        let sim = cosine_similarity(&a, &b);
        assert!(sim.abs() < 0.0001);
    }
}
