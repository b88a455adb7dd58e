//! Vector similarity retrieval
//!
//! Cosine similarity between the query embedding and stored entity
//! embeddings of the matching model. Inactive entities are excluded by the
//! storage query, not re-checked here.

use crate::db::{cosine_similarity, Database};
use crate::error::{FolioError, Result};
use crate::model::EntityType;

/// Stored vectors for one entity type and model, with `updated_at` for
/// tie-breaking. The storage query already excludes inactive entities.
pub fn load_entity_vectors(
    db: &Database,
    entity_type: EntityType,
    model: &str,
) -> Result<Vec<(i64, Vec<f32>, String)>> {
    db.get_embeddings_for_type(entity_type, model)
}

/// Score loaded vectors against the query. Pure compute, no storage access,
/// so it can run off the request task while other retrieval proceeds.
pub fn score_vectors(
    query_vector: &[f32],
    stored: Vec<(i64, Vec<f32>, String)>,
    threshold: f32,
    limit: usize,
) -> Vec<(i64, f64)> {
    let mut hits: Vec<(i64, f32, String)> = stored
        .into_iter()
        .map(|(id, vector, updated_at)| {
            (id, cosine_similarity(query_vector, &vector), updated_at)
        })
        .filter(|(_, sim, _)| *sim >= threshold)
        .collect();

    hits.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| b.2.cmp(&a.2))
            .then_with(|| a.0.cmp(&b.0))
    });

    hits.into_iter()
        .take(limit)
        .map(|(id, sim, _)| (id, sim as f64))
        .collect()
}

/// Retrieve entities with similarity >= threshold, ordered descending,
/// ties broken by more recent `updated_at`.
pub fn vector_retrieve(
    db: &Database,
    query_vector: &[f32],
    entity_type: EntityType,
    model: &str,
    threshold: f32,
    limit: usize,
) -> Result<Vec<(i64, f64)>> {
    if query_vector.is_empty() {
        return Err(FolioError::VectorRetrieval(
            "empty query vector".to_string(),
        ));
    }
    let stored = load_entity_vectors(db, entity_type, model)?;
    Ok(score_vectors(query_vector, stored, threshold, limit))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{NewProfile, NewProject};
    use crate::model::Availability;

    fn db_with_vectors() -> Database {
        let db = Database::open_in_memory().unwrap();
        db.initialize().unwrap();
        let owner = db
            .insert_profile(&NewProfile {
                handle: "o".into(),
                display_name: "Owner".into(),
                headline: None,
                bio: None,
                skills: vec![],
                interests: vec![],
                location: None,
                availability: Availability::default(),
            })
            .unwrap();
        for (slug, vector) in [
            ("close", vec![1.0f32, 0.1, 0.0]),
            ("mid", vec![0.5, 0.5, 0.0]),
            ("far", vec![0.0, 0.0, 1.0]),
        ] {
            let id = db
                .insert_project(&NewProject {
                    owner_id: owner,
                    name: slug.to_uppercase(),
                    slug: slug.into(),
                    oneliner: None,
                    description: None,
                    featured: false,
                    url: None,
                    media: vec![],
                })
                .unwrap();
            db.upsert_embedding(EntityType::Project, id, "m", &vector)
                .unwrap();
        }
        db
    }

    #[test]
    fn test_threshold_excludes_weak_hits() {
        let db = db_with_vectors();
        let query = vec![1.0f32, 0.0, 0.0];

        let hits = vector_retrieve(&db, &query, EntityType::Project, "m", 0.4, 10).unwrap();
        // "far" is orthogonal; "mid" ~0.707; "close" ~0.995
        assert_eq!(hits.len(), 2);
        assert!(hits[0].1 > hits[1].1);

        let strict = vector_retrieve(&db, &query, EntityType::Project, "m", 0.9, 10).unwrap();
        assert_eq!(strict.len(), 1);
    }

    #[test]
    fn test_inactive_entity_excluded() {
        let db = db_with_vectors();
        db.deactivate_project(1).unwrap();
        let query = vec![1.0f32, 0.0, 0.0];
        let hits = vector_retrieve(&db, &query, EntityType::Project, "m", 0.1, 10).unwrap();
        assert!(hits.iter().all(|(id, _)| *id != 1));
    }

    #[test]
    fn test_empty_query_vector_is_error() {
        let db = db_with_vectors();
        let err = vector_retrieve(&db, &[], EntityType::Project, "m", 0.1, 10).unwrap_err();
        assert!(matches!(err, FolioError::VectorRetrieval(_)));
    }

    #[test]
    fn test_score_after_load_matches_retrieve() {
        let db = db_with_vectors();
        let query = vec![1.0f32, 0.0, 0.0];

        let direct = vector_retrieve(&db, &query, EntityType::Project, "m", 0.4, 10).unwrap();
        let stored = load_entity_vectors(&db, EntityType::Project, "m").unwrap();
        let split = score_vectors(&query, stored, 0.4, 10);
        assert_eq!(direct, split);
    }

    #[test]
    fn test_limit_applied_after_ordering() {
        let db = db_with_vectors();
        let query = vec![1.0f32, 0.0, 0.0];
        let hits = vector_retrieve(&db, &query, EntityType::Project, "m", 0.0, 1).unwrap();
        assert_eq!(hits.len(), 1);
        // Highest similarity survives the cut
        let all = vector_retrieve(&db, &query, EntityType::Project, "m", 0.0, 10).unwrap();
        assert_eq!(hits[0].0, all[0].0);
    }
}
