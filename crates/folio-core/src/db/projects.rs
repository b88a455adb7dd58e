//! Project repository (read side + seed inserts)

use super::Database;
use crate::error::Result;
use crate::model::Project;
use chrono::Utc;
use rusqlite::{params, Row};

/// Project fields supplied by the CRUD collaborator when seeding
#[derive(Debug, Clone, serde::Deserialize)]
pub struct NewProject {
    pub owner_id: i64,
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

fn project_from_row(row: &Row) -> rusqlite::Result<Project> {
    let media_json: String = row.get(8)?;
    Ok(Project {
        id: row.get(0)?,
        owner_id: row.get(1)?,
        name: row.get(2)?,
        slug: row.get(3)?,
        oneliner: row.get(4)?,
        description: row.get(5)?,
        featured: row.get::<_, i64>(6)? != 0,
        url: row.get(7)?,
        media: serde_json::from_str(&media_json).unwrap_or_default(),
        active: row.get::<_, i64>(9)? != 0,
        updated_at: row.get(10)?,
    })
}

const PROJECT_COLUMNS: &str =
    "id, owner_id, name, slug, oneliner, description, featured, url, media, active, updated_at";

/// Ordering for project browse pages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectOrder {
    Recent,
    Featured,
    Name,
    Random,
}

impl ProjectOrder {
    fn sql(&self) -> &'static str {
        match self {
            Self::Recent => "updated_at DESC, id DESC",
            Self::Featured => "featured DESC, updated_at DESC, id DESC",
            Self::Name => "name COLLATE NOCASE ASC",
            Self::Random => "RANDOM()",
        }
    }
}

impl Database {
    /// Insert a project, returning its id. Seed path only.
    pub fn insert_project(&self, new: &NewProject) -> Result<i64> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO projects
                (owner_id, name, slug, oneliner, description, featured, url, media,
                 active, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, 1, ?9, ?9)",
            params![
                new.owner_id,
                new.name,
                new.slug,
                new.oneliner,
                new.description,
                new.featured as i64,
                new.url,
                serde_json::to_string(&new.media)?,
                now,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Fetch a single active project
    pub fn get_project(&self, id: i64) -> Result<Option<Project>> {
        let result = self.conn.query_row(
            &format!("SELECT {PROJECT_COLUMNS} FROM projects WHERE id = ?1 AND active = 1"),
            params![id],
            project_from_row,
        );
        match result {
            Ok(p) => Ok(Some(p)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Fetch active projects by ids
    pub fn get_projects_by_ids(&self, ids: &[i64]) -> Result<Vec<Project>> {
        let mut results = Vec::with_capacity(ids.len());
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects WHERE id = ?1 AND active = 1"
        ))?;
        for id in ids {
            match stmt.query_row(params![id], project_from_row) {
                Ok(p) => results.push(p),
                Err(rusqlite::Error::QueryReturnedNoRows) => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(results)
    }

    /// All active projects (keyword retrieval scans these in memory)
    pub fn list_active_projects(&self) -> Result<Vec<Project>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects WHERE active = 1"
        ))?;
        let results = stmt
            .query_map([], project_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(results)
    }

    /// Browse page of active projects
    pub fn browse_projects_page(
        &self,
        order: ProjectOrder,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<Project>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects WHERE active = 1
             ORDER BY {} LIMIT ?1 OFFSET ?2",
            order.sql()
        ))?;
        let results = stmt
            .query_map(params![limit as i64, offset as i64], project_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(results)
    }

    /// Count active projects
    pub fn count_active_projects(&self) -> Result<usize> {
        let count: i64 =
            self.conn
                .query_row("SELECT COUNT(*) FROM projects WHERE active = 1", [], |row| {
                    row.get(0)
                })?;
        Ok(count as usize)
    }

    /// Mark a project inactive (soft delete)
    pub fn deactivate_project(&self, id: i64) -> Result<bool> {
        let now = Utc::now().to_rfc3339();
        let rows = self.conn.execute(
            "UPDATE projects SET active = 0, updated_at = ?2 WHERE id = ?1",
            params![id, now],
        )?;
        Ok(rows > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::NewProfile;
    use crate::model::Availability;

    fn seeded_db() -> Database {
        let db = Database::open_in_memory().unwrap();
        db.initialize().unwrap();
        let owner = db
            .insert_profile(&NewProfile {
                handle: "owner".into(),
                display_name: "Owner".into(),
                headline: None,
                bio: None,
                skills: vec![],
                interests: vec![],
                location: None,
                availability: Availability::default(),
            })
            .unwrap();
        db.insert_project(&NewProject {
            owner_id: owner,
            name: "Synth Garden".into(),
            slug: "synth-garden".into(),
            oneliner: Some("Generative music toy".into()),
            description: None,
            featured: true,
            url: None,
            media: vec![],
        })
        .unwrap();
        db.insert_project(&NewProject {
            owner_id: owner,
            name: "Atlas".into(),
            slug: "atlas".into(),
            oneliner: None,
            description: Some("Maps for climbers".into()),
            featured: false,
            url: None,
            media: vec![],
        })
        .unwrap();
        db
    }

    #[test]
    fn test_slug_unique_per_owner() {
        let db = seeded_db();
        let dup = db.insert_project(&NewProject {
            owner_id: 1,
            name: "Other".into(),
            slug: "atlas".into(),
            oneliner: None,
            description: None,
            featured: false,
            url: None,
            media: vec![],
        });
        assert!(dup.is_err());
    }

    #[test]
    fn test_featured_order_puts_featured_first() {
        let db = seeded_db();
        let page = db
            .browse_projects_page(ProjectOrder::Featured, 10, 0)
            .unwrap();
        assert_eq!(page[0].name, "Synth Garden");
        assert!(page[0].featured);
    }

    #[test]
    fn test_random_order_returns_full_page() {
        let db = seeded_db();
        let page = db.browse_projects_page(ProjectOrder::Random, 10, 0).unwrap();
        assert_eq!(page.len(), 2);
    }
}
