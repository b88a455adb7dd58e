//! Profile repository (read side + seed inserts)

use super::Database;
use crate::error::Result;
use crate::model::{Availability, Profile};
use chrono::Utc;
use rusqlite::{params, Row};

/// Profile fields supplied by the CRUD collaborator when seeding
#[derive(Debug, Clone, serde::Deserialize)]
pub struct NewProfile {
    pub handle: String,
    pub display_name: String,
    #[serde(default)]
    pub headline: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub availability: Availability,
}

fn profile_from_row(row: &Row) -> rusqlite::Result<Profile> {
    let skills_json: String = row.get(5)?;
    let interests_json: String = row.get(6)?;
    Ok(Profile {
        id: row.get(0)?,
        handle: row.get(1)?,
        display_name: row.get(2)?,
        headline: row.get(3)?,
        bio: row.get(4)?,
        skills: serde_json::from_str(&skills_json).unwrap_or_default(),
        interests: serde_json::from_str(&interests_json).unwrap_or_default(),
        location: row.get(7)?,
        availability: Availability {
            hire: row.get::<_, i64>(8)? != 0,
            collaborate: row.get::<_, i64>(9)? != 0,
            hiring: row.get::<_, i64>(10)? != 0,
        },
        active: row.get::<_, i64>(11)? != 0,
        updated_at: row.get(12)?,
    })
}

const PROFILE_COLUMNS: &str = "id, handle, display_name, headline, bio, skills, interests, \
     location, avail_hire, avail_collaborate, avail_hiring, active, updated_at";

impl Database {
    /// Insert a profile, returning its id. Seed path only; the search engine
    /// never calls this.
    pub fn insert_profile(&self, new: &NewProfile) -> Result<i64> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO profiles
                (handle, display_name, headline, bio, skills, interests, location,
                 avail_hire, avail_collaborate, avail_hiring, active, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, 1, ?11, ?11)",
            params![
                new.handle,
                new.display_name,
                new.headline,
                new.bio,
                serde_json::to_string(&new.skills)?,
                serde_json::to_string(&new.interests)?,
                new.location,
                new.availability.hire as i64,
                new.availability.collaborate as i64,
                new.availability.hiring as i64,
                now,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Fetch a single active profile
    pub fn get_profile(&self, id: i64) -> Result<Option<Profile>> {
        let result = self.conn.query_row(
            &format!("SELECT {PROFILE_COLUMNS} FROM profiles WHERE id = ?1 AND active = 1"),
            params![id],
            profile_from_row,
        );
        match result {
            Ok(p) => Ok(Some(p)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Fetch active profiles by ids, preserving no particular order
    pub fn get_profiles_by_ids(&self, ids: &[i64]) -> Result<Vec<Profile>> {
        let mut results = Vec::with_capacity(ids.len());
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {PROFILE_COLUMNS} FROM profiles WHERE id = ?1 AND active = 1"
        ))?;
        for id in ids {
            match stmt.query_row(params![id], profile_from_row) {
                Ok(p) => results.push(p),
                Err(rusqlite::Error::QueryReturnedNoRows) => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(results)
    }

    /// All active profiles (keyword retrieval scans these in memory)
    pub fn list_active_profiles(&self) -> Result<Vec<Profile>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {PROFILE_COLUMNS} FROM profiles WHERE active = 1"
        ))?;
        let results = stmt
            .query_map([], profile_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(results)
    }

    /// Browse page of active profiles ordered by recency or name
    pub fn browse_profiles(&self, order_by_name: bool, limit: usize, offset: usize) -> Result<Vec<Profile>> {
        let order = if order_by_name {
            "display_name COLLATE NOCASE ASC"
        } else {
            "updated_at DESC, id DESC"
        };
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {PROFILE_COLUMNS} FROM profiles WHERE active = 1
             ORDER BY {order} LIMIT ?1 OFFSET ?2"
        ))?;
        let results = stmt
            .query_map(params![limit as i64, offset as i64], profile_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(results)
    }

    /// Count active profiles
    pub fn count_active_profiles(&self) -> Result<usize> {
        let count: i64 =
            self.conn
                .query_row("SELECT COUNT(*) FROM profiles WHERE active = 1", [], |row| {
                    row.get(0)
                })?;
        Ok(count as usize)
    }

    /// Mark a profile inactive (soft delete, seed/admin path)
    pub fn deactivate_profile(&self, id: i64) -> Result<bool> {
        let now = Utc::now().to_rfc3339();
        let rows = self.conn.execute(
            "UPDATE profiles SET active = 0, updated_at = ?2 WHERE id = ?1",
            params![id, now],
        )?;
        Ok(rows > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded_db() -> Database {
        let db = Database::open_in_memory().unwrap();
        db.initialize().unwrap();
        db.insert_profile(&NewProfile {
            handle: "mina".into(),
            display_name: "Mina K".into(),
            headline: Some("AI engineer".into()),
            bio: None,
            skills: vec!["ai".into(), "rust".into()],
            interests: vec!["music".into()],
            location: Some("Berlin, Germany".into()),
            availability: Availability {
                hire: true,
                ..Default::default()
            },
        })
        .unwrap();
        db
    }

    #[test]
    fn test_insert_and_fetch_profile() {
        let db = seeded_db();
        let profile = db.get_profile(1).unwrap().unwrap();
        assert_eq!(profile.handle, "mina");
        assert_eq!(profile.skills, vec!["ai", "rust"]);
        assert!(profile.availability.hire);
    }

    #[test]
    fn test_deactivated_profile_hidden() {
        let db = seeded_db();
        assert!(db.deactivate_profile(1).unwrap());
        assert!(db.get_profile(1).unwrap().is_none());
        assert_eq!(db.count_active_profiles().unwrap(), 0);
        assert!(db.get_profiles_by_ids(&[1]).unwrap().is_empty());
    }

    #[test]
    fn test_browse_order_by_name() {
        let db = seeded_db();
        db.insert_profile(&NewProfile {
            handle: "arno".into(),
            display_name: "Arno B".into(),
            headline: None,
            bio: None,
            skills: vec![],
            interests: vec![],
            location: None,
            availability: Availability::default(),
        })
        .unwrap();
        let page = db.browse_profiles(true, 10, 0).unwrap();
        assert_eq!(page[0].display_name, "Arno B");
    }
}
