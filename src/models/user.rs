use rusqlite::{params, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbPool;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct User {
    pub username: String,
    pub password: String, // bcrypt hash
    pub bio: String,
    pub profilepicture: String,
}

/// Public fields shown next to someone else's post.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct UserSummary {
    pub username: String,
    pub profilepicture: String,
}

impl User {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(User {
            username: row.get("username")?,
            password: row.get("password")?,
            bio: row.get::<_, Option<String>>("bio")?.unwrap_or_default(),
            profilepicture: row
                .get::<_, Option<String>>("profilepicture")?
                .unwrap_or_default(),
        })
    }

    pub fn find_by_username(pool: &DbPool, username: &str) -> Option<Self> {
        let conn = pool.get().ok()?;
        conn.query_row(
            "SELECT * FROM users WHERE username = ?1",
            params![username],
            Self::from_row,
        )
        .ok()
    }

    pub fn exists(pool: &DbPool, username: &str) -> bool {
        let conn = match pool.get() {
            Ok(c) => c,
            Err(_) => return false,
        };
        conn.query_row(
            "SELECT COUNT(*) FROM users WHERE username = ?1",
            params![username],
            |row| row.get::<_, i64>(0),
        )
        .map(|c| c > 0)
        .unwrap_or(false)
    }

    pub fn count(pool: &DbPool) -> i64 {
        let conn = match pool.get() {
            Ok(c) => c,
            Err(_) => return 0,
        };
        conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))
            .unwrap_or(0)
    }

    pub fn create(
        pool: &DbPool,
        username: &str,
        password_hash: &str,
        profilepicture: &str,
    ) -> Result<(), String> {
        let conn = pool.get().map_err(|e| e.to_string())?;
        conn.execute(
            "INSERT INTO users (username, password, bio, profilepicture)
             VALUES (?1, ?2, '', ?3)",
            params![username, password_hash, profilepicture],
        )
        .map_err(|e| e.to_string())?;
        Ok(())
    }

    /// Full overwrite of the editable profile fields.
    pub fn update_profile(
        pool: &DbPool,
        username: &str,
        bio: &str,
        profilepicture: &str,
    ) -> Result<(), String> {
        let conn = pool.get().map_err(|e| e.to_string())?;
        conn.execute(
            "UPDATE users SET bio = ?1, profilepicture = ?2 WHERE username = ?3",
            params![bio, profilepicture, username],
        )
        .map_err(|e| e.to_string())?;
        Ok(())
    }

    pub fn summary(pool: &DbPool, username: &str) -> Option<UserSummary> {
        let conn = pool.get().ok()?;
        conn.query_row(
            "SELECT username, profilepicture FROM users WHERE username = ?1",
            params![username],
            |row| {
                Ok(UserSummary {
                    username: row.get(0)?,
                    profilepicture: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
                })
            },
        )
        .ok()
    }

    /// Return a safe version without the password hash for template contexts
    pub fn safe_json(&self) -> serde_json::Value {
        serde_json::json!({
            "username": self.username,
            "bio": self.bio,
            "profilepicture": self.profilepicture,
        })
    }
}
