use rusqlite::{params, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbPool;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Tag {
    pub tagid: i64,
    pub tagname: String,
}

impl Tag {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Tag {
            tagid: row.get("tagid")?,
            tagname: row.get("tagname")?,
        })
    }

    pub fn find_by_name(pool: &DbPool, tagname: &str) -> Option<Self> {
        let conn = pool.get().ok()?;
        conn.query_row(
            "SELECT * FROM tags WHERE tagname = ?1",
            params![tagname],
            Self::from_row,
        )
        .ok()
    }

    pub fn list(pool: &DbPool) -> Vec<Self> {
        let conn = match pool.get() {
            Ok(c) => c,
            Err(_) => return vec![],
        };
        let mut stmt = match conn.prepare("SELECT * FROM tags ORDER BY tagname") {
            Ok(s) => s,
            Err(_) => return vec![],
        };
        stmt.query_map([], Self::from_row)
            .map(|rows| rows.filter_map(|r| r.ok()).collect())
            .unwrap_or_default()
    }

    /// Tag names attached to a post, via the posttags join.
    pub fn names_for_post(pool: &DbPool, postid: i64) -> Vec<String> {
        let conn = match pool.get() {
            Ok(c) => c,
            Err(_) => return vec![],
        };
        let mut stmt = match conn.prepare(
            "SELECT tags.tagname
             FROM posttags
             JOIN tags ON posttags.tagid = tags.tagid
             WHERE posttags.postid = ?1",
        ) {
            Ok(s) => s,
            Err(_) => return vec![],
        };
        stmt.query_map(params![postid], |row| row.get(0))
            .map(|rows| rows.filter_map(|r| r.ok()).collect())
            .unwrap_or_default()
    }

    pub fn create(pool: &DbPool, tagname: &str) -> Result<i64, String> {
        let conn = pool.get().map_err(|e| e.to_string())?;
        conn.execute("INSERT INTO tags (tagname) VALUES (?1)", params![tagname])
            .map_err(|e| e.to_string())?;
        Ok(conn.last_insert_rowid())
    }

    pub fn find_or_create(pool: &DbPool, tagname: &str) -> Result<i64, String> {
        if let Some(existing) = Self::find_by_name(pool, tagname) {
            return Ok(existing.tagid);
        }
        Self::create(pool, tagname)
    }

    /// Attach a tag to a post; re-attaching is a no-op.
    pub fn attach(pool: &DbPool, postid: i64, tagid: i64) -> Result<(), String> {
        let conn = pool.get().map_err(|e| e.to_string())?;
        conn.execute(
            "INSERT OR IGNORE INTO posttags (postid, tagid) VALUES (?1, ?2)",
            params![postid, tagid],
        )
        .map_err(|e| e.to_string())?;
        Ok(())
    }
}
