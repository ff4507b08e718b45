use chrono::NaiveDateTime;
use rusqlite::{params, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbPool;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Comment {
    pub commentid: i64,
    pub postid: i64,
    pub username: String,
    pub commenttext: String,
    pub createtime: NaiveDateTime,
}

impl Comment {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Comment {
            commentid: row.get("commentid")?,
            postid: row.get("postid")?,
            username: row.get("username")?,
            commenttext: row.get("commenttext")?,
            createtime: row.get("createtime")?,
        })
    }

    pub fn find_by_id(pool: &DbPool, commentid: i64) -> Option<Self> {
        let conn = pool.get().ok()?;
        conn.query_row(
            "SELECT * FROM comments WHERE commentid = ?1",
            params![commentid],
            Self::from_row,
        )
        .ok()
    }

    pub fn for_post(pool: &DbPool, postid: i64) -> Vec<Self> {
        let conn = match pool.get() {
            Ok(c) => c,
            Err(_) => return vec![],
        };
        let mut stmt = match conn
            .prepare("SELECT * FROM comments WHERE postid = ?1 ORDER BY createtime")
        {
            Ok(s) => s,
            Err(_) => return vec![],
        };
        stmt.query_map(params![postid], Self::from_row)
            .map(|rows| rows.filter_map(|r| r.ok()).collect())
            .unwrap_or_default()
    }

    pub fn count_for_post(pool: &DbPool, postid: i64) -> i64 {
        let conn = match pool.get() {
            Ok(c) => c,
            Err(_) => return 0,
        };
        conn.query_row(
            "SELECT COUNT(*) FROM comments WHERE postid = ?1",
            params![postid],
            |row| row.get(0),
        )
        .unwrap_or(0)
    }

    /// Insert with a server-assigned timestamp.
    pub fn create(
        pool: &DbPool,
        postid: i64,
        username: &str,
        commenttext: &str,
    ) -> Result<i64, String> {
        let conn = pool.get().map_err(|e| e.to_string())?;
        conn.execute(
            "INSERT INTO comments (postid, username, commenttext, createtime)
             VALUES (?1, ?2, ?3, CURRENT_TIMESTAMP)",
            params![postid, username, commenttext],
        )
        .map_err(|e| e.to_string())?;
        Ok(conn.last_insert_rowid())
    }
}
