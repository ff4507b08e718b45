use chrono::NaiveDateTime;
use rusqlite::{params, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbPool;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Post {
    pub postid: i64,
    pub username: String,
    pub title: String,
    pub titleimagepath: Option<String>,
    pub descriptions: Option<String>,
    pub likes: i64,
    pub createtime: NaiveDateTime,
}

/// Discover-page projection: just enough to render a card.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PostSummary {
    pub postid: i64,
    pub title: String,
    pub titleimagepath: Option<String>,
    pub descriptions: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PostForm {
    pub title: String,
    pub titleimagepath: Option<String>,
    pub descriptions: Option<String>,
}

impl Post {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Post {
            postid: row.get("postid")?,
            username: row.get("username")?,
            title: row.get("title")?,
            titleimagepath: row.get("titleimagepath")?,
            descriptions: row.get("descriptions")?,
            likes: row.get("likes")?,
            createtime: row.get("createtime")?,
        })
    }

    fn summary_from_row(row: &Row) -> rusqlite::Result<PostSummary> {
        Ok(PostSummary {
            postid: row.get("postid")?,
            title: row.get("title")?,
            titleimagepath: row.get("titleimagepath")?,
            descriptions: row.get("descriptions")?,
        })
    }

    pub fn find_by_id(pool: &DbPool, postid: i64) -> Option<Self> {
        let conn = pool.get().ok()?;
        conn.query_row(
            "SELECT * FROM posts WHERE postid = ?1",
            params![postid],
            Self::from_row,
        )
        .ok()
    }

    /// Like `find_by_id` but keeps "no such post" apart from a store
    /// failure, which feed assembly reports differently.
    pub fn find_checked(pool: &DbPool, postid: i64) -> Result<Option<Self>, String> {
        let conn = pool.get().map_err(|e| e.to_string())?;
        match conn.query_row(
            "SELECT * FROM posts WHERE postid = ?1",
            params![postid],
            Self::from_row,
        ) {
            Ok(post) => Ok(Some(post)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.to_string()),
        }
    }

    /// Every post, unfiltered and unpaginated, as discover cards.
    pub fn list_summaries(pool: &DbPool) -> Result<Vec<PostSummary>, String> {
        let conn = pool.get().map_err(|e| e.to_string())?;
        let mut stmt = conn
            .prepare("SELECT postid, title, titleimagepath, descriptions FROM posts")
            .map_err(|e| e.to_string())?;
        let rows = stmt
            .query_map([], Self::summary_from_row)
            .map_err(|e| e.to_string())?;
        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(|e| e.to_string())
    }

    /// Case-insensitive substring match on title or descriptions.
    /// The empty query matches every post.
    pub fn search_summaries(pool: &DbPool, query: &str) -> Result<Vec<PostSummary>, String> {
        let conn = pool.get().map_err(|e| e.to_string())?;
        let pattern = format!("%{}%", query);
        let mut stmt = conn
            .prepare(
                "SELECT postid, title, titleimagepath, descriptions FROM posts
                 WHERE title LIKE ?1 OR descriptions LIKE ?1",
            )
            .map_err(|e| e.to_string())?;
        let rows = stmt
            .query_map(params![pattern], Self::summary_from_row)
            .map_err(|e| e.to_string())?;
        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(|e| e.to_string())
    }

    pub fn ids_for_user(pool: &DbPool, username: &str) -> Vec<i64> {
        let conn = match pool.get() {
            Ok(c) => c,
            Err(_) => return vec![],
        };
        let mut stmt = match conn.prepare("SELECT postid FROM posts WHERE username = ?1") {
            Ok(s) => s,
            Err(_) => return vec![],
        };
        stmt.query_map(params![username], |row| row.get(0))
            .map(|rows| rows.filter_map(|r| r.ok()).collect())
            .unwrap_or_default()
    }

    pub fn count(pool: &DbPool) -> i64 {
        let conn = match pool.get() {
            Ok(c) => c,
            Err(_) => return 0,
        };
        conn.query_row("SELECT COUNT(*) FROM posts", [], |row| row.get(0))
            .unwrap_or(0)
    }

    pub fn create(pool: &DbPool, username: &str, form: &PostForm) -> Result<i64, String> {
        let conn = pool.get().map_err(|e| e.to_string())?;
        conn.execute(
            "INSERT INTO posts (username, title, titleimagepath, descriptions)
             VALUES (?1, ?2, ?3, ?4)",
            params![username, form.title, form.titleimagepath, form.descriptions],
        )
        .map_err(|e| e.to_string())?;
        Ok(conn.last_insert_rowid())
    }

    /// Relative `likes + 1` update, then read back the new count.
    /// Updating zero rows means the post does not exist.
    pub fn increment_likes(pool: &DbPool, postid: i64) -> Result<i64, String> {
        let conn = pool.get().map_err(|e| e.to_string())?;
        let updated = conn
            .execute(
                "UPDATE posts SET likes = likes + 1 WHERE postid = ?1",
                params![postid],
            )
            .map_err(|e| e.to_string())?;
        if updated == 0 {
            return Err(format!("no post with id {}", postid));
        }
        conn.query_row(
            "SELECT likes FROM posts WHERE postid = ?1",
            params![postid],
            |row| row.get(0),
        )
        .map_err(|e| e.to_string())
    }
}
