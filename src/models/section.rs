use chrono::NaiveDateTime;
use rusqlite::{params, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbPool;

/// One ordered block of a post's body.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Section {
    pub sectionid: i64,
    pub postid: i64,
    pub sectiontitle: Option<String>,
    pub sectiontext: Option<String>,
    pub sectionimagepath: Option<String>,
    pub createtime: NaiveDateTime,
}

impl Section {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Section {
            sectionid: row.get("sectionid")?,
            postid: row.get("postid")?,
            sectiontitle: row.get("sectiontitle")?,
            sectiontext: row.get("sectiontext")?,
            sectionimagepath: row.get("sectionimagepath")?,
            createtime: row.get("createtime")?,
        })
    }

    pub fn for_post(pool: &DbPool, postid: i64) -> Vec<Self> {
        let conn = match pool.get() {
            Ok(c) => c,
            Err(_) => return vec![],
        };
        let mut stmt = match conn
            .prepare("SELECT * FROM sections WHERE postid = ?1 ORDER BY createtime ASC")
        {
            Ok(s) => s,
            Err(_) => return vec![],
        };
        stmt.query_map(params![postid], Self::from_row)
            .map(|rows| rows.filter_map(|r| r.ok()).collect())
            .unwrap_or_default()
    }

    pub fn create(
        pool: &DbPool,
        postid: i64,
        sectiontitle: Option<&str>,
        sectiontext: Option<&str>,
        sectionimagepath: Option<&str>,
    ) -> Result<i64, String> {
        let conn = pool.get().map_err(|e| e.to_string())?;
        conn.execute(
            "INSERT INTO sections (postid, sectiontitle, sectiontext, sectionimagepath, createtime)
             VALUES (?1, ?2, ?3, ?4, CURRENT_TIMESTAMP)",
            params![postid, sectiontitle, sectiontext, sectionimagepath],
        )
        .map_err(|e| e.to_string())?;
        Ok(conn.last_insert_rowid())
    }
}
