use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::params;

pub type DbPool = Pool<SqliteConnectionManager>;

pub fn init_pool() -> Result<DbPool, Box<dyn std::error::Error>> {
    let path = std::env::var("DRIFTLOG_DB")
        .unwrap_or_else(|_| "website/db/driftlog.db".to_string());
    let manager = SqliteConnectionManager::file(path);
    let pool = Pool::builder().max_size(10).build(manager)?;

    // Enable WAL mode for better concurrent read performance
    let conn = pool.get()?;
    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;

    Ok(pool)
}

pub fn run_migrations(pool: &DbPool) -> Result<(), Box<dyn std::error::Error>> {
    let conn = pool.get()?;

    conn.execute_batch(
        "
        -- Accounts
        CREATE TABLE IF NOT EXISTS users (
            username TEXT PRIMARY KEY,
            password TEXT NOT NULL,
            bio TEXT NOT NULL DEFAULT '',
            profilepicture TEXT NOT NULL DEFAULT '/images/ProfilePicture/1.png'
        );

        -- Posts
        CREATE TABLE IF NOT EXISTS posts (
            postid INTEGER PRIMARY KEY,
            username TEXT NOT NULL,
            title TEXT NOT NULL,
            titleimagepath TEXT,
            descriptions TEXT,
            likes INTEGER NOT NULL DEFAULT 0,
            createtime DATETIME DEFAULT CURRENT_TIMESTAMP,
            FOREIGN KEY (username) REFERENCES users(username)
        );

        -- Comments
        CREATE TABLE IF NOT EXISTS comments (
            commentid INTEGER PRIMARY KEY,
            postid INTEGER NOT NULL,
            username TEXT NOT NULL,
            commenttext TEXT NOT NULL,
            createtime DATETIME DEFAULT CURRENT_TIMESTAMP,
            FOREIGN KEY (postid) REFERENCES posts(postid)
        );

        -- Tag vocabulary
        CREATE TABLE IF NOT EXISTS tags (
            tagid INTEGER PRIMARY KEY,
            tagname TEXT NOT NULL UNIQUE
        );

        -- Many-to-many: posts <-> tags
        CREATE TABLE IF NOT EXISTS posttags (
            postid INTEGER NOT NULL,
            tagid INTEGER NOT NULL,
            UNIQUE(postid, tagid),
            FOREIGN KEY (postid) REFERENCES posts(postid),
            FOREIGN KEY (tagid) REFERENCES tags(tagid)
        );

        -- Ordered body blocks of a post
        CREATE TABLE IF NOT EXISTS sections (
            sectionid INTEGER PRIMARY KEY,
            postid INTEGER NOT NULL,
            sectiontitle TEXT,
            sectiontext TEXT,
            sectionimagepath TEXT,
            createtime DATETIME DEFAULT CURRENT_TIMESTAMP,
            FOREIGN KEY (postid) REFERENCES posts(postid)
        );

        -- Login sessions
        CREATE TABLE IF NOT EXISTS sessions (
            id TEXT PRIMARY KEY,
            username TEXT NOT NULL,
            created_at DATETIME NOT NULL,
            expires_at DATETIME NOT NULL
        );

        -- Settings (key-value)
        CREATE TABLE IF NOT EXISTS settings (
            key TEXT PRIMARY KEY,
            value TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_posts_username ON posts(username);
        CREATE INDEX IF NOT EXISTS idx_comments_postid ON comments(postid);
        CREATE INDEX IF NOT EXISTS idx_sections_postid ON sections(postid);
        CREATE INDEX IF NOT EXISTS idx_posttags_postid ON posttags(postid);
        ",
    )?;

    Ok(())
}

pub fn seed_defaults(pool: &DbPool) -> Result<(), Box<dyn std::error::Error>> {
    let conn = pool.get()?;

    let defaults = vec![
        ("site_name", "Driftlog"),
        ("session_expiry_hours", "24"),
        ("display_timezone", "America/Denver"),
        ("default_profile_picture", "/images/ProfilePicture/1.png"),
    ];

    for (key, value) in defaults {
        conn.execute(
            "INSERT OR IGNORE INTO settings (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
    }

    Ok(())
}
