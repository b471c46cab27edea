//! Database schema definitions
//!
//! This module contains all SQL schema definitions for the Unified-RSS database.

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
-- Per-site feed mappings and defaults
CREATE TABLE IF NOT EXISTS site_configs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    site_name TEXT NOT NULL UNIQUE,
    url_pattern TEXT NOT NULL,
    default_language TEXT NOT NULL DEFAULT '',
    default_categories TEXT NOT NULL DEFAULT '[]',
    default_countries TEXT NOT NULL DEFAULT '[]',
    title_field TEXT DEFAULT 'title',
    link_field TEXT DEFAULT 'link',
    date_field TEXT DEFAULT 'pubDate',
    description_field TEXT DEFAULT 'description',
    author_field TEXT,
    keywords_field TEXT,
    image_field TEXT,
    media_namespace TEXT,
    media_content_field TEXT,
    fetch_article_image INTEGER NOT NULL DEFAULT 0,
    article_image_selector TEXT
);

-- Normalized articles, unique by link
CREATE TABLE IF NOT EXISTS articles (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    link TEXT NOT NULL UNIQUE,
    description TEXT,
    source TEXT,
    language TEXT,
    countries TEXT,
    categories TEXT,
    keywords TEXT,
    author TEXT,
    image_url TEXT,
    pub_date TEXT,
    fetch_date TEXT
);

CREATE INDEX IF NOT EXISTS idx_articles_source ON articles(source);
CREATE INDEX IF NOT EXISTS idx_articles_fetch_date ON articles(fetch_date);

-- Track feed runs
CREATE TABLE IF NOT EXISTS runs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    feed_url TEXT NOT NULL,
    site_name TEXT NOT NULL,
    started_at TEXT NOT NULL,
    finished_at TEXT,
    status TEXT NOT NULL,
    entries_seen INTEGER NOT NULL DEFAULT 0,
    articles_saved INTEGER NOT NULL DEFAULT 0,
    articles_failed INTEGER NOT NULL DEFAULT 0
);
"#;

/// Initializes the database schema
///
/// # Arguments
///
/// * `conn` - The database connection
///
/// # Returns
///
/// * `Ok(())` - Schema initialized successfully
/// * `Err(rusqlite::Error)` - Failed to initialize schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    migrate_legacy_columns(conn)?;
    Ok(())
}

/// Renames columns of databases created by earlier releases
///
/// Those databases stored the article image selector in
/// `site_configs.article_image_xpath`.
fn migrate_legacy_columns(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    let columns = table_columns(conn, "site_configs")?;
    let has = |name: &str| columns.iter().any(|column| column == name);

    if has("article_image_xpath") && !has("article_image_selector") {
        tracing::info!("Migrating site_configs.article_image_xpath to article_image_selector");
        conn.execute_batch(
            "ALTER TABLE site_configs RENAME COLUMN article_image_xpath TO article_image_selector",
        )?;
    }

    Ok(())
}

fn table_columns(conn: &rusqlite::Connection, table: &str) -> Result<Vec<String>, rusqlite::Error> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({})", table))?;
    let columns = stmt
        .query_map([], |row| row.get::<_, String>(1))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(columns)
}
