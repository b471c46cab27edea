//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the store traits.

use crate::config::{
    default_date_field, default_description_field, default_link_field, default_title_field,
    SiteConfig,
};
use crate::feed::{Article, FeedRunReport};
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{
    ArticleStore, RunStore, SiteConfigStore, StorageError, StorageResult,
};
use crate::storage::{RunRecord, RunStatus};
use crate::UnifiedError;
use chrono::Utc;
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;

const SITE_COLUMNS: &str = "site_name, url_pattern, default_language, default_categories,
     default_countries, title_field, link_field, date_field, description_field, author_field,
     keywords_field, image_field, media_namespace, media_content_field, fetch_article_image,
     article_image_selector";

const ARTICLE_COLUMNS: &str = "title, link, description, source, language, countries,
     categories, keywords, author, image_url, pub_date, fetch_date";

const RUN_COLUMNS: &str = "id, feed_url, site_name, started_at, finished_at, status,
     entries_seen, articles_saved, articles_failed";

/// SQLite storage backend
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Creates a new SqliteStorage instance
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteStorage)` - Successfully opened/created database
    /// * `Err(UnifiedError)` - Failed to open database
    pub fn new(path: &Path) -> Result<Self, UnifiedError> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database
    pub fn new_in_memory() -> Result<Self, UnifiedError> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }
}

impl SiteConfigStore for SqliteStorage {
    fn find_by_name(&self, name: &str) -> StorageResult<Option<SiteConfig>> {
        let site = self
            .conn
            .query_row(
                &format!("SELECT {} FROM site_configs WHERE site_name = ?1", SITE_COLUMNS),
                params![name],
                site_from_row,
            )
            .optional()?;
        Ok(site)
    }

    fn find_by_url_substring(&self, url: &str) -> StorageResult<Option<SiteConfig>> {
        // instr() is case-sensitive, unlike LIKE
        let site = self
            .conn
            .query_row(
                &format!(
                    "SELECT {} FROM site_configs
                     WHERE url_pattern <> '' AND instr(?1, url_pattern) > 0
                     ORDER BY id ASC LIMIT 1",
                    SITE_COLUMNS
                ),
                params![url],
                site_from_row,
            )
            .optional()?;
        Ok(site)
    }

    fn list_sites(&self) -> StorageResult<Vec<SiteConfig>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM site_configs ORDER BY id ASC",
            SITE_COLUMNS
        ))?;

        let sites = stmt
            .query_map([], site_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(sites)
    }

    fn upsert_site(&mut self, site: &SiteConfig) -> StorageResult<()> {
        let categories = serde_json::to_string(&site.categories)?;
        let countries = serde_json::to_string(&site.countries)?;

        self.conn.execute(
            &format!(
                "INSERT INTO site_configs ({}) VALUES
                 (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)
                 ON CONFLICT(site_name) DO UPDATE SET
                    url_pattern = excluded.url_pattern,
                    default_language = excluded.default_language,
                    default_categories = excluded.default_categories,
                    default_countries = excluded.default_countries,
                    title_field = excluded.title_field,
                    link_field = excluded.link_field,
                    date_field = excluded.date_field,
                    description_field = excluded.description_field,
                    author_field = excluded.author_field,
                    keywords_field = excluded.keywords_field,
                    image_field = excluded.image_field,
                    media_namespace = excluded.media_namespace,
                    media_content_field = excluded.media_content_field,
                    fetch_article_image = excluded.fetch_article_image,
                    article_image_selector = excluded.article_image_selector",
                SITE_COLUMNS
            ),
            params![
                site.site_name,
                site.url_pattern,
                site.language,
                categories,
                countries,
                site.title_field,
                site.link_field,
                site.date_field,
                site.description_field,
                site.author_field,
                site.keywords_field,
                site.image_field,
                site.media_namespace,
                site.media_content_field,
                site.fetch_article_image,
                site.article_image_selector,
            ],
        )?;
        Ok(())
    }
}

impl ArticleStore for SqliteStorage {
    fn upsert_article(&mut self, article: &Article) -> StorageResult<()> {
        if article.link.trim().is_empty() {
            return Err(StorageError::ConstraintViolation(format!(
                "article '{}' has an empty link",
                article.title
            )));
        }

        let countries = serde_json::to_string(&article.countries)?;
        let categories = serde_json::to_string(&article.categories)?;
        let keywords = serde_json::to_string(&article.keywords)?;
        let now = Utc::now().to_rfc3339();

        self.conn.execute(
            &format!(
                "INSERT INTO articles ({}) VALUES
                 (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
                 ON CONFLICT(link) DO UPDATE SET
                    title = excluded.title,
                    description = excluded.description,
                    source = excluded.source,
                    language = excluded.language,
                    countries = excluded.countries,
                    categories = excluded.categories,
                    keywords = excluded.keywords,
                    author = excluded.author,
                    image_url = excluded.image_url,
                    pub_date = excluded.pub_date,
                    fetch_date = excluded.fetch_date",
                ARTICLE_COLUMNS
            ),
            params![
                article.title,
                article.link,
                article.description,
                article.source,
                article.language,
                countries,
                categories,
                keywords,
                article.author,
                article.image,
                article.date,
                now,
            ],
        )?;
        Ok(())
    }

    fn get_article(&self, link: &str) -> StorageResult<Option<Article>> {
        let article = self
            .conn
            .query_row(
                &format!("SELECT {} FROM articles WHERE link = ?1", ARTICLE_COLUMNS),
                params![link],
                article_from_row,
            )
            .optional()?;
        Ok(article)
    }

    fn list_articles(&self, source: Option<&str>, limit: usize) -> StorageResult<Vec<Article>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM articles
             WHERE ?1 IS NULL OR source = ?1
             ORDER BY fetch_date DESC, id DESC
             LIMIT ?2",
            ARTICLE_COLUMNS
        ))?;

        let articles = stmt
            .query_map(params![source, limit as i64], article_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(articles)
    }

    fn count_articles(&self) -> StorageResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM articles", [], |row| row.get(0))?;
        Ok(count as u64)
    }
}

impl RunStore for SqliteStorage {
    fn create_run(&mut self, feed_url: &str, site_name: &str) -> StorageResult<i64> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO runs (feed_url, site_name, started_at, status) VALUES (?1, ?2, ?3, ?4)",
            params![feed_url, site_name, now, RunStatus::Running.to_db_string()],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn finish_run(
        &mut self,
        run_id: i64,
        status: RunStatus,
        report: &FeedRunReport,
    ) -> StorageResult<()> {
        let now = Utc::now().to_rfc3339();
        let updated = self.conn.execute(
            "UPDATE runs SET status = ?1, finished_at = ?2, entries_seen = ?3,
             articles_saved = ?4, articles_failed = ?5 WHERE id = ?6",
            params![
                status.to_db_string(),
                now,
                report.entries_seen as i64,
                report.articles_saved as i64,
                report.articles_failed as i64,
                run_id
            ],
        )?;

        if updated == 0 {
            return Err(StorageError::RunNotFound(run_id));
        }
        Ok(())
    }

    fn get_run(&self, run_id: i64) -> StorageResult<RunRecord> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM runs WHERE id = ?1", RUN_COLUMNS),
                params![run_id],
                run_from_row,
            )
            .optional()?
            .ok_or(StorageError::RunNotFound(run_id))
    }

    fn latest_runs(&self, limit: usize) -> StorageResult<Vec<RunRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM runs ORDER BY id DESC LIMIT ?1",
            RUN_COLUMNS
        ))?;

        let runs = stmt
            .query_map(params![limit as i64], run_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(runs)
    }
}

/// Reads a JSON string array column
fn json_list(row: &Row<'_>, idx: usize) -> rusqlite::Result<Vec<String>> {
    match row.get::<_, Option<String>>(idx)? {
        Some(raw) if !raw.trim().is_empty() => serde_json::from_str(&raw)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e))),
        _ => Ok(Vec::new()),
    }
}

fn site_from_row(row: &Row<'_>) -> rusqlite::Result<SiteConfig> {
    Ok(SiteConfig {
        site_name: row.get(0)?,
        url_pattern: row.get(1)?,
        language: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
        categories: json_list(row, 3)?,
        countries: json_list(row, 4)?,
        title_field: row
            .get::<_, Option<String>>(5)?
            .unwrap_or_else(default_title_field),
        link_field: row
            .get::<_, Option<String>>(6)?
            .unwrap_or_else(default_link_field),
        date_field: row
            .get::<_, Option<String>>(7)?
            .unwrap_or_else(default_date_field),
        description_field: row
            .get::<_, Option<String>>(8)?
            .unwrap_or_else(default_description_field),
        author_field: row.get(9)?,
        keywords_field: row.get(10)?,
        image_field: row.get(11)?,
        media_namespace: row.get(12)?,
        media_content_field: row.get(13)?,
        fetch_article_image: row.get(14)?,
        article_image_selector: row.get(15)?,
    })
}

fn article_from_row(row: &Row<'_>) -> rusqlite::Result<Article> {
    Ok(Article {
        title: row.get(0)?,
        link: row.get(1)?,
        description: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
        source: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
        language: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
        countries: json_list(row, 5)?,
        categories: json_list(row, 6)?,
        keywords: json_list(row, 7)?,
        author: row.get(8)?,
        image: row.get::<_, Option<String>>(9)?.unwrap_or_default(),
        date: row.get::<_, Option<String>>(10)?.unwrap_or_default(),
        fetch_timestamp: row.get(11)?,
    })
}

fn run_from_row(row: &Row<'_>) -> rusqlite::Result<RunRecord> {
    Ok(RunRecord {
        id: row.get(0)?,
        feed_url: row.get(1)?,
        site_name: row.get(2)?,
        started_at: row.get(3)?,
        finished_at: row.get(4)?,
        status: RunStatus::from_db_string(&row.get::<_, String>(5)?)
            .unwrap_or(RunStatus::Failed),
        entries_seen: row.get::<_, i64>(6)? as u64,
        articles_saved: row.get::<_, i64>(7)? as u64,
        articles_failed: row.get::<_, i64>(8)? as u64,
    })
}
