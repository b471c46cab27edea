//! Storage traits and error types
//!
//! This module defines the collaborator interfaces the feed runner depends
//! on, and their error type.

use crate::config::SiteConfig;
use crate::feed::{Article, FeedRunReport};
use crate::storage::{RunRecord, RunStatus};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Run not found: {0}")]
    RunNotFound(i64),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),
}

impl From<serde_json::Error> for StorageError {
    fn from(error: serde_json::Error) -> Self {
        Self::Serialization(error.to_string())
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Backing store for site configurations
///
/// Lookups that find nothing return `Ok(None)`; errors are reserved for
/// failures of the store itself.
pub trait SiteConfigStore {
    /// Finds the configuration whose `site_name` equals `name`
    fn find_by_name(&self, name: &str) -> StorageResult<Option<SiteConfig>>;

    /// Finds the first configuration, in storage order, whose `url_pattern`
    /// occurs in `url` (case-sensitive)
    fn find_by_url_substring(&self, url: &str) -> StorageResult<Option<SiteConfig>>;

    /// Lists all configurations in storage order
    fn list_sites(&self) -> StorageResult<Vec<SiteConfig>>;

    /// Inserts a configuration, or replaces the one with the same `site_name`
    fn upsert_site(&mut self, site: &SiteConfig) -> StorageResult<()>;
}

/// Article persistence, idempotent by link
pub trait ArticleStore {
    /// Inserts the article or updates the existing one with the same link
    ///
    /// Sets the fetch timestamp. Articles with an empty link are rejected
    /// with [`StorageError::ConstraintViolation`].
    fn upsert_article(&mut self, article: &Article) -> StorageResult<()>;

    /// Gets an article by link
    fn get_article(&self, link: &str) -> StorageResult<Option<Article>>;

    /// Lists the most recently fetched articles, optionally for one source
    fn list_articles(&self, source: Option<&str>, limit: usize) -> StorageResult<Vec<Article>>;

    /// Gets total article count
    fn count_articles(&self) -> StorageResult<u64>;
}

/// Feed run bookkeeping
pub trait RunStore {
    /// Creates a new run in the `running` state and returns its ID
    fn create_run(&mut self, feed_url: &str, site_name: &str) -> StorageResult<i64>;

    /// Records the final status and counts of a run
    fn finish_run(
        &mut self,
        run_id: i64,
        status: RunStatus,
        report: &FeedRunReport,
    ) -> StorageResult<()>;

    /// Gets a run by ID
    fn get_run(&self, run_id: i64) -> StorageResult<RunRecord>;

    /// Gets the most recent runs, newest first
    fn latest_runs(&self, limit: usize) -> StorageResult<Vec<RunRecord>>;
}
