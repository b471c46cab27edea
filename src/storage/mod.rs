//! Storage module for persisting site configurations, articles and runs
//!
//! This module handles all database operations, including:
//! - SQLite database initialization and schema management
//! - Site configuration lookup by name or URL pattern
//! - Article upsert keyed by link
//! - Feed run tracking

mod schema;
mod sqlite;
mod traits;

pub use sqlite::SqliteStorage;
pub use traits::{ArticleStore, RunStore, SiteConfigStore, StorageError, StorageResult};

use crate::UnifiedError;
use std::path::Path;

/// Initializes or opens a storage database
///
/// Missing parent directories are created.
///
/// # Arguments
///
/// * `path` - Path to the SQLite database file
///
/// # Returns
///
/// * `Ok(SqliteStorage)` - Successfully initialized storage
/// * `Err(UnifiedError)` - Failed to initialize storage
pub fn open_storage(path: &Path) -> Result<SqliteStorage, UnifiedError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    SqliteStorage::new(path)
}

/// Represents a feed run in the database
#[derive(Debug, Clone)]
pub struct RunRecord {
    pub id: i64,
    pub feed_url: String,
    pub site_name: String,
    pub started_at: String,
    pub finished_at: Option<String>,
    pub status: RunStatus,
    pub entries_seen: u64,
    pub articles_saved: u64,
    pub articles_failed: u64,
}

/// Status of a feed run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Running,
    Completed,
    Failed,
}

impl RunStatus {
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "running" => Some(Self::Running),
            "completed" => Some(Self::Completed),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }
}
