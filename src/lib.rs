//! Unified-RSS: configuration-driven feed normalization
//!
//! This crate turns syndication feeds from heterogeneous news sources into a
//! common article record. Each source is described by a declarative site
//! configuration (where the title, link, image, etc. live in that site's feed
//! dialect) instead of a dedicated scraper per site.

pub mod config;
pub mod extract;
pub mod feed;
pub mod fetch;
pub mod output;
pub mod sites;
pub mod storage;

use thiserror::Error;

/// Main error type for Unified-RSS operations
#[derive(Debug, Error)]
pub enum UnifiedError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] fetch::FetchError),

    #[error("Feed parse error for {url}: {message}")]
    FeedParse { url: String, message: String },

    #[error("No site configuration found for {0}")]
    SiteNotFound(String),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid field path for site '{site}': {message}")]
    InvalidFieldPath { site: String, message: String },

    #[error("Invalid article image selector for site '{site}': {selector}")]
    InvalidSelector { site: String, selector: String },
}

/// Result type alias for Unified-RSS operations
pub type Result<T> = std::result::Result<T, UnifiedError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::{Config, SiteConfig};
pub use extract::{extract, FieldPath, NamespaceMap};
pub use feed::{Article, ArticleNormalizer, FeedDocument, FeedRunReport, FeedRunner, RunOverrides};
pub use sites::SiteResolver;
