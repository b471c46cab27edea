//! HTTP fetch collaborators
//!
//! The extraction engine only sees the [`FeedFetcher`] and [`PageFetcher`]
//! traits; [`HttpFetcher`] is the reqwest-backed implementation used by the
//! command-line tool.

mod client;
mod decode;

pub use client::{build_http_client, HttpFetcher};
pub use decode::decode_body;

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur while fetching a feed or an article page
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Could not connect to {url}")]
    Connect { url: String },

    #[error("HTTP status {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),
}

/// Fetches the raw XML body of a syndication feed
#[async_trait]
pub trait FeedFetcher: Send + Sync {
    async fn fetch_feed(&self, url: &str) -> Result<String, FetchError>;
}

/// Fetches the HTML body of an article page
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch_html(&self, url: &str) -> Result<String, FetchError>;
}
