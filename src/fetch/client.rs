//! reqwest-backed fetcher
//!
//! This module handles all HTTP requests made by a feed run:
//! - Building the HTTP client with the configured user agent and timeout
//! - GET requests for feed documents and article pages
//! - Decoding bodies in their declared character encoding
//! - Error classification (timeout, connection, HTTP status)

use crate::config::FetchConfig;
use crate::fetch::decode::decode_body;
use crate::fetch::{FeedFetcher, FetchError, PageFetcher};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::time::Duration;

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The fetch configuration (user agent, timeout)
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use unified_rss::config::FetchConfig;
/// use unified_rss::fetch::build_http_client;
///
/// let client = build_http_client(&FetchConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &FetchConfig) -> Result<Client, reqwest::Error> {
    let timeout = Duration::from_secs(config.timeout_secs);

    Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(timeout)
        .connect_timeout(timeout)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetcher for feeds and article pages over HTTP(S)
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &FetchConfig) -> Result<Self, FetchError> {
        Ok(Self {
            client: build_http_client(config)?,
        })
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// GETs `url` and returns the body as text
    ///
    /// The body is decoded with [`decode_body`]. Non-success status codes are
    /// reported as [`FetchError::Status`].
    async fn get_text(&self, url: &str) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| classify_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);

        let body = response
            .bytes()
            .await
            .map_err(|e| classify_error(url, e))?;

        Ok(decode_body(&body, content_type.as_deref()))
    }
}

#[async_trait]
impl FeedFetcher for HttpFetcher {
    async fn fetch_feed(&self, url: &str) -> Result<String, FetchError> {
        tracing::debug!("Fetching feed {}", url);
        self.get_text(url).await
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch_html(&self, url: &str) -> Result<String, FetchError> {
        tracing::debug!("Fetching article page {}", url);
        self.get_text(url).await
    }
}

fn classify_error(url: &str, error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else if error.is_connect() {
        FetchError::Connect {
            url: url.to_string(),
        }
    } else {
        FetchError::Http {
            url: url.to_string(),
            source: error,
        }
    }
}
