use serde::{Deserialize, Serialize};

/// Default user agent sent with feed and article requests
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Main configuration structure for Unified-RSS
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default, rename = "site")]
    pub sites: Vec<SiteConfig>,
}

/// HTTP fetch configuration
#[derive(Debug, Clone, Deserialize)]
pub struct FetchConfig {
    /// Timeout applied to every feed and article request (seconds)
    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// User agent header value
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the SQLite database holding site configurations and articles
    #[serde(rename = "database-path", default = "default_database_path")]
    pub database_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
        }
    }
}

/// Describes how one source's feed dialect maps onto the article schema
///
/// Field values are field path strings of the form `path[|attribute]`, where
/// `path` may use a `prefix:tag` segment or a pre-qualified `{uri}tag`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SiteConfig {
    /// Unique site identifier, also used as the article `source`
    pub site_name: String,

    /// Substring matched against feed URLs when no site name is given
    pub url_pattern: String,

    /// Default article language
    #[serde(default)]
    pub language: String,

    /// Default article categories
    #[serde(default)]
    pub categories: Vec<String>,

    /// Default article countries
    #[serde(default)]
    pub countries: Vec<String>,

    #[serde(default = "default_title_field")]
    pub title_field: String,

    #[serde(default = "default_link_field")]
    pub link_field: String,

    #[serde(default = "default_date_field")]
    pub date_field: String,

    #[serde(default = "default_description_field")]
    pub description_field: String,

    #[serde(default)]
    pub author_field: Option<String>,

    /// Field holding a comma-separated keyword list
    #[serde(default)]
    pub keywords_field: Option<String>,

    #[serde(default)]
    pub image_field: Option<String>,

    /// Namespace URI of the media enclosure element (e.g. Media RSS)
    #[serde(default)]
    pub media_namespace: Option<String>,

    /// Local name of the media enclosure element inside `media_namespace`
    #[serde(default)]
    pub media_content_field: Option<String>,

    /// Whether the article page may be fetched to find an image
    #[serde(default)]
    pub fetch_article_image: bool,

    /// CSS selector for the article page image; first `<img>` when absent
    #[serde(default)]
    pub article_image_selector: Option<String>,
}

impl SiteConfig {
    /// Creates a site configuration with the built-in field defaults
    pub fn new(site_name: impl Into<String>, url_pattern: impl Into<String>) -> Self {
        Self {
            site_name: site_name.into(),
            url_pattern: url_pattern.into(),
            language: String::new(),
            categories: Vec::new(),
            countries: Vec::new(),
            title_field: default_title_field(),
            link_field: default_link_field(),
            date_field: default_date_field(),
            description_field: default_description_field(),
            author_field: None,
            keywords_field: None,
            image_field: None,
            media_namespace: None,
            media_content_field: None,
            fetch_article_image: false,
            article_image_selector: None,
        }
    }

    /// Returns the media enclosure namespace/field pair when both are set
    pub fn media_enclosure(&self) -> Option<(&str, &str)> {
        let namespace = self.media_namespace.as_deref().filter(|s| !s.is_empty())?;
        let field = self
            .media_content_field
            .as_deref()
            .filter(|s| !s.is_empty())?;
        Some((namespace, field))
    }
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_database_path() -> String {
    "db/site_configs.db".to_string()
}

pub(crate) fn default_title_field() -> String {
    "title".to_string()
}

pub(crate) fn default_link_field() -> String {
    "link".to_string()
}

pub(crate) fn default_date_field() -> String {
    "pubDate".to_string()
}

pub(crate) fn default_description_field() -> String {
    "description".to_string()
}
