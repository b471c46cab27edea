//! Tiered image resolution
//!
//! Sites expose article images at increasingly expensive locations. The
//! tiers are tried in order and the first non-empty result wins:
//!
//! | Tier | Source | Cost |
//! |------|--------|------|
//! | 1 | Configured `image_field` in the entry | free |
//! | 2 | Namespaced media enclosure `url` attribute | free |
//! | 3 | Article page scrape (opt-in per site) | one HTTP round trip |
//!
//! Failures never propagate: an entry without an image gets `""`.

use crate::config::SiteConfig;
use crate::extract::{extract, FeedEntry, FieldPath};
use crate::fetch::PageFetcher;
use scraper::{Html, Selector};
use url::Url;

/// Resolves at most one image URL per article
pub struct ImageResolver<'a> {
    pages: &'a dyn PageFetcher,
}

impl<'a> ImageResolver<'a> {
    pub fn new(pages: &'a dyn PageFetcher) -> Self {
        Self { pages }
    }

    /// Runs the image tiers for one entry
    ///
    /// # Arguments
    ///
    /// * `entry` - The feed entry
    /// * `link` - The article link already extracted from the entry
    /// * `config` - The site configuration
    ///
    /// # Returns
    ///
    /// The image URL, or an empty string when no tier produced one
    pub async fn resolve_image(
        &self,
        entry: &FeedEntry<'_, '_>,
        link: &str,
        config: &SiteConfig,
    ) -> String {
        let image = from_configured_field(entry, config);
        if !image.is_empty() {
            return image;
        }

        let image = from_media_enclosure(entry, config);
        if !image.is_empty() {
            return image;
        }

        if config.fetch_article_image && !link.is_empty() {
            return self.from_article_page(link, config).await;
        }

        String::new()
    }

    /// Tier 3: fetches the article page and selects an image from it
    async fn from_article_page(&self, link: &str, config: &SiteConfig) -> String {
        let html = match self.pages.fetch_html(link).await {
            Ok(html) => html,
            Err(e) => {
                tracing::warn!("Failed to fetch image from {}: {}", link, e);
                return String::new();
            }
        };

        match select_page_image(&html, config.article_image_selector.as_deref(), link) {
            Ok(Some(image)) => image,
            Ok(None) => {
                tracing::debug!("No image found on article page {}", link);
                String::new()
            }
            Err(message) => {
                tracing::warn!("Failed to select image from {}: {}", link, message);
                String::new()
            }
        }
    }
}

/// Tier 1: the configured image field
fn from_configured_field(entry: &FeedEntry<'_, '_>, config: &SiteConfig) -> String {
    extract(entry, &FieldPath::resolve_opt(config.image_field.as_deref()))
}

/// Tier 2: the `url` attribute of the `{media_namespace}media_content_field` child
fn from_media_enclosure(entry: &FeedEntry<'_, '_>, config: &SiteConfig) -> String {
    config
        .media_enclosure()
        .and_then(|(namespace, field)| entry.child_qualified(namespace, field))
        .and_then(|element| element.attribute("url"))
        .map(|url| url.trim().to_string())
        .unwrap_or_default()
}

/// Selects an image URL from an article page
///
/// With a selector, the first matching element is used; otherwise the first
/// `<img>` in the document. The image URL is read from `src`, or from
/// `content` so that selectors such as `meta[property="og:image"]` work.
/// Root-relative URLs are resolved against `page_url`.
///
/// # Returns
///
/// * `Ok(Some(String))` - An image URL was found
/// * `Ok(None)` - Nothing matched, or the match has no usable URL
/// * `Err(String)` - The selector could not be parsed
pub fn select_page_image(
    html: &str,
    selector: Option<&str>,
    page_url: &str,
) -> Result<Option<String>, String> {
    let selector_text = selector.filter(|s| !s.trim().is_empty()).unwrap_or("img");
    let selector = Selector::parse(selector_text)
        .map_err(|e| format!("invalid selector '{}': {:?}", selector_text, e))?;

    let document = Html::parse_document(html);
    let image = document
        .select(&selector)
        .next()
        .and_then(|element| {
            element
                .value()
                .attr("src")
                .or_else(|| element.value().attr("content"))
        })
        .map(str::trim)
        .filter(|src| !src.is_empty())
        .map(|src| absolutize_image_url(src, page_url));

    Ok(image)
}

/// Resolves a root-relative image URL (`/path`) against the page URL
///
/// Anything else is returned unchanged.
///
/// # Example
///
/// ```
/// use unified_rss::feed::absolutize_image_url;
///
/// assert_eq!(
///     absolutize_image_url("/pics/a.jpg", "https://www.lequipe.fr/Football/article/1"),
///     "https://www.lequipe.fr/pics/a.jpg"
/// );
/// ```
pub fn absolutize_image_url(src: &str, page_url: &str) -> String {
    if !src.starts_with('/') {
        return src.to_string();
    }

    match Url::parse(page_url).and_then(|base| base.join(src)) {
        Ok(absolute) => absolute.to_string(),
        Err(e) => {
            tracing::debug!("Could not resolve {} against {}: {}", src, page_url, e);
            src.to_string()
        }
    }
}
