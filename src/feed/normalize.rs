//! Article normalization

use crate::config::SiteConfig;
use crate::extract::{extract, FeedEntry, FieldPath};
use crate::feed::article::{Article, RunOverrides};
use crate::feed::image::ImageResolver;
use crate::fetch::PageFetcher;

/// The field paths of one site configuration, resolved once per run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteFields {
    pub title: FieldPath,
    pub link: FieldPath,
    pub date: FieldPath,
    pub description: FieldPath,
    pub author: FieldPath,
    pub keywords: FieldPath,
}

impl SiteFields {
    pub fn from_config(config: &SiteConfig) -> Self {
        Self {
            title: FieldPath::resolve(&config.title_field),
            link: FieldPath::resolve(&config.link_field),
            date: FieldPath::resolve(&config.date_field),
            description: FieldPath::resolve(&config.description_field),
            author: FieldPath::resolve_opt(config.author_field.as_deref()),
            keywords: FieldPath::resolve_opt(config.keywords_field.as_deref()),
        }
    }
}

/// Turns feed entries into [`Article`] records for one site configuration
pub struct ArticleNormalizer<'a> {
    images: ImageResolver<'a>,
}

impl<'a> ArticleNormalizer<'a> {
    pub fn new(pages: &'a dyn PageFetcher) -> Self {
        Self {
            images: ImageResolver::new(pages),
        }
    }

    /// Normalizes one entry
    ///
    /// `language`, `categories` and `countries` come from `overrides` when
    /// provided and non-empty, else from the site defaults. Every other field
    /// is extracted from the entry. An empty link still produces an article;
    /// rejecting it is up to the store.
    pub async fn normalize(
        &self,
        entry: &FeedEntry<'_, '_>,
        config: &SiteConfig,
        overrides: &RunOverrides,
    ) -> Article {
        let fields = SiteFields::from_config(config);
        self.normalize_with(entry, &fields, config, overrides).await
    }

    /// Same as [`normalize`](Self::normalize) with pre-resolved field paths
    pub async fn normalize_with(
        &self,
        entry: &FeedEntry<'_, '_>,
        fields: &SiteFields,
        config: &SiteConfig,
        overrides: &RunOverrides,
    ) -> Article {
        let link = extract(entry, &fields.link);

        let author = if fields.author.is_untracked() {
            None
        } else {
            Some(extract(entry, &fields.author)).filter(|author| !author.is_empty())
        };

        let keywords = split_keywords(&extract(entry, &fields.keywords));
        let image = self.images.resolve_image(entry, &link, config).await;

        Article {
            title: extract(entry, &fields.title),
            description: extract(entry, &fields.description),
            date: extract(entry, &fields.date),
            source: config.site_name.clone(),
            language: overrides.language(&config.language).to_string(),
            categories: overrides.categories(&config.categories).to_vec(),
            countries: overrides.countries(&config.countries).to_vec(),
            keywords,
            author,
            image,
            link,
            fetch_timestamp: None,
        }
    }
}

/// Splits a comma-separated keyword string, trimming each piece
///
/// Empty pieces, such as the one after a trailing comma, are dropped rather
/// than kept as empty keywords: `"a, b ,"` gives `["a", "b"]`, not
/// `["a", "b", ""]`.
///
/// # Example
///
/// ```
/// use unified_rss::feed::split_keywords;
///
/// assert_eq!(split_keywords("Football, Ligue 1 ,PSG"), vec!["Football", "Ligue 1", "PSG"]);
/// assert_eq!(split_keywords("a, b ,"), vec!["a", "b"]);
/// assert!(split_keywords("").is_empty());
/// ```
pub fn split_keywords(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|keyword| !keyword.is_empty())
        .map(str::to_string)
        .collect()
}
