//! Feed run orchestration
//!
//! A run resolves the site configuration for a feed, fetches and parses the
//! feed, normalizes every entry and upserts the resulting articles. Each run
//! is recorded in the run store with its counts.

use crate::feed::document::FeedDocument;
use crate::feed::normalize::{ArticleNormalizer, SiteFields};
use crate::feed::RunOverrides;
use crate::fetch::{FeedFetcher, PageFetcher};
use crate::sites::SiteResolver;
use crate::storage::{ArticleStore, RunStatus, RunStore, SiteConfigStore};
use crate::UnifiedError;
use serde::Serialize;
use std::time::Instant;

/// Outcome of one feed run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FeedRunReport {
    pub feed_url: String,
    pub site_name: String,
    /// Number of `item`/`entry` elements in the feed
    pub entries_seen: u64,
    pub articles_saved: u64,
    pub articles_failed: u64,
}

/// Runs feeds against its stores and a pair of fetchers
pub struct FeedRunner<'a, C: ?Sized, S> {
    sites: &'a C,
    store: &'a mut S,
    feeds: &'a dyn FeedFetcher,
    pages: &'a dyn PageFetcher,
}

impl<'a, C, S> FeedRunner<'a, C, S>
where
    C: SiteConfigStore + ?Sized,
    S: ArticleStore + RunStore,
{
    /// Creates a new runner
    ///
    /// # Arguments
    ///
    /// * `sites` - Site configurations to resolve feeds against
    /// * `store` - Articles and run records
    /// * `feeds` - Fetches feed documents
    /// * `pages` - Fetches article pages for image scraping
    pub fn new(
        sites: &'a C,
        store: &'a mut S,
        feeds: &'a dyn FeedFetcher,
        pages: &'a dyn PageFetcher,
    ) -> Self {
        Self {
            sites,
            store,
            feeds,
            pages,
        }
    }

    /// Processes one feed
    ///
    /// This method:
    /// 1. Resolves the site configuration (explicit name, else URL pattern)
    /// 2. Fetches and parses the feed
    /// 3. Normalizes each entry in document order
    /// 4. Upserts each article, counting failures without stopping
    ///
    /// # Arguments
    ///
    /// * `url` - The feed URL
    /// * `site` - Explicit site name, if any
    /// * `overrides` - Per-run language/categories/countries
    ///
    /// # Returns
    ///
    /// * `Ok(FeedRunReport)` - The run completed, possibly with failed entries
    /// * `Err(UnifiedError::SiteNotFound)` - No configuration applies; nothing is recorded
    /// * `Err(UnifiedError)` - The feed could not be fetched or parsed; the run is marked failed
    pub async fn process_feed(
        &mut self,
        url: &str,
        site: Option<&str>,
        overrides: &RunOverrides,
    ) -> Result<FeedRunReport, UnifiedError> {
        let resolved = SiteResolver::new(self.sites).resolve(site, url)?;
        let config = match resolved {
            Some(config) => config,
            None => {
                let key = site.filter(|s| !s.is_empty()).unwrap_or(url);
                tracing::error!("No site configuration found for {}", key);
                return Err(UnifiedError::SiteNotFound(key.to_string()));
            }
        };

        tracing::info!("Processing feed {} as '{}'", url, config.site_name);
        let start_time = Instant::now();

        let mut report = FeedRunReport {
            feed_url: url.to_string(),
            site_name: config.site_name.clone(),
            ..FeedRunReport::default()
        };
        let run_id = self.store.create_run(url, &config.site_name)?;

        let body = match self.feeds.fetch_feed(url).await {
            Ok(body) => body,
            Err(e) => {
                tracing::error!("Failed to fetch feed {}: {}", url, e);
                self.fail_run(run_id, &report);
                return Err(e.into());
            }
        };

        let document = match FeedDocument::parse(&body) {
            Ok(document) => document,
            Err(e) => {
                tracing::error!("Failed to parse feed {}: {}", url, e);
                self.fail_run(run_id, &report);
                return Err(UnifiedError::FeedParse {
                    url: url.to_string(),
                    message: e.to_string(),
                });
            }
        };

        let normalizer = ArticleNormalizer::new(self.pages);
        let fields = SiteFields::from_config(&config);

        for entry in document.entries() {
            report.entries_seen += 1;

            let article = normalizer
                .normalize_with(&entry, &fields, &config, overrides)
                .await;

            match self.store.upsert_article(&article) {
                Ok(()) => {
                    report.articles_saved += 1;
                    tracing::debug!("Saved article: {}", article.link);
                }
                Err(e) => {
                    report.articles_failed += 1;
                    tracing::error!(
                        "Failed to save entry {} ('{}'): {}",
                        report.entries_seen,
                        article.title,
                        e
                    );
                }
            }
        }

        self.store
            .finish_run(run_id, RunStatus::Completed, &report)?;

        tracing::info!(
            "Feed {} done: {} of {} entries saved in {:?}",
            url,
            report.articles_saved,
            report.entries_seen,
            start_time.elapsed()
        );

        Ok(report)
    }

    /// Marks a run as failed, logging if that fails too
    fn fail_run(&mut self, run_id: i64, report: &FeedRunReport) {
        if let Err(e) = self.store.finish_run(run_id, RunStatus::Failed, report) {
            tracing::error!("Failed to record failure of run {}: {}", run_id, e);
        }
    }
}
