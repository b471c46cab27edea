//! Site configuration resolver
//!
//! Picks the configuration for a feed run: an explicit site name wins,
//! otherwise the feed URL is matched against stored URL patterns.

use crate::config::SiteConfig;
use crate::storage::{SiteConfigStore, StorageResult};
use tracing::debug;

/// Resolves site configurations from a backing store
///
/// Lookups that find nothing return `Ok(None)`. Deciding whether that is
/// fatal is left to the caller.
pub struct SiteResolver<'a, S: SiteConfigStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: SiteConfigStore + ?Sized> SiteResolver<'a, S> {
    /// Creates a resolver over the given store
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Looks up a configuration by exact site name
    pub fn by_name(&self, name: &str) -> StorageResult<Option<SiteConfig>> {
        self.store.find_by_name(name)
    }

    /// Looks up the first configuration whose URL pattern occurs in `url`
    pub fn by_url(&self, url: &str) -> StorageResult<Option<SiteConfig>> {
        self.store.find_by_url_substring(url)
    }

    /// Resolves the configuration for a feed
    ///
    /// # Arguments
    ///
    /// * `site` - Explicit site name; takes precedence when given
    /// * `url` - The feed URL, used when no site name is given
    ///
    /// # Returns
    ///
    /// * `Ok(Some(SiteConfig))` - A configuration was found
    /// * `Ok(None)` - No configuration applies
    /// * `Err(StorageError)` - The store failed
    pub fn resolve(&self, site: Option<&str>, url: &str) -> StorageResult<Option<SiteConfig>> {
        match site.filter(|name| !name.is_empty()) {
            Some(name) => {
                debug!("Resolving site by name: {}", name);
                self.by_name(name)
            }
            None => {
                debug!("Resolving site by URL: {}", url);
                self.by_url(url)
            }
        }
    }
}
