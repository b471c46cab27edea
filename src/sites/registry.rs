//! In-memory site configuration store
//!
//! Holds the `[[site]]` entries of a TOML configuration in file order, for
//! runs that do not need a database.

use crate::config::{Config, SiteConfig};
use crate::sites::matcher::first_match;
use crate::storage::{SiteConfigStore, StorageResult};

/// Site configurations kept in memory, in insertion order
#[derive(Debug, Clone, Default)]
pub struct SiteRegistry {
    sites: Vec<SiteConfig>,
}

impl SiteRegistry {
    /// Creates an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding the sites of a configuration, in file order
    pub fn from_config(config: &Config) -> Self {
        Self {
            sites: config.sites.clone(),
        }
    }

    pub fn len(&self) -> usize {
        self.sites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }
}

impl From<Vec<SiteConfig>> for SiteRegistry {
    fn from(sites: Vec<SiteConfig>) -> Self {
        Self { sites }
    }
}

impl SiteConfigStore for SiteRegistry {
    fn find_by_name(&self, name: &str) -> StorageResult<Option<SiteConfig>> {
        Ok(self.sites.iter().find(|s| s.site_name == name).cloned())
    }

    fn find_by_url_substring(&self, url: &str) -> StorageResult<Option<SiteConfig>> {
        Ok(first_match(&self.sites, url).cloned())
    }

    fn list_sites(&self) -> StorageResult<Vec<SiteConfig>> {
        Ok(self.sites.clone())
    }

    fn upsert_site(&mut self, site: &SiteConfig) -> StorageResult<()> {
        match self
            .sites
            .iter_mut()
            .find(|s| s.site_name == site.site_name)
        {
            Some(existing) => *existing = site.clone(),
            None => self.sites.push(site.clone()),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_config;

    #[test]
    fn test_from_config_keeps_file_order() {
        let config = parse_config(
            r#"
[[site]]
site-name = "Les Echos"
url-pattern = "lesechos.fr"

[[site]]
site-name = "Le Monde"
url-pattern = "lemonde.fr"
"#,
        )
        .unwrap();

        let registry = SiteRegistry::from_config(&config);
        let names: Vec<_> = registry
            .list_sites()
            .unwrap()
            .into_iter()
            .map(|s| s.site_name)
            .collect();
        assert_eq!(names, vec!["Les Echos", "Le Monde"]);
    }

    #[test]
    fn test_upsert_replaces_by_name() {
        let mut registry = SiteRegistry::new();
        registry
            .upsert_site(&SiteConfig::new("Le Monde", "lemonde.fr"))
            .unwrap();
        registry
            .upsert_site(&SiteConfig::new("Le Monde", "www.lemonde.fr"))
            .unwrap();

        assert_eq!(registry.len(), 1);
        let site = registry.find_by_name("Le Monde").unwrap().unwrap();
        assert_eq!(site.url_pattern, "www.lemonde.fr");
    }

    #[test]
    fn test_find_by_url_substring() {
        let registry = SiteRegistry::from(vec![SiteConfig::new("Le Monde", "lemonde.fr")]);
        assert!(registry
            .find_by_url_substring("https://www.lemonde.fr/x")
            .unwrap()
            .is_some());
        assert!(registry
            .find_by_url_substring("https://www.lefigaro.fr/x")
            .unwrap()
            .is_none());
    }
}
