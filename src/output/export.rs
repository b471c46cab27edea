//! JSON export of site configurations

use crate::config::SiteConfig;

/// Formats one site configuration as pretty-printed JSON
///
/// Keys use the same kebab-case names as the TOML configuration file.
pub fn format_site_json(site: &SiteConfig) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(site)
}
