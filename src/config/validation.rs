use crate::config::types::{Config, FetchConfig, OutputConfig, SiteConfig};
use crate::sites::patterns_overlap;
use crate::ConfigError;
use scraper::Selector;
use std::collections::HashSet;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_fetch_config(&config.fetch)?;
    validate_output_config(&config.output)?;
    validate_sites(&config.sites)?;
    Ok(())
}

/// Validates fetch configuration
fn validate_fetch_config(config: &FetchConfig) -> Result<(), ConfigError> {
    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "timeout_secs must be >= 1, got {}",
            config.timeout_secs
        )));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.database_path.is_empty() {
        return Err(ConfigError::Validation(
            "database_path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates the site list: each entry on its own, then name uniqueness
///
/// Overlapping URL patterns are accepted but reported, since URL resolution
/// takes the first stored match and gives no priority among overlaps.
fn validate_sites(sites: &[SiteConfig]) -> Result<(), ConfigError> {
    let mut names = HashSet::new();

    for site in sites {
        validate_site(site)?;

        if !names.insert(site.site_name.as_str()) {
            return Err(ConfigError::Validation(format!(
                "Duplicate site_name '{}'",
                site.site_name
            )));
        }
    }

    for (i, a) in sites.iter().enumerate() {
        for b in sites.iter().skip(i + 1) {
            if patterns_overlap(&a.url_pattern, &b.url_pattern) {
                tracing::warn!(
                    "URL patterns '{}' ({}) and '{}' ({}) overlap; first stored match wins",
                    a.url_pattern,
                    a.site_name,
                    b.url_pattern,
                    b.site_name
                );
            }
        }
    }

    Ok(())
}

/// Validates a single site configuration
pub fn validate_site(site: &SiteConfig) -> Result<(), ConfigError> {
    if site.site_name.trim().is_empty() {
        return Err(ConfigError::Validation(
            "site_name cannot be empty".to_string(),
        ));
    }

    if site.url_pattern.is_empty() {
        return Err(ConfigError::Validation(format!(
            "url_pattern cannot be empty for site '{}'",
            site.site_name
        )));
    }

    let fields = [
        ("title_field", Some(site.title_field.as_str())),
        ("link_field", Some(site.link_field.as_str())),
        ("date_field", Some(site.date_field.as_str())),
        ("description_field", Some(site.description_field.as_str())),
        ("author_field", site.author_field.as_deref()),
        ("keywords_field", site.keywords_field.as_deref()),
        ("image_field", site.image_field.as_deref()),
    ];
    for (name, raw) in fields {
        if let Some(raw) = raw {
            validate_field_path(&site.site_name, name, raw)?;
        }
    }

    if site.media_namespace.is_some() != site.media_content_field.is_some() {
        return Err(ConfigError::Validation(format!(
            "media_namespace and media_content_field must be set together for site '{}'",
            site.site_name
        )));
    }

    if let Some(selector) = &site.article_image_selector {
        if Selector::parse(selector).is_err() {
            return Err(ConfigError::InvalidSelector {
                site: site.site_name.clone(),
                selector: selector.clone(),
            });
        }
    }

    Ok(())
}

/// Checks the `path[|attribute]` shape of a field path string
///
/// An empty string is valid and means the field is not tracked.
fn validate_field_path(site: &str, name: &str, raw: &str) -> Result<(), ConfigError> {
    if raw.is_empty() {
        return Ok(());
    }

    let invalid = |message: String| ConfigError::InvalidFieldPath {
        site: site.to_string(),
        message,
    };

    let (path, attribute) = match raw.split_once('|') {
        Some((path, attribute)) => (path, Some(attribute)),
        None => (raw, None),
    };

    if path.trim().is_empty() {
        return Err(invalid(format!("{} '{}' has an empty element path", name, raw)));
    }

    if attribute.is_some_and(|a| a.trim().is_empty()) {
        return Err(invalid(format!("{} '{}' has an empty attribute name", name, raw)));
    }

    if path.matches('{').count() != path.matches('}').count() {
        return Err(invalid(format!(
            "{} '{}' has an unbalanced namespace qualifier",
            name, raw
        )));
    }

    Ok(())
}
