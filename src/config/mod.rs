//! Configuration module for Unified-RSS
//!
//! This module handles loading, parsing, and validating the TOML file that
//! carries the fetcher settings, the database location and the per-site
//! feed mappings.
//!
//! # Example
//!
//! ```no_run
//! use unified_rss::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("sites.toml")).unwrap();
//! println!("{} site configurations loaded", config.sites.len());
//! ```

mod defaults;
mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, FetchConfig, OutputConfig, SiteConfig};

// Re-export parser and validation functions
pub use defaults::{default_config, DEFAULT_SITES_TOML};
pub use parser::{load_config, parse_config};
pub use validation::{validate, validate_site};

pub(crate) use types::{
    default_date_field, default_description_field, default_link_field, default_title_field,
};
