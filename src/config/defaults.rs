//! Built-in site configurations
//!
//! The bundled `sites.toml` describes the French news sites the tool ships
//! with. It is compiled into the binary so that `setup` works without a
//! configuration file.

use crate::config::parser::parse_config;
use crate::config::types::Config;
use crate::ConfigError;

/// The bundled configuration file
pub const DEFAULT_SITES_TOML: &str = include_str!("../../sites.toml");

/// Parses and validates the bundled configuration
///
/// # Returns
///
/// * `Ok(Config)` - The default fetch/output settings and sites
/// * `Err(ConfigError)` - The bundled file is invalid
pub fn default_config() -> Result<Config, ConfigError> {
    parse_config(DEFAULT_SITES_TOML)
}
