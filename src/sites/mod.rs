//! Site configuration lookup
//!
//! This module resolves which site configuration applies to a feed, either
//! by explicit site name or by matching the feed URL against each site's
//! URL pattern.

mod matcher;
mod registry;
mod resolver;

pub use matcher::{first_match, pattern_matches, patterns_overlap};
pub use registry::SiteRegistry;
pub use resolver::SiteResolver;
