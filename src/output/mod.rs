//! Output module for human-readable listings
//!
//! This module handles:
//! - Listing stored site configurations
//! - Exporting one site configuration as JSON
//! - Listing recently fetched articles
//! - Summarizing feed runs

mod export;
mod listing;
mod report;

pub use export::format_site_json;
pub use listing::{format_articles, format_sites, print_articles, print_sites};
pub use report::{format_run_report, format_runs, print_run_report, print_runs};
