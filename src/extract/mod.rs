//! Field extraction engine
//!
//! This module turns a site's field path strings into typed lookups and
//! evaluates them against one feed entry:
//! - Field path resolution (`path[|attribute]`, namespace prefixes)
//! - Namespace-aware element lookup within an entry
//! - Attribute-vs-text extraction with HTML unwrapping

mod entry;
mod field_path;
mod html;
mod value;

pub use entry::{FeedEntry, NamespaceMap};
pub use field_path::{FieldLookup, FieldPath, PathSegment};
pub use html::{html_to_text, looks_like_markup};
pub use value::{extract, find_element};
