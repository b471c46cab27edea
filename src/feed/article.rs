use serde::{Deserialize, Serialize};

/// A normalized article record
///
/// `link` is the natural key. `fetch_timestamp` is assigned by the store when
/// the article is persisted; freshly normalized articles leave it unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    pub link: String,
    pub description: String,
    pub source: String,
    pub language: String,
    pub countries: Vec<String>,
    pub categories: Vec<String>,
    pub keywords: Vec<String>,
    pub author: Option<String>,
    /// Image URL; empty when no image was found
    pub image: String,
    /// Raw publication date as found in the feed
    pub date: String,
    pub fetch_timestamp: Option<String>,
}

/// Per-run overrides of a site's defaults
///
/// An override that is absent or empty leaves the site default in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOverrides {
    pub language: Option<String>,
    pub categories: Option<Vec<String>>,
    pub countries: Option<Vec<String>>,
}

impl RunOverrides {
    pub fn language<'a>(&'a self, default: &'a str) -> &'a str {
        self.language
            .as_deref()
            .filter(|language| !language.is_empty())
            .unwrap_or(default)
    }

    pub fn categories<'a>(&'a self, default: &'a [String]) -> &'a [String] {
        pick_list(self.categories.as_deref(), default)
    }

    pub fn countries<'a>(&'a self, default: &'a [String]) -> &'a [String] {
        pick_list(self.countries.as_deref(), default)
    }
}

fn pick_list<'a>(value: Option<&'a [String]>, default: &'a [String]) -> &'a [String] {
    value.filter(|list| !list.is_empty()).unwrap_or(default)
}
