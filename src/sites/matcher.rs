use crate::config::SiteConfig;

/// Checks if a site URL pattern matches a feed URL
///
/// Patterns are plain substrings, compared case-sensitively. An empty
/// pattern never matches.
///
/// # Arguments
///
/// * `pattern` - The site's URL pattern, e.g. "lemonde.fr"
/// * `url` - The feed URL to check against the pattern
///
/// # Returns
///
/// * `true` - If the pattern occurs in the URL
/// * `false` - Otherwise
///
/// # Examples
///
/// ```
/// use unified_rss::sites::pattern_matches;
///
/// assert!(pattern_matches("lemonde.fr", "https://www.lemonde.fr/rss/une.xml"));
/// assert!(!pattern_matches("lemonde.fr", "https://www.lefigaro.fr/rss"));
/// assert!(!pattern_matches("", "https://www.lemonde.fr/rss/une.xml"));
/// ```
pub fn pattern_matches(pattern: &str, url: &str) -> bool {
    !pattern.is_empty() && url.contains(pattern)
}

/// Returns the first site, in the given order, whose pattern matches `url`
pub fn first_match<'a, I>(sites: I, url: &str) -> Option<&'a SiteConfig>
where
    I: IntoIterator<Item = &'a SiteConfig>,
{
    sites
        .into_iter()
        .find(|site| pattern_matches(&site.url_pattern, url))
}

/// Checks whether two patterns could both match the same URL
///
/// This is the case when one pattern is contained in the other.
pub fn patterns_overlap(a: &str, b: &str) -> bool {
    !a.is_empty() && !b.is_empty() && (a.contains(b) || b.contains(a))
}
