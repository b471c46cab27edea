//! HTML unwrapping for feed text fields
//!
//! Many feeds embed HTML-escaped rich text in fields such as `description`.
//! Once the XML layer has unescaped it, the value looks like markup and is
//! reduced to its visible text here.

use scraper::{Html, Node};

/// Heuristic used to decide whether a text value carries embedded markup
pub fn looks_like_markup(text: &str) -> bool {
    text.contains('<') && text.contains('>')
}

/// Elements whose text content is never rendered
const HIDDEN_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

/// Parses `fragment` as an HTML fragment and returns its visible text
///
/// Text inside `<script>`, `<style>`, `<noscript>` and `<template>` is
/// skipped. Runs of whitespace are collapsed to a single space and the
/// result is trimmed.
///
/// # Example
///
/// ```
/// use unified_rss::extract::html_to_text;
///
/// assert_eq!(html_to_text("<b>Breaking</b> news"), "Breaking news");
/// ```
pub fn html_to_text(fragment: &str) -> String {
    let parsed = Html::parse_fragment(fragment);

    let mut text = String::new();
    for node in parsed.root_element().descendants() {
        if let Node::Text(chunk) = node.value() {
            if !node.ancestors().any(|ancestor| is_hidden(ancestor.value())) {
                text.push_str(chunk);
            }
        }
    }

    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn is_hidden(node: &Node) -> bool {
    node.as_element()
        .map_or(false, |element| HIDDEN_ELEMENTS.contains(&element.name()))
}
