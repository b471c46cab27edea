//! Value extraction from feed entries

use crate::extract::entry::FeedEntry;
use crate::extract::field_path::{FieldLookup, FieldPath, PathSegment};
use crate::extract::html::{html_to_text, looks_like_markup};
use roxmltree::Node;

/// Extracts the value a field path points to within a feed entry
///
/// Never fails: a missing element, an absent attribute or an untracked field
/// all yield an empty string. Missing elements are logged as warnings.
///
/// # Rules
///
/// 1. An untracked field yields `""` immediately
/// 2. The element is located along the path (see [`find_element`])
/// 3. With an attribute name, the attribute value is returned (or `""`);
///    the element text is never consulted in that case
/// 4. Otherwise the trimmed text is returned, reduced to its visible text
///    when it contains embedded markup
pub fn extract(entry: &FeedEntry<'_, '_>, field: &FieldPath) -> String {
    let lookup = match field {
        FieldPath::Untracked => return String::new(),
        FieldPath::Lookup(lookup) => lookup,
    };

    let element = match find_element(entry, lookup) {
        Some(element) => element,
        None => {
            tracing::warn!("Field '{}' not found in entry", lookup.element_path);
            return String::new();
        }
    };

    if let Some(attribute) = &lookup.attribute_name {
        return element.attribute(attribute.as_str()).unwrap_or("").to_string();
    }

    let text = element.text().unwrap_or("").trim();
    if looks_like_markup(text) {
        html_to_text(text)
    } else {
        text.to_string()
    }
}

/// Locates the element a lookup points to, relative to the entry
///
/// Segment matching:
/// - `{uri}tag` matches that exact expanded name
/// - `prefix:tag` is qualified with the URI bound to `prefix` in the entry's
///   namespace map; an unbound prefix falls back to matching the local name
///   in any namespace
/// - a bare `tag` matches elements in no namespace or the default namespace
/// - after `//`, the next segment is searched among all descendants
pub fn find_element<'a, 'input>(
    entry: &FeedEntry<'a, 'input>,
    lookup: &FieldLookup,
) -> Option<Node<'a, 'input>> {
    let namespaces = entry.namespaces();
    let mut current = entry.node();
    let mut descend = false;

    for segment in lookup.segments() {
        if segment == PathSegment::Descendant {
            descend = true;
            continue;
        }

        if let PathSegment::Prefixed { prefix, .. } = segment {
            if namespaces.uri(prefix).is_none() {
                tracing::debug!(
                    "Namespace prefix '{}' is unbound, matching '{}' by local name",
                    prefix,
                    lookup.element_path
                );
            }
        }

        let matches = |node: &Node<'_, '_>| node.is_element() && segment_matches(node, segment, entry);
        let found = if descend {
            current.descendants().skip(1).find(matches)
        } else {
            current.children().find(matches)
        };

        current = found?;
        descend = false;
    }

    Some(current)
}

fn segment_matches(node: &Node<'_, '_>, segment: PathSegment<'_>, entry: &FeedEntry<'_, '_>) -> bool {
    let tag = node.tag_name();
    match segment {
        PathSegment::Local(name) => {
            tag.name() == name
                && (tag.namespace().is_none()
                    || tag.namespace() == entry.namespaces().default_namespace())
        }
        PathSegment::Prefixed { prefix, name } => match entry.namespaces().uri(prefix) {
            Some(uri) => tag.name() == name && tag.namespace() == Some(uri),
            None => tag.name() == name,
        },
        PathSegment::Qualified { namespace, name } => {
            tag.name() == name && tag.namespace() == Some(namespace)
        }
        PathSegment::Descendant => false,
    }
}
