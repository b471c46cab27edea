//! Feed entries and their namespace resolution context

use std::collections::HashMap;

/// Document-scoped namespace declarations
///
/// Maps the prefixes declared on a feed's root element to their URIs. The
/// default namespace (`xmlns="..."`) is kept separately, since bare tag
/// names in field paths match it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamespaceMap {
    prefixes: HashMap<String, String>,
    default_namespace: Option<String>,
}

impl NamespaceMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collects the namespaces in scope on the document's root element
    pub fn from_document(document: &roxmltree::Document<'_>) -> Self {
        let mut map = Self::new();
        for namespace in document.root_element().namespaces() {
            match namespace.name() {
                Some(prefix) => map.insert(prefix, namespace.uri()),
                None => map.default_namespace = Some(namespace.uri().to_string()),
            }
        }
        map
    }

    pub fn insert(&mut self, prefix: impl Into<String>, uri: impl Into<String>) {
        self.prefixes.insert(prefix.into(), uri.into());
    }

    /// Returns the URI bound to `prefix`, if any
    pub fn uri(&self, prefix: &str) -> Option<&str> {
        self.prefixes.get(prefix).map(String::as_str)
    }

    pub fn default_namespace(&self) -> Option<&str> {
        self.default_namespace.as_deref()
    }

    pub fn len(&self) -> usize {
        self.prefixes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty() && self.default_namespace.is_none()
    }
}

/// One `<item>`/`<entry>` element of a parsed feed, read-only
///
/// Carries the owning document's namespace map so that prefixed field
/// paths can be resolved at lookup time.
#[derive(Debug, Clone, Copy)]
pub struct FeedEntry<'a, 'input> {
    node: roxmltree::Node<'a, 'input>,
    namespaces: &'a NamespaceMap,
}

impl<'a, 'input> FeedEntry<'a, 'input> {
    pub fn new(node: roxmltree::Node<'a, 'input>, namespaces: &'a NamespaceMap) -> Self {
        Self { node, namespaces }
    }

    pub fn node(&self) -> roxmltree::Node<'a, 'input> {
        self.node
    }

    pub fn namespaces(&self) -> &'a NamespaceMap {
        self.namespaces
    }

    /// Finds a direct child element by namespace URI and local name
    pub fn child_qualified(&self, namespace: &str, name: &str) -> Option<roxmltree::Node<'a, 'input>> {
        self.node
            .children()
            .find(|child| child.is_element() && child.has_tag_name((namespace, name)))
    }
}
