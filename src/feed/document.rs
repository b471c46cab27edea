//! Parsed feed documents

use crate::extract::{FeedEntry, NamespaceMap};
use roxmltree::{Document, ParsingOptions};

/// A parsed RSS/Atom document
///
/// Exposes the entries (`<item>` or `<entry>` elements, in document order)
/// and the document-level namespace map used to resolve prefixed field
/// paths.
pub struct FeedDocument<'input> {
    document: Document<'input>,
    namespaces: NamespaceMap,
}

impl<'input> FeedDocument<'input> {
    /// Parses feed XML
    ///
    /// Leading byte-order marks and whitespace are skipped. DTDs are allowed
    /// since some publishers still ship RSS 0.91 doctypes.
    pub fn parse(xml: &'input str) -> Result<Self, roxmltree::Error> {
        let xml = xml.trim_start_matches('\u{feff}').trim_start();
        let options = ParsingOptions {
            allow_dtd: true,
            ..ParsingOptions::default()
        };
        let document = Document::parse_with_options(xml, options)?;
        let namespaces = NamespaceMap::from_document(&document);

        Ok(Self {
            document,
            namespaces,
        })
    }

    pub fn namespaces(&self) -> &NamespaceMap {
        &self.namespaces
    }

    /// Iterates over the feed entries in document order
    pub fn entries(&self) -> impl Iterator<Item = FeedEntry<'_, 'input>> + '_ {
        self.document
            .descendants()
            .filter(|node| node.is_element() && is_entry_tag(node.tag_name().name()))
            .map(move |node| FeedEntry::new(node, &self.namespaces))
    }

    pub fn entry_count(&self) -> usize {
        self.entries().count()
    }
}

fn is_entry_tag(name: &str) -> bool {
    name == "item" || name == "entry"
}
