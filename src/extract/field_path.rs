//! Field path resolution
//!
//! A field path string has the form `path[|attribute]`. The path is a
//! `/`-separated list of element names relative to the entry, where each
//! name is either a bare tag (`title`), a prefixed tag (`media:thumbnail`)
//! or a pre-qualified tag (`{http://purl.org/dc/elements/1.1/}creator`).
//!
//! Namespace prefixes are NOT resolved here. The prefix-to-URI mapping
//! belongs to the feed document, so it is applied at extraction time.

/// A resolved descriptor for locating one logical field inside a feed entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldPath {
    /// The field is not tracked; extraction always yields an empty value
    Untracked,

    /// A lookup into the entry's element tree
    Lookup(FieldLookup),
}

/// Element lookup half of a [`FieldPath`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldLookup {
    /// Path into the entry's element tree, possibly already namespace-qualified
    pub element_path: String,

    /// If set, the value is read from this attribute instead of the text
    pub attribute_name: Option<String>,

    /// Logical namespace prefix, mapped to a URI at lookup time
    pub namespace_prefix: Option<String>,
}

/// One step of an element path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathSegment<'a> {
    /// Matches a child by local name, in no namespace or the default one
    Local(&'a str),

    /// `prefix:tag`, the prefix still unresolved
    Prefixed { prefix: &'a str, name: &'a str },

    /// `{uri}tag`
    Qualified { namespace: &'a str, name: &'a str },

    /// Produced by `//`; the next segment is searched among all descendants
    Descendant,
}

impl FieldPath {
    /// Resolves a raw field path string
    ///
    /// # Examples
    ///
    /// ```
    /// use unified_rss::extract::FieldPath;
    ///
    /// let path = FieldPath::resolve("media:thumbnail|url");
    /// let lookup = path.lookup().unwrap();
    /// assert_eq!(lookup.element_path, "media:thumbnail");
    /// assert_eq!(lookup.attribute_name.as_deref(), Some("url"));
    /// assert_eq!(lookup.namespace_prefix.as_deref(), Some("media"));
    ///
    /// assert!(FieldPath::resolve("").is_untracked());
    /// ```
    pub fn resolve(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.is_empty() {
            return Self::Untracked;
        }

        let (path, attribute_name) = match raw.split_once('|') {
            Some((path, attribute)) => {
                let attribute = attribute.trim();
                (path.trim(), (!attribute.is_empty()).then(|| attribute.to_string()))
            }
            None => (raw, None),
        };

        if path.is_empty() {
            return Self::Untracked;
        }

        // `{uri}tag` paths are already qualified; their URI contains ':' too
        let namespace_prefix = if path.contains(':') && !path.contains('{') {
            split_segments(path).into_iter().find_map(|segment| match segment {
                PathSegment::Prefixed { prefix, .. } => Some(prefix.to_string()),
                _ => None,
            })
        } else {
            None
        };

        Self::Lookup(FieldLookup {
            element_path: path.to_string(),
            attribute_name,
            namespace_prefix,
        })
    }

    /// Resolves an optional field path; `None` means untracked
    pub fn resolve_opt(raw: Option<&str>) -> Self {
        raw.map(Self::resolve).unwrap_or(Self::Untracked)
    }

    pub fn is_untracked(&self) -> bool {
        matches!(self, Self::Untracked)
    }

    pub fn lookup(&self) -> Option<&FieldLookup> {
        match self {
            Self::Untracked => None,
            Self::Lookup(lookup) => Some(lookup),
        }
    }
}

impl FieldLookup {
    /// Splits the element path into segments
    pub fn segments(&self) -> Vec<PathSegment<'_>> {
        split_segments(&self.element_path)
    }
}

/// Splits a path on `/`, ignoring separators inside `{...}` qualifiers
fn split_segments(path: &str) -> Vec<PathSegment<'_>> {
    let mut segments = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;

    for (i, c) in path.char_indices() {
        match c {
            '{' => depth += 1,
            '}' => depth = depth.saturating_sub(1),
            '/' if depth == 0 => {
                push_segment(&mut segments, &path[start..i], start == 0);
                start = i + 1;
            }
            _ => {}
        }
    }
    push_segment(&mut segments, &path[start..], start == 0);

    segments
}

fn push_segment<'a>(segments: &mut Vec<PathSegment<'a>>, raw: &'a str, leading: bool) {
    let raw = raw.trim();
    match raw {
        // A leading '/' is treated as relative to the entry
        "" if leading => {}
        "" => {
            if segments.last() != Some(&PathSegment::Descendant) {
                segments.push(PathSegment::Descendant);
            }
        }
        "." => {}
        _ => segments.push(parse_segment(raw)),
    }
}

fn parse_segment(raw: &str) -> PathSegment<'_> {
    if let Some(rest) = raw.strip_prefix('{') {
        if let Some((namespace, name)) = rest.split_once('}') {
            return PathSegment::Qualified { namespace, name };
        }
    }

    match raw.split_once(':') {
        Some((prefix, name)) if !prefix.is_empty() && !name.is_empty() => {
            PathSegment::Prefixed { prefix, name }
        }
        _ => PathSegment::Local(raw),
    }
}
