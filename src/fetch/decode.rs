//! Response body decoding
//!
//! Feeds from older publishers are often served as ISO-8859-1 or
//! Windows-1252 without a charset parameter. The encoding is taken from the
//! Content-Type charset, then a byte-order mark, then the XML declaration,
//! and defaults to UTF-8.

use encoding_rs::{Encoding, UTF_8};

/// How far into the body the XML declaration is looked for
const DECLARATION_SCAN_LIMIT: usize = 1024;

/// Decodes a response body to text
///
/// # Arguments
///
/// * `body` - The raw response bytes
/// * `content_type` - The Content-Type header value, if any
///
/// # Returns
///
/// The decoded text. Invalid sequences are replaced with U+FFFD.
///
/// # Example
///
/// ```
/// use unified_rss::fetch::decode_body;
///
/// let latin1 = b"<?xml version=\"1.0\" encoding=\"ISO-8859-1\"?><title>S\xe9nat</title>";
/// assert_eq!(
///     decode_body(latin1, Some("application/rss+xml")),
///     "<?xml version=\"1.0\" encoding=\"ISO-8859-1\"?><title>Sénat</title>"
/// );
/// ```
pub fn decode_body(body: &[u8], content_type: Option<&str>) -> String {
    let encoding = content_type
        .and_then(extract_charset)
        .and_then(|charset| Encoding::for_label(charset.as_bytes()))
        .or_else(|| Encoding::for_bom(body).map(|(encoding, _)| encoding))
        .or_else(|| xml_declared_encoding(body))
        .unwrap_or(UTF_8);

    let (decoded, used, had_errors) = encoding.decode(body);
    if had_errors {
        tracing::debug!(
            "Body is not valid {}, invalid sequences replaced",
            used.name()
        );
    }
    decoded.into_owned()
}

/// Extracts the charset parameter from a Content-Type header value
fn extract_charset(content_type: &str) -> Option<String> {
    content_type.split(';').find_map(|part| {
        let part = part.trim();
        let (name, value) = part.split_once('=')?;
        if !name.trim().eq_ignore_ascii_case("charset") {
            return None;
        }
        let value = value.trim().trim_matches('"').trim_matches('\'');
        (!value.is_empty()).then(|| value.to_string())
    })
}

/// Reads the `encoding` pseudo-attribute of a leading `<?xml ...?>` declaration
///
/// A declaration that could be read as ASCII cannot really be UTF-16, so
/// UTF-16 labels map to UTF-8 here.
fn xml_declared_encoding(body: &[u8]) -> Option<&'static Encoding> {
    let head = String::from_utf8_lossy(&body[..body.len().min(DECLARATION_SCAN_LIMIT)]);
    let head = head.trim_start_matches('\u{feff}').trim_start();

    let declaration = head.strip_prefix("<?xml")?;
    let declaration = &declaration[..declaration.find("?>")?];

    let after = &declaration[declaration.find("encoding")? + "encoding".len()..];
    let value = after.trim_start().strip_prefix('=')?.trim_start();
    let quote = value.chars().next().filter(|c| *c == '"' || *c == '\'')?;
    let value = &value[1..];
    let value = &value[..value.find(quote)?];

    Encoding::for_label(value.trim().as_bytes()).map(Encoding::output_encoding)
}
