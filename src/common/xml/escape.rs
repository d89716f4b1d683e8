use std::borrow::Cow;

use aho_corasick::AhoCorasick;
use once_cell::sync::Lazy;

const SPECIAL: [&str; 5] = ["&", "<", ">", "\"", "'"];
const ENTITIES: [&str; 5] = ["&amp;", "&lt;", "&gt;", "&quot;", "&apos;"];

// Built once, shared by every writer session.
static XML_ESCAPER: Lazy<Option<AhoCorasick>> =
    Lazy::new(|| AhoCorasick::builder().build(SPECIAL).ok());

/// Escape XML special characters in element text or attribute values.
///
/// Borrows the input when nothing needs escaping, which is the common case
/// for header names and shared strings.
///
/// # Examples
///
/// ```
/// use sheet_cartographer::common::xml::escape_xml;
/// assert_eq!(escape_xml("a & b"), "a &amp; b");
/// assert_eq!(escape_xml("<Name>"), "&lt;Name&gt;");
/// assert_eq!(escape_xml("plain"), "plain");
/// ```
#[inline]
pub fn escape_xml(s: &str) -> Cow<'_, str> {
    if !s.bytes().any(|b| matches!(b, b'&' | b'<' | b'>' | b'"' | b'\'')) {
        return Cow::Borrowed(s);
    }
    match XML_ESCAPER.as_ref() {
        Some(escaper) => Cow::Owned(escaper.replace_all(s, &ENTITIES)),
        None => Cow::Owned(escape_scalar(s)),
    }
}

fn escape_scalar(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 8);
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            other => out.push(other),
        }
    }
    out
}
