use aho_corasick::AhoCorasick;
use once_cell::sync::Lazy;
use std::borrow::Cow;

const SPECIAL: [&str; 5] = ["&", "<", ">", "\"", "'"];
const REFERENCES: [&str; 5] = ["&amp;", "&lt;", "&gt;", "&quot;", "&apos;"];

static ESCAPER: Lazy<AhoCorasick> =
    Lazy::new(|| AhoCorasick::new(SPECIAL).expect("escape patterns are valid"));

/// Escape `s` for use in text content or a quoted attribute value.
///
/// Borrows when nothing needs escaping.
///
/// # Examples
///
/// ```
/// use slidekit::common::xml::escape_xml;
/// assert_eq!(escape_xml("Revenue"), "Revenue");
/// assert_eq!(escape_xml("<ctd a=\"1\">Q&A</ctd>"), "&lt;ctd a=&quot;1&quot;&gt;Q&amp;A&lt;/ctd&gt;");
/// ```
pub fn escape_xml(s: &str) -> Cow<'_, str> {
    if ESCAPER.is_match(s) {
        Cow::Owned(ESCAPER.replace_all(s, &REFERENCES))
    } else {
        Cow::Borrowed(s)
    }
}
