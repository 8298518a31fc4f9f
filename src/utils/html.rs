//! HTML utility functions.
//!
//! - `escape_attr()` - attribute value escaping
//! - `escape_script()` - keeps embedded text from closing a `<script>` early
//! - `unescape()` - character references in attribute values read from source
//! - `is_void_element()` - elements rendered without a closing tag

use std::borrow::Cow;

/// Characters that require escaping inside a double-quoted attribute.
const ESCAPE_CHARS: [char; 5] = ['<', '>', '&', '"', '\''];

#[inline]
fn escape_char(c: char) -> Option<&'static str> {
    match c {
        '<' => Some("&lt;"),
        '>' => Some("&gt;"),
        '&' => Some("&amp;"),
        '"' => Some("&quot;"),
        '\'' => Some("&#39;"),
        _ => None,
    }
}

/// Escape HTML attribute values.
///
/// Uses `Cow` to avoid allocation when no escaping is needed.
///
/// # Example
/// ```ignore
/// assert_eq!(escape_attr("a\"b"), "a&quot;b");
/// assert_eq!(escape_attr("style.css"), "style.css"); // No allocation
/// ```
#[inline]
pub fn escape_attr(s: &str) -> Cow<'_, str> {
    if !s.contains(&ESCAPE_CHARS[..]) {
        return Cow::Borrowed(s);
    }

    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match escape_char(c) {
            Some(entity) => result.push_str(entity),
            None => result.push(c),
        }
    }
    Cow::Owned(result)
}

/// Escape `</` as `<\/` for text embedded in an inline script.
///
/// Only valid where a backslash before `/` is a no-op: JS string literals
/// and regex literals.
#[inline]
pub fn escape_script(s: &str) -> Cow<'_, str> {
    if s.contains("</") {
        Cow::Owned(s.replace("</", "<\\/"))
    } else {
        Cow::Borrowed(s)
    }
}

/// Decode HTML character references.
///
/// Handles the common named references and numeric ones (`&#65;`, `&#x41;`).
/// Anything unrecognized, including a bare `&`, is kept as written.
pub fn unescape(s: &str) -> Cow<'_, str> {
    if !s.contains('&') {
        return Cow::Borrowed(s);
    }

    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(pos) = rest.find('&') {
        result.push_str(&rest[..pos]);
        rest = &rest[pos..];

        let decoded = rest[1..]
            .find(';')
            .filter(|&end| end > 0 && end <= 10)
            .and_then(|end| decode_reference(&rest[1..=end]).map(|c| (c, end + 2)));
        match decoded {
            Some((c, len)) => {
                result.push(c);
                rest = &rest[len..];
            }
            None => {
                result.push('&');
                rest = &rest[1..];
            }
        }
    }
    result.push_str(rest);
    Cow::Owned(result)
}

/// Decode the name between `&` and `;`.
fn decode_reference(name: &str) -> Option<char> {
    match name {
        "lt" => Some('<'),
        "gt" => Some('>'),
        "amp" => Some('&'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{00A0}'),
        _ => {
            let num = name.strip_prefix('#')?;
            let code = match num.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => num.parse().ok()?,
            };
            char::from_u32(code)
        }
    }
}

/// Check if an HTML tag is a void element (no closing tag).
#[inline]
pub fn is_void_element(tag: &str) -> bool {
    matches!(
        tag,
        "area"
            | "base"
            | "br"
            | "col"
            | "embed"
            | "hr"
            | "img"
            | "input"
            | "link"
            | "meta"
            | "source"
            | "track"
            | "wbr"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_attr() {
        assert_eq!(escape_attr("style.css"), "style.css");
        assert!(matches!(escape_attr("style.css"), Cow::Borrowed(_)));
        assert_eq!(escape_attr("a\"b<c>"), "a&quot;b&lt;c&gt;");
        assert_eq!(escape_attr("x&y"), "x&amp;y");
    }

    #[test]
    fn test_escape_script() {
        assert_eq!(escape_script("\"</script>\""), "\"<\\/script>\"");
        assert!(matches!(escape_script("a < b"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_unescape() {
        assert!(matches!(unescape("/css/app.css"), Cow::Borrowed(_)));
        assert_eq!(unescape("/css/a&amp;b.css"), "/css/a&b.css");
        assert_eq!(unescape("&lt;x&gt; &quot;&#39;&#x27;&#65;"), "<x> \"''A");
        assert_eq!(unescape("&nbsp;"), "\u{00A0}");
    }

    #[test]
    fn test_unescape_keeps_unknown() {
        assert_eq!(unescape("a & b"), "a & b");
        assert_eq!(unescape("a&b;c"), "a&b;c");
        assert_eq!(unescape("&;"), "&;");
        assert_eq!(unescape("&amp"), "&amp");
        assert_eq!(unescape("x&&amp;y"), "x&&y");
        assert_eq!(unescape("&#xZZ;"), "&#xZZ;");
    }

    #[test]
    fn test_void_elements() {
        assert!(is_void_element("link"));
        assert!(is_void_element("meta"));
        assert!(!is_void_element("script"));
    }
}
