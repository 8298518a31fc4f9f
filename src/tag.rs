//! Head element model shared by every host.
//!
//! Field names follow the host payloads (`tagName`, `innerHTML`,
//! `closeTag`), and any field this crate does not know about is carried
//! along untouched in `extra`.

use std::fmt::Write;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::utils::html::{escape_attr, is_void_element};

// ============================================================================
// Attributes
// ============================================================================

/// Ordered attribute map.
///
/// Values are strings in practice, but hosts may send `true` for valueless
/// attributes (`defer`, `async`), so the raw JSON value is kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Attrs(Map<String, Value>);

impl Attrs {
    pub fn new() -> Self {
        Self::default()
    }

    /// String value of an attribute, `None` if absent or not a string.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).and_then(Value::as_str)
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), Value::String(value.into()));
    }

    /// Set a valueless (boolean) attribute.
    pub fn set_flag(&mut self, name: impl Into<String>) {
        self.0.insert(name.into(), Value::Bool(true));
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>, const N: usize> From<[(K, V); N]> for Attrs {
    fn from(pairs: [(K, V); N]) -> Self {
        let mut attrs = Self::new();
        for (k, v) in pairs {
            attrs.set(k, v);
        }
        attrs
    }
}

// ============================================================================
// HeadElement
// ============================================================================

/// One element of a document head.
///
/// Treated as immutable once received: transformations build new elements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeadElement {
    pub tag_name: String,
    #[serde(default)]
    pub attributes: Attrs,
    #[serde(rename = "innerHTML", default, skip_serializing_if = "Option::is_none")]
    pub inner_html: Option<String>,
    /// Explicit closing tag. Hosts that omit it fall back to the void-element table.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub close_tag: Option<bool>,
    /// Host fields outside the core model (`voidTag`, `meta`, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl HeadElement {
    pub fn new(tag_name: impl Into<String>, attributes: Attrs) -> Self {
        Self {
            tag_name: tag_name.into(),
            attributes,
            inner_html: None,
            close_tag: None,
            extra: Map::new(),
        }
    }

    pub fn with_inner_html(mut self, html: impl Into<String>) -> Self {
        self.inner_html = Some(html.into());
        self
    }

    pub fn with_close_tag(mut self, close_tag: bool) -> Self {
        self.close_tag = Some(close_tag);
        self
    }

    /// `href` attribute, if present as a string.
    #[inline]
    pub fn href(&self) -> Option<&str> {
        self.attributes.get("href")
    }

    #[inline]
    pub fn is(&self, tag: &str) -> bool {
        self.tag_name.eq_ignore_ascii_case(tag)
    }

    /// Whether the element is serialized with an explicit closing tag.
    pub fn needs_close_tag(&self) -> bool {
        self.close_tag
            .unwrap_or_else(|| !is_void_element(&self.tag_name.to_ascii_lowercase()))
    }

    /// Render as HTML.
    ///
    /// `inner_html` is emitted verbatim: it is trusted markup (or raw script
    /// text for `script`).
    pub fn to_html(&self) -> String {
        let mut out = String::with_capacity(64);
        out.push('<');
        out.push_str(&self.tag_name);

        for (name, value) in self.attributes.iter() {
            match value {
                Value::String(s) => {
                    let _ = write!(out, " {name}=\"{}\"", escape_attr(s));
                }
                Value::Bool(true) => {
                    out.push(' ');
                    out.push_str(name);
                }
                Value::Bool(false) | Value::Null => {}
                other => {
                    let _ = write!(out, " {name}=\"{}\"", escape_attr(&other.to_string()));
                }
            }
        }
        out.push('>');

        if let Some(inner) = &self.inner_html {
            out.push_str(inner);
        }
        if self.needs_close_tag() {
            let _ = write!(out, "</{}>", self.tag_name);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_host_shape() {
        let value = json!({
            "tagName": "link",
            "voidTag": true,
            "attributes": { "href": "main.css", "rel": "stylesheet" },
            "meta": { "plugin": "html-webpack-plugin" }
        });
        let elem: HeadElement = serde_json::from_value(value.clone()).unwrap();
        assert_eq!(elem.tag_name, "link");
        assert_eq!(elem.href(), Some("main.css"));
        assert_eq!(elem.close_tag, None);
        assert!(elem.extra.contains_key("voidTag"));

        // Unknown fields survive a round trip.
        assert_eq!(serde_json::to_value(&elem).unwrap(), value);
    }

    #[test]
    fn test_attribute_order_preserved() {
        let attrs = Attrs::from([("rel", "stylesheet"), ("href", "a.css"), ("type", "text/css")]);
        let names: Vec<_> = attrs.iter().map(|(k, _)| k).collect();
        assert_eq!(names, ["rel", "href", "type"]);
    }

    #[test]
    fn test_to_html_void_and_flags() {
        let mut attrs = Attrs::from([("href", "a\"b.css")]);
        attrs.set_flag("crossorigin");
        let link = HeadElement::new("link", attrs);
        assert_eq!(link.to_html(), "<link href=\"a&quot;b.css\" crossorigin>");
    }

    #[test]
    fn test_to_html_script_keeps_body_raw() {
        let script = HeadElement::new("script", Attrs::from([("type", "text/javascript")]))
            .with_inner_html("if (a < b) {}")
            .with_close_tag(true);
        assert_eq!(
            script.to_html(),
            "<script type=\"text/javascript\">if (a < b) {}</script>"
        );
    }

    #[test]
    fn test_close_tag_fallback() {
        assert!(!HeadElement::new("META", Attrs::new()).needs_close_tag());
        assert!(HeadElement::new("title", Attrs::new()).needs_close_tag());
        assert!(!HeadElement::new("title", Attrs::new()).with_close_tag(false).needs_close_tag());
    }
}
