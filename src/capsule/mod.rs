//! Runtime code capsules.
//!
//! The decision logic and the tag post-processor are written by the user as
//! JavaScript and only ever run in the browser. At build time they are plain
//! text: validated once with oxc, then embedded into the synthesized script.
//!
//! A function capsule is rebuilt in the browser with
//! `new Function("return (<source>)")()`: the source travels as a JSON string
//! literal, so quotes and newlines never need hand escaping.

mod minify;
mod parse;

pub use minify::minify_js;
pub use parse::{ExprKind, classify_expression};

use serde_json::Value;

use crate::error::{InjectError, Result};
use crate::utils::html::escape_script;

// ============================================================================
// Capsule
// ============================================================================

/// Validated JS function expression source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capsule {
    source: String,
}

impl Capsule {
    /// Accept `source` only if it is a function or arrow function expression.
    ///
    /// On rejection returns what the source turned out to be instead.
    pub fn parse(source: &str) -> std::result::Result<Self, ExprKind> {
        match classify_expression(source) {
            ExprKind::Function => Ok(Self {
                source: source.trim().to_string(),
            }),
            other => Err(other),
        }
    }

    /// The function source, verbatim (trimmed).
    pub fn source(&self) -> &str {
        &self.source
    }

    /// JS expression evaluating to the function at runtime.
    pub fn to_js(&self) -> String {
        let body = Value::String(format!("return (\n{}\n);", self.source)).to_string();
        format!("(new Function({}))()", escape_script(&body))
    }
}

// ============================================================================
// DecisionLogic
// ============================================================================

/// How the browser decides between `base.css` and `base.rtl.css`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecisionLogic {
    /// Regex literal tested against `document.cookie`. The base name is ignored.
    Pattern(String),
    /// Function called as `isRtl(window, base)`.
    Function(Capsule),
}

impl DecisionLogic {
    /// Parse a regex literal (`/lang=ar/i`) or a function expression.
    pub fn parse(source: &str) -> Result<Self> {
        match classify_expression(source) {
            ExprKind::RegExp(literal) => Ok(Self::Pattern(literal)),
            ExprKind::Function => Ok(Self::Function(Capsule {
                source: source.trim().to_string(),
            })),
            other => Err(InjectError::InvalidDecisionLogic(other.describe().to_string())),
        }
    }

    /// Build a regex literal from a bare pattern body and flags.
    ///
    /// `pattern("lang_type=ar", "")` is `/lang_type=ar/`.
    pub fn pattern(pattern: &str, flags: &str) -> Result<Self> {
        let literal = format!("/{}/{flags}", escape_regex_body(pattern));
        match classify_expression(&literal) {
            ExprKind::RegExp(literal) => Ok(Self::Pattern(literal)),
            _ => Err(InjectError::InvalidDecisionLogic(format!(
                "an invalid pattern `{literal}`"
            ))),
        }
    }

    /// JS expression evaluating to `function (window, base) -> boolean`.
    ///
    /// A literal containing `</` cannot be escaped in place (its closing
    /// delimiter may be the `/`), so it is rebuilt with `new RegExp` from
    /// string literals instead.
    pub fn to_js(&self) -> String {
        match self {
            Self::Pattern(literal) if literal.contains("</") => {
                let (body, flags) = split_literal(literal);
                format!(
                    "function () {{ return new RegExp({}, {}).test(document.cookie); }}",
                    js_string(body),
                    js_string(flags)
                )
            }
            Self::Pattern(literal) => {
                format!("function () {{ return {literal}.test(document.cookie); }}")
            }
            Self::Function(capsule) => capsule.to_js(),
        }
    }

    /// Short description for logs.
    pub fn label(&self) -> String {
        match self {
            Self::Pattern(literal) => format!("cookie pattern {literal}"),
            Self::Function(_) => "function".to_string(),
        }
    }
}

/// Split a validated `/body/flags` literal.
fn split_literal(literal: &str) -> (&str, &str) {
    match literal.rfind('/') {
        Some(end) if end > 0 => (&literal[1..end], &literal[end + 1..]),
        _ => (literal, ""),
    }
}

/// JSON string literal, safe inside an inline script.
fn js_string(s: &str) -> String {
    escape_script(&Value::String(s.to_string()).to_string()).into_owned()
}

/// Escape a pattern body for use between `/` delimiters.
///
/// Mirrors `RegExp.prototype.source`: unescaped `/` and line terminators are
/// escaped, an empty pattern becomes `(?:)`.
fn escape_regex_body(pattern: &str) -> String {
    if pattern.is_empty() {
        return "(?:)".to_string();
    }

    let mut out = String::with_capacity(pattern.len() + 2);
    let mut escaped = false;
    for c in pattern.chars() {
        if escaped {
            out.push(c);
            escaped = false;
            continue;
        }
        match c {
            '\\' => {
                out.push(c);
                escaped = true;
            }
            '/' => out.push_str("\\/"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            _ => out.push(c),
        }
    }
    out
}

// ============================================================================
// PostProcessor
// ============================================================================

/// Function applied to each runtime `<link>` before it is appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostProcessor(Capsule);

impl PostProcessor {
    pub fn parse(source: &str) -> Result<Self> {
        Capsule::parse(source)
            .map(Self)
            .map_err(|kind| InjectError::InvalidPostProcessor(kind.describe().to_string()))
    }

    pub fn source(&self) -> &str {
        self.0.source()
    }

    pub fn to_js(&self) -> String {
        self.0.to_js()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decision_from_literal() {
        let logic = DecisionLogic::parse("/lang_type=ar/").unwrap();
        assert_eq!(logic, DecisionLogic::Pattern("/lang_type=ar/".into()));
        assert!(logic.to_js().contains("/lang_type=ar/.test(document.cookie)"));
    }

    #[test]
    fn test_decision_from_pattern_parts() {
        let logic = DecisionLogic::pattern("dir=rtl", "i").unwrap();
        assert_eq!(logic, DecisionLogic::Pattern("/dir=rtl/i".into()));

        let logic = DecisionLogic::pattern("a/b", "").unwrap();
        assert_eq!(logic, DecisionLogic::Pattern("/a\\/b/".into()));

        let logic = DecisionLogic::pattern("", "").unwrap();
        assert_eq!(logic, DecisionLogic::Pattern("/(?:)/".into()));

        assert!(matches!(
            DecisionLogic::pattern("x", "q"),
            Err(InjectError::InvalidDecisionLogic(_))
        ));
    }

    #[test]
    fn test_literal_ending_in_lt_uses_constructor() {
        let logic = DecisionLogic::parse("/dir=</").unwrap();
        assert_eq!(logic, DecisionLogic::Pattern("/dir=</".into()));
        assert_eq!(
            logic.to_js(),
            r#"function () { return new RegExp("dir=<", "").test(document.cookie); }"#
        );

        let js = DecisionLogic::pattern("a<", "i").unwrap().to_js();
        assert!(js.contains(r#"new RegExp("a<", "i")"#));
        assert!(!js.contains("</"));
    }

    #[test]
    fn test_literal_with_lt_in_class() {
        let js = DecisionLogic::parse("/[</]x/g").unwrap().to_js();
        assert!(js.contains(r#"new RegExp("[<\/]x", "g")"#));
    }

    #[test]
    fn test_split_literal() {
        assert_eq!(split_literal("/a\\/b/gi"), ("a\\/b", "gi"));
        assert_eq!(split_literal("/x/"), ("x", ""));
    }

    #[test]
    fn test_decision_rejects_plain_string() {
        let err = DecisionLogic::parse("ar").unwrap_err();
        assert!(matches!(err, InjectError::InvalidDecisionLogic(_)));
        assert!(err.to_string().contains("must be a Regexp"));
    }

    #[test]
    fn test_function_capsule_serialization() {
        let src = "function (win, base) {\n  return win.name === \"rtl\";\n}";
        let logic = DecisionLogic::parse(src).unwrap();
        let js = logic.to_js();
        assert!(js.starts_with("(new Function(\"return (\\nfunction (win, base) {\\n"));
        assert!(js.contains("win.name === \\\"rtl\\\""));
        assert!(js.ends_with("\"))()"));
        assert!(!js.contains('\n'));
    }

    #[test]
    fn test_capsule_cannot_close_script() {
        let capsule = Capsule::parse("() => '</script>'").unwrap();
        assert!(!capsule.to_js().contains("</script>"));
        assert!(capsule.to_js().contains("<\\/script>"));
    }

    #[test]
    fn test_post_processor() {
        let post = PostProcessor::parse("function (link) { return link; }").unwrap();
        assert_eq!(post.source(), "function (link) { return link; }");

        let err = PostProcessor::parse("/re/").unwrap_err();
        assert_eq!(err, InjectError::InvalidPostProcessor("a regular expression".into()));
    }
}
