//! Embedded runtime script.
//!
//! `runtime.js` is the browser-side half of the injector. It carries three
//! placeholders filled at build time:
//!
//! | Placeholder       | Replaced with                                  |
//! |-------------------|------------------------------------------------|
//! | `__RTL_ASSETS__`  | JSON array of stylesheet base names            |
//! | `__RTL_DECIDE__`  | `function (window, base) -> boolean`           |
//! | `__RTL_MODIFY__`  | `function (link) -> link`, or `null`           |
//!
//! # Usage
//!
//! ```ignore
//! let js = RUNTIME_JS.render(&RuntimeVars {
//!     assets: "[\"style\"]".into(),
//!     decide: "function () { return /ar/.test(document.cookie); }".into(),
//!     modify: None,
//! });
//! ```

use std::marker::PhantomData;

/// Trait for template variable sets
pub trait TemplateVars {
    fn apply(&self, content: &str) -> String;
}

/// Template with typed variable injection
#[derive(Debug, Clone, Copy)]
pub struct Template<V> {
    content: &'static str,
    _marker: PhantomData<V>,
}

impl<V> Template<V> {
    pub const fn new(content: &'static str) -> Self {
        Self {
            content,
            _marker: PhantomData,
        }
    }
}

impl<V: TemplateVars> Template<V> {
    pub fn render(&self, vars: &V) -> String {
        vars.apply(self.content)
    }
}

// ============================================================================
// Runtime script
// ============================================================================

const ASSETS: &str = "__RTL_ASSETS__";
const DECIDE: &str = "__RTL_DECIDE__";
const MODIFY: &str = "__RTL_MODIFY__";

/// Variables for runtime.js, each already a JS expression.
#[derive(Debug, Clone)]
pub struct RuntimeVars {
    pub assets: String,
    pub decide: String,
    pub modify: Option<String>,
}

impl TemplateVars for RuntimeVars {
    /// Single pass, so user text that happens to contain a placeholder
    /// name is never substituted twice.
    fn apply(&self, content: &str) -> String {
        let modify = self.modify.as_deref().unwrap_or("null");
        let slots = [
            (ASSETS, self.assets.as_str()),
            (DECIDE, self.decide.as_str()),
            (MODIFY, modify),
        ];

        let mut out = String::with_capacity(content.len() + self.assets.len() + self.decide.len());
        let mut rest = content;
        while let Some(pos) = rest.find("__RTL_") {
            out.push_str(&rest[..pos]);
            rest = &rest[pos..];
            match slots.iter().find(|(key, _)| rest.starts_with(key)) {
                Some((key, value)) => {
                    out.push_str(value);
                    rest = &rest[key.len()..];
                }
                None => {
                    out.push_str("__RTL_");
                    rest = &rest["__RTL_".len()..];
                }
            }
        }
        out.push_str(rest);
        out
    }
}

/// Browser-side link reconstruction.
pub const RUNTIME_JS: Template<RuntimeVars> = Template::new(include_str!("runtime.js"));

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(modify: Option<&str>) -> RuntimeVars {
        RuntimeVars {
            assets: "[\"a\",\"b\"]".into(),
            decide: "function () { return true; }".into(),
            modify: modify.map(Into::into),
        }
    }

    #[test]
    fn test_all_placeholders_filled() {
        let js = RUNTIME_JS.render(&vars(None));
        assert!(!js.contains("__RTL_"));
        assert!(js.contains("var assets = [\"a\",\"b\"];"));
        assert!(js.contains("var isRtl = function () { return true; };"));
        assert!(js.contains("var modifyTag = null;"));
    }

    #[test]
    fn test_modify_present() {
        let js = RUNTIME_JS.render(&vars(Some("(function (l) { return l; })")));
        assert!(js.contains("var modifyTag = (function (l) { return l; });"));
    }

    #[test]
    fn test_placeholder_in_user_text_is_not_expanded() {
        let mut v = vars(None);
        v.assets = "[\"__RTL_MODIFY__\"]".into();
        let js = RUNTIME_JS.render(&v);
        assert!(js.contains("var assets = [\"__RTL_MODIFY__\"];"));
        assert!(js.contains("var modifyTag = null;"));
    }
}
