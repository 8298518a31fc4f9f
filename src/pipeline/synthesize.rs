//! Runtime script synthesis.
//!
//! Turns the removed stylesheet links into one inline `<script>` that
//! recreates them at page load, each pointing at `base.css` or
//! `base.rtl.css` depending on the decision logic.

use serde_json::Value;

use crate::capsule::minify_js;
use crate::config::InjectConfig;
use crate::embed::{RUNTIME_JS, RuntimeVars};
use crate::error::{InjectError, Result};
use crate::tag::{Attrs, HeadElement};
use crate::utils::html::escape_script;

/// Strip the trailing `.css` from a stylesheet link's href.
pub fn base_name(elem: &HeadElement) -> Result<&str> {
    let href = elem.href().unwrap_or_default();
    href.strip_suffix(".css")
        .ok_or_else(|| InjectError::MalformedAssetReference(href.to_string()))
}

/// JSON array literal of base names, in link order.
pub fn assets_literal(stylesheets: &[HeadElement]) -> Result<String> {
    let names = stylesheets
        .iter()
        .map(|elem| base_name(elem).map(|name| Value::String(name.to_string())))
        .collect::<Result<Vec<_>>>()?;
    Ok(escape_script(&Value::Array(names).to_string()).into_owned())
}

/// Build the `<script>` element replacing `stylesheets`.
pub fn synthesize(stylesheets: &[HeadElement], config: &InjectConfig) -> Result<HeadElement> {
    let vars = RuntimeVars {
        assets: assets_literal(stylesheets)?,
        decide: config.is_rtl.to_js(),
        modify: config.modify_tag.as_ref().map(|post| post.to_js()),
    };
    let mut js = RUNTIME_JS.render(&vars);

    if config.minify {
        match minify_js(&js) {
            // Codegen may unescape `<\/` or fold a RegExp back into a literal.
            Ok(minified) if minified.contains("</") => {
                crate::debug!("inject"; "minified script contains `</`, keeping it as-is");
            }
            Ok(minified) => js = minified,
            Err(err) => {
                crate::debug!("inject"; "runtime script did not minify, keeping it as-is: {}", err);
            }
        }
    }

    Ok(
        HeadElement::new("script", Attrs::from([("type", "text/javascript")]))
            .with_inner_html(js)
            .with_close_tag(true),
    )
}
