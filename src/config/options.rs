//! Raw options and their validation.
//!
//! Options arrive loosely typed (a TOML file or a host's JSON object). The
//! two JS-valued options are checked here, before any document is touched:
//!
//! | Option       | Accepted                                               |
//! |--------------|--------------------------------------------------------|
//! | `is_rtl`     | `"/re/flags"`, `{ pattern, flags }`, function source   |
//! | `modify_tag` | function source                                        |

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::diagnostic::{ConfigDiagnostics, FieldPath};
use super::{AlternatePolicy, InjectConfig};
use crate::capsule::{DecisionLogic, PostProcessor};
use crate::error::{InjectError, Result};

/// Options as written by the user, before validation.
///
/// Both snake_case (`rtl.toml`) and the camelCase host spelling are accepted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawOptions {
    /// Decides at page load whether `.rtl.css` is used. Required.
    #[serde(alias = "isRtl")]
    pub is_rtl: Option<Value>,
    /// Applied to each runtime `<link>` before it is appended.
    #[serde(alias = "modifyTag")]
    pub modify_tag: Option<Value>,
    /// What to do with `*.rtl.css` links already in the head.
    pub alternate: AlternatePolicy,
    /// Minify the synthesized script.
    pub minify: bool,
}

/// Generated-style field path accessors.
pub struct RawOptionsFields {
    pub is_rtl: FieldPath,
    pub modify_tag: FieldPath,
}

impl RawOptions {
    /// Field paths for diagnostic messages.
    pub const FIELDS: RawOptionsFields = RawOptionsFields {
        is_rtl: FieldPath::new("is_rtl"),
        modify_tag: FieldPath::new("modify_tag"),
    };

    /// Validate and freeze into an [`InjectConfig`].
    ///
    /// Fails with the first error, `is_rtl` before `modify_tag`.
    pub fn validate(&self) -> Result<InjectConfig> {
        let is_rtl = decision_logic(self.is_rtl.as_ref())?;
        let modify_tag = post_processor(self.modify_tag.as_ref())?;
        Ok(InjectConfig {
            is_rtl,
            modify_tag,
            alternate: self.alternate,
            minify: self.minify,
        })
    }

    /// Collect every option error with its field and a fix hint.
    pub fn diagnose(&self, diag: &mut ConfigDiagnostics) {
        if let Err(err) = decision_logic(self.is_rtl.as_ref()) {
            diag.error_with_hint(
                Self::FIELDS.is_rtl,
                err.to_string(),
                "use a regex literal like \"/lang_type=ar/\" or \"function (win, base) { ... }\"",
            );
        }
        if let Err(err) = post_processor(self.modify_tag.as_ref()) {
            diag.error_with_hint(
                Self::FIELDS.modify_tag,
                err.to_string(),
                "use a function like \"function (link) { return link; }\" or remove the field",
            );
        }
    }
}

fn decision_logic(value: Option<&Value>) -> Result<DecisionLogic> {
    match value {
        None | Some(Value::Null) => Err(InjectError::MissingDecisionLogic),
        Some(Value::String(source)) => DecisionLogic::parse(source),
        Some(Value::Object(table)) if table.contains_key("pattern") => pattern_table(table),
        Some(other) => Err(InjectError::InvalidDecisionLogic(describe(other).to_string())),
    }
}

/// `{ pattern = "...", flags = "..." }`
fn pattern_table(table: &Map<String, Value>) -> Result<DecisionLogic> {
    let flags = match table.get("flags") {
        None => "",
        Some(Value::String(flags)) => flags,
        Some(other) => {
            return Err(InjectError::InvalidDecisionLogic(format!(
                "a pattern with {} flags",
                describe(other)
            )));
        }
    };
    match table.get("pattern") {
        Some(Value::String(pattern)) => DecisionLogic::pattern(pattern, flags),
        other => Err(InjectError::InvalidDecisionLogic(format!(
            "a pattern of {}",
            other.map_or("nothing", describe)
        ))),
    }
}

fn post_processor(value: Option<&Value>) -> Result<Option<PostProcessor>> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(source)) => PostProcessor::parse(source).map(Some),
        Some(other) => Err(InjectError::InvalidPostProcessor(describe(other).to_string())),
    }
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
