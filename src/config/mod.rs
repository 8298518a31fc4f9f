//! Injector configuration.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── diagnostic  # FieldPath, ConfigDiagnostics
//! ├── error       # ConfigError
//! ├── options     # RawOptions (unvalidated) and validation
//! └── mod.rs      # InjectConfig (this file)
//! ```
//!
//! # Example `rtl.toml`
//!
//! ```toml
//! is_rtl = "/lang_type=ar/"
//! modify_tag = "function (link) { link.media = 'all'; return link; }"
//! alternate = "keep"
//! minify = false
//! ```
//!
//! `InjectConfig` is built once, never mutated afterwards, and borrowed by
//! every transformation.

mod diagnostic;
mod error;
mod options;

pub use diagnostic::{ConfigDiagnostic, ConfigDiagnostics, FieldPath};
pub use error::ConfigError;
pub use options::RawOptions;

use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

use crate::capsule::{DecisionLogic, PostProcessor};

/// Handling of `*.rtl.css` links already present in the head.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum AlternatePolicy {
    /// Pass them through untouched.
    #[default]
    Keep,
    /// Remove them; the runtime script is the only source of stylesheet links.
    Drop,
}

/// Validated injector configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InjectConfig {
    pub is_rtl: DecisionLogic,
    pub modify_tag: Option<PostProcessor>,
    pub alternate: AlternatePolicy,
    pub minify: bool,
}

impl InjectConfig {
    pub fn new(is_rtl: DecisionLogic) -> Self {
        Self {
            is_rtl,
            modify_tag: None,
            alternate: AlternatePolicy::default(),
            minify: false,
        }
    }

    pub fn with_modify_tag(mut self, modify_tag: PostProcessor) -> Self {
        self.modify_tag = Some(modify_tag);
        self
    }

    pub fn with_alternate(mut self, alternate: AlternatePolicy) -> Self {
        self.alternate = alternate;
        self
    }

    pub fn with_minify(mut self, minify: bool) -> Self {
        self.minify = minify;
        self
    }
}

// ============================================================================
// Loading
// ============================================================================

impl RawOptions {
    /// Parse TOML content, collecting unknown keys into `diag` as warnings.
    pub fn from_toml(content: &str, diag: &mut ConfigDiagnostics) -> Result<Self, ConfigError> {
        let deserializer = toml::Deserializer::new(content);
        let raw = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            diag.ignored(path.to_string());
        })?;
        Ok(raw)
    }

    /// Load options from a file; a missing file yields empty options.
    pub fn load(path: &Path, diag: &mut ConfigDiagnostics) -> Result<Self, ConfigError> {
        if !path.exists() {
            crate::debug!("config"; "{} not found, using defaults", path.display());
            return Ok(Self::default());
        }
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
        Self::from_toml(&content, diag)
    }

    /// Full validation with grouped diagnostics.
    pub fn finish(&self, mut diag: ConfigDiagnostics) -> Result<InjectConfig, ConfigError> {
        diag.print_warnings();
        self.diagnose(&mut diag);
        diag.into_result().map_err(ConfigError::Diagnostics)?;
        Ok(self.validate()?)
    }

    /// Update option if an override is provided.
    pub fn update_option<T: Clone>(option: &mut T, value: Option<&T>) {
        if let Some(value) = value {
            *option = value.clone();
        }
    }
}

// ============================================================================
// Test Helpers
// ============================================================================

/// Parse options TOML; panics if there are unknown fields.
#[cfg(test)]
pub fn test_parse_options(content: &str) -> RawOptions {
    let mut diag = ConfigDiagnostics::new();
    let raw = RawOptions::from_toml(content, &mut diag).unwrap();
    assert!(
        diag.ignored_fields().is_empty(),
        "test options have unknown fields: {:?}",
        diag.ignored_fields()
    );
    raw
}
