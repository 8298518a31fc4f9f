//! Head tag transformation.
//!
//! ```text
//! head ──► classify ──┬─► untouched ───────────────┐
//!                     └─► stylesheets ─► synthesize ┴─► [script, ...untouched]
//! ```
//!
//! - `classify`: stable partition of the head sequence
//! - `synthesize`: runtime `<script>` recreating the removed links
//!
//! `process()` is pure: the same snapshot and config always produce the same
//! output, and nothing outside the head sequence is touched.

pub mod classify;
pub mod synthesize;

use serde_json::{Map, Value};

use crate::config::InjectConfig;
use crate::error::Result;
use crate::tag::HeadElement;
use crate::utils::plural_count;

pub use classify::{Classification, Disposition, classify, disposition, is_base_stylesheet};
pub use synthesize::synthesize;

/// Host-independent view of a document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentSnapshot {
    /// Head elements, in document order.
    pub head: Vec<HeadElement>,
    /// Every other host field (body tags, chunks, output name, ...), passed through.
    pub extra: Map<String, Value>,
}

impl DocumentSnapshot {
    pub fn new(head: Vec<HeadElement>) -> Self {
        Self {
            head,
            extra: Map::new(),
        }
    }
}

/// Replace base stylesheet links with the runtime script.
///
/// `config` is validated by construction, so the only failure left is a
/// malformed stylesheet reference.
pub fn process(snapshot: DocumentSnapshot, config: &InjectConfig) -> Result<DocumentSnapshot> {
    let DocumentSnapshot { head, extra } = snapshot;
    let Classification {
        untouched,
        stylesheets,
        dropped,
    } = classify(head, config.alternate);

    crate::debug!(
        "inject";
        "{} deferred to runtime, {} kept, {} dropped",
        plural_count(stylesheets.len(), "stylesheet"),
        untouched.len(),
        dropped.len()
    );

    let script = synthesize(&stylesheets, config)?;

    let mut head = Vec::with_capacity(untouched.len() + 1);
    head.push(script);
    head.extend(untouched);

    Ok(DocumentSnapshot { head, extra })
}
