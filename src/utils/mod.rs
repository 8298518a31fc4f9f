//! Utility modules.

pub mod html;

/// Format count with noun, handling pluralization.
///
/// - `plural_count(1, "file")` -> `"1 file"`
/// - `plural_count(3, "file")` -> `"3 files"`
#[inline]
pub fn plural_count(count: usize, noun: &str) -> String {
    let suffix = if count == 1 { "" } else { "s" };
    format!("{count} {noun}{suffix}")
}
