//! `html` command: rewrite built HTML files in place.
//!
//! Base stylesheet links are cut out of each `<head>` and the runtime
//! script is spliced in right after the opening tag. Everything else in
//! the file is left byte-for-byte as it was.

use std::fs;
use std::ops::Range;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use anyhow::{Result, anyhow};
use rayon::prelude::*;

use super::common::collect_html_files;
use crate::config::InjectConfig;
use crate::pipeline::{Disposition, disposition, synthesize};
use crate::tag::{Attrs, HeadElement};
use crate::utils::html::{is_void_element, unescape};
use crate::utils::plural_count;
use crate::{debug, log, logger};

/// Files seen and files changed by one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HtmlReport {
    pub scanned: usize,
    pub rewritten: usize,
}

/// Rewrite every HTML file under `paths`.
pub fn run_html(paths: &[PathBuf], config: &InjectConfig, dry: bool) -> Result<HtmlReport> {
    let files = collect_html_files(paths)?;
    let report = rewrite_files(&files, config, dry)?;

    let verb = if dry { "would rewrite" } else { "rewrote" };
    logger::success(&format!(
        "{verb} {} of {}",
        report.rewritten,
        plural_count(report.scanned, "file")
    ));
    Ok(report)
}

/// Process files in parallel; fails after the first broken file is reported.
pub fn rewrite_files(files: &[PathBuf], config: &InjectConfig, dry: bool) -> Result<HtmlReport> {
    let has_error = AtomicBool::new(false);
    let rewritten = AtomicUsize::new(0);

    files.par_iter().for_each(|path| match rewrite_file(path, config, dry) {
        Ok(true) => {
            rewritten.fetch_add(1, Ordering::Relaxed);
        }
        Ok(false) => {}
        Err(e) => {
            has_error.store(true, Ordering::Relaxed);
            log!("error"; "{}: {:#}", path.display(), e);
        }
    });

    if has_error.load(Ordering::Relaxed) {
        return Err(anyhow!("some files could not be rewritten"));
    }
    Ok(HtmlReport {
        scanned: files.len(),
        rewritten: rewritten.into_inner(),
    })
}

fn rewrite_file(path: &Path, config: &InjectConfig, dry: bool) -> Result<bool> {
    let html = fs::read_to_string(path)?;
    let Some(out) = rewrite_document(&html, config)? else {
        debug!("html"; "{}: no base stylesheets", path.display());
        return Ok(false);
    };
    if dry {
        log!("html"; "{}", path.display());
    } else {
        fs::write(path, out)?;
        debug!("html"; "rewrote {}", path.display());
    }
    Ok(true)
}

/// Rewrite one document.
///
/// Returns `None` when there is no `<head>` or nothing in it to remove, so
/// rewritten files are left alone on a second run.
pub fn rewrite_document(html: &str, config: &InjectConfig) -> Result<Option<String>> {
    let dom = tl::parse(html, tl::ParserOptions::default())
        .map_err(|e| anyhow!("failed to parse HTML: {e}"))?;
    let parser = dom.parser();

    // Selectors match names byte-for-byte, so `<HEAD>` is found by hand.
    let Some(head) = dom
        .nodes()
        .iter()
        .filter_map(tl::Node::as_tag)
        .find(|tag| tag.name().as_utf8_str().eq_ignore_ascii_case("head"))
    else {
        return Ok(None);
    };

    let head_start = offset_in(html, head.raw().as_bytes())
        .ok_or_else(|| anyhow!("<head> is not part of the document"))?;
    let open_end = html[head_start..]
        .find('>')
        .map(|i| head_start + i + 1)
        .ok_or_else(|| anyhow!("unterminated <head> tag"))?;

    let mut stylesheets = Vec::new();
    let mut removed = Vec::new();
    let mut pending: Vec<tl::NodeHandle> = head.children().top().iter().copied().collect();
    pending.reverse();
    while let Some(handle) = pending.pop() {
        let Some(tl::Node::Tag(tag)) = handle.get(parser) else {
            continue;
        };
        let elem = head_element(tag);
        if elem.is("body") {
            break;
        }
        let void = is_void_element(&elem.tag_name);
        if void {
            // tl only knows lowercase void names; an unclosed `<LINK>`
            // adopts the siblings that follow it.
            let start = pending.len();
            pending.extend(tag.children().top().iter().copied());
            pending[start..].reverse();
        }
        match disposition(&elem, config.alternate) {
            Disposition::Keep => continue,
            Disposition::Stylesheet => stylesheets.push(elem),
            Disposition::Drop => {}
        }
        removed.push(widen_to_line(html, tag_range(html, tag, void)?));
    }

    if removed.is_empty() {
        return Ok(None);
    }

    let script = synthesize(&stylesheets, config)?.to_html();

    let mut out = String::with_capacity(html.len() + script.len());
    out.push_str(&html[..open_end]);
    out.push_str(&script);
    let mut cursor = open_end;
    for range in removed {
        out.push_str(&html[cursor..range.start]);
        cursor = range.end;
    }
    out.push_str(&html[cursor..]);
    Ok(Some(out))
}

/// Head element view of a parsed tag.
///
/// tl hands back source text, so names are lowercased and values have
/// their character references decoded.
fn head_element(tag: &tl::HTMLTag) -> HeadElement {
    let mut attrs = Attrs::new();
    for (key, value) in tag.attributes().iter() {
        let key = key.to_ascii_lowercase();
        match value {
            Some(value) => attrs.set(key, unescape(&value)),
            None => attrs.set_flag(key),
        }
    }
    HeadElement::new(tag.name().as_utf8_str().to_lowercase(), attrs)
}

/// Source range of `tag`; only the opening tag for void elements.
fn tag_range(html: &str, tag: &tl::HTMLTag, void: bool) -> Result<Range<usize>> {
    let raw = tag.raw().as_bytes();
    let start = offset_in(html, raw)
        .ok_or_else(|| anyhow!("<{}> is not part of the document", tag.name().as_utf8_str()))?;
    let len = if void {
        raw.iter().position(|&b| b == b'>').map_or(raw.len(), |i| i + 1)
    } else {
        raw.len()
    };
    Ok(start..start + len)
}

/// Byte offset of `inner` within `outer`, if `inner` borrows from it.
fn offset_in(outer: &str, inner: &[u8]) -> Option<usize> {
    let start = (inner.as_ptr() as usize).checked_sub(outer.as_ptr() as usize)?;
    (start + inner.len() <= outer.len()).then_some(start)
}

/// Extend a removal over its line when nothing else sits on that line.
fn widen_to_line(html: &str, range: Range<usize>) -> Range<usize> {
    let before = &html[..range.start];
    let line_start = before.rfind('\n').map_or(0, |i| i + 1);
    if !before[line_start..].trim().is_empty() {
        return range;
    }
    let after = &html[range.end..];
    match after.find('\n') {
        Some(i) if after[..i].trim().is_empty() => line_start..range.end + i + 1,
        _ => range,
    }
}
