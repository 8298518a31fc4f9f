//! Common utilities shared across CLI commands.

use std::fs;
use std::io::{self, BufRead, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use jwalk::WalkDir;
use serde::de::DeserializeOwned;

/// Collect HTML files from CLI paths.
///
/// Directories are walked recursively; explicit files must be HTML.
pub fn collect_html_files(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    // Handle stdin case: read paths from stdin when `-` is passed
    let paths: Vec<PathBuf> = if paths.len() == 1 && paths[0].as_os_str() == "-" {
        read_paths_from_stdin()?
    } else {
        paths.to_vec()
    };

    let mut all_files = Vec::new();
    for path in &paths {
        if path.is_file() {
            if is_html(path) {
                all_files.push(path.clone());
            } else {
                anyhow::bail!("Not an HTML file: {}", path.display());
            }
        } else if path.is_dir() {
            let mut dir_files: Vec<_> = WalkDir::new(path)
                .into_iter()
                .filter_map(Result::ok)
                .filter(|e| e.file_type().is_file())
                .map(|e| e.path())
                .filter(|p| is_html(p))
                .collect();
            dir_files.sort();
            all_files.extend(dir_files);
        } else {
            anyhow::bail!("Path not found: {}", path.display());
        }
    }

    Ok(all_files)
}

/// Read file paths from stdin, one per line
pub fn read_paths_from_stdin() -> Result<Vec<PathBuf>> {
    let stdin = io::stdin();
    let mut paths = Vec::new();

    for line in stdin.lock().lines() {
        let line = line?;
        let trimmed = line.trim();
        if !trimmed.is_empty() {
            paths.push(PathBuf::from(trimmed));
        }
    }

    Ok(paths)
}

/// Parse JSON from a file, or from stdin when `path` is `None`.
pub fn read_json<T: DeserializeOwned>(path: Option<&Path>) -> Result<T> {
    let content = match path {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };
    let source = path.map_or_else(|| "stdin".to_string(), |p| p.display().to_string());
    serde_json::from_str(&content).with_context(|| format!("invalid JSON in {source}"))
}

fn is_html(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("html") || ext.eq_ignore_ascii_case("htm"))
}
