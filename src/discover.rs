//! Source discovery under a root directory, and output path derivation.

use crate::parser::SOURCE_EXTENSION;
use anyhow::{bail, Context, Result};
use glob::Pattern;
use std::path::{Component, Path, PathBuf};
use tracing::debug;
use walkdir::{DirEntry, WalkDir};

/// Directory names skipped unless the caller adds more.
pub const DEFAULT_EXCLUDES: &[&str] = &["__pycache__", "migrations", ".venv"];

/// Compile directory-name exclusion globs (defaults plus `extra`).
pub fn exclude_patterns(extra: &[String]) -> Result<Vec<Pattern>> {
    DEFAULT_EXCLUDES
        .iter()
        .copied()
        .chain(extra.iter().map(String::as_str))
        .map(|p| Pattern::new(p).with_context(|| format!("invalid exclude pattern: {}", p)))
        .collect()
}

/// Recursively find source files under `root`, sorted for deterministic output.
///
/// Directories whose name matches any of `excludes` are not descended into.
pub fn find_sources(root: &Path, excludes: &[Pattern]) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        bail!("not a directory: {}", root.display());
    }

    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_excluded_dir(e, excludes));

    let mut files = Vec::new();
    for entry in walker {
        let entry = entry.with_context(|| format!("failed to walk {}", root.display()))?;
        if entry.file_type().is_file()
            && entry.path().extension().and_then(|e| e.to_str()) == Some(SOURCE_EXTENSION)
        {
            files.push(entry.into_path());
        }
    }
    debug!("found {} source files under {}", files.len(), root.display());
    Ok(files)
}

fn is_excluded_dir(entry: &DirEntry, excludes: &[Pattern]) -> bool {
    // The root itself is never excluded.
    if entry.depth() == 0 || !entry.file_type().is_dir() {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    let excluded = excludes.iter().any(|p| p.matches(&name));
    if excluded {
        debug!("skipping directory {}", entry.path().display());
    }
    excluded
}

/// `/`-separated form of a relative path, used in deep links.
pub fn link_path(relative: &Path) -> String {
    relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Output location for a source file: `<output>/<relative dir>/<stem>.<ext>`.
/// "app/api/views.py" → "docs/app/api/views.md"
pub fn derive_output_path(output_dir: &Path, relative: &Path, ext: &str) -> PathBuf {
    let mut path = output_dir.to_path_buf();
    if let Some(parent) = relative.parent() {
        path.push(parent);
    }
    let stem = relative
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.push(format!("{}.{}", stem, ext));
    path
}
