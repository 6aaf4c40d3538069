//! Repository URL resolution for deep links.
//!
//! Lookup order: explicit flag (or `DRFDOC_REPO_URL`), then `repo_url:` in the
//! documentation site settings (`mkdocs.yml`) of the root, then of the current
//! directory. With none of these, links are left relative.

use anyhow::{Context, Result};
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tracing::debug;

static RE_REPO_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?m)^repo_url:[ \t]*["']?([^"'\s#]+)["']?"#).unwrap()
});

const SITE_SETTINGS: &[&str] = &["mkdocs.yml", "mkdocs.yaml"];

/// Resolve the base URL for deep links. Always returns a usable prefix:
/// empty, or ending in `/`.
pub fn resolve_repo_url(explicit: Option<&str>, root: &Path) -> Result<String> {
    if let Some(url) = explicit {
        return Ok(normalize(url));
    }

    let mut dirs: Vec<PathBuf> = vec![root.to_path_buf()];
    if let Ok(cwd) = std::env::current_dir() {
        dirs.push(cwd);
    }

    for dir in &dirs {
        for name in SITE_SETTINGS {
            let candidate = dir.join(name);
            if !candidate.is_file() {
                continue;
            }
            let content = fs::read_to_string(&candidate)
                .with_context(|| format!("failed to read {}", candidate.display()))?;
            if let Some(url) = repo_url_from_settings(&content) {
                debug!("repo url {} from {}", url, candidate.display());
                return Ok(normalize(url));
            }
        }
    }

    Ok(String::new())
}

/// Extract the top-level `repo_url` value from site settings text.
pub fn repo_url_from_settings(content: &str) -> Option<&str> {
    RE_REPO_URL
        .captures(content)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

fn normalize(url: &str) -> String {
    let url = url.trim();
    if url.is_empty() || url.ends_with('/') {
        url.to_string()
    } else {
        format!("{}/", url)
    }
}
