//! Renderer module: trait-based format dispatch.

pub mod json;
pub mod markdown;

use crate::model::Document;
use anyhow::{anyhow, Result};

/// Trait for rendering a file's class facts into a specific output format.
pub trait Renderer {
    /// `None` when no class in the document has anything to show.
    fn render(&self, doc: &Document, base_url: &str) -> Option<String>;
    fn file_extension(&self) -> &str;
}

/// Create a renderer for the given format name.
pub fn create_renderer(format: &str) -> Result<Box<dyn Renderer>> {
    match format {
        "markdown" | "md" => Ok(Box::new(markdown::MarkdownRenderer)),
        "json" => Ok(Box::new(json::JsonRenderer)),
        _ => Err(anyhow!("unknown format: {}. Use markdown or json", format)),
    }
}
