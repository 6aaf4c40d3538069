//! Markdown renderer: one fragment per documented class.

use crate::fragment;
use crate::model::Document;
use crate::render::Renderer;

pub struct MarkdownRenderer;

impl Renderer for MarkdownRenderer {
    fn render(&self, doc: &Document, base_url: &str) -> Option<String> {
        let mut output = String::new();
        for facts in &doc.classes {
            if let Some(frag) = fragment::assemble(facts, base_url, &doc.path) {
                output.push_str(&frag.render());
                output.push('\n');
            }
        }
        if output.is_empty() {
            None
        } else {
            Some(output)
        }
    }

    fn file_extension(&self) -> &str {
        "md"
    }
}
