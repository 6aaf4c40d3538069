//! Fragment assembly: one documentation block per class.

use crate::capability;
use crate::model::{BindingValue, ClassFacts};

/// The assembled documentation for a single class.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentFragment {
    pub class_name: String,
    pub url: String,
    pub sections: Vec<String>,
}

impl DocumentFragment {
    /// `## [Name](url)` followed by the sections, blank-line separated.
    pub fn render(&self) -> String {
        let mut out = format!("## [{}]({})\n\n", self.class_name, self.url);
        out.push_str(&self.sections.join("\n\n"));
        out.push('\n');
        out
    }
}

/// Deep link to a class declaration: `<base><path>#L<line>`.
pub fn deep_link(base_url: &str, relative_path: &str, line: usize) -> String {
    format!("{}{}#L{}", base_url, relative_path, line)
}

/// Inline code span. The fence is one backtick longer than the longest run
/// inside `text`, padded with spaces when `text` contains any.
fn code_span(text: &str) -> String {
    let longest = text
        .split(|c: char| c != '`')
        .map(str::len)
        .max()
        .unwrap_or(0);
    if longest == 0 {
        return format!("`{}`", text);
    }
    let fence = "`".repeat(longest + 1);
    format!("{fence} {text} {fence}")
}

/// Assemble the fragment for one class, or `None` if it has nothing to say.
///
/// Section order: free text, permissions, serializers, paginations, model,
/// methods, then every binding as `` `key` --> value ``.
pub fn assemble(facts: &ClassFacts, base_url: &str, relative_path: &str) -> Option<DocumentFragment> {
    let mut sections = Vec::new();

    if !facts.expression.is_empty() {
        sections.push(facts.expression.clone());
    }

    let labeled: [(&str, Option<&BindingValue>); 4] = [
        ("Permissions", facts.permission_classes()),
        ("Serializers", facts.serializer_class()),
        ("Paginations", facts.pagination_class()),
        ("Model", facts.queryset_model()),
    ];
    for (label, value) in labeled {
        if let Some(value) = value {
            sections.push(format!("**{}:** {}", label, code_span(&value.to_string())));
        }
    }

    if let Some(methods) = capability::render_methods(&facts.capabilities) {
        sections.push(format!("**Methods:**\n\n{}", methods));
    }

    if !facts.bindings.is_empty() {
        let dump: Vec<String> = facts
            .bindings
            .iter()
            .map(|(key, value)| format!("`{}` --> {}", key, value))
            .collect();
        sections.push(dump.join("\n\n"));
    }

    if sections.is_empty() {
        return None;
    }

    Some(DocumentFragment {
        class_name: facts.name.clone(),
        url: deep_link(base_url, relative_path, facts.line),
        sections,
    })
}
