//! JSON renderer: structured output for tooling integration.
//!
//! Carries the same classes as the markdown output, with bindings rendered to
//! their display strings.

use crate::capability::Capability;
use crate::fragment;
use crate::model::{ClassFacts, Document};
use crate::render::Renderer;
use indexmap::IndexMap;
use serde::Serialize;

pub struct JsonRenderer;

#[derive(Serialize)]
struct FileJson<'a> {
    path: &'a str,
    classes: Vec<ClassJson<'a>>,
}

#[derive(Serialize)]
struct ClassJson<'a> {
    name: &'a str,
    line: usize,
    url: String,
    bases: &'a [String],
    methods: &'a [String],
    #[serde(skip_serializing_if = "str::is_empty")]
    docstring: &'a str,
    bindings: IndexMap<&'a str, String>,
    capabilities: &'a [Capability],
}

impl<'a> ClassJson<'a> {
    fn new(facts: &'a ClassFacts, url: String) -> Self {
        Self {
            name: &facts.name,
            line: facts.line,
            url,
            bases: &facts.bases,
            methods: &facts.methods,
            docstring: &facts.expression,
            bindings: facts
                .bindings
                .iter()
                .map(|(k, v)| (k.as_str(), v.to_string()))
                .collect(),
            capabilities: &facts.capabilities,
        }
    }
}

impl Renderer for JsonRenderer {
    fn render(&self, doc: &Document, base_url: &str) -> Option<String> {
        let classes: Vec<ClassJson> = doc
            .classes
            .iter()
            .filter_map(|facts| {
                fragment::assemble(facts, base_url, &doc.path).map(|frag| ClassJson::new(facts, frag.url))
            })
            .collect();
        if classes.is_empty() {
            return None;
        }

        let file = FileJson {
            path: &doc.path,
            classes,
        };
        // Serializing plain strings and numbers cannot fail.
        serde_json::to_string_pretty(&file).ok().map(|mut s| {
            s.push('\n');
            s
        })
    }

    fn file_extension(&self) -> &str {
        "json"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::extract_file;
    use crate::parser::SourceParser;
    use std::path::Path;

    fn render(src: &str) -> Option<serde_json::Value> {
        let file = SourceParser::new()
            .unwrap()
            .parse(Path::new("api/views.py"), src)
            .unwrap();
        let doc = Document {
            path: "api/views.py".into(),
            classes: extract_file(&file),
        };
        JsonRenderer
            .render(&doc, "https://example.com/")
            .map(|s| serde_json::from_str(&s).unwrap())
    }

    #[test]
    fn class_fields() {
        let value = render("class PersonViewSet(viewsets.ReadOnlyModelViewSet):\n    \"\"\"People.\"\"\"\n    serializer_class = PersonSerializer\n    permission_classes = [A | B]\n").unwrap();
        let class = &value["classes"][0];
        assert_eq!(value["path"], "api/views.py");
        assert_eq!(class["name"], "PersonViewSet");
        assert_eq!(class["url"], "https://example.com/api/views.py#L1");
        assert_eq!(class["docstring"], "People.");
        assert_eq!(class["bindings"]["serializer_class"], "PersonSerializer");
        assert_eq!(class["bindings"]["permission_classes"], "[A | B]");
        assert_eq!(class["capabilities"], serde_json::json!(["Retrieve", "List"]));
    }

    #[test]
    fn undocumented_classes_are_left_out() {
        let value = render("class Empty:\n    pass\n\nclass Full:\n    x = 1\n").unwrap();
        assert_eq!(value["classes"].as_array().map(Vec::len), Some(1));
        assert_eq!(value["classes"][0]["name"], "Full");
        assert!(value["classes"][0].get("docstring").is_none());
        assert_eq!(render("class Empty:\n    pass\n"), None);
    }
}
