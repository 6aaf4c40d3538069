//! Class fact extraction: walks a class body and collects its documented facts.

pub mod shape;
pub mod union;

use crate::capability;
use crate::model::*;
use indexmap::IndexMap;

/// Build the [`ClassFacts`] for one class declaration.
///
/// Statements are visited in source order. String statements feed the free-text
/// expression; assignments go through the shape dispatcher, and a later
/// assignment to the same key replaces the earlier value.
pub fn extract_class(class: &ClassDeclaration) -> ClassFacts {
    let mut expression: Vec<String> = Vec::new();
    let mut bindings: IndexMap<String, BindingValue> = IndexMap::new();

    for stmt in &class.body {
        match stmt {
            Statement::Docstring(text) => expression.push(trim_lines(text)),
            Statement::Assign { target, value } => {
                if let Some(binding) = shape::dispatch(value) {
                    bindings.insert(target.clone(), binding);
                }
            }
            Statement::Other => {}
        }
    }

    ClassFacts {
        name: class.name.clone(),
        line: class.line,
        bases: class.bases.clone(),
        methods: class.methods.clone(),
        expression: expression.join("\n").trim().to_string(),
        bindings,
        capabilities: capability::map_bases(&class.bases),
    }
}

/// Extract facts for every class in a file, in declaration order.
pub fn extract_file(file: &SourceFile) -> Vec<ClassFacts> {
    file.classes.iter().map(extract_class).collect()
}

fn trim_lines(text: &str) -> String {
    text.split('\n')
        .map(str::trim)
        .collect::<Vec<_>>()
        .join("\n")
}
