//! Capability mapping: which operations a class exposes through its bases.

use serde::Serialize;
use std::fmt;

/// An operation a view exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Capability {
    Create,
    Retrieve,
    Update,
    List,
    Destroy,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Capability::Create => "Create",
            Capability::Retrieve => "Retrieve",
            Capability::Update => "Update",
            Capability::List => "List",
            Capability::Destroy => "Destroy",
        };
        f.write_str(label)
    }
}

use Capability::*;

/// Known base classes and the operations they contribute, in display order.
pub const REGISTRY: &[(&str, &[Capability])] = &[
    ("ModelViewSet", &[Create, Retrieve, Update, List, Destroy]),
    ("ReadOnlyModelViewSet", &[Retrieve, List]),
    ("ListCreateAPIView", &[Create, List]),
    ("RetrieveUpdateAPIView", &[Retrieve, Update]),
    ("RetrieveUpdateDestroyAPIView", &[Retrieve, Update, Destroy]),
    ("RetrieveDestroyAPIView", &[Retrieve, Destroy]),
    ("CreateModelMixin", &[Create]),
    ("CreateAPIView", &[Create]),
    ("RetrieveModelMixin", &[Retrieve]),
    ("RetrieveAPIView", &[Retrieve]),
    ("ListModelMixin", &[List]),
    ("ListAPIView", &[List]),
    ("UpdateModelMixin", &[Update]),
    ("UpdateAPIView", &[Update]),
    ("DestroyModelMixin", &[Destroy]),
    ("DestroyAPIView", &[Destroy]),
];

/// Registry entry for a single identifier.
pub fn lookup(segment: &str) -> &'static [Capability] {
    REGISTRY
        .iter()
        .find(|(name, _)| *name == segment)
        .map(|(_, caps)| *caps)
        .unwrap_or(&[])
}

/// Map base-class references to capabilities.
///
/// Every dot-separated segment of every base is looked up; matches accumulate
/// in declaration order and duplicates are kept.
pub fn map_bases(bases: &[String]) -> Vec<Capability> {
    bases
        .iter()
        .flat_map(|base| base.split('.'))
        .flat_map(|segment| lookup(segment).iter().copied())
        .collect()
}

/// Bulleted `- Label` lines, or `None` when there is nothing to list.
pub fn render_methods(capabilities: &[Capability]) -> Option<String> {
    if capabilities.is_empty() {
        return None;
    }
    let lines: Vec<String> = capabilities.iter().map(|c| format!("- {}", c)).collect();
    Some(lines.join("\n"))
}
