//! Parser module: turns Python source text into the syntax model.

pub mod python;

use crate::model::SourceFile;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to load the Python grammar: {0}")]
    Language(#[from] tree_sitter::LanguageError),

    #[error("parser produced no syntax tree")]
    NoTree,

    #[error("syntax error at line {line}, column {column}")]
    Syntax { line: usize, column: usize },
}

/// Source file extension recognized by the parser.
pub const SOURCE_EXTENSION: &str = "py";

/// Reusable Python parser. One instance per thread of work.
pub struct SourceParser {
    inner: tree_sitter::Parser,
}

impl SourceParser {
    pub fn new() -> Result<Self, ParseError> {
        let mut inner = tree_sitter::Parser::new();
        inner.set_language(&tree_sitter_python::LANGUAGE.into())?;
        Ok(Self { inner })
    }

    /// Parse one file. `path` is recorded as-is on the result.
    pub fn parse(&mut self, path: &Path, content: &str) -> Result<SourceFile, ParseError> {
        let tree = self.inner.parse(content, None).ok_or(ParseError::NoTree)?;
        let root = tree.root_node();
        if root.has_error() {
            let (line, column) = python::first_error_position(root);
            return Err(ParseError::Syntax { line, column });
        }
        Ok(SourceFile {
            path: path.to_path_buf(),
            classes: python::lower_classes(root, content),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_empty_module() {
        let mut parser = SourceParser::new().unwrap();
        let file = parser.parse(Path::new("empty.py"), "").unwrap();
        assert!(file.classes.is_empty());
        assert_eq!(file.path, Path::new("empty.py"));
    }

    #[test]
    fn malformed_source_is_a_syntax_error() {
        let mut parser = SourceParser::new().unwrap();
        let err = parser
            .parse(Path::new("bad.py"), "class Broken(:\n    x = [1, 2\n")
            .unwrap_err();
        assert!(matches!(err, ParseError::Syntax { .. }), "{err:?}");
    }

    #[test]
    fn parser_is_reusable_across_files() {
        let mut parser = SourceParser::new().unwrap();
        let a = parser.parse(Path::new("a.py"), "class A:\n    pass\n").unwrap();
        let b = parser.parse(Path::new("b.py"), "class B:\n    pass\n").unwrap();
        assert_eq!(a.classes[0].name, "A");
        assert_eq!(b.classes[0].name, "B");
    }
}
