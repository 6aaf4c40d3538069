//! Data model for parsed source files and extracted class facts: format-agnostic.

use indexmap::IndexMap;
use std::fmt;
use std::path::PathBuf;

use crate::capability::Capability;

// -- Syntax model (produced by the parser) ------------------------------------

/// One parsed source file.
#[derive(Debug, Default)]
pub struct SourceFile {
    /// Path relative to the documented root
    pub path: PathBuf,
    pub classes: Vec<ClassDeclaration>,
}

/// A top-level class declaration.
#[derive(Debug, Default)]
pub struct ClassDeclaration {
    pub name: String,
    /// 1-based line of the `class` keyword
    pub line: usize,
    /// Base-class references as written, e.g. `generics.ListAPIView`
    pub bases: Vec<String>,
    pub methods: Vec<String>,
    pub body: Vec<Statement>,
}

/// A class body statement, reduced to the forms the extractor cares about.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// A standalone string literal (docstring or free text)
    Docstring(String),
    /// `target = value`; the target is already reduced to its leaf name
    Assign { target: String, value: Expr },
    Other,
}

/// Right-hand side expression shapes.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Name(String),
    Attribute { value: Box<Expr>, attr: String },
    Constant(Literal),
    List(Vec<Expr>),
    Tuple(Vec<Expr>),
    /// `left | right`
    BitOr(Box<Expr>, Box<Expr>),
    Call {
        func: Box<Expr>,
        args: Vec<Expr>,
        keywords: Vec<(String, Expr)>,
    },
    Other,
}

impl Expr {
    /// Root symbol of a member-access chain (`a` for `a.b.c`), or the name itself.
    pub fn root_symbol(&self) -> Option<&str> {
        match self {
            Expr::Name(id) => Some(id),
            Expr::Attribute { value, .. } => value.root_symbol(),
            _ => None,
        }
    }
}

/// Literal constants.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Str(String),
    /// Integer or float, kept as written
    Number(String),
    Bool(bool),
    None,
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Str(s) | Literal::Number(s) => f.write_str(s),
            Literal::Bool(true) => f.write_str("True"),
            Literal::Bool(false) => f.write_str("False"),
            Literal::None => f.write_str("None"),
        }
    }
}

// -- Extracted facts ----------------------------------------------------------

/// A single normalized value: a literal or a symbol name.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Literal(Literal),
    Symbol(String),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Literal(lit) => lit.fmt(f),
            Scalar::Symbol(name) => f.write_str(name),
        }
    }
}

/// The value bound to a class attribute.
#[derive(Debug, Clone, PartialEq)]
pub enum BindingValue {
    Scalar(Scalar),
    Sequence(Vec<Scalar>),
    /// Plain symbols followed by one flattened `A | B | C` string
    Alternatives {
        symbols: Vec<String>,
        alternation: String,
    },
    Field(FieldDescriptor),
}

impl fmt::Display for BindingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BindingValue::Scalar(s) => s.fmt(f),
            BindingValue::Sequence(items) => {
                let items: Vec<String> = items.iter().map(ToString::to_string).collect();
                write!(f, "[{}]", items.join(", "))
            }
            BindingValue::Alternatives {
                symbols,
                alternation,
            } => {
                let mut items: Vec<&str> = symbols.iter().map(String::as_str).collect();
                if !alternation.is_empty() {
                    items.push(alternation);
                }
                write!(f, "[{}]", items.join(", "))
            }
            BindingValue::Field(field) => field.fmt(f),
        }
    }
}

/// Summary of a model field declaration such as `models.CharField(max_length=10)`.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    pub kind: String,
    pub options: Vec<(String, String)>,
}

impl fmt::Display for FieldDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:", self.kind)?;
        for (key, value) in &self.options {
            write!(f, " {}={}", key, value)?;
        }
        Ok(())
    }
}

/// Everything extracted from one class declaration.
#[derive(Debug, Default)]
pub struct ClassFacts {
    pub name: String,
    pub line: usize,
    pub bases: Vec<String>,
    pub methods: Vec<String>,
    /// Concatenated standalone string statements, line-trimmed
    pub expression: String,
    /// Attribute bindings in first-assignment order; later assignments replace the value
    pub bindings: IndexMap<String, BindingValue>,
    pub capabilities: Vec<Capability>,
}

impl ClassFacts {
    pub fn permission_classes(&self) -> Option<&BindingValue> {
        self.bindings.get("permission_classes")
    }

    pub fn serializer_class(&self) -> Option<&BindingValue> {
        self.bindings.get("serializer_class")
    }

    pub fn pagination_class(&self) -> Option<&BindingValue> {
        self.bindings.get("pagination_class")
    }

    pub fn queryset_model(&self) -> Option<&BindingValue> {
        self.bindings.get("queryset")
    }
}

/// All class facts from one source file, ready for rendering.
#[derive(Debug, Default)]
pub struct Document {
    /// Path relative to the documented root, `/`-separated
    pub path: String,
    pub classes: Vec<ClassFacts>,
}
