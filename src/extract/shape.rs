//! Assignment shape dispatch.
//!
//! Classifies the right-hand side of one class-level assignment and reduces it
//! to a [`BindingValue`]. The recognized shapes are tried in priority order:
//!
//! 1. list/tuple whose first or last element is an alternation → [`BindingValue::Alternatives`]
//! 2. any other list/tuple → [`BindingValue::Sequence`] of recognized elements
//! 3. literal constant → scalar
//! 4. `a.b.c` → `[a]`
//! 5. `a.b` → `[a]`
//! 6. bare name → scalar symbol
//! 7. `module.Kind(key=value, ...)` → [`BindingValue::Field`]
//!
//! Anything else yields `None`. Unrecognized shapes are expected input, not errors.

use super::union::{flatten_alternatives, is_alternation};
use crate::model::*;

/// Reduce an assignment value to a binding, or `None` if the shape is not recognized.
pub fn dispatch(value: &Expr) -> Option<BindingValue> {
    match value {
        Expr::List(elements) | Expr::Tuple(elements) => Some(collection(elements)),
        Expr::Constant(lit) => Some(BindingValue::Scalar(Scalar::Literal(lit.clone()))),
        Expr::Attribute { value: base, .. } => chain_root(base),
        Expr::Name(id) => Some(BindingValue::Scalar(Scalar::Symbol(id.clone()))),
        Expr::Call {
            func,
            args,
            keywords,
        } if args.is_empty() => field_descriptor(func, keywords),
        _ => None,
    }
}

fn collection(elements: &[Expr]) -> BindingValue {
    // When both ends are alternations the first one wins; the last is not a
    // plain symbol and drops out.
    let split = match elements {
        [first, rest @ ..] if is_alternation(first) => Some((first, rest)),
        [rest @ .., last] if is_alternation(last) => Some((last, rest)),
        _ => None,
    };
    match split {
        Some((Expr::BitOr(left, right), rest)) => BindingValue::Alternatives {
            symbols: rest.iter().filter_map(plain_symbol).collect(),
            alternation: flatten_alternatives(left, right),
        },
        _ => BindingValue::Sequence(elements.iter().filter_map(element).collect()),
    }
}

/// Symbol name of an element beside an alternation: `Name` or the root of `name.attr`.
fn plain_symbol(expr: &Expr) -> Option<String> {
    match expr {
        Expr::Name(id) => Some(id.clone()),
        Expr::Attribute { value, .. } => match value.as_ref() {
            Expr::Name(id) => Some(id.clone()),
            _ => None,
        },
        _ => None,
    }
}

/// Per-element reduction for general lists. Unknown shapes are dropped.
fn element(expr: &Expr) -> Option<Scalar> {
    match expr {
        Expr::Call { func, args, .. } if matches!(func.as_ref(), Expr::Attribute { .. }) => {
            match args.as_slice() {
                [Expr::Constant(lit)] => Some(Scalar::Literal(lit.clone())),
                _ => None,
            }
        }
        Expr::Tuple(items) => match items.first() {
            Some(Expr::Name(id)) => Some(Scalar::Symbol(id.clone())),
            Some(Expr::Constant(lit)) => Some(Scalar::Literal(lit.clone())),
            _ => None,
        },
        Expr::Constant(lit) => Some(Scalar::Literal(lit.clone())),
        Expr::Name(id) => Some(Scalar::Symbol(id.clone())),
        Expr::Attribute { .. } => expr.root_symbol().map(|id| Scalar::Symbol(id.to_string())),
        _ => None,
    }
}

/// `a.b` and `a.b.c` both reduce to `[a]`; deeper or non-name chains are unrecognized.
fn chain_root(base: &Expr) -> Option<BindingValue> {
    let root = match base {
        Expr::Name(id) => id,
        Expr::Attribute { value, .. } => match value.as_ref() {
            Expr::Name(id) => id,
            _ => return None,
        },
        _ => return None,
    };
    Some(BindingValue::Sequence(vec![Scalar::Symbol(root.clone())]))
}

/// `models.CharField(max_length=100)` → `CharField: max_length=100`.
fn field_descriptor(func: &Expr, keywords: &[(String, Expr)]) -> Option<BindingValue> {
    let Expr::Attribute { value, attr } = func else {
        return None;
    };
    if !matches!(value.as_ref(), Expr::Name(_)) {
        return None;
    }

    let options = keywords
        .iter()
        .filter_map(|(key, value)| keyword_value(value).map(|v| (key.clone(), v)))
        .collect();

    Some(BindingValue::Field(FieldDescriptor {
        kind: attr.clone(),
        options,
    }))
}

fn keyword_value(expr: &Expr) -> Option<String> {
    match expr {
        Expr::Call { args, keywords, .. } if keywords.is_empty() => match args.as_slice() {
            [Expr::Constant(lit)] => Some(lit.to_string()),
            _ => None,
        },
        Expr::Constant(lit) => Some(lit.to_string()),
        Expr::Attribute { value, attr } => match value.as_ref() {
            Expr::Name(id) => Some(format!("{}.{}", id, attr)),
            _ => None,
        },
        Expr::Name(id) => Some(id.clone()),
        _ => None,
    }
}
