//! Alternation flattening: `A | B | C` nested binary nodes → `"A | B | C"`.

use crate::model::Expr;

/// `true` for an alternation whose operands are all names or further
/// alternations. Anything else in the chain makes the whole node unrecognized.
pub fn is_alternation(expr: &Expr) -> bool {
    if !matches!(expr, Expr::BitOr(..)) {
        return false;
    }
    let mut pending = vec![expr];
    while let Some(operand) = pending.pop() {
        match operand {
            Expr::Name(_) => {}
            Expr::BitOr(left, right) => {
                pending.push(left);
                pending.push(right);
            }
            _ => return false,
        }
    }
    true
}

/// Flatten the operands of one `left | right` node into its leaf symbols,
/// left to right, joined by `" | "`.
///
/// Operands that are neither a plain name nor another alternation are skipped.
pub fn flatten_alternatives(left: &Expr, right: &Expr) -> String {
    let mut leaves = leaves_of(left);
    leaves.extend(leaves_of(right));
    leaves.join(" | ")
}

fn leaves_of(operand: &Expr) -> Vec<&str> {
    let mut leaves = Vec::new();
    let mut pending = vec![operand];
    while let Some(expr) = pending.pop() {
        match expr {
            Expr::Name(id) => leaves.push(id.as_str()),
            // right first so the left side is popped first
            Expr::BitOr(left, right) => {
                pending.push(right);
                pending.push(left);
            }
            _ => {}
        }
    }
    leaves
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(id: &str) -> Expr {
        Expr::Name(id.to_string())
    }

    fn or(left: Expr, right: Expr) -> Expr {
        Expr::BitOr(Box::new(left), Box::new(right))
    }

    #[test]
    fn two_operands() {
        assert_eq!(flatten_alternatives(&name("A"), &name("B")), "A | B");
    }

    #[test]
    fn left_leaning_chain() {
        // ((A | B) | C) | D, the way `A | B | C | D` parses
        let left = or(or(name("A"), name("B")), name("C"));
        assert_eq!(flatten_alternatives(&left, &name("D")), "A | B | C | D");
    }

    #[test]
    fn right_leaning_chain() {
        let right = or(name("B"), or(name("C"), name("D")));
        assert_eq!(flatten_alternatives(&name("A"), &right), "A | B | C | D");
    }

    #[test]
    fn balanced_chain() {
        let left = or(name("A"), name("B"));
        let right = or(name("C"), name("D"));
        assert_eq!(flatten_alternatives(&left, &right), "A | B | C | D");
    }

    #[test]
    fn mixed_nesting_keeps_source_order() {
        // A | (B | (C | D)) | E
        let inner = or(name("B"), or(name("C"), name("D")));
        let left = or(name("A"), inner);
        assert_eq!(flatten_alternatives(&left, &name("E")), "A | B | C | D | E");
    }

    #[test]
    fn long_chain() {
        let mut chain = name("P0");
        for i in 1..200 {
            chain = or(chain, name(&format!("P{i}")));
        }
        let Expr::BitOr(left, right) = &chain else {
            panic!("expected alternation");
        };
        let flat = flatten_alternatives(left, right);
        assert!(flat.starts_with("P0 | P1 | P2"));
        assert!(flat.ends_with("P198 | P199"));
        assert_eq!(flat.matches(" | ").count(), 199);
    }

    #[test]
    fn alternation_of_names() {
        assert!(is_alternation(&or(name("A"), or(name("B"), name("C")))));
    }

    #[test]
    fn alternation_with_member_access_is_not_recognized() {
        let member = Expr::Attribute {
            value: Box::new(name("x")),
            attr: "y".into(),
        };
        assert!(!is_alternation(&or(member, name("B"))));
        assert!(!is_alternation(&or(name("A"), or(name("B"), Expr::Other))));
    }

    #[test]
    fn bare_name_is_not_an_alternation() {
        assert!(!is_alternation(&name("A")));
    }

    #[test]
    fn unsupported_operand_is_skipped() {
        assert_eq!(flatten_alternatives(&Expr::Other, &name("B")), "B");
    }
}
