//! Lowering from the tree-sitter Python grammar into the syntax model.
//!
//! Only the shapes the extractor inspects get their own variant. Everything
//! else becomes `Expr::Other` / `Statement::Other` and is ignored downstream.

use crate::model::*;
use tracing::debug;
use tree_sitter::Node;

/// Expressions nested deeper than this are lowered to `Expr::Other`.
const MAX_NESTING: usize = 256;

/// Collect top-level class declarations (plain or decorated) in source order.
pub fn lower_classes(root: Node, code: &str) -> Vec<ClassDeclaration> {
    let mut classes = Vec::new();
    let mut cursor = root.walk();
    for child in root.named_children(&mut cursor) {
        let class_node = match child.kind() {
            "class_definition" => child,
            "decorated_definition" => match child.child_by_field_name("definition") {
                Some(def) if def.kind() == "class_definition" => def,
                _ => continue,
            },
            _ => continue,
        };
        if let Some(class) = lower_class(class_node, code) {
            classes.push(class);
        }
    }
    classes
}

/// 1-based (line, column) of the first ERROR or MISSING node.
pub fn first_error_position(node: Node) -> (usize, usize) {
    let target = find_error(node).unwrap_or(node);
    let pos = target.start_position();
    (pos.row + 1, pos.column + 1)
}

fn find_error(node: Node) -> Option<Node> {
    let mut pending = vec![node];
    while let Some(current) = pending.pop() {
        if current.is_error() || current.is_missing() {
            return Some(current);
        }
        let mut cursor = current.walk();
        let children: Vec<Node> = current
            .children(&mut cursor)
            .filter(|c| c.has_error())
            .collect();
        pending.extend(children.into_iter().rev());
    }
    None
}

fn lower_class(node: Node, code: &str) -> Option<ClassDeclaration> {
    let name = text(code, node.child_by_field_name("name")?).to_string();

    let mut bases = Vec::new();
    if let Some(superclasses) = node.child_by_field_name("superclasses") {
        let mut cursor = superclasses.walk();
        for base in superclasses.named_children(&mut cursor) {
            if matches!(base.kind(), "identifier" | "attribute") {
                bases.push(text(code, base).split_whitespace().collect());
            }
        }
    }

    let mut methods = Vec::new();
    let mut body = Vec::new();
    if let Some(block) = node.child_by_field_name("body") {
        let mut cursor = block.walk();
        for stmt in block.named_children(&mut cursor) {
            match stmt.kind() {
                "function_definition" => methods.extend(function_name(stmt, code)),
                "decorated_definition" => {
                    if let Some(def) = stmt.child_by_field_name("definition") {
                        if def.kind() == "function_definition" {
                            methods.extend(function_name(def, code));
                        }
                    }
                    body.push(Statement::Other);
                }
                "expression_statement" => body.push(lower_statement(stmt, code)),
                "comment" => {}
                _ => body.push(Statement::Other),
            }
        }
    }

    Some(ClassDeclaration {
        name,
        line: node.start_position().row + 1,
        bases,
        methods,
        body,
    })
}

fn function_name(node: Node, code: &str) -> Option<String> {
    node.child_by_field_name("name")
        .map(|n| text(code, n).to_string())
}

fn lower_statement(node: Node, code: &str) -> Statement {
    let mut cursor = node.walk();
    let children: Vec<Node> = node
        .named_children(&mut cursor)
        .filter(|c| c.kind() != "comment")
        .collect();
    let [inner] = children.as_slice() else {
        return Statement::Other;
    };

    match inner.kind() {
        "string" | "concatenated_string" => Statement::Docstring(string_value(*inner, code)),
        "assignment" => lower_assignment(*inner, code),
        _ => Statement::Other,
    }
}

fn lower_assignment(node: Node, code: &str) -> Statement {
    let Some(target) = node.child_by_field_name("left").and_then(|l| target_key(l, code)) else {
        return Statement::Other;
    };

    // `a = b = value` nests assignments on the right; the value is the innermost one.
    let mut right = node.child_by_field_name("right");
    while let Some(r) = right {
        if r.kind() != "assignment" {
            break;
        }
        right = r.child_by_field_name("right");
    }

    match right {
        Some(value) => Statement::Assign {
            target,
            value: lower_expr(value, code),
        },
        // Bare annotation: `name: int`
        None => Statement::Other,
    }
}

/// Leaf name of an assignment target: `x` → `x`, `self.x` → `x`.
fn target_key(node: Node, code: &str) -> Option<String> {
    match node.kind() {
        "identifier" => Some(text(code, node).to_string()),
        "attribute" => node
            .child_by_field_name("attribute")
            .map(|a| text(code, a).to_string()),
        _ => None,
    }
}

/// Lower an expression node.
pub fn lower_expr(node: Node, code: &str) -> Expr {
    lower_nested(node, code, 0)
}

fn lower_nested(node: Node, code: &str, depth: usize) -> Expr {
    if depth >= MAX_NESTING {
        debug!(
            "expression at line {} nested deeper than {} levels",
            node.start_position().row + 1,
            MAX_NESTING
        );
        return Expr::Other;
    }
    let depth = depth + 1;

    match node.kind() {
        "identifier" => Expr::Name(text(code, node).to_string()),
        "attribute" => {
            let (Some(object), Some(attr)) = (
                node.child_by_field_name("object"),
                node.child_by_field_name("attribute"),
            ) else {
                return Expr::Other;
            };
            Expr::Attribute {
                value: Box::new(lower_nested(object, code, depth)),
                attr: text(code, attr).to_string(),
            }
        }
        "string" | "concatenated_string" => Expr::Constant(Literal::Str(string_value(node, code))),
        "integer" | "float" => Expr::Constant(Literal::Number(text(code, node).to_string())),
        "true" => Expr::Constant(Literal::Bool(true)),
        "false" => Expr::Constant(Literal::Bool(false)),
        "none" => Expr::Constant(Literal::None),
        "unary_operator" => lower_negative_number(node, code),
        "list" => Expr::List(lower_elements(node, code, depth)),
        "tuple" => Expr::Tuple(lower_elements(node, code, depth)),
        "parenthesized_expression" => {
            let mut cursor = node.walk();
            let inner: Vec<Node> = node
                .named_children(&mut cursor)
                .filter(|c| c.kind() != "comment")
                .collect();
            match inner.as_slice() {
                [only] => lower_nested(*only, code, depth),
                _ => Expr::Other,
            }
        }
        "binary_operator" => {
            let operator = node.child_by_field_name("operator").map(|o| o.kind());
            match (
                operator,
                node.child_by_field_name("left"),
                node.child_by_field_name("right"),
            ) {
                (Some("|"), Some(left), Some(right)) => Expr::BitOr(
                    Box::new(lower_nested(left, code, depth)),
                    Box::new(lower_nested(right, code, depth)),
                ),
                _ => Expr::Other,
            }
        }
        "call" => lower_call(node, code, depth),
        _ => Expr::Other,
    }
}

fn lower_negative_number(node: Node, code: &str) -> Expr {
    let operator = node.child_by_field_name("operator").map(|o| o.kind());
    let argument = node.child_by_field_name("argument");
    match (operator, argument) {
        (Some("-"), Some(arg)) if matches!(arg.kind(), "integer" | "float") => {
            Expr::Constant(Literal::Number(format!("-{}", text(code, arg))))
        }
        _ => Expr::Other,
    }
}

fn lower_elements(node: Node, code: &str, depth: usize) -> Vec<Expr> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|c| c.kind() != "comment")
        .map(|c| lower_nested(c, code, depth))
        .collect()
}

fn lower_call(node: Node, code: &str, depth: usize) -> Expr {
    let Some(function) = node.child_by_field_name("function") else {
        return Expr::Other;
    };
    let mut args = Vec::new();
    let mut keywords = Vec::new();

    if let Some(arguments) = node.child_by_field_name("arguments") {
        if arguments.kind() != "argument_list" {
            // Generator argument: `f(x for x in y)`
            return Expr::Other;
        }
        let mut cursor = arguments.walk();
        for arg in arguments.named_children(&mut cursor) {
            match arg.kind() {
                "comment" => {}
                "keyword_argument" => {
                    if let (Some(name), Some(value)) = (
                        arg.child_by_field_name("name"),
                        arg.child_by_field_name("value"),
                    ) {
                        let value = lower_nested(value, code, depth);
                        keywords.push((text(code, name).to_string(), value));
                    }
                }
                _ => args.push(lower_nested(arg, code, depth)),
            }
        }
    }

    Expr::Call {
        func: Box::new(lower_nested(function, code, depth)),
        args,
        keywords,
    }
}

/// Literal text of a string node with prefix and quotes removed.
/// Escape sequences are kept as written.
fn string_value(node: Node, code: &str) -> String {
    if node.kind() == "concatenated_string" {
        let mut cursor = node.walk();
        return node
            .named_children(&mut cursor)
            .filter(|c| c.kind() == "string")
            .map(|c| strip_quotes(text(code, c)).to_string())
            .collect();
    }
    strip_quotes(text(code, node)).to_string()
}

fn strip_quotes(raw: &str) -> &str {
    let unprefixed = raw.trim_start_matches(|c: char| c.is_ascii_alphabetic());
    for quote in ["\"\"\"", "'''", "\"", "'"] {
        if unprefixed.len() >= quote.len() * 2
            && unprefixed.starts_with(quote)
            && unprefixed.ends_with(quote)
        {
            return &unprefixed[quote.len()..unprefixed.len() - quote.len()];
        }
    }
    unprefixed
}

fn text<'a>(code: &'a str, node: Node) -> &'a str {
    &code[node.byte_range()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::SourceParser;
    use std::path::Path;

    fn classes(src: &str) -> Vec<ClassDeclaration> {
        SourceParser::new()
            .unwrap()
            .parse(Path::new("t.py"), src)
            .unwrap()
            .classes
    }

    fn single_assign(src: &str) -> (String, Expr) {
        let class = classes(src).remove(0);
        match class.body.into_iter().next() {
            Some(Statement::Assign { target, value }) => (target, value),
            other => panic!("expected assignment, got {other:?}"),
        }
    }

    #[test]
    fn class_header() {
        let src = "import x\n\n\nclass PersonViewSet(mixins.ListModelMixin, GenericViewSet, metaclass=Meta):\n    def list(self):\n        pass\n\n    async def retrieve(self):\n        pass\n";
        let class = classes(src).remove(0);
        assert_eq!(class.name, "PersonViewSet");
        assert_eq!(class.line, 4);
        assert_eq!(class.bases, vec!["mixins.ListModelMixin", "GenericViewSet"]);
        assert_eq!(class.methods, vec!["list", "retrieve"]);
    }

    #[test]
    fn decorated_class_uses_class_keyword_line() {
        let src = "@register\nclass Tagged:\n    pass\n";
        let class = classes(src).remove(0);
        assert_eq!(class.name, "Tagged");
        assert_eq!(class.line, 2);
    }

    #[test]
    fn nested_and_function_definitions_are_not_classes() {
        let src = "def helper():\n    class Inner:\n        pass\n\nclass Outer:\n    class Meta:\n        model = Person\n";
        let found = classes(src);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Outer");
        assert_eq!(found[0].body, vec![Statement::Other]);
    }

    #[test]
    fn docstring_statement() {
        let src = "class A:\n    \"\"\"\n    Lists people.\n    \"\"\"\n";
        let class = classes(src).remove(0);
        assert_eq!(
            class.body,
            vec![Statement::Docstring("\n    Lists people.\n    ".into())]
        );
    }

    #[test]
    fn string_prefixes_and_quotes_removed() {
        let (_, value) = single_assign("class A:\n    x = r'raw\\d'\n");
        assert_eq!(value, Expr::Constant(Literal::Str("raw\\d".into())));

        let (_, value) = single_assign("class A:\n    x = 'a' \"b\"\n");
        assert_eq!(value, Expr::Constant(Literal::Str("ab".into())));
    }

    #[test]
    fn attribute_target_uses_leaf() {
        let (target, _) = single_assign("class A:\n    self.lookup_field = 'pk'\n");
        assert_eq!(target, "lookup_field");
    }

    #[test]
    fn chained_and_annotated_assignments() {
        let (target, value) = single_assign("class A:\n    a = b = 3\n");
        assert_eq!(target, "a");
        assert_eq!(value, Expr::Constant(Literal::Number("3".into())));

        let (target, value) = single_assign("class A:\n    page_size: int = -5\n");
        assert_eq!(target, "page_size");
        assert_eq!(value, Expr::Constant(Literal::Number("-5".into())));
    }

    #[test]
    fn bare_annotation_is_not_an_assignment() {
        let class = classes("class A:\n    name: str\n").remove(0);
        assert_eq!(class.body, vec![Statement::Other]);
    }

    #[test]
    fn alternation_nests_left() {
        let (_, value) = single_assign("class A:\n    x = [A | B | C]\n");
        let Expr::List(items) = value else {
            panic!("expected list");
        };
        let expected = Expr::BitOr(
            Box::new(Expr::BitOr(
                Box::new(Expr::Name("A".into())),
                Box::new(Expr::Name("B".into())),
            )),
            Box::new(Expr::Name("C".into())),
        );
        assert_eq!(items, vec![expected]);
    }

    #[test]
    fn very_long_alternation_is_cut_off() {
        let operands: Vec<String> = (0..50_000).map(|i| format!("P{i}")).collect();
        let src = format!("class A:\n    x = [X, {}]\n", operands.join(" | "));
        let (_, value) = single_assign(&src);
        let Expr::List(items) = value else {
            panic!("expected list");
        };
        assert_eq!(items[0], Expr::Name("X".into()));

        let Expr::BitOr(_, last) = &items[1] else {
            panic!("expected alternation");
        };
        assert_eq!(**last, Expr::Name("P49999".into()));

        // Follow the left spine down to the cut-off point.
        let mut node = &items[1];
        let mut depth = 0;
        while let Expr::BitOr(left, _) = node {
            node = left;
            depth += 1;
        }
        assert_eq!(*node, Expr::Other);
        assert!(depth < MAX_NESTING);
    }

    #[test]
    fn deeply_nested_lists_are_cut_off() {
        let src = format!("class A:\n    x = {}1{}\n", "[".repeat(5_000), "]".repeat(5_000));
        let (_, mut value) = single_assign(&src);
        let mut depth = 0;
        while let Expr::List(mut items) = value {
            value = items.remove(0);
            depth += 1;
        }
        assert_eq!(value, Expr::Other);
        assert_eq!(depth, MAX_NESTING);
    }

    #[test]
    fn other_binary_operators_are_opaque() {
        let (_, value) = single_assign("class A:\n    x = A & B\n");
        assert_eq!(value, Expr::Other);
    }

    #[test]
    fn call_arguments_split_positional_and_keyword() {
        let (_, value) = single_assign(
            "class A:\n    name = models.CharField(_('Name'), max_length=100, blank=True)\n",
        );
        let Expr::Call { func, args, keywords } = value else {
            panic!("expected call");
        };
        assert_eq!(func.root_symbol(), Some("models"));
        assert_eq!(args.len(), 1);
        assert_eq!(keywords.len(), 2);
        assert_eq!(keywords[0].0, "max_length");
        assert_eq!(keywords[1].1, Expr::Constant(Literal::Bool(true)));
    }

    #[test]
    fn comments_inside_lists_are_ignored() {
        let (_, value) = single_assign("class A:\n    x = [\n        A,  # first\n        B,\n    ]\n");
        assert_eq!(
            value,
            Expr::List(vec![Expr::Name("A".into()), Expr::Name("B".into())])
        );
    }

    #[test]
    fn parentheses_are_transparent() {
        let (_, value) = single_assign("class A:\n    x = (Foo)\n");
        assert_eq!(value, Expr::Name("Foo".into()));
    }
}
