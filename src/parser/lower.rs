//
//  lower.rs
//  urltrace
//
//  tree-sitter JavaScript/TypeScript trees → syntax::Node.
//

use tree_sitter::Node as TsNode;

use super::helpers::{named_children, node_text, span_of, string_value};
use crate::syntax::{Call, Node, NodeKind};

/// Node kinds dropped entirely: types and other constructs that never hold
/// runtime calls or declarations.
const SKIPPED: &[&str] = &[
    "comment",
    "hash_bang_line",
    "type_annotation",
    "type_arguments",
    "type_parameters",
    "type_alias_declaration",
    "interface_declaration",
    "abstract_method_signature",
    "method_signature",
    "property_signature",
    "ambient_declaration",
    "accessibility_modifier",
    "override_modifier",
];

/// Expression wrappers that do not change the value.
const TRANSPARENT: &[&str] = &[
    "parenthesized_expression",
    "as_expression",
    "satisfies_expression",
    "non_null_expression",
];

/// Lower the tree rooted at `root` (normally a `program` node).
pub fn lower_tree(root: &TsNode, source: &[u8]) -> Node {
    let items = lower_children(root, source);
    Node::new(NodeKind::Program(items), span_of(root))
}

fn lower_children(node: &TsNode, source: &[u8]) -> Vec<Node> {
    named_children(node)
        .iter()
        .filter_map(|child| lower(child, source))
        .collect()
}

/// Lower every named child except the one in field `skip`.
fn lower_children_except(node: &TsNode, source: &[u8], skip: &str) -> Vec<Node> {
    let skipped = node.child_by_field_name(skip).map(|n| n.id());
    named_children(node)
        .iter()
        .filter(|child| Some(child.id()) != skipped)
        .filter_map(|child| lower(child, source))
        .collect()
}

fn lower(node: &TsNode, source: &[u8]) -> Option<Node> {
    lower_named(node, source, None)
}

/// Lower `node`; if it is an anonymous function, give it `inferred` as its name.
fn lower_named(node: &TsNode, source: &[u8], inferred: Option<&str>) -> Option<Node> {
    let kind = node.kind();
    if SKIPPED.contains(&kind) {
        return None;
    }
    let span = span_of(node);

    if TRANSPARENT.contains(&kind) {
        let inner = named_children(node).into_iter().next()?;
        return lower_named(&inner, source, inferred);
    }

    let lowered = match kind {
        "program" | "statement_block" | "class_body" => {
            NodeKind::Block(lower_children(node, source))
        }
        "variable_declarator" => lower_declarator(node, source),
        "function_declaration" | "generator_function_declaration" | "method_definition" => {
            lower_function(node, source, None)
        }
        "function_expression" | "function" | "generator_function" | "arrow_function" => {
            lower_function(node, source, inferred)
        }
        "pair" => lower_pair(node, source),
        "field_definition" | "public_field_definition" => lower_field(node, source),
        "assignment_expression" => lower_assignment(node, source),
        "call_expression" => lower_call(node, source),
        "member_expression" => lower_member(node, source),
        "identifier" => NodeKind::Identifier(node_text(node, source)),
        "this" => NodeKind::This,
        "string" => NodeKind::StringLiteral(string_value(node, source)),
        "number" => NodeKind::NumberLiteral(node_text(node, source)),
        "binary_expression" => lower_binary(node, source),
        "template_string" => NodeKind::Template {
            parts: named_children(node)
                .iter()
                .filter(|child| child.kind() == "template_substitution")
                .flat_map(|sub| lower_children(sub, source))
                .collect(),
        },
        // `<T>value`: the expression is the last child
        "type_assertion" => {
            let inner = named_children(node).into_iter().last()?;
            return lower_named(&inner, source, inferred);
        }
        _ => NodeKind::Other {
            children: lower_children(node, source),
        },
    };
    Some(Node::new(lowered, span))
}

fn lower_declarator(node: &TsNode, source: &[u8]) -> NodeKind {
    let name = node.child_by_field_name("name");
    let value = node.child_by_field_name("value");
    match name {
        Some(name) if name.kind() == "identifier" => {
            let name = node_text(&name, source);
            let init = value
                .and_then(|v| lower_named(&v, source, Some(name.as_str())))
                .map(Box::new);
            NodeKind::VariableDeclarator { name, init }
        }
        // Destructuring patterns are not tracked; keep the initializer walkable.
        _ => NodeKind::Other {
            children: value.and_then(|v| lower(&v, source)).into_iter().collect(),
        },
    }
}

fn lower_function(node: &TsNode, source: &[u8], inferred: Option<&str>) -> NodeKind {
    let own_name = node
        .child_by_field_name("name")
        .map(|n| property_name(&n, source));
    NodeKind::Function {
        name: own_name.or_else(|| inferred.map(str::to_string)),
        body: lower_children_except(node, source, "name"),
    }
}

fn lower_pair(node: &TsNode, source: &[u8]) -> NodeKind {
    let key = node
        .child_by_field_name("key")
        .map(|k| property_name(&k, source))
        .unwrap_or_default();
    match node.child_by_field_name("value") {
        Some(value) => match lower_named(&value, source, Some(key.as_str())) {
            Some(value) => NodeKind::Property {
                key,
                value: Box::new(value),
            },
            None => NodeKind::Other {
                children: Vec::new(),
            },
        },
        None => NodeKind::Other {
            children: Vec::new(),
        },
    }
}

/// Class fields: `load = () => this.http.get(...)`.
fn lower_field(node: &TsNode, source: &[u8]) -> NodeKind {
    let key_field = node
        .child_by_field_name("property")
        .or_else(|| node.child_by_field_name("name"));
    let key = key_field.map(|k| property_name(&k, source));
    let children = node
        .child_by_field_name("value")
        .and_then(|v| lower_named(&v, source, key.as_deref()))
        .into_iter()
        .collect();
    NodeKind::Other { children }
}

/// `name = function () {}` names the function; other assignments are opaque.
fn lower_assignment(node: &TsNode, source: &[u8]) -> NodeKind {
    let left = node.child_by_field_name("left");
    let inferred = left
        .filter(|l| l.kind() == "identifier")
        .map(|l| node_text(&l, source));
    let mut children: Vec<Node> = left.and_then(|l| lower(&l, source)).into_iter().collect();
    if let Some(right) = node.child_by_field_name("right") {
        children.extend(lower_named(&right, source, inferred.as_deref()));
    }
    NodeKind::Other { children }
}

fn lower_call(node: &TsNode, source: &[u8]) -> NodeKind {
    let Some(function) = node
        .child_by_field_name("function")
        .and_then(|f| lower(&f, source))
    else {
        return NodeKind::Other {
            children: lower_children(node, source),
        };
    };
    let arguments = match node.child_by_field_name("arguments") {
        Some(args) if args.kind() == "arguments" => lower_children(&args, source),
        // tagged template: tag`...`
        Some(args) => lower(&args, source).into_iter().collect(),
        None => Vec::new(),
    };
    NodeKind::Call(Call {
        callee: Box::new(function),
        arguments,
    })
}

fn lower_member(node: &TsNode, source: &[u8]) -> NodeKind {
    let object = node
        .child_by_field_name("object")
        .and_then(|o| lower(&o, source));
    let property = node.child_by_field_name("property");
    match (object, property) {
        (Some(object), Some(property)) => NodeKind::Member {
            object: Box::new(object),
            property: node_text(&property, source),
        },
        (object, _) => NodeKind::Other {
            children: object.into_iter().collect(),
        },
    }
}

/// Binary expressions. The left spine of `a + b + c + ...` is unrolled into a
/// loop so long chains do not recurse once per operand.
fn lower_binary(node: &TsNode, source: &[u8]) -> NodeKind {
    let mut spine = vec![*node];
    while let Some(left) = spine.last().and_then(|n| n.child_by_field_name("left")) {
        if left.kind() != "binary_expression" {
            break;
        }
        spine.push(left);
    }

    let mut left = spine
        .last()
        .and_then(|n| n.child_by_field_name("left"))
        .and_then(|l| lower(&l, source));
    for inner in spine[1..].iter().rev() {
        left = Some(Node::new(binary_kind(inner, left, source), span_of(inner)));
    }
    binary_kind(node, left, source)
}

fn binary_kind(node: &TsNode, left: Option<Node>, source: &[u8]) -> NodeKind {
    let right = node.child_by_field_name("right").and_then(|r| lower(&r, source));
    let operator = node
        .child_by_field_name("operator")
        .map(|op| node_text(&op, source))
        .unwrap_or_default();
    match (left, right) {
        (Some(left), Some(right)) => NodeKind::Binary {
            operator,
            left: Box::new(left),
            right: Box::new(right),
        },
        (left, right) => NodeKind::Other {
            children: left.into_iter().chain(right).collect(),
        },
    }
}

/// Name of a property key: identifiers verbatim, string keys decoded.
fn property_name(node: &TsNode, source: &[u8]) -> String {
    match node.kind() {
        "string" => string_value(node, source),
        _ => node_text(node, source),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::SupportedLanguage;
    use tree_sitter::Parser;

    fn lower_source(lang: SupportedLanguage, source: &str) -> Node {
        let mut parser = Parser::new();
        parser.set_language(&lang.tree_sitter_language()).unwrap();
        let tree = parser.parse(source, None).unwrap();
        lower_tree(&tree.root_node(), source.as_bytes())
    }

    fn collect<'a>(node: &'a Node, out: &mut Vec<&'a Node>) {
        out.push(node);
        for child in node.children() {
            collect(child, out);
        }
    }

    fn all_nodes(node: &Node) -> Vec<&Node> {
        let mut out = Vec::new();
        collect(node, &mut out);
        out
    }

    fn function_names(node: &Node) -> Vec<Option<String>> {
        all_nodes(node)
            .into_iter()
            .filter_map(|n| match &n.kind {
                NodeKind::Function { name, .. } => Some(name.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_function_name_inference() {
        let source = r#"
function declared() {}
var assigned = function () {};
const arrow = () => 1;
later = function () {};
var obj = { viaPair: function () {}, shorthand() {} };
class Svc { method() {} }
run(function () {});
"#;
        let tree = lower_source(SupportedLanguage::JavaScript, source);
        let names = function_names(&tree);
        for expected in ["declared", "assigned", "arrow", "later", "viaPair", "shorthand", "method"] {
            assert!(
                names.contains(&Some(expected.to_string())),
                "missing {expected}: {names:?}"
            );
        }
        assert!(names.contains(&None));
    }

    #[test]
    fn test_string_escapes_are_decoded() {
        let tree = lower_source(SupportedLanguage::JavaScript, r#"var a = 'it\'s\/here';"#);
        let init = all_nodes(&tree).into_iter().find_map(|n| match &n.kind {
            NodeKind::VariableDeclarator { init: Some(init), .. } => Some(init.kind.clone()),
            _ => None,
        });
        assert_eq!(init, Some(NodeKind::StringLiteral("it's/here".to_string())));
    }

    #[test]
    fn test_member_call_shape() {
        let tree = lower_source(SupportedLanguage::JavaScript, "this.http.get('/data');");
        let call = all_nodes(&tree).into_iter().find_map(|n| match &n.kind {
            NodeKind::Call(call) => Some(call.clone()),
            _ => None,
        });
        let call = call.unwrap();
        let NodeKind::Member { object, property } = &call.callee.kind else {
            panic!("callee is not a member: {:?}", call.callee);
        };
        assert_eq!(property, "get");
        assert!(matches!(&object.kind, NodeKind::Member { property, .. } if property == "http"));
        assert_eq!(call.arguments.len(), 1);
        assert_eq!(call.callee.span.line, 1);
    }

    #[test]
    fn test_typescript_wrappers_are_transparent() {
        let source = "const base = ('/api/' as string);\nconst url = base! + 'users';\n";
        let tree = lower_source(SupportedLanguage::TypeScript, source);
        let inits: Vec<NodeKind> = all_nodes(&tree)
            .into_iter()
            .filter_map(|n| match &n.kind {
                NodeKind::VariableDeclarator { init: Some(init), .. } => Some(init.kind.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(inits[0], NodeKind::StringLiteral("/api/".to_string()));
        assert!(matches!(
            &inits[1],
            NodeKind::Binary { left, .. } if left.kind == NodeKind::Identifier("base".to_string())
        ));
    }

    #[test]
    fn test_binary_chain_nests_to_the_left() {
        let tree = lower_source(SupportedLanguage::JavaScript, "var u = a + 'b' - c;");
        let init = all_nodes(&tree).into_iter().find_map(|n| match &n.kind {
            NodeKind::VariableDeclarator { init: Some(init), .. } => Some(init.kind.clone()),
            _ => None,
        });
        let Some(NodeKind::Binary {
            operator,
            left,
            right,
        }) = init
        else {
            panic!("initializer is not binary");
        };
        assert_eq!(operator, "-");
        assert_eq!(right.kind, NodeKind::Identifier("c".to_string()));
        let NodeKind::Binary {
            operator,
            left,
            right,
        } = &left.kind
        else {
            panic!("left operand is not binary: {left:?}");
        };
        assert_eq!(operator, "+");
        assert_eq!(left.kind, NodeKind::Identifier("a".to_string()));
        assert_eq!(right.kind, NodeKind::StringLiteral("b".to_string()));
        assert_eq!(right.span.column, 13);
    }

    #[test]
    fn test_destructuring_is_not_a_binding() {
        let tree = lower_source(SupportedLanguage::JavaScript, "const { api } = config;");
        assert!(!all_nodes(&tree)
            .iter()
            .any(|n| matches!(n.kind, NodeKind::VariableDeclarator { .. })));
    }
}
