//
//  resolve.rs
//  urltrace
//
//  Best-effort constant propagation over literals, identifiers and `+`.
//

use serde::Serialize;

use super::bindings::BindingTable;
use super::pattern::JoinRule;
use crate::syntax::{Node, NodeKind};

/// Result of resolving an expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ResolvedValue {
    Known(String),
    Unknown,
}

impl ResolvedValue {
    pub fn known(value: &str) -> Self {
        ResolvedValue::Known(value.to_string())
    }

    pub fn is_known(&self) -> bool {
        matches!(self, ResolvedValue::Known(_))
    }

    /// Text form, with `placeholder` standing in for an unresolved value.
    pub fn render(&self, placeholder: &str) -> String {
        match self {
            ResolvedValue::Known(s) => s.clone(),
            ResolvedValue::Unknown => placeholder.to_string(),
        }
    }
}

/// Resolves expressions against a [`BindingTable`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Resolver {
    rule: JoinRule,
}

impl Resolver {
    pub fn new(rule: JoinRule) -> Self {
        Self { rule }
    }

    /// Resolve `node`. Never fails and never touches the table.
    pub fn resolve(&self, node: &Node, bindings: &BindingTable) -> ResolvedValue {
        match &node.kind {
            NodeKind::StringLiteral(value) => ResolvedValue::Known(value.clone()),
            NodeKind::NumberLiteral(text) => ResolvedValue::Known(number_text(text)),
            NodeKind::Identifier(name) => bindings.lookup(name),
            NodeKind::Binary { operator, .. } if operator == "+" => {
                self.resolve_concat(node, bindings)
            }
            NodeKind::Binary { .. }
            | NodeKind::Call(_)
            | NodeKind::Member { .. }
            | NodeKind::Template { .. }
            | NodeKind::This
            | NodeKind::Function { .. }
            | NodeKind::Property { .. }
            | NodeKind::VariableDeclarator { .. }
            | NodeKind::Program(_)
            | NodeKind::Block(_)
            | NodeKind::Other { .. } => ResolvedValue::Unknown,
        }
    }

    /// `a + b + c + ...` folded left to right. The left spine is walked with a
    /// loop so long chains do not recurse once per operand.
    fn resolve_concat(&self, node: &Node, bindings: &BindingTable) -> ResolvedValue {
        let mut operands = Vec::new();
        let mut head = node;
        while let NodeKind::Binary {
            operator,
            left,
            right,
        } = &head.kind
        {
            if operator != "+" {
                break;
            }
            operands.push(right.as_ref());
            head = left.as_ref();
        }

        let ResolvedValue::Known(mut value) = self.resolve(head, bindings) else {
            return ResolvedValue::Unknown;
        };
        for operand in operands.iter().rev() {
            let ResolvedValue::Known(right) = self.resolve(operand, bindings) else {
                return ResolvedValue::Unknown;
            };
            self.append(&mut value, &right);
        }
        ResolvedValue::Known(value)
    }

    fn append(&self, value: &mut String, right: &str) {
        match self.rule {
            JoinRule::Path => push_path_segment(value, right),
            JoinRule::Concat => value.push_str(right),
        }
    }
}

/// Join two endpoint fragments with exactly one `/` between them.
///
/// At most one trailing slash is removed from `left` and one leading slash
/// from `right`.
pub fn path_join(left: &str, right: &str) -> String {
    let mut joined = left.to_string();
    push_path_segment(&mut joined, right);
    joined
}

fn push_path_segment(value: &mut String, right: &str) {
    if value.ends_with('/') {
        value.pop();
    }
    value.push('/');
    value.push_str(right.strip_prefix('/').unwrap_or(right));
}

/// Textual value of a number literal. Radix-prefixed integers render in decimal.
fn number_text(text: &str) -> String {
    let cleaned: String = text.chars().filter(|c| *c != '_').collect();
    let prefix = cleaned.get(..2).map(str::to_ascii_lowercase);
    let radix = match prefix.as_deref() {
        Some("0x") => 16,
        Some("0o") => 8,
        Some("0b") => 2,
        _ => return cleaned,
    };
    u64::from_str_radix(&cleaned[2..], radix)
        .map(|n| n.to_string())
        .unwrap_or(cleaned)
}
