//! Closed syntax tree consumed by the analysis core.
//!
//! The front end (`crate::parser`) lowers tree-sitter trees into this shape.
//! Every construct the analysis cares about has its own variant; everything
//! else is kept as [`NodeKind::Other`] so the walk still reaches nested calls
//! and declarations.

use serde::Serialize;

/// Position of a node in its source file. Lines and columns are 1-based.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Span {
    pub line: usize,
    pub column: usize,
    pub start_byte: usize,
    pub end_byte: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub span: Span,
}

/// A call expression: `callee(arguments...)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub callee: Box<Node>,
    pub arguments: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Program(Vec<Node>),
    Block(Vec<Node>),
    /// `name = init` inside a `var`/`let`/`const` declaration.
    VariableDeclarator {
        name: String,
        init: Option<Box<Node>>,
    },
    /// Function, arrow function or method. `name` is the declared or
    /// inferred name.
    Function {
        name: Option<String>,
        body: Vec<Node>,
    },
    Call(Call),
    /// Non-computed property access: `object.property`.
    Member {
        object: Box<Node>,
        property: String,
    },
    Identifier(String),
    This,
    /// Decoded string contents (quotes and escapes removed).
    StringLiteral(String),
    /// Number literal text.
    NumberLiteral(String),
    Binary {
        operator: String,
        left: Box<Node>,
        right: Box<Node>,
    },
    /// Template literal; `parts` holds the substitution expressions.
    Template {
        parts: Vec<Node>,
    },
    /// `key: value` entry of an object literal.
    Property {
        key: String,
        value: Box<Node>,
    },
    /// Anything not modelled above.
    Other {
        children: Vec<Node>,
    },
}

impl Node {
    pub fn new(kind: NodeKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Children in document order.
    pub fn children(&self) -> Vec<&Node> {
        match &self.kind {
            NodeKind::Program(items) | NodeKind::Block(items) => items.iter().collect(),
            NodeKind::VariableDeclarator { init, .. } => init.as_deref().into_iter().collect(),
            NodeKind::Function { body, .. } => body.iter().collect(),
            NodeKind::Call(call) => std::iter::once(call.callee.as_ref())
                .chain(call.arguments.iter())
                .collect(),
            NodeKind::Member { object, .. } => vec![object.as_ref()],
            NodeKind::Binary { left, right, .. } => vec![left.as_ref(), right.as_ref()],
            NodeKind::Template { parts } => parts.iter().collect(),
            NodeKind::Property { value, .. } => vec![value.as_ref()],
            NodeKind::Other { children } => children.iter().collect(),
            NodeKind::Identifier(_)
            | NodeKind::This
            | NodeKind::StringLiteral(_)
            | NodeKind::NumberLiteral(_) => Vec::new(),
        }
    }

    /// Name of this node if it is a named function or method.
    pub fn function_name(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Function { name, .. } => name.as_deref(),
            _ => None,
        }
    }
}

impl NodeKind {
    /// Move the children out, in document order.
    fn into_children(self) -> Vec<Node> {
        match self {
            NodeKind::Program(items) | NodeKind::Block(items) => items,
            NodeKind::VariableDeclarator { init, .. } => init.map(|n| *n).into_iter().collect(),
            NodeKind::Function { body, .. } => body,
            NodeKind::Call(call) => {
                let mut children = vec![*call.callee];
                children.extend(call.arguments);
                children
            }
            NodeKind::Member { object, .. } => vec![*object],
            NodeKind::Binary { left, right, .. } => vec![*left, *right],
            NodeKind::Template { parts } => parts,
            NodeKind::Property { value, .. } => vec![*value],
            NodeKind::Other { children } => children,
            NodeKind::Identifier(_)
            | NodeKind::This
            | NodeKind::StringLiteral(_)
            | NodeKind::NumberLiteral(_) => Vec::new(),
        }
    }
}

// Long `a + b + c + ...` chains nest one Box per operand; tear them down
// with a work list so dropping never recurses.
impl Drop for Node {
    fn drop(&mut self) {
        let mut pending = std::mem::replace(&mut self.kind, NodeKind::This).into_children();
        while let Some(mut node) = pending.pop() {
            pending.extend(std::mem::replace(&mut node.kind, NodeKind::This).into_children());
        }
    }
}
