//
//  bindings.rs
//  urltrace
//

use std::collections::HashMap;

use super::resolve::{ResolvedValue, Resolver};
use crate::syntax::Node;

/// Forward-only name → value table for one traversal.
///
/// Declarations are applied in traversal order and the last one wins. There
/// is no hoisting and no block scoping: a name used before its declaration
/// resolves to [`ResolvedValue::Unknown`].
#[derive(Debug, Default)]
pub struct BindingTable {
    values: HashMap<String, ResolvedValue>,
}

impl BindingTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve `init` against the current table and bind the result to `name`.
    pub fn declare(&mut self, name: &str, init: &Node, resolver: &Resolver) {
        let value = resolver.resolve(init, self);
        self.values.insert(name.to_string(), value);
    }

    pub fn lookup(&self, name: &str) -> ResolvedValue {
        self.values
            .get(name)
            .cloned()
            .unwrap_or(ResolvedValue::Unknown)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
