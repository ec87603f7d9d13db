//
//  driver.rs
//  urltrace
//
//  Single pre-order pass: declarations feed the binding table, calls feed
//  the matcher, matches become findings.
//

use tracing::debug;

use super::bindings::BindingTable;
use super::findings::{Finding, FindingCollector, ANONYMOUS_FUNCTION};
use super::matcher::Matcher;
use super::pattern::{AnalysisOptions, CallPattern};
use super::resolve::Resolver;
use crate::syntax::{Call, Node, NodeKind};

/// Runs the call-site analysis over syntax trees.
///
/// An `Analyzer` holds configuration only; every [`Analyzer::analyze`] call
/// gets a fresh binding table, so independent trees may be analysed from
/// several threads at once.
#[derive(Debug, Clone)]
pub struct Analyzer {
    patterns: Vec<CallPattern>,
    options: AnalysisOptions,
}

impl Analyzer {
    pub fn new(patterns: Vec<CallPattern>, options: AnalysisOptions) -> Self {
        Self { patterns, options }
    }

    /// Walk `root` once and return its findings in document order.
    pub fn analyze(&self, root: &Node) -> Vec<Finding> {
        let mut pass = Pass {
            matcher: Matcher::new(&self.patterns),
            resolver: Resolver::new(self.options.join_rule),
            placeholder: &self.options.placeholder,
            bindings: BindingTable::new(),
            collector: FindingCollector::new(),
            ancestors: Vec::new(),
        };
        pass.walk(root);
        debug!(
            bindings = pass.bindings.len(),
            findings = pass.collector.findings().len(),
            "analysis pass finished"
        );
        pass.collector.into_findings()
    }
}

enum WorkItem<'t> {
    Visit(&'t Node),
    Leave,
}

struct Pass<'a, 't> {
    matcher: Matcher<'a>,
    resolver: Resolver,
    placeholder: &'a str,
    bindings: BindingTable,
    collector: FindingCollector,
    ancestors: Vec<&'t Node>,
}

impl<'t> Pass<'_, 't> {
    /// Pre-order walk driven by an explicit work list, so tree depth is not
    /// bounded by the thread stack.
    fn walk(&mut self, root: &'t Node) {
        let mut stack = vec![WorkItem::Visit(root)];
        while let Some(item) = stack.pop() {
            match item {
                WorkItem::Visit(node) => {
                    self.visit(node);
                    self.ancestors.push(node);
                    stack.push(WorkItem::Leave);
                    stack.extend(node.children().into_iter().rev().map(WorkItem::Visit));
                }
                WorkItem::Leave => {
                    self.ancestors.pop();
                }
            }
        }
    }

    fn visit(&mut self, node: &'t Node) {
        match &node.kind {
            NodeKind::VariableDeclarator {
                name,
                init: Some(init),
            } => self.bindings.declare(name, init, &self.resolver),
            NodeKind::Call(call) => self.visit_call(node, call),
            NodeKind::VariableDeclarator { init: None, .. }
            | NodeKind::Program(_)
            | NodeKind::Block(_)
            | NodeKind::Function { .. }
            | NodeKind::Member { .. }
            | NodeKind::Identifier(_)
            | NodeKind::This
            | NodeKind::StringLiteral(_)
            | NodeKind::NumberLiteral(_)
            | NodeKind::Binary { .. }
            | NodeKind::Template { .. }
            | NodeKind::Property { .. }
            | NodeKind::Other { .. } => {}
        }
    }

    fn visit_call(&mut self, node: &Node, call: &Call) {
        let Some(found) = self.matcher.match_call(call) else {
            return;
        };
        // Arity was checked by the matcher.
        let argument = &call.arguments[found.pattern.endpoint_arg];
        let value = self.resolver.resolve(argument, &self.bindings);
        let enclosing = self.enclosing_name();

        debug!(
            callee = %found.label,
            enclosing = %enclosing,
            line = node.span.line,
            resolved = value.is_known(),
            "matched call site"
        );

        self.collector.push(Finding {
            enclosing,
            callee: found.label.clone(),
            endpoint: value.render(self.placeholder),
            http_method: found.http_method(),
            resolved: value.is_known(),
            span: node.span,
        });
    }

    /// Nearest named function or method on the ancestor chain.
    fn enclosing_name(&self) -> String {
        self.ancestors
            .iter()
            .rev()
            .find_map(|ancestor| ancestor.function_name())
            .unwrap_or(ANONYMOUS_FUNCTION)
            .to_string()
    }
}
