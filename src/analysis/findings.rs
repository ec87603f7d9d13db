//
//  findings.rs
//  urltrace
//

use serde::Serialize;

use crate::syntax::Span;

/// Enclosing name reported when a call is not inside any named function.
pub const ANONYMOUS_FUNCTION: &str = "anonymous function";

/// One matched call site and the endpoint it targets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    /// Nearest named enclosing function or method.
    pub enclosing: String,
    /// Matched callee, e.g. `this.http.get` or `makeRestCall`.
    pub callee: String,
    /// Resolved endpoint with unresolved parts rendered as the placeholder.
    pub endpoint: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_method: Option<String>,
    /// Whether the endpoint was fully resolved.
    pub resolved: bool,
    pub span: Span,
}

/// Findings in traversal order.
#[derive(Debug, Default)]
pub struct FindingCollector {
    findings: Vec<Finding>,
}

impl FindingCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, finding: Finding) {
        self.findings.push(finding);
    }

    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    pub fn into_findings(self) -> Vec<Finding> {
        self.findings
    }
}
