//
//  pattern.rs
//  urltrace
//

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::{Result, UrlTraceError};

/// Placeholder rendered for every unresolved endpoint.
pub const DEFAULT_PLACEHOLDER: &str = "{?}";

/// Declarative description of an interesting call shape.
///
/// `object_path` is the receiver chain from the innermost name outwards:
/// `["this", "http"]` describes `this.http`. With a non-empty `methods` set the
/// pattern matches `this.http.<method>(...)`; with an empty set the callee
/// itself must be the path, e.g. `["makeRestCall"]` matches `makeRestCall(...)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallPattern {
    pub object_path: Vec<String>,
    #[serde(default)]
    pub methods: BTreeSet<String>,
    /// Index of the argument holding the endpoint.
    #[serde(default)]
    pub endpoint_arg: usize,
    /// Fixed HTTP verb for every call matched by this pattern.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_method: Option<String>,
}

impl CallPattern {
    /// `object.path.method(...)` for any of `methods`.
    pub fn method_call(object_path: &[&str], methods: &[&str]) -> Self {
        Self {
            object_path: object_path.iter().map(|s| s.to_string()).collect(),
            methods: methods.iter().map(|s| s.to_string()).collect(),
            endpoint_arg: 0,
            http_method: None,
        }
    }

    /// `name(...)`
    pub fn function(name: &str) -> Self {
        Self {
            object_path: vec![name.to_string()],
            methods: BTreeSet::new(),
            endpoint_arg: 0,
            http_method: None,
        }
    }

    pub fn with_endpoint_arg(mut self, index: usize) -> Self {
        self.endpoint_arg = index;
        self
    }

    pub fn with_http_method(mut self, method: &str) -> Self {
        self.http_method = Some(method.to_string());
        self
    }

    pub fn is_bare_function(&self) -> bool {
        self.methods.is_empty()
    }

    pub fn validate(&self) -> Result<()> {
        if self.object_path.is_empty() {
            return Err(UrlTraceError::InvalidPattern(
                "object_path must name at least one identifier".to_string(),
            ));
        }
        if let Some(empty) = self
            .object_path
            .iter()
            .chain(self.methods.iter())
            .find(|s| s.trim().is_empty())
        {
            return Err(UrlTraceError::InvalidPattern(format!(
                "empty name {:?} in pattern {}",
                empty,
                self.object_path.join(".")
            )));
        }
        Ok(())
    }
}

/// How two known sides of a `+` are combined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JoinRule {
    /// Endpoint path join: exactly one `/` at the boundary.
    #[default]
    Path,
    /// Plain string concatenation.
    Concat,
}

/// Per-run analysis settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisOptions {
    pub join_rule: JoinRule,
    pub placeholder: String,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            join_rule: JoinRule::Path,
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
        }
    }
}

/// Patterns used when no configuration overrides them.
pub fn default_patterns() -> Vec<CallPattern> {
    vec![
        // Angular HttpClient injected as `this.http`
        CallPattern::method_call(
            &["this", "http"],
            &["get", "post", "put", "delete", "patch", "head", "options"],
        ),
        // AngularJS $http service
        CallPattern::method_call(
            &["$http"],
            &["get", "post", "put", "delete", "patch", "head", "jsonp"],
        ),
        CallPattern::method_call(&["axios"], &["get", "post", "put", "delete", "patch"]),
        CallPattern::function("fetch"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_rejects_empty_path() {
        let pattern = CallPattern {
            object_path: Vec::new(),
            methods: BTreeSet::new(),
            endpoint_arg: 0,
            http_method: None,
        };
        assert!(pattern.validate().is_err());
        assert!(CallPattern::method_call(&["this", ""], &["get"]).validate().is_err());
        assert!(CallPattern::function("makeRestCall").validate().is_ok());
    }

    #[test]
    fn test_default_patterns_are_valid() {
        for pattern in default_patterns() {
            pattern.validate().unwrap();
        }
        assert!(default_patterns().iter().any(|p| p.is_bare_function()));
    }
}
