//
//  matcher.rs
//  urltrace
//
//  Structural matching of call expressions against CallPatterns.
//

use super::pattern::CallPattern;
use crate::syntax::{Call, Node, NodeKind};

/// HTTP verbs recognised from a matched method name.
const HTTP_VERBS: &[&str] = &[
    "get", "post", "put", "delete", "patch", "head", "options", "jsonp",
];

/// A call that matched one of the configured patterns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallMatch<'p> {
    pub pattern: &'p CallPattern,
    /// `this.http.get` for method calls, `makeRestCall` for bare functions.
    pub label: String,
    /// Method name for method-call matches.
    pub method: Option<String>,
}

impl CallMatch<'_> {
    /// HTTP verb for this call: the pattern's override, else inferred from the method name.
    pub fn http_method(&self) -> Option<String> {
        if let Some(verb) = &self.pattern.http_method {
            return Some(verb.to_uppercase());
        }
        let method = self.method.as_deref()?;
        HTTP_VERBS
            .iter()
            .find(|verb| verb.eq_ignore_ascii_case(method))
            .map(|verb| verb.to_uppercase())
    }
}

/// Matches calls against an ordered list of patterns. First match wins.
#[derive(Debug, Clone, Copy)]
pub struct Matcher<'p> {
    patterns: &'p [CallPattern],
}

impl<'p> Matcher<'p> {
    pub fn new(patterns: &'p [CallPattern]) -> Self {
        Self { patterns }
    }

    pub fn match_call(&self, call: &Call) -> Option<CallMatch<'p>> {
        self.patterns
            .iter()
            .find_map(|pattern| match_pattern(call, pattern))
    }
}

fn match_pattern<'p>(call: &Call, pattern: &'p CallPattern) -> Option<CallMatch<'p>> {
    // Too few arguments: probably an unrelated call sharing the name.
    if call.arguments.len() <= pattern.endpoint_arg {
        return None;
    }

    if pattern.is_bare_function() {
        if !matches_path(&call.callee, &pattern.object_path) {
            return None;
        }
        return Some(CallMatch {
            pattern,
            label: pattern.object_path.join("."),
            method: None,
        });
    }

    let NodeKind::Member { object, property } = &call.callee.kind else {
        return None;
    };
    if !pattern.methods.contains(property) || !matches_path(object, &pattern.object_path) {
        return None;
    }
    Some(CallMatch {
        pattern,
        label: format!("{}.{}", pattern.object_path.join("."), property),
        method: Some(property.clone()),
    })
}

/// Does `node` spell out `path` exactly? The last element is the outermost
/// property; the first is the innermost receiver.
fn matches_path(node: &Node, path: &[String]) -> bool {
    let Some((last, rest)) = path.split_last() else {
        return false;
    };
    if rest.is_empty() {
        return match &node.kind {
            NodeKind::Identifier(name) => name == last,
            NodeKind::This => last == "this",
            _ => false,
        };
    }
    match &node.kind {
        NodeKind::Member { object, property } => property == last && matches_path(object, rest),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::build::*;

    fn as_call(node: Node) -> Call {
        match into_kind(node) {
            NodeKind::Call(call) => call,
            other => panic!("expected call, got {other:?}"),
        }
    }

    fn http_call(receiver: Node, method: &str) -> Call {
        as_call(call(member(receiver, method), vec![string("/api")]))
    }

    #[test]
    fn test_nested_object_path() {
        let patterns = vec![CallPattern::method_call(&["this", "http"], &["get", "post"])];
        let matcher = Matcher::new(&patterns);

        let found = matcher
            .match_call(&http_call(member(this(), "http"), "get"))
            .unwrap();
        assert_eq!(found.label, "this.http.get");
        assert_eq!(found.http_method().as_deref(), Some("GET"));

        assert!(matcher.match_call(&http_call(member(this(), "http"), "put")).is_none());
        assert!(matcher.match_call(&http_call(member(ident("other"), "http"), "get")).is_none());
        assert!(matcher.match_call(&http_call(ident("http"), "get")).is_none());
        assert!(matcher
            .match_call(&http_call(member(member(this(), "svc"), "http"), "get"))
            .is_none());
    }

    #[test]
    fn test_accepted_method_set_extends_matches() {
        let patterns = vec![CallPattern::method_call(
            &["this", "http"],
            &["get", "post", "put"],
        )];
        let matcher = Matcher::new(&patterns);
        assert!(matcher.match_call(&http_call(member(this(), "http"), "put")).is_some());
    }

    #[test]
    fn test_free_identifier_receiver() {
        let patterns = vec![CallPattern::method_call(&["$http"], &["get", "post"])];
        let matcher = Matcher::new(&patterns);
        let found = matcher.match_call(&http_call(ident("$http"), "post")).unwrap();
        assert_eq!(found.label, "$http.post");
        assert!(matcher.match_call(&http_call(member(this(), "$http"), "post")).is_none());
    }

    #[test]
    fn test_bare_function() {
        let patterns = vec![CallPattern::function("makeRestCall")];
        let matcher = Matcher::new(&patterns);

        let found = matcher
            .match_call(&as_call(call(ident("makeRestCall"), vec![ident("userApi")])))
            .unwrap();
        assert_eq!(found.label, "makeRestCall");
        assert_eq!(found.method, None);
        assert_eq!(found.http_method(), None);

        assert!(matcher
            .match_call(&as_call(call(ident("makeOtherCall"), vec![string("/x")])))
            .is_none());
        assert!(matcher
            .match_call(&as_call(call(member(ident("svc"), "makeRestCall"), vec![string("/x")])))
            .is_none());
    }

    #[test]
    fn test_too_few_arguments_do_not_match() {
        let patterns = vec![
            CallPattern::function("makeRestCall"),
            CallPattern::method_call(&["$http"], &["post"]).with_endpoint_arg(1),
        ];
        let matcher = Matcher::new(&patterns);
        assert!(matcher
            .match_call(&as_call(call(ident("makeRestCall"), Vec::new())))
            .is_none());
        assert!(matcher
            .match_call(&as_call(call(member(ident("$http"), "post"), vec![string("/x")])))
            .is_none());
        assert!(matcher
            .match_call(&as_call(call(
                member(ident("$http"), "post"),
                vec![ident("body"), string("/x")]
            )))
            .is_some());
    }

    #[test]
    fn test_first_pattern_wins_and_verb_override() {
        let patterns = vec![
            CallPattern::method_call(&["api"], &["send"]).with_http_method("post"),
            CallPattern::method_call(&["api"], &["send", "get"]),
        ];
        let matcher = Matcher::new(&patterns);
        let found = matcher.match_call(&http_call(ident("api"), "send")).unwrap();
        assert!(std::ptr::eq(found.pattern, &patterns[0]));
        assert_eq!(found.http_method().as_deref(), Some("POST"));

        let found = matcher.match_call(&http_call(ident("api"), "get")).unwrap();
        assert!(std::ptr::eq(found.pattern, &patterns[1]));
    }
}
