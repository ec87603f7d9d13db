//
//  helpers.rs
//  urltrace
//

use tree_sitter::Node;

use crate::syntax::Span;

/// Get the full text of a node.
pub fn node_text(node: &Node, source: &[u8]) -> String {
    node.utf8_text(source).unwrap_or("").to_string()
}

/// Position of a node, 1-based.
pub fn span_of(node: &Node) -> Span {
    let start = node.start_position();
    Span {
        line: start.row + 1,
        column: start.column + 1,
        start_byte: node.start_byte(),
        end_byte: node.end_byte(),
    }
}

/// Named, non-comment children in document order.
pub fn named_children<'t>(node: &Node<'t>) -> Vec<Node<'t>> {
    let mut cursor = node.walk();
    let children: Vec<Node<'t>> = node
        .named_children(&mut cursor)
        .filter(|child| child.kind() != "comment")
        .collect();
    children
}

/// Decoded contents of a JS string literal node.
pub fn string_value(node: &Node, source: &[u8]) -> String {
    let mut value = String::new();
    for part in named_children(node) {
        let text = node_text(&part, source);
        match part.kind() {
            "escape_sequence" => value.push_str(&unescape(&text)),
            _ => value.push_str(&text),
        }
    }
    value
}

/// Decode one JS escape sequence such as `\n`, `\x41` or `\u{1F600}`.
pub fn unescape(seq: &str) -> String {
    let Some(body) = seq.strip_prefix('\\') else {
        return seq.to_string();
    };
    let mut chars = body.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };
    let rest = chars.as_str();
    let decoded = match first {
        'n' => Some('\n'),
        't' => Some('\t'),
        'r' => Some('\r'),
        'b' => Some('\u{8}'),
        'f' => Some('\u{c}'),
        'v' => Some('\u{b}'),
        '0' if rest.is_empty() => Some('\0'),
        // line continuation
        '\n' | '\r' | '\u{2028}' | '\u{2029}' => return String::new(),
        'x' => u32::from_str_radix(rest, 16).ok().and_then(char::from_u32),
        'u' => {
            let hex = rest.trim_start_matches('{').trim_end_matches('}');
            u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
        }
        other => Some(other),
    };
    match decoded {
        Some(c) => c.to_string(),
        None => seq.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unescape() {
        assert_eq!(unescape("\\n"), "\n");
        assert_eq!(unescape("\\'"), "'");
        assert_eq!(unescape("\\/"), "/");
        assert_eq!(unescape("\\x41"), "A");
        assert_eq!(unescape("\\u0041"), "A");
        assert_eq!(unescape("\\u{1F600}"), "\u{1F600}");
        assert_eq!(unescape("\\\n"), "");
        assert_eq!(unescape("\\uZZZZ"), "\\uZZZZ");
    }
}
