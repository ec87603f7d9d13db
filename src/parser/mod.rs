//
//  mod.rs
//  urltrace
//
//  Front end: tree-sitter parsing and lowering into `crate::syntax`.
//

mod helpers;
pub mod language;
mod lower;

use std::path::Path;

use tracing::debug;
use tree_sitter::Parser;

use crate::error::{Result, UrlTraceError};
use crate::syntax::Node;

pub use language::SupportedLanguage;

/// Parse `source` as `lang` and lower it into a syntax tree.
///
/// `path` is only used for error messages.
pub fn parse_source(path: &Path, lang: SupportedLanguage, source: &str) -> Result<Node> {
    let mut parser = Parser::new();
    parser
        .set_language(&lang.tree_sitter_language())
        .map_err(|e| UrlTraceError::ParserInitError(path.to_path_buf(), e.to_string()))?;

    let tree = parser
        .parse(source, None)
        .ok_or_else(|| UrlTraceError::TreeSitterParseFailed(path.to_path_buf()))?;

    let root = tree.root_node();
    if root.has_error() {
        // tree-sitter recovers; the lowered tree keeps every well-formed part.
        debug!(path = %path.display(), "syntax errors in source, analysing recovered tree");
    }
    Ok(lower::lower_tree(&root, source.as_bytes()))
}

/// Detect the language from `path` and parse `source`.
pub fn parse_file(path: &Path, source: &str) -> Result<(SupportedLanguage, Node)> {
    let lang = SupportedLanguage::from_path(path)
        .ok_or_else(|| UrlTraceError::UnsupportedLanguage(path.to_path_buf()))?;
    let tree = parse_source(path, lang, source)?;
    Ok((lang, tree))
}
