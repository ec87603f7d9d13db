//
//  error.rs
//  urltrace
//

use std::path::PathBuf;

/// Errors surfaced by the front end, configuration and scanner.
///
/// The analysis core never fails: anything it cannot determine becomes an
/// unresolved value instead of an error.
#[derive(Debug, thiserror::Error)]
pub enum UrlTraceError {
    #[error("Unsupported language: {}", .0.display())]
    UnsupportedLanguage(PathBuf),

    #[error("Failed to initialise parser for {}: {}", .0.display(), .1)]
    ParserInitError(PathBuf, String),

    #[error("tree-sitter failed to parse {}", .0.display())]
    TreeSitterParseFailed(PathBuf),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid config {}: {}", .0.display(), .1)]
    ConfigError(PathBuf, #[source] toml::de::Error),

    #[error("Invalid call pattern: {0}")]
    InvalidPattern(String),
}

pub type Result<T> = std::result::Result<T, UrlTraceError>;
