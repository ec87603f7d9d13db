//! # urltrace
//!
//! Static discovery of HTTP client call sites in JavaScript and TypeScript,
//! with best-effort reconstruction of the endpoint each call targets.
//!
//! The endpoint argument is resolved by forward constant propagation over
//! literals, variables and `+` concatenation. Anything that cannot be
//! determined statically is reported with a placeholder instead of being
//! dropped.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::path::Path;
//! use urltrace::{analyze_source, CallPattern, UrlTraceConfig};
//!
//! let mut config = UrlTraceConfig::default();
//! config.patterns.push(CallPattern::function("makeRestCall"));
//!
//! let source = "var userApi = '/user-service/';\nmakeRestCall(userApi + 'bob');";
//! let report = analyze_source(Path::new("data.js"), source, &config.analyzer()).unwrap();
//!
//! assert_eq!(report.findings[0].endpoint, "/user-service/bob");
//! ```

pub mod analysis;
pub mod cli;
pub mod config;
pub mod error;
pub mod parser;
pub mod scan;
pub mod syntax;

// Re-exports for convenience
pub use analysis::{
    AnalysisOptions, Analyzer, BindingTable, CallPattern, Finding, JoinRule, ResolvedValue,
    Resolver,
};
pub use config::UrlTraceConfig;
pub use error::{Result, UrlTraceError};
pub use parser::{parse_file, parse_source, SupportedLanguage};
pub use scan::{analyze_file, analyze_source, scan, FileReport, ScanReport};
