//! Call-site analysis core.
//!
//! Matches HTTP-client call sites against [`CallPattern`]s and resolves the
//! endpoint argument of every match through a forward-only binding table.

pub mod bindings;
pub mod driver;
pub mod findings;
pub mod matcher;
pub mod pattern;
pub mod resolve;

pub use bindings::BindingTable;
pub use driver::Analyzer;
pub use findings::{Finding, FindingCollector, ANONYMOUS_FUNCTION};
pub use matcher::{CallMatch, Matcher};
pub use pattern::{default_patterns, AnalysisOptions, CallPattern, JoinRule, DEFAULT_PLACEHOLDER};
pub use resolve::{path_join, ResolvedValue, Resolver};
