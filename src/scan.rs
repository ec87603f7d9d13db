//
//  scan.rs
//  urltrace
//
//  Directory walking: find supported files and analyse each one.
//

use ignore::WalkBuilder;
use rayon::prelude::*;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::analysis::{Analyzer, Finding};
use crate::config::UrlTraceConfig;
use crate::error::Result;
use crate::parser::{parse_file, SupportedLanguage};

/// Directories that should never be scanned, even without .gitignore.
const BUILTIN_IGNORE: &[&str] = &[
    "node_modules",
    "bower_components",
    "jspm_packages",
    "vendor",
    "dist",
    "build",
    ".git",
    ".svn",
    ".hg",
    "target",
    ".next",
    ".nuxt",
    ".angular",
    "coverage",
    ".cache",
    ".turbo",
    ".output",
];

/// Findings for one source file.
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub path: PathBuf,
    pub language: SupportedLanguage,
    pub findings: Vec<Finding>,
}

/// Outcome of a directory scan.
#[derive(Debug, Default, Serialize)]
pub struct ScanReport {
    /// Files with at least one finding, sorted by path.
    pub files: Vec<FileReport>,
    pub files_scanned: usize,
    pub files_skipped: usize,
}

impl ScanReport {
    pub fn finding_count(&self) -> usize {
        self.files.iter().map(|f| f.findings.len()).sum()
    }
}

/// Parse and analyse one file's source.
pub fn analyze_source(path: &Path, source: &str, analyzer: &Analyzer) -> Result<FileReport> {
    let (language, tree) = parse_file(path, source)?;
    let findings = analyzer.analyze(&tree);
    Ok(FileReport {
        path: path.to_path_buf(),
        language,
        findings,
    })
}

/// Read, parse and analyse one file from disk.
pub fn analyze_file(path: &Path, analyzer: &Analyzer) -> Result<FileReport> {
    let source = fs::read_to_string(path)?;
    analyze_source(path, &source, analyzer)
}

/// Check if a path contains any ignored directory.
fn is_ignored(path: &Path, extra: &[String]) -> bool {
    path.components().any(|c| {
        if let std::path::Component::Normal(name) = c {
            let name = name.to_str().unwrap_or("");
            BUILTIN_IGNORE.contains(&name) || extra.iter().any(|e| e == name)
        } else {
            false
        }
    })
}

/// Collect every supported source file under `roots`.
///
/// Respects .gitignore and `.urltraceignore` files. Missing roots and walk
/// errors are logged and skipped.
pub fn discover_files(roots: &[PathBuf], config: &UrlTraceConfig) -> Vec<PathBuf> {
    let extra = &config.scan.ignore_dirs;
    let mut files: Vec<PathBuf> = roots
        .iter()
        .filter(|root| {
            let exists = root.exists();
            if !exists {
                warn!(root = %root.display(), "scan root does not exist");
            }
            exists
        })
        .flat_map(|root| {
            WalkBuilder::new(root)
                .hidden(true)
                .git_ignore(true)
                .git_global(true)
                .git_exclude(true)
                .add_custom_ignore_filename(".urltraceignore")
                .build()
                .filter_map(|entry| match entry {
                    Ok(entry) => Some(entry),
                    Err(e) => {
                        warn!("skipping unreadable entry: {e}");
                        None
                    }
                })
                .filter(|entry| entry.file_type().is_some_and(|ft| ft.is_file()))
                .filter(move |entry| {
                    let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
                    !is_ignored(relative, extra)
                })
                .filter(|entry| SupportedLanguage::from_path(entry.path()).is_some())
                .map(|entry| entry.into_path())
        })
        .collect();
    files.sort();
    files.dedup();
    files
}

/// Scan all supported files under `roots`.
///
/// Files are analysed in parallel; each gets its own binding table. Files that
/// fail to read or parse, or exceed the size limit, are skipped and counted.
/// A root that does not exist counts as one skipped entry.
pub fn scan(roots: &[PathBuf], config: &UrlTraceConfig) -> ScanReport {
    let files = discover_files(roots, config);
    let analyzer = config.analyzer();
    let max_bytes = config.scan.max_file_bytes;

    let results: Vec<Option<FileReport>> = files
        .par_iter()
        .map(|path| {
            let size = fs::metadata(path).map(|m| m.len()).unwrap_or(0);
            if size > max_bytes {
                debug!(path = %path.display(), size, "skipping large file");
                return None;
            }
            match analyze_file(path, &analyzer) {
                Ok(report) => Some(report),
                Err(e) => {
                    warn!(path = %path.display(), "skipping file: {e}");
                    None
                }
            }
        })
        .collect();

    let missing_roots = roots.iter().filter(|root| !root.exists()).count();
    let files_scanned = results.iter().filter(|r| r.is_some()).count();
    let files_skipped = results.len() - files_scanned + missing_roots;
    let files: Vec<FileReport> = results
        .into_iter()
        .flatten()
        .filter(|report| !report.findings.is_empty())
        .collect();

    let report = ScanReport {
        files,
        files_scanned,
        files_skipped,
    };
    info!(
        files = report.files_scanned,
        skipped = report.files_skipped,
        findings = report.finding_count(),
        "scan complete"
    );
    report
}
