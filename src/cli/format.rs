//! Output formatting for findings.

use std::path::Path;

use crate::analysis::Finding;
use crate::scan::{FileReport, ScanReport};

/// `path:line  METHOD callee  (in enclosing)  -> endpoint`
pub fn format_finding(output: &mut String, path: &Path, finding: &Finding) {
    let method = finding
        .http_method
        .as_deref()
        .map(|m| format!("{m} "))
        .unwrap_or_default();
    output.push_str(&format!(
        "{}:{}  {}{}  (in {})  -> {}\n",
        path.display(),
        finding.span.line,
        method,
        finding.callee,
        finding.enclosing,
        finding.endpoint
    ));
}

pub fn format_file(output: &mut String, report: &FileReport) {
    for finding in &report.findings {
        format_finding(output, &report.path, finding);
    }
}

pub fn format_scan(report: &ScanReport) -> String {
    let mut output = String::new();
    for file in &report.files {
        format_file(&mut output, file);
    }
    let unresolved = report
        .files
        .iter()
        .flat_map(|f| &f.findings)
        .filter(|f| !f.resolved)
        .count();
    output.push_str(&format!(
        "\n{} call sites ({} unresolved) in {} of {} files",
        report.finding_count(),
        unresolved,
        report.files.len(),
        report.files_scanned
    ));
    if report.files_skipped > 0 {
        output.push_str(&format!(", {} skipped", report.files_skipped));
    }
    output.push('\n');
    output
}
