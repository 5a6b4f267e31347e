//! Reading back the cumulative report.

use std::path::Path;

use crate::entry::ReportEntry;
use crate::error::ReportError;
use crate::summary::RunSummary;

/// Parse every entry in the report at `path`, in file order.
///
/// A missing file is an empty history. Blank lines are ignored and malformed
/// lines are skipped with a warning, so one damaged line never hides the
/// rest of the report.
///
/// # Errors
///
/// Returns [`ReportError::Io`] if the file exists but cannot be read.
pub async fn read_history(path: &Path) -> Result<Vec<ReportEntry>, ReportError> {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(ReportError::io(path, e)),
    };
    Ok(parse_entries(&content))
}

pub(crate) fn parse_entries(content: &str) -> Vec<ReportEntry> {
    let mut entries = Vec::new();
    for (index, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str::<ReportEntry>(line) {
            Ok(entry) => entries.push(entry),
            Err(e) => {
                tracing::warn!(line = index + 1, error = %e, "skipping malformed report line");
            }
        }
    }
    entries
}

/// Summary entries only, oldest first.
#[must_use]
pub fn run_summaries(entries: &[ReportEntry]) -> Vec<RunSummary> {
    entries
        .iter()
        .filter_map(|entry| match entry {
            ReportEntry::Summary(summary) => Some(summary.clone()),
            ReportEntry::Outcome(_) => None,
        })
        .collect()
}

/// The number the next run should take: one past the highest run number seen.
#[must_use]
pub fn next_run_number(entries: &[ReportEntry]) -> u64 {
    entries
        .iter()
        .map(ReportEntry::run_number)
        .max()
        .map_or(1, |n| n + 1)
}
