//! Per-run CSV snapshot: `name,rating,review_count`, sorted by name.

use std::fmt::Write as _;
use std::path::Path;

use hotelpulse_scraper::Outcome;

use crate::error::ReportError;

const HEADER: &str = "name,rating,review_count";

/// Render `outcomes` as CSV. Failed hotels keep their row with empty values.
#[must_use]
pub fn render_snapshot(outcomes: &[Outcome]) -> String {
    let mut rows: Vec<&Outcome> = outcomes.iter().collect();
    rows.sort_by(|a, b| a.name().cmp(b.name()));

    let mut out = String::with_capacity(32 * (rows.len() + 1));
    out.push_str(HEADER);
    out.push('\n');
    for outcome in rows {
        let name = quote(outcome.name());
        let _ = match outcome {
            Outcome::Ok(record) => {
                writeln!(out, "{name},{},{}", record.rating, record.review_count)
            }
            Outcome::Failed(_) => writeln!(out, "{name},,"),
        };
    }
    out
}

/// Overwrite `path` with the snapshot for this run.
///
/// # Errors
///
/// Returns [`ReportError::Io`] if the file cannot be written.
pub async fn write_snapshot(path: &Path, outcomes: &[Outcome]) -> Result<(), ReportError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| ReportError::io(parent, e))?;
    }
    tokio::fs::write(path, render_snapshot(outcomes))
        .await
        .map_err(|e| ReportError::io(path, e))?;
    tracing::info!(path = %path.display(), rows = outcomes.len(), "CSV snapshot written");
    Ok(())
}

/// RFC 4180 quoting: fields containing commas, quotes or line breaks are
/// wrapped in quotes with inner quotes doubled.
fn quote(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
