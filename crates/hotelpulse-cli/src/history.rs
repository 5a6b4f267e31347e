//! `history` command handler: recent run summaries from the report.

use hotelpulse_core::AppConfig;
use hotelpulse_report::{read_history, run_summaries, RunSummary};

/// The last `limit` summaries, newest first.
pub(crate) fn latest(summaries: &[RunSummary], limit: usize) -> Vec<&RunSummary> {
    summaries.iter().rev().take(limit).collect()
}

/// Print the most recent run summaries.
///
/// # Errors
///
/// Returns an error if the report exists but cannot be read.
pub(crate) async fn show_history(config: &AppConfig, limit: usize) -> anyhow::Result<()> {
    let entries = read_history(&config.report_path).await?;
    let summaries = run_summaries(&entries);
    if summaries.is_empty() {
        println!("no runs recorded in {}", config.report_path.display());
        return Ok(());
    }

    println!(
        "{:>5}  {:<20}  {:>5}  {:>5}  {:>6}  {:>9}",
        "run", "finished (UTC)", "total", "ok", "failed", "duration"
    );
    for summary in latest(&summaries, limit) {
        println!(
            "{:>5}  {:<20}  {:>5}  {:>5}  {:>6}  {:>8.2}s",
            summary.run_number,
            summary.finished_at.format("%Y-%m-%d %H:%M:%S"),
            summary.total,
            summary.succeeded,
            summary.failed,
            summary.duration_secs()
        );
    }
    Ok(())
}
