//! Run entry point: schedule retrievals and stream each outcome into the report.

use futures::StreamExt;
use hotelpulse_core::HotelTarget;
use hotelpulse_scraper::{Outcome, Scheduler};

use crate::error::ReportError;
use crate::sink::ReportSink;
use crate::summary::RunSummary;

/// Everything a caller needs after a run: the summary written to the report
/// and the outcomes in completion order.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub summary: RunSummary,
    pub outcomes: Vec<Outcome>,
}

/// Run `targets` through `scheduler`, appending each outcome to `sink` as it
/// completes, then write the run summary.
///
/// `on_outcome` is called after each outcome has been made durable, so a
/// caller can show live progress.
///
/// # Errors
///
/// Returns [`ReportError`] if the report cannot be written. Per-hotel
/// failures are never errors; they are recorded as `failed` entries.
pub async fn execute_run<F>(
    scheduler: &Scheduler,
    targets: Vec<HotelTarget>,
    concurrency: usize,
    sink: &ReportSink,
    mut on_outcome: F,
) -> Result<RunReport, ReportError>
where
    F: FnMut(&Outcome),
{
    let expected = targets.len();
    let mut outcomes = Vec::with_capacity(expected);
    let mut stream = Box::pin(scheduler.run(targets, concurrency));

    while let Some(outcome) = stream.next().await {
        sink.append(&outcome).await?;
        on_outcome(&outcome);
        outcomes.push(outcome);
    }

    let summary = sink.finalize().await?;
    debug_assert_eq!(outcomes.len(), expected);
    Ok(RunReport { summary, outcomes })
}
