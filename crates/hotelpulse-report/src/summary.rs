//! Aggregate counts and timing for one run.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entry::EntryStatus;

/// Running success/failure counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    pub succeeded: u64,
    pub failed: u64,
}

impl Tally {
    pub fn record(&mut self, status: EntryStatus) {
        match status {
            EntryStatus::Ok => self.succeeded += 1,
            EntryStatus::Failed => self.failed += 1,
        }
    }

    #[must_use]
    pub fn total(&self) -> u64 {
        self.succeeded + self.failed
    }
}

/// Written once as the last entry of a run.
///
/// `total == succeeded + failed` always holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub run_id: Uuid,
    pub run_number: u64,
    pub total: u64,
    pub succeeded: u64,
    pub failed: u64,
    /// Wall-clock duration of the whole run.
    pub duration_ms: u64,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl RunSummary {
    #[must_use]
    pub fn new(
        run_id: Uuid,
        run_number: u64,
        tally: Tally,
        duration_ms: u64,
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
    ) -> Self {
        Self {
            run_id,
            run_number,
            total: tally.total(),
            succeeded: tally.succeeded,
            failed: tally.failed,
            duration_ms,
            started_at,
            finished_at,
        }
    }

    /// Run duration in seconds, for display.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn duration_secs(&self) -> f64 {
        self.duration_ms as f64 / 1000.0
    }
}
