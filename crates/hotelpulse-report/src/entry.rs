//! On-disk report entry format: one JSON object per line, tagged by `type`.

use std::time::Duration;

use chrono::{DateTime, Utc};
use hotelpulse_scraper::{FailureKind, FailureStage, Outcome};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::summary::RunSummary;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryStatus {
    Ok,
    Failed,
}

/// One hotel's outcome as persisted in the report.
///
/// `rating`, `review_count` and `strategy` are present only on `ok` entries;
/// `kind`, `stage` and `detail` only on `failed` ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutcomeEntry {
    pub run_id: Uuid,
    pub run_number: u64,
    pub timestamp: DateTime<Utc>,
    pub hotel: String,
    pub name: String,
    pub status: EntryStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy: Option<String>,
    pub duration_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<FailureKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stage: Option<FailureStage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl OutcomeEntry {
    #[must_use]
    pub fn from_outcome(run_id: Uuid, run_number: u64, outcome: &Outcome) -> Self {
        match outcome {
            Outcome::Ok(record) => Self {
                run_id,
                run_number,
                timestamp: record.completed_at,
                hotel: record.hotel.clone(),
                name: record.name.clone(),
                status: EntryStatus::Ok,
                rating: Some(record.rating),
                review_count: Some(record.review_count),
                strategy: Some(record.strategy.clone()),
                duration_ms: millis(record.elapsed),
                kind: None,
                stage: None,
                detail: None,
            },
            Outcome::Failed(failure) => Self {
                run_id,
                run_number,
                timestamp: failure.failed_at,
                hotel: failure.hotel.clone(),
                name: failure.name.clone(),
                status: EntryStatus::Failed,
                rating: None,
                review_count: None,
                strategy: None,
                duration_ms: millis(failure.elapsed),
                kind: Some(failure.kind),
                stage: Some(failure.stage),
                detail: Some(failure.detail.clone()),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReportEntry {
    Outcome(OutcomeEntry),
    Summary(RunSummary),
}

impl ReportEntry {
    #[must_use]
    pub fn run_number(&self) -> u64 {
        match self {
            ReportEntry::Outcome(entry) => entry.run_number,
            ReportEntry::Summary(summary) => summary.run_number,
        }
    }

    /// Serialize as a single newline-terminated JSON line.
    ///
    /// # Errors
    ///
    /// Returns [`serde_json::Error`] if the entry cannot be serialized.
    pub fn to_line(&self) -> Result<String, serde_json::Error> {
        let mut line = serde_json::to_string(self)?;
        line.push('\n');
        Ok(line)
    }
}

pub(crate) fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
