//! Per-hotel retrieval results.

use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::error::{FailureKind, FailureStage};

/// A successful retrieval: validated values plus timing.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedRecord {
    /// Hotel slug.
    pub hotel: String,
    /// Display name from the roster.
    pub name: String,
    pub rating: f64,
    pub review_count: u64,
    /// Tag of the extraction strategy that produced the raw text.
    pub strategy: String,
    /// Wall-clock time from worker start to record construction.
    pub elapsed: Duration,
    pub completed_at: DateTime<Utc>,
}

/// A failed retrieval, classified by kind and the stage it failed in.
#[derive(Debug, Clone, PartialEq)]
pub struct RetrievalFailure {
    pub hotel: String,
    pub name: String,
    pub kind: FailureKind,
    pub stage: FailureStage,
    pub detail: String,
    pub elapsed: Duration,
    pub failed_at: DateTime<Utc>,
}

/// Exactly one of these is produced for every scheduled hotel.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Ok(ValidatedRecord),
    Failed(RetrievalFailure),
}

impl Outcome {
    /// Slug of the hotel this outcome belongs to.
    #[must_use]
    pub fn hotel(&self) -> &str {
        match self {
            Outcome::Ok(record) => &record.hotel,
            Outcome::Failed(failure) => &failure.hotel,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Outcome::Ok(record) => &record.name,
            Outcome::Failed(failure) => &failure.name,
        }
    }

    #[must_use]
    pub fn elapsed(&self) -> Duration {
        match self {
            Outcome::Ok(record) => record.elapsed,
            Outcome::Failed(failure) => failure.elapsed,
        }
    }

    #[must_use]
    pub fn finished_at(&self) -> DateTime<Utc> {
        match self {
            Outcome::Ok(record) => record.completed_at,
            Outcome::Failed(failure) => failure.failed_at,
        }
    }

    #[must_use]
    pub fn is_ok(&self) -> bool {
        matches!(self, Outcome::Ok(_))
    }
}
