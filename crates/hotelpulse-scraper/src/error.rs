use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised by a browser session.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("session could not be opened: {0}")]
    Open(String),

    #[error("invalid selector \"{selector}\": {reason}")]
    InvalidSelector { selector: String, reason: String },

    #[error("element handle is stale; the page changed since it was found")]
    StaleElement,

    #[error("no page loaded; navigate first")]
    NoPage,

    #[error("session unreachable: {0}")]
    Unreachable(String),
}

impl SessionError {
    /// Returns `true` when the session can no longer be used for this hotel
    /// and the remaining extraction strategies should not be attempted.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            SessionError::Unreachable(_) | SessionError::Open(_) | SessionError::NoPage
        )
    }
}

/// Why a single extraction strategy did not produce a result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MissReason {
    /// The strategy ran but did not find text for both fields.
    Incomplete,
    TimedOut { after_ms: u64 },
    Errored(String),
}

impl std::fmt::Display for MissReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MissReason::Incomplete => write!(f, "incomplete"),
            MissReason::TimedOut { after_ms } => write!(f, "timed out after {after_ms}ms"),
            MissReason::Errored(reason) => write!(f, "error: {reason}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrategyMiss {
    pub strategy: String,
    pub reason: MissReason,
}

/// Errors returned by [`crate::PageLocator::locate`].
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("all extraction strategies exhausted for {hotel}: {}", describe_misses(.tried))]
    Exhausted {
        hotel: String,
        tried: Vec<StrategyMiss>,
    },

    #[error("session failure: {0}")]
    Session(#[from] SessionError),
}

impl ExtractionError {
    #[must_use]
    pub fn kind(&self) -> FailureKind {
        match self {
            ExtractionError::Exhausted { .. } => FailureKind::ExtractionFailure,
            ExtractionError::Session(_) => FailureKind::SessionFailure,
        }
    }
}

fn describe_misses(tried: &[StrategyMiss]) -> String {
    if tried.is_empty() {
        return "no strategies configured".to_string();
    }
    tried
        .iter()
        .map(|miss| format!("{} ({})", miss.strategy, miss.reason))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Raw text that could not be coerced into a well-formed, in-range value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationFailure {
    #[error("unparsable rating text \"{text}\"")]
    UnparsableRating { text: String },

    #[error("unparsable review count text \"{text}\"")]
    UnparsableCount { text: String },

    #[error("{field} {value} is outside the allowed range {range}")]
    OutOfRange {
        field: &'static str,
        value: String,
        range: String,
    },
}

impl ValidationFailure {
    #[must_use]
    pub fn kind(&self) -> FailureKind {
        match self {
            ValidationFailure::UnparsableRating { .. } => FailureKind::UnparsableRating,
            ValidationFailure::UnparsableCount { .. } => FailureKind::UnparsableCount,
            ValidationFailure::OutOfRange { .. } => FailureKind::OutOfRange,
        }
    }
}

/// Failure taxonomy recorded on a [`crate::RetrievalFailure`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    ExtractionFailure,
    SessionFailure,
    UnparsableRating,
    UnparsableCount,
    OutOfRange,
    WorkerPanic,
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            FailureKind::ExtractionFailure => "extraction_failure",
            FailureKind::SessionFailure => "session_failure",
            FailureKind::UnparsableRating => "unparsable_rating",
            FailureKind::UnparsableCount => "unparsable_count",
            FailureKind::OutOfRange => "out_of_range",
            FailureKind::WorkerPanic => "worker_panic",
        };
        write!(f, "{label}")
    }
}

/// Pipeline stage a retrieval failed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureStage {
    /// Checking a session out of the pool.
    Session,
    Locate,
    Validate,
    /// The worker task itself aborted.
    Worker,
}

impl std::fmt::Display for FailureStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailureStage::Session => write!(f, "session"),
            FailureStage::Locate => write!(f, "locate"),
            FailureStage::Validate => write!(f, "validate"),
            FailureStage::Worker => write!(f, "worker"),
        }
    }
}
