//! Concurrent hotel rating retrieval.
//!
//! A [`Scheduler`] fans hotel targets out over a bounded pool of
//! [`RetrievalWorker`]s. Each worker checks a browser session out of the
//! [`SessionPool`], runs the [`PageLocator`] strategy chain against the
//! listing page, validates the raw text with [`RecordValidator`] and packages
//! the result as an [`Outcome`].

pub mod error;
pub mod locator;
pub mod outcome;
pub(crate) mod parse_helpers;
pub(crate) mod retry;
pub mod scheduler;
pub mod session;
pub mod validate;
pub mod worker;

pub use error::{ExtractionError, FailureKind, FailureStage, SessionError, ValidationFailure};
pub use locator::{
    default_strategies, ExtractionStrategy, FieldLocator, PageLocator, RawExtraction, RawFields,
    SelectorStrategy, TextSource,
};
pub use outcome::{Outcome, RetrievalFailure, ValidatedRecord};
pub use scheduler::Scheduler;
pub use session::{
    BrowserSession, ElementHandle, HttpSession, HttpSessionFactory, PooledSession,
    SessionFactory, SessionPool,
};
pub use validate::{RatingBounds, RecordValidator, ValidatedFields};
pub use worker::RetrievalWorker;
