//! Cumulative, append-only run report.
//!
//! Every outcome of a run is appended to a JSON Lines file as soon as it
//! completes, followed by one summary entry when the run finishes.

pub mod csv;
pub mod entry;
pub mod error;
pub mod history;
pub mod pipeline;
pub mod sink;
pub mod summary;

pub use csv::write_snapshot;
pub use entry::{EntryStatus, OutcomeEntry, ReportEntry};
pub use error::ReportError;
pub use history::{next_run_number, read_history, run_summaries};
pub use pipeline::{execute_run, RunReport};
pub use sink::ReportSink;
pub use summary::{RunSummary, Tally};
