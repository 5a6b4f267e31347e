use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("report I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize report entry: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("run {run_number} was already finalized")]
    AlreadyFinalized { run_number: u64 },

    #[error("run {run_number} stopped accepting entries after a failed report write")]
    Poisoned { run_number: u64 },

    #[error("report writer task has stopped")]
    WriterClosed,
}

impl ReportError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ReportError::Io {
            path: path.into(),
            source,
        }
    }
}
