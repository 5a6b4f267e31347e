//! Single-writer append sink for the cumulative report.
//!
//! One background task owns the report file. [`ReportSink`] handles are
//! cheap to clone and send entries to it over a bounded queue; each append
//! waits for an acknowledgement sent only after the line has been written,
//! flushed and synced. Lines from concurrent callers therefore never
//! interleave, and a returned `Ok` means the entry is on disk.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use hotelpulse_scraper::Outcome;
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::{mpsc, oneshot};
use uuid::Uuid;

use crate::entry::{millis, OutcomeEntry, ReportEntry};
use crate::error::ReportError;
use crate::history::{next_run_number, parse_entries};
use crate::summary::{RunSummary, Tally};

const QUEUE_DEPTH: usize = 64;

enum Command {
    Append {
        entry: Box<OutcomeEntry>,
        ack: oneshot::Sender<Result<(), ReportError>>,
    },
    Finalize {
        ack: oneshot::Sender<Result<RunSummary, ReportError>>,
    },
}

#[derive(Clone)]
pub struct ReportSink {
    tx: mpsc::Sender<Command>,
    run_id: Uuid,
    run_number: u64,
    path: Arc<PathBuf>,
}

impl ReportSink {
    /// Open (or create) the report at `path` and start a new run.
    ///
    /// The run number is one past the highest run number already in the
    /// file. Existing content is never modified; if it does not end in a
    /// newline, one is written first so the new run starts on its own line.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::Io`] if the file or its parent directory cannot
    /// be read, created or opened for appending.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, ReportError> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| ReportError::io(parent, e))?;
        }

        let existing = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(ReportError::io(&path, e)),
        };
        let run_number = next_run_number(&parse_entries(&String::from_utf8_lossy(&existing)));

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .map_err(|e| ReportError::io(&path, e))?;
        if existing.last().is_some_and(|b| *b != b'\n') {
            write_durably(&mut file, b"\n")
                .await
                .map_err(|e| ReportError::io(&path, e))?;
        }

        let sink = Self::start(file, path, Uuid::new_v4(), run_number);
        tracing::info!(
            path = %sink.path.display(),
            run_number,
            run_id = %sink.run_id,
            "report run opened"
        );
        Ok(sink)
    }

    /// Spawn the writer task over an already opened report file.
    fn start(file: File, path: PathBuf, run_id: Uuid, run_number: u64) -> Self {
        let (tx, rx) = mpsc::channel(QUEUE_DEPTH);
        let writer = Writer {
            file,
            path: path.clone(),
            run_id,
            run_number,
            tally: Tally::default(),
            started_at: Utc::now(),
            started: Instant::now(),
            finalized: false,
            poisoned: false,
        };
        tokio::spawn(writer.run(rx));
        Self {
            tx,
            run_id,
            run_number,
            path: Arc::new(path),
        }
    }

    #[must_use]
    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    #[must_use]
    pub fn run_number(&self) -> u64 {
        self.run_number
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one outcome. Returns once the entry is durable.
    ///
    /// # Errors
    ///
    /// - [`ReportError::Io`] if the write, flush or sync fails.
    /// - [`ReportError::AlreadyFinalized`] after [`ReportSink::finalize`].
    /// - [`ReportError::Poisoned`] once any earlier write has failed.
    /// - [`ReportError::WriterClosed`] if the writer task is gone.
    pub async fn append(&self, outcome: &Outcome) -> Result<(), ReportError> {
        let entry = OutcomeEntry::from_outcome(self.run_id, self.run_number, outcome);
        let (ack, done) = oneshot::channel();
        self.tx
            .send(Command::Append {
                entry: Box::new(entry),
                ack,
            })
            .await
            .map_err(|_| ReportError::WriterClosed)?;
        done.await.map_err(|_| ReportError::WriterClosed)?
    }

    /// Write the run summary after the last outcome and return it.
    ///
    /// Only the first call writes; later calls and later appends fail with
    /// [`ReportError::AlreadyFinalized`].
    ///
    /// # Errors
    ///
    /// Same as [`ReportSink::append`].
    pub async fn finalize(&self) -> Result<RunSummary, ReportError> {
        let (ack, done) = oneshot::channel();
        self.tx
            .send(Command::Finalize { ack })
            .await
            .map_err(|_| ReportError::WriterClosed)?;
        done.await.map_err(|_| ReportError::WriterClosed)?
    }
}

struct Writer {
    file: File,
    path: PathBuf,
    run_id: Uuid,
    run_number: u64,
    tally: Tally,
    started_at: DateTime<Utc>,
    started: Instant,
    finalized: bool,
    /// Set after a failed write; the file may end in a partial line.
    poisoned: bool,
}

impl Writer {
    async fn run(mut self, mut rx: mpsc::Receiver<Command>) {
        while let Some(command) = rx.recv().await {
            match command {
                Command::Append { entry, ack } => {
                    let result = self.append(*entry).await;
                    let _ = ack.send(result);
                }
                Command::Finalize { ack } => {
                    let result = self.finalize().await;
                    let _ = ack.send(result);
                }
            }
        }
        if !self.finalized {
            tracing::warn!(run_number = self.run_number, "report closed without a summary entry");
        }
    }

    fn ensure_writable(&self) -> Result<(), ReportError> {
        if self.poisoned {
            return Err(ReportError::Poisoned {
                run_number: self.run_number,
            });
        }
        if self.finalized {
            return Err(ReportError::AlreadyFinalized {
                run_number: self.run_number,
            });
        }
        Ok(())
    }

    async fn append(&mut self, entry: OutcomeEntry) -> Result<(), ReportError> {
        self.ensure_writable()?;
        let status = entry.status;
        self.write_entry(&ReportEntry::Outcome(entry)).await?;
        self.tally.record(status);
        Ok(())
    }

    async fn finalize(&mut self) -> Result<RunSummary, ReportError> {
        self.ensure_writable()?;
        let summary = RunSummary::new(
            self.run_id,
            self.run_number,
            self.tally,
            millis(self.started.elapsed()),
            self.started_at,
            Utc::now(),
        );
        self.write_entry(&ReportEntry::Summary(summary.clone()))
            .await?;
        self.finalized = true;
        tracing::info!(
            run_number = summary.run_number,
            total = summary.total,
            succeeded = summary.succeeded,
            failed = summary.failed,
            duration_ms = summary.duration_ms,
            "run summary written"
        );
        Ok(summary)
    }

    async fn write_entry(&mut self, entry: &ReportEntry) -> Result<(), ReportError> {
        let line = entry.to_line()?;
        if let Err(e) = write_durably(&mut self.file, line.as_bytes()).await {
            self.poisoned = true;
            tracing::error!(
                path = %self.path.display(),
                run_number = self.run_number,
                error = %e,
                "report write failed; refusing further entries for this run"
            );
            return Err(ReportError::io(&self.path, e));
        }
        Ok(())
    }
}

async fn write_durably(file: &mut File, bytes: &[u8]) -> std::io::Result<()> {
    file.write_all(bytes).await?;
    file.flush().await?;
    file.sync_data().await
}

#[cfg(test)]
#[path = "sink_test.rs"]
mod tests;
