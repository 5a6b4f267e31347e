//! Fan-out of hotel targets over a bounded set of concurrent workers.

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use futures::stream::{self, Stream, StreamExt};
use hotelpulse_core::HotelTarget;

use crate::error::{FailureKind, FailureStage};
use crate::outcome::{Outcome, RetrievalFailure};
use crate::worker::RetrievalWorker;

pub struct Scheduler {
    worker: Arc<RetrievalWorker>,
}

impl Scheduler {
    #[must_use]
    pub fn new(worker: Arc<RetrievalWorker>) -> Self {
        Self { worker }
    }

    /// Run every target with at most `concurrency` retrievals in flight.
    ///
    /// The returned stream yields exactly one [`Outcome`] per target, in
    /// completion order. Each retrieval runs on its own task; a task that
    /// panics yields a [`FailureKind::WorkerPanic`] failure for its hotel and
    /// the rest of the run continues.
    pub fn run(
        &self,
        targets: Vec<HotelTarget>,
        concurrency: usize,
    ) -> impl Stream<Item = Outcome> + Send + 'static {
        let limit = concurrency.max(1);
        tracing::info!(hotels = targets.len(), concurrency = limit, "scheduling retrievals");

        let worker = Arc::clone(&self.worker);
        stream::iter(targets)
            .map(move |target| {
                let worker = Arc::clone(&worker);
                async move {
                    let started = Instant::now();
                    let hotel = target.slug.clone();
                    let name = target.name.clone();
                    match tokio::spawn(async move { worker.run(target).await }).await {
                        Ok(outcome) => outcome,
                        Err(e) => {
                            tracing::error!(hotel = %hotel, error = %e, "retrieval task aborted");
                            Outcome::Failed(RetrievalFailure {
                                hotel,
                                name,
                                kind: FailureKind::WorkerPanic,
                                stage: FailureStage::Worker,
                                detail: e.to_string(),
                                elapsed: started.elapsed(),
                                failed_at: Utc::now(),
                            })
                        }
                    }
                }
            })
            .buffer_unordered(limit)
    }
}
