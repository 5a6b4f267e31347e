//! One retrieval, start to finish, for one hotel.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use hotelpulse_core::HotelTarget;

use crate::error::{ExtractionError, FailureKind, FailureStage};
use crate::locator::PageLocator;
use crate::outcome::{Outcome, RetrievalFailure, ValidatedRecord};
use crate::session::SessionPool;
use crate::validate::RecordValidator;

/// Runs the checkout, locate, validate sequence for a single hotel.
///
/// [`RetrievalWorker::run`] never fails: every error is classified and
/// returned as [`Outcome::Failed`].
pub struct RetrievalWorker {
    locator: Arc<PageLocator>,
    validator: Arc<RecordValidator>,
    pool: Arc<SessionPool>,
    debug_dir: Option<PathBuf>,
}

impl RetrievalWorker {
    #[must_use]
    pub fn new(
        locator: Arc<PageLocator>,
        validator: Arc<RecordValidator>,
        pool: Arc<SessionPool>,
    ) -> Self {
        Self {
            locator,
            validator,
            pool,
            debug_dir: None,
        }
    }

    /// Write the page source to `dir` whenever every strategy misses.
    #[must_use]
    pub fn with_debug_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.debug_dir = dir;
        self
    }

    #[must_use]
    pub fn pool(&self) -> &Arc<SessionPool> {
        &self.pool
    }

    pub async fn run(&self, target: HotelTarget) -> Outcome {
        let started = Instant::now();
        tracing::debug!(hotel = %target.slug, "retrieval started");

        let mut pooled = match self.pool.checkout().await {
            Ok(pooled) => pooled,
            Err(e) => {
                return fail(
                    &target,
                    started,
                    FailureKind::SessionFailure,
                    FailureStage::Session,
                    e.to_string(),
                );
            }
        };

        let raw = match self.locator.locate(&target, pooled.session_mut()).await {
            Ok(raw) => {
                self.pool.release(pooled).await;
                raw
            }
            Err(err @ ExtractionError::Exhausted { .. }) => {
                if let Some(dir) = &self.debug_dir {
                    if let Some(source) = pooled.session_mut().page_source() {
                        dump_page_source(dir, &target.slug, &source).await;
                    }
                }
                self.pool.release(pooled).await;
                return fail(&target, started, err.kind(), FailureStage::Locate, err.to_string());
            }
            Err(err @ ExtractionError::Session(_)) => {
                self.pool.discard(pooled).await;
                return fail(&target, started, err.kind(), FailureStage::Locate, err.to_string());
            }
        };

        match self.validator.validate(&raw) {
            Ok(fields) => {
                let elapsed = started.elapsed();
                tracing::info!(
                    hotel = %target.slug,
                    rating = fields.rating,
                    review_count = fields.review_count,
                    strategy = %fields.strategy,
                    elapsed_ms = elapsed.as_millis(),
                    "hotel retrieved"
                );
                Outcome::Ok(ValidatedRecord {
                    hotel: fields.hotel,
                    name: target.name,
                    rating: fields.rating,
                    review_count: fields.review_count,
                    strategy: fields.strategy,
                    elapsed,
                    completed_at: Utc::now(),
                })
            }
            Err(e) => fail(&target, started, e.kind(), FailureStage::Validate, e.to_string()),
        }
    }
}

fn fail(
    target: &HotelTarget,
    started: Instant,
    kind: FailureKind,
    stage: FailureStage,
    detail: String,
) -> Outcome {
    let elapsed = started.elapsed();
    tracing::warn!(
        hotel = %target.slug,
        kind = %kind,
        stage = %stage,
        elapsed_ms = elapsed.as_millis(),
        error = %detail,
        "hotel retrieval failed"
    );
    Outcome::Failed(RetrievalFailure {
        hotel: target.slug.clone(),
        name: target.name.clone(),
        kind,
        stage,
        detail,
        elapsed,
        failed_at: Utc::now(),
    })
}

/// File name for a page-source dump: `debug_<slug>_<timestamp>.html`.
pub(crate) fn debug_file_name(slug: &str) -> String {
    format!("debug_{slug}_{}.html", Utc::now().format("%Y%m%dT%H%M%S%.3f"))
}

async fn dump_page_source(dir: &Path, slug: &str, source: &str) {
    let path = dir.join(debug_file_name(slug));
    let result = async {
        tokio::fs::create_dir_all(dir).await?;
        tokio::fs::write(&path, source).await
    }
    .await;
    match result {
        Ok(()) => tracing::info!(hotel = slug, path = %path.display(), "saved page source"),
        Err(e) => tracing::warn!(hotel = slug, error = %e, "failed to save page source"),
    }
}

#[cfg(test)]
#[path = "worker_test.rs"]
mod tests;
