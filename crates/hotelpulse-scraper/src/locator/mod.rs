//! Rating-panel locator.
//!
//! Navigates a session to the hotel's listing search page, then tries
//! extraction strategies in declared order and returns the first one that
//! yields text for both the rating and the review count. Fields are never
//! combined from different strategies.

mod strategy;
pub mod types;

pub use strategy::{default_strategies, ExtractionStrategy, FieldLocator, SelectorStrategy, TextSource};
pub use types::{RawExtraction, RawFields};

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use hotelpulse_core::HotelTarget;

use crate::error::{ExtractionError, MissReason, StrategyMiss};
use crate::session::BrowserSession;

pub struct PageLocator {
    strategies: Vec<Arc<dyn ExtractionStrategy>>,
    strategy_timeout: Duration,
}

impl PageLocator {
    #[must_use]
    pub fn new(strategies: Vec<Arc<dyn ExtractionStrategy>>, strategy_timeout: Duration) -> Self {
        Self {
            strategies,
            strategy_timeout,
        }
    }

    #[must_use]
    pub fn with_default_strategies(strategy_timeout: Duration) -> Self {
        Self::new(default_strategies(), strategy_timeout)
    }

    /// Strategy tags in the order they are tried.
    #[must_use]
    pub fn strategy_tags(&self) -> Vec<&str> {
        self.strategies.iter().map(|s| s.tag()).collect()
    }

    /// Locate the rating panel for `target` and read its raw text.
    ///
    /// Each strategy attempt is bounded by the configured timeout; a timeout
    /// or a recoverable session error moves on to the next strategy.
    ///
    /// # Errors
    ///
    /// - [`ExtractionError::Session`] if navigation fails or the session
    ///   becomes unusable mid-attempt.
    /// - [`ExtractionError::Exhausted`] if no strategy produced both fields.
    pub async fn locate(
        &self,
        target: &HotelTarget,
        session: &mut dyn BrowserSession,
    ) -> Result<RawExtraction, ExtractionError> {
        session.navigate(&target.query).await?;

        let mut tried = Vec::with_capacity(self.strategies.len());
        for strategy in &self.strategies {
            let tag = strategy.tag();
            let reason =
                match tokio::time::timeout(self.strategy_timeout, strategy.attempt(session)).await {
                    Ok(Ok(Some(fields))) => {
                        tracing::debug!(hotel = %target.slug, strategy = tag, "rating panel located");
                        return Ok(RawExtraction {
                            hotel: target.slug.clone(),
                            rating_text: fields.rating_text,
                            count_text: fields.count_text,
                            strategy: tag.to_string(),
                            extracted_at: Utc::now(),
                        });
                    }
                    Ok(Ok(None)) => MissReason::Incomplete,
                    Ok(Err(e)) if e.is_fatal() => return Err(ExtractionError::Session(e)),
                    Ok(Err(e)) => MissReason::Errored(e.to_string()),
                    Err(_elapsed) => MissReason::TimedOut {
                        after_ms: u64::try_from(self.strategy_timeout.as_millis())
                            .unwrap_or(u64::MAX),
                    },
                };
            tracing::debug!(hotel = %target.slug, strategy = tag, reason = %reason, "strategy missed");
            tried.push(StrategyMiss {
                strategy: tag.to_string(),
                reason,
            });
        }

        Err(ExtractionError::Exhausted {
            hotel: target.slug.clone(),
            tried,
        })
    }
}
