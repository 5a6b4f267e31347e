//! Retry with exponential back-off and jitter for session navigation.
//!
//! Only transient transport failures are retried. Anything else is returned
//! immediately so the worker can record the failure and move on.

use std::future::Future;
use std::time::Duration;

use crate::error::SessionError;

/// Returns `true` for errors that are worth retrying after a back-off delay.
///
/// **Retriable:**
/// - Network-level failures: timeout, connection reset.
/// - HTTP 429 and 5xx responses.
///
/// **Not retriable:** 4xx statuses other than 429, selector errors, and
/// anything raised after the page was loaded.
pub(crate) fn is_retriable(err: &SessionError) -> bool {
    match err {
        SessionError::Http(e) => e.is_timeout() || e.is_connect() || e.is_request(),
        SessionError::UnexpectedStatus { status, .. } => *status == 429 || *status >= 500,
        SessionError::Open(_)
        | SessionError::InvalidSelector { .. }
        | SessionError::StaleElement
        | SessionError::NoPage
        | SessionError::Unreachable(_) => false,
    }
}

/// Runs `operation` with up to `max_retries` additional attempts on transient errors.
///
/// Back-off schedule with `backoff_base_ms = 500`:
///
/// | Attempt | Sleep before next attempt      |
/// |---------|--------------------------------|
/// | 1       | 500 ms × 2⁰ ± 25 % jitter      |
/// | 2       | 500 ms × 2¹ ± 25 % jitter      |
/// | 3       | 500 ms × 2² ± 25 % jitter      |
///
/// Delay is capped at 30 s.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_ms: u64,
    mut operation: F,
) -> Result<T, SessionError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, SessionError>>,
{
    const MAX_DELAY_MS: u64 = 30_000;
    let mut attempt = 0u32;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !is_retriable(&err) || attempt >= max_retries {
                    return Err(err);
                }
                attempt += 1;
                let computed = backoff_base_ms.saturating_mul(1u64 << (attempt - 1).min(10));
                let capped = computed.min(MAX_DELAY_MS);
                #[allow(
                    clippy::cast_possible_truncation,
                    clippy::cast_sign_loss,
                    clippy::cast_precision_loss
                )]
                let delay_ms = (capped as f64 * (rand::random::<f64>() * 0.5 + 0.75)) as u64;
                tracing::warn!(
                    attempt,
                    max_retries,
                    delay_ms,
                    error = %err,
                    "transient navigation error; retrying after back-off"
                );
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            }
        }
    }
}
