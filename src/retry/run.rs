//! Bounded retry loop over a releasable unit of work.

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::backoff::Backoff;

use super::error::{classify, ExecError};

/// A unit of work that can be invoked repeatedly, can judge whether a given
/// failure is worth another attempt, and can release whatever resources it
/// holds.
///
/// The retryable owns its resource lifecycle between attempts: a failed
/// `invoke` must leave no open resource behind before the next `invoke`
/// starts. [`run_with_retry`] never calls `release` itself; wrap the session
/// in [`run_session`] to guarantee release on every exit path.
#[async_trait]
pub trait Retryable: Send {
    type Output: Send;

    /// Perform one attempt.
    async fn invoke(&mut self) -> Result<Self::Output, ExecError>;

    /// Whether `err` is worth another attempt. The default classifies by
    /// error kind: transient network conditions retry, everything else is
    /// fatal.
    fn is_retryable(&self, err: &ExecError) -> bool {
        classify(err).is_retryable()
    }

    /// Release held resources. Idempotent; safe after a failed `invoke`.
    async fn release(&mut self);
}

/// Drives `retryable` through up to `max_attempts` attempts, sleeping for
/// `backoff.next_delay()` between retryable failures.
///
/// A non-retryable failure propagates immediately with no delay. The final
/// attempt is unconditional: its outcome propagates without classification
/// or delay, so exhaustion surfaces the *last* attempt's error.
/// `max_attempts == 1` means try exactly once.
///
/// Does not call `release()`; see [`run_session`].
pub async fn run_with_retry<R: Retryable>(
    retryable: &mut R,
    max_attempts: u32,
    backoff: &mut dyn Backoff,
) -> Result<R::Output, ExecError> {
    assert!(max_attempts >= 1, "max_attempts must be at least 1");

    for attempt in 1..max_attempts {
        match retryable.invoke().await {
            Ok(value) => {
                debug!(attempt, "attempt succeeded");
                return Ok(value);
            }
            Err(err) => {
                if !retryable.is_retryable(&err) {
                    warn!(attempt, error = %err, "non-retryable failure, giving up");
                    return Err(err);
                }
                let delay = backoff.next_delay();
                warn!(
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    error = %err,
                    "retryable failure, backing off"
                );
                tokio::time::sleep(delay).await;
            }
        }
    }

    // Last attempt: whatever happens here is terminal.
    retryable.invoke().await
}

/// Runs a full retry session and guarantees `release()` is called exactly
/// once, whatever the outcome — success, exhaustion, or fatal failure.
pub async fn run_session<R: Retryable>(
    mut retryable: R,
    max_attempts: u32,
    backoff: &mut dyn Backoff,
) -> Result<R::Output, ExecError> {
    let result = run_with_retry(&mut retryable, max_attempts, backoff).await;
    retryable.release().await;
    result
}
