//! Retry-with-backoff wrapper for upstream calls.
//!
//! One deadline is armed per logical invocation and shared by every attempt.
//! Attempts are strictly sequential: attempt n+1 starts only after attempt n
//! failed and its backoff elapsed.

use std::future::Future;

use tokio::time::{sleep, timeout_at, Duration, Instant};
use tracing::{debug, info, warn};

use crate::error::{ChatError, Result};

/// Bounds for one retried invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of attempts, first one included
    pub max_attempts: u32,
    /// Deadline shared by all attempts and backoff waits
    pub overall_timeout: Duration,
    /// Backoff unit; the wait after attempt `n` is `base_delay * 2^n`
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            overall_timeout: Duration::from_secs(30),
            base_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Wait inserted after failed attempt `attempt` (counted from 1).
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(2u32.saturating_pow(attempt))
    }
}

/// Per-invocation bookkeeping. Never outlives one call to [`with_retry`].
#[derive(Debug)]
struct RetryState {
    attempt: u32,
    max_attempts: u32,
    last_error: Option<ChatError>,
}

impl RetryState {
    fn new(max_attempts: u32) -> Self {
        Self {
            attempt: 0,
            max_attempts,
            last_error: None,
        }
    }

    fn exhausted(&self) -> bool {
        self.attempt >= self.max_attempts
    }
}

/// Runs `operation` until it succeeds, attempts run out, or the deadline passes.
///
/// `operation` receives the 1-based attempt number. An attempt still pending
/// when the deadline elapses is dropped (cancelling its I/O) and fails with
/// [`ChatError::Timeout`]. When the next backoff would end at or past the
/// deadline the loop stops early, since that attempt could not complete.
/// The returned error is the last one observed.
pub async fn with_retry<T, F, Fut>(policy: &RetryPolicy, mut operation: F) -> Result<T>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let deadline = Instant::now() + policy.overall_timeout;
    let mut state = RetryState::new(policy.max_attempts.max(1));

    loop {
        state.attempt += 1;
        let attempt = state.attempt;
        debug!(attempt, max_attempts = state.max_attempts, "Calling upstream");

        let outcome = match timeout_at(deadline, operation(attempt)).await {
            Ok(result) => result,
            Err(_) => Err(ChatError::Timeout),
        };

        match outcome {
            Ok(value) => {
                if attempt > 1 {
                    info!(attempt, "Upstream call succeeded after retry");
                }
                return Ok(value);
            }
            Err(err) => {
                warn!(
                    attempt,
                    max_attempts = state.max_attempts,
                    error = %err,
                    "Upstream attempt failed"
                );
                state.last_error = Some(err);
            }
        }

        if state.exhausted() {
            break;
        }

        let delay = policy.backoff_delay(attempt);
        if Instant::now() + delay >= deadline {
            warn!(attempt, "Retry budget exhausted before next attempt");
            break;
        }

        debug!(delay_ms = delay.as_millis() as u64, "Backing off before retry");
        sleep(delay).await;
    }

    Err(state.last_error.unwrap_or(ChatError::Timeout))
}
