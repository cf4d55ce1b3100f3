//! Bounded retry with optional backoff and cancellation.
//!
//! Identity creation is retried a fixed number of times. By default there
//! is no delay between attempts; a non-zero `initial_delay` turns on
//! exponential backoff, optionally with jitter.
//!
//! # Example
//!
//! ```rust,no_run
//! use platform_provision::retry::{with_retry_cancellable, RetryConfig};
//! use tokio_util::sync::CancellationToken;
//!
//! async fn example() {
//!     let config = RetryConfig::identity_default();
//!     let token = CancellationToken::new();
//!
//!     let result = with_retry_cancellable(&config, &token, "create_identity", || async {
//!         // Your operation here
//!         Ok::<_, String>(())
//!     })
//!     .await;
//!     assert!(result.is_ok());
//! }
//! ```

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

/// Configuration for retry behavior.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of attempts, including the first one
    pub max_attempts: u32,

    /// Delay before the first retry (zero disables backoff)
    pub initial_delay: Duration,

    /// Maximum delay between retries
    pub max_delay: Duration,

    /// Base for exponential backoff (typically 2.0)
    pub exponential_base: f64,

    /// Randomize each delay between 50% and 150% of its nominal value
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self::identity_default()
    }
}

impl RetryConfig {
    /// Retry policy for identity creation.
    ///
    /// Five attempts back to back, without backoff.
    pub fn identity_default() -> Self {
        Self {
            max_attempts: 5,
            initial_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
            exponential_base: 2.0,
            jitter: false,
        }
    }

    /// Create a configuration with exponential backoff and jitter.
    ///
    /// Useful against cloud APIs that throttle bursts of identical requests.
    pub fn with_backoff(max_attempts: u32, initial_delay: Duration, max_delay: Duration) -> Self {
        Self {
            max_attempts,
            initial_delay,
            max_delay,
            exponential_base: 2.0,
            jitter: true,
        }
    }

    /// Create a configuration that never retries.
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            ..Self::identity_default()
        }
    }

    /// Check if attempts are separated by a delay.
    pub fn has_backoff(&self) -> bool {
        !self.initial_delay.is_zero()
    }

    fn next_delay(&self, delay: Duration) -> Duration {
        let secs = (delay.as_secs_f64() * self.exponential_base).min(self.max_delay.as_secs_f64());
        Duration::try_from_secs_f64(secs).unwrap_or(self.max_delay)
    }

    fn jittered(&self, delay: Duration) -> Duration {
        if !self.jitter {
            return delay;
        }
        delay.mul_f64(rand::thread_rng().gen_range(0.5..1.5))
    }
}

/// Terminal failure of a retried operation.
#[derive(Debug, Error, PartialEq)]
pub enum RetryError<E> {
    /// Every attempt failed
    #[error("All {attempts} attempts failed, last error: {last}")]
    Exhausted {
        /// Attempts made
        attempts: u32,
        /// Error of the last attempt
        last: E,
    },

    /// The token was cancelled before an attempt succeeded
    #[error("Cancelled")]
    Cancelled,
}

/// Execute an operation up to `max_attempts` times, racing each attempt
/// and each backoff sleep against `token`.
///
/// The loop stops at the first `Ok`. Errors are not inspected; callers that
/// want an error to end the loop successfully map it to `Ok` inside `f`.
///
/// # Returns
///
/// The first successful result, `RetryError::Exhausted` carrying the last
/// error, or `RetryError::Cancelled`
pub async fn with_retry_cancellable<F, Fut, T, E>(
    config: &RetryConfig,
    token: &CancellationToken,
    operation: &str,
    mut f: F,
) -> Result<T, RetryError<E>>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, E>>,
    E: std::fmt::Debug,
{
    if token.is_cancelled() {
        return Err(RetryError::Cancelled);
    }

    let max_attempts = config.max_attempts.max(1);
    let mut attempt = 0;
    let mut delay = config.initial_delay;

    loop {
        attempt += 1;

        let result = tokio::select! {
            biased;
            () = token.cancelled() => return Err(RetryError::Cancelled),
            result = f() => result,
        };

        match result {
            Ok(value) => {
                if attempt > 1 {
                    tracing::info!(operation, attempts = attempt, "Operation succeeded after retry");
                }
                return Ok(value);
            }
            Err(e) if attempt >= max_attempts => {
                tracing::error!(
                    operation,
                    attempts = attempt,
                    error = ?e,
                    "All retry attempts exhausted"
                );
                return Err(RetryError::Exhausted { attempts: attempt, last: e });
            }
            Err(e) => {
                let wait = config.jittered(delay);
                tracing::warn!(
                    operation,
                    attempt = attempt,
                    max_attempts = max_attempts,
                    delay_ms = wait.as_millis() as u64,
                    error = ?e,
                    "Attempt failed, retrying"
                );

                if !wait.is_zero() {
                    tokio::select! {
                        biased;
                        () = token.cancelled() => return Err(RetryError::Cancelled),
                        () = sleep(wait) => {}
                    }
                    delay = config.next_delay(delay);
                }
            }
        }
    }
}
