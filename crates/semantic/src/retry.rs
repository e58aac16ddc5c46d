//! Retry logic with exponential backoff for embedding API calls.
//!
//! Only transient failures are retried; the caller decides what "transient"
//! means through a predicate, and [`is_retryable_error`] covers the common
//! HTTP and network cases.

use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::warn;

/// Configuration for retry behavior.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct RetryConfig {
    /// Maximum number of retry attempts after the first try.
    pub max_retries: u32,
    /// Initial delay between retries (base for exponential backoff) in milliseconds.
    #[serde(with = "crate::serde_millis")]
    pub base_delay: Duration,
    /// Maximum delay between retries in milliseconds.
    #[serde(with = "crate::serde_millis")]
    pub max_delay: Duration,
    /// Multiplier for exponential backoff.
    pub backoff_multiplier: f64,
    /// Add random jitter to prevent synchronized retries.
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(5),
            backoff_multiplier: 2.0,
            jitter: true,
        }
    }
}

impl RetryConfig {
    pub fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    pub fn with_base_delay(mut self, delay: Duration) -> Self {
        self.base_delay = delay;
        self
    }

    pub fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    pub fn with_backoff_multiplier(mut self, multiplier: f64) -> Self {
        self.backoff_multiplier = multiplier;
        self
    }

    pub fn with_jitter(mut self, jitter: bool) -> Self {
        self.jitter = jitter;
        self
    }

    /// Delay before retry number `attempt` (1-indexed; attempt 0 is the first try).
    pub fn calculate_delay(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return Duration::ZERO;
        }

        let exponential = self.base_delay.as_millis() as f64
            * self
                .backoff_multiplier
                .powi(i32::try_from(attempt - 1).unwrap_or(i32::MAX));
        let delay_ms = exponential.min(self.max_delay.as_millis() as f64) as u64;

        // ±25% jitter
        if self.jitter {
            let jitter_range = delay_ms / 4;
            if jitter_range > 0 {
                let jitter = fastrand::u64(0..jitter_range * 2);
                return Duration::from_millis(delay_ms - jitter_range + jitter);
            }
        }

        Duration::from_millis(delay_ms)
    }
}

/// Result of a retryable operation.
#[derive(Debug, Clone)]
pub struct RetryResult<T, E> {
    /// The final result (success or last error).
    pub result: Result<T, E>,
    /// Number of attempts made (1 = first try succeeded).
    pub attempts: u32,
    /// Total time spent, including backoff sleeps.
    pub total_duration: Duration,
}

impl<T, E> RetryResult<T, E> {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    pub fn into_result(self) -> Result<T, E> {
        self.result
    }
}

/// Run `operation` until it succeeds, fails with a non-retryable error, or
/// the retry budget is spent.
///
/// # Example
/// ```
/// use semantic::retry::{execute_with_retry_async, RetryConfig};
/// use std::time::Duration;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let config = RetryConfig::default()
///     .with_max_retries(3)
///     .with_base_delay(Duration::from_millis(1));
///
/// let result = execute_with_retry_async(
///     &config,
///     |_: &String| true,
///     |attempt| async move {
///         if attempt == 0 {
///             Err("transient error".to_string())
///         } else {
///             Ok("success")
///         }
///     },
/// )
/// .await;
///
/// assert!(result.is_success());
/// assert_eq!(result.attempts, 2);
/// # }
/// ```
pub async fn execute_with_retry_async<T, E, P, F, Fut>(
    config: &RetryConfig,
    retryable: P,
    mut operation: F,
) -> RetryResult<T, E>
where
    E: std::fmt::Display,
    P: Fn(&E) -> bool,
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let start = Instant::now();
    let mut attempt = 0;

    loop {
        match operation(attempt).await {
            Ok(value) => {
                return RetryResult {
                    result: Ok(value),
                    attempts: attempt + 1,
                    total_duration: start.elapsed(),
                };
            }
            Err(err) => {
                if attempt >= config.max_retries || !retryable(&err) {
                    return RetryResult {
                        result: Err(err),
                        attempts: attempt + 1,
                        total_duration: start.elapsed(),
                    };
                }

                attempt += 1;
                let delay = config.calculate_delay(attempt);
                warn!(attempt, delay_ms = delay.as_millis() as u64, error = %err, "retrying request");
                if !delay.is_zero() {
                    sleep(delay).await;
                }
            }
        }
    }
}

/// Determine if an error message describes a transient failure.
pub fn is_retryable_error(error: &str) -> bool {
    let error_lower = error.to_lowercase();

    if error_lower.contains("timeout")
        || error_lower.contains("timed out")
        || error_lower.contains("connection")
        || error_lower.contains("reset")
        || error_lower.contains("refused")
        || error_lower.contains("dns")
        || error_lower.contains("unreachable")
    {
        return true;
    }

    if error_lower.contains("503") // Service Unavailable
        || error_lower.contains("502") // Bad Gateway
        || error_lower.contains("504") // Gateway Timeout
        || error_lower.contains("429") // Too Many Requests
        || error_lower.contains("500")
        || error_lower.contains("524")
    {
        return true;
    }

    if error_lower.contains("400")
        || error_lower.contains("401")
        || error_lower.contains("403")
        || error_lower.contains("404")
        || error_lower.contains("422")
    {
        return false;
    }

    true
}
