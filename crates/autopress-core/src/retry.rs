//! Retry engine with exponential backoff
//!
//! Wraps a fallible async operation and re-invokes it on transient failures.
//! Every failure is converted into a [`StructuredError`] (classifying raw
//! errors on the way in), retryability is decided from the error itself plus
//! an optional category allow-list, and the delay between attempts grows
//! exponentially up to a cap. The delay schedule is strictly deterministic —
//! no jitter — so timing is exactly reproducible.

use crate::error::{AutopressResult, ErrorCategory, StructuredError};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::warn;

/// Observer invoked before each backoff sleep with the completed attempt
/// number and the failure that triggered the retry.
pub type RetryObserver = Arc<dyn Fn(u32, &StructuredError) + Send + Sync>;

/// Per-call-site retry policy.
#[derive(Clone)]
pub struct RetryOptions {
    /// Total attempt budget, first try included
    pub max_attempts: u32,
    /// Delay before the second attempt
    pub initial_delay: Duration,
    /// Cap on the per-attempt delay
    pub max_delay: Duration,
    /// Multiplier applied to the delay after each failed attempt
    pub backoff_factor: f64,
    /// Optional allow-list; when present, only these categories retry
    pub retryable_categories: Option<Vec<ErrorCategory>>,
    /// Optional observer called with (attempt, error) before each sleep
    pub on_retry: Option<RetryObserver>,
}

impl Default for RetryOptions {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_millis(1000),
            max_delay: Duration::from_millis(30_000),
            backoff_factor: 2.0,
            retryable_categories: None,
            on_retry: None,
        }
    }
}

impl std::fmt::Debug for RetryOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RetryOptions")
            .field("max_attempts", &self.max_attempts)
            .field("initial_delay", &self.initial_delay)
            .field("max_delay", &self.max_delay)
            .field("backoff_factor", &self.backoff_factor)
            .field("retryable_categories", &self.retryable_categories)
            .field("on_retry", &self.on_retry.as_ref().map(|_| "..."))
            .finish()
    }
}

impl RetryOptions {
    /// Create options with the default policy
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the total attempt budget
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Set the initial backoff delay
    pub fn with_initial_delay(mut self, initial_delay: Duration) -> Self {
        self.initial_delay = initial_delay;
        self
    }

    /// Set the backoff delay cap
    pub fn with_max_delay(mut self, max_delay: Duration) -> Self {
        self.max_delay = max_delay;
        self
    }

    /// Set the backoff multiplier
    pub fn with_backoff_factor(mut self, backoff_factor: f64) -> Self {
        self.backoff_factor = backoff_factor;
        self
    }

    /// Restrict retries to the given categories
    pub fn with_retryable_categories(mut self, categories: Vec<ErrorCategory>) -> Self {
        self.retryable_categories = Some(categories);
        self
    }

    /// Install a retry observer
    pub fn with_on_retry<F>(mut self, observer: F) -> Self
    where
        F: Fn(u32, &StructuredError) + Send + Sync + 'static,
    {
        self.on_retry = Some(Arc::new(observer));
        self
    }
}

/// Backoff delay after the given (1-based) failed attempt:
/// `min(initial_delay * backoff_factor^(attempt-1), max_delay)`.
pub fn backoff_delay(attempt: u32, options: &RetryOptions) -> Duration {
    let exponent = attempt.saturating_sub(1);
    let factor = options.backoff_factor.powi(exponent as i32);
    let millis = (options.initial_delay.as_millis() as f64 * factor).round();
    // Saturating float cast; the cap below bounds it either way.
    Duration::from_millis(millis as u64).min(options.max_delay)
}

/// Invoke `operation` until it succeeds, its failure is non-retryable, or
/// the attempt budget is exhausted.
///
/// Attempts are strictly sequential: attempt n+1 never starts before attempt
/// n has failed and the corresponding backoff delay has elapsed. A success
/// returns immediately with no further attempts and no delay. Once the
/// engine gives up, the last failure is returned to the caller, which then
/// owns it.
pub async fn with_retry<T, E, F, Fut>(
    mut operation: F,
    options: &RetryOptions,
) -> AutopressResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Into<StructuredError>,
{
    let mut attempt: u32 = 1;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(raw) => {
                let error: StructuredError = raw.into();
                let category_allowed = options
                    .retryable_categories
                    .as_ref()
                    .is_none_or(|allowed| allowed.contains(&error.category));
                if !(error.retryable && category_allowed) || attempt >= options.max_attempts {
                    return Err(error);
                }
                let delay = backoff_delay(attempt, options);
                if let Some(observer) = &options.on_retry {
                    observer(attempt, &error);
                }
                warn!(
                    attempt,
                    max_attempts = options.max_attempts,
                    delay_ms = delay.as_millis() as u64,
                    category = %error.category,
                    error = %error,
                    "attempt failed, retrying"
                );
                sleep(delay).await;
                attempt += 1;
            }
        }
    }
}
