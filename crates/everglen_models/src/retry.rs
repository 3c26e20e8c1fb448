//! Uniform retry policy for completion calls.

use everglen_core::RetryConfig;
use everglen_error::CompletionError;
use std::future::Future;
use std::time::Duration;
use tokio_retry2::strategy::{ExponentialBackoff, jitter};
use tokio_retry2::{Retry, RetryError};
use tracing::{debug, warn};

/// Exponential backoff with jitter, applied to transient completion failures.
///
/// `max_retries` counts attempts after the first, so zero means a single
/// attempt. Only errors whose kind reports `is_retryable()` are retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_retries: usize,
    initial_backoff_ms: u64,
    max_delay: Duration,
}

impl RetryPolicy {
    /// Creates a policy.
    pub fn new(max_retries: usize, initial_backoff_ms: u64, max_delay: Duration) -> Self {
        Self {
            max_retries,
            initial_backoff_ms,
            max_delay,
        }
    }

    /// A policy that never retries.
    pub fn none() -> Self {
        Self::new(0, 0, Duration::ZERO)
    }

    /// Attempts after the first.
    pub fn max_retries(&self) -> usize {
        self.max_retries
    }

    /// Run `operation`, retrying transient failures.
    pub async fn run<T, F, Fut>(&self, mut operation: F) -> Result<T, CompletionError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, CompletionError>>,
    {
        let strategy = ExponentialBackoff::from_millis(self.initial_backoff_ms.max(1))
            .factor(2)
            .max_delay(self.max_delay)
            .map(jitter)
            .take(self.max_retries);

        let mut attempt = 0usize;
        Retry::spawn(strategy, || {
            attempt += 1;
            let current = attempt;
            let fut = operation();
            async move {
                match fut.await {
                    Ok(value) => Ok(value),
                    Err(e) if e.is_retryable() => {
                        warn!(attempt = current, error = %e, "Transient completion failure, will retry");
                        Err(RetryError::Transient {
                            err: e,
                            retry_after: None,
                        })
                    }
                    Err(e) => {
                        debug!(attempt = current, error = %e, "Permanent completion failure");
                        Err(RetryError::Permanent(e))
                    }
                }
            }
        })
        .await
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&RetryConfig::default())
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self::new(
            config.max_retries,
            config.initial_backoff_ms,
            Duration::from_secs(config.max_delay_secs),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use everglen_error::CompletionErrorKind;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn fast(max_retries: usize) -> RetryPolicy {
        RetryPolicy::new(max_retries, 1, Duration::from_millis(2))
    }

    #[tokio::test]
    async fn test_transient_errors_are_retried_until_success() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();

        let result = fast(5)
            .run(|| {
                let n = counter.fetch_add(1, Ordering::SeqCst);
                async move {
                    if n < 2 {
                        Err(CompletionError::new(CompletionErrorKind::from_status(503, "busy")))
                    } else {
                        Ok("done")
                    }
                }
            })
            .await;

        assert_eq!(result.unwrap(), "done");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_bad_request_fails_immediately() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();

        let result: Result<(), _> = fast(5)
            .run(|| {
                counter.fetch_add(1, Ordering::SeqCst);
                async { Err(CompletionError::new(CompletionErrorKind::from_status(413, "too long"))) }
            })
            .await;

        assert!(matches!(
            result.unwrap_err().kind,
            CompletionErrorKind::BadRequest { status: 413, .. }
        ));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_retries_are_bounded() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();

        let result: Result<(), _> = fast(2)
            .run(|| {
                counter.fetch_add(1, Ordering::SeqCst);
                async { Err(CompletionError::new(CompletionErrorKind::RateLimited("slow down".into()))) }
            })
            .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_zero_retries_means_one_attempt() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();

        let result: Result<(), _> = RetryPolicy::none()
            .run(|| {
                counter.fetch_add(1, Ordering::SeqCst);
                async { Err(CompletionError::new(CompletionErrorKind::Http("refused".into()))) }
            })
            .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
