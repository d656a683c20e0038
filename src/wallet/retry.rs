//! Exponential-backoff retry for wallet operations.
//!
//! Attempts run strictly one after another. Between failures the helper
//! sleeps `min(base_delay * backoff_multiplier^attempt, max_delay)` using a
//! cooperative tokio timer, so other tasks keep running while it waits.

use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::error::RetryError;

/// Retry budget and backoff curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryConfig {
    /// Retries after the first attempt; the operation runs at most
    /// `max_retries + 1` times.
    pub max_retries: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
    pub backoff_multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_millis(1000),
            max_delay: Duration::from_millis(30_000),
            backoff_multiplier: 2.0,
        }
    }
}

/// Delay to wait after the failure of attempt `attempt` (0-based).
///
/// A zero base delay always yields zero. Other results that overflow, are
/// not finite, or exceed the cap clamp to `max_delay`.
pub fn calculate_retry_delay(attempt: u32, config: &RetryConfig) -> Duration {
    if config.base_delay.is_zero() {
        return Duration::ZERO;
    }
    let factor = config.backoff_multiplier.powf(f64::from(attempt));
    let secs = config.base_delay.as_secs_f64() * factor;
    match Duration::try_from_secs_f64(secs) {
        Ok(delay) => delay.min(config.max_delay),
        Err(_) => config.max_delay,
    }
}

/// Run `op` until it succeeds or the retry budget is spent.
///
/// The last failure is returned verbatim; earlier failures are dropped.
pub async fn retry_with_backoff<T, E, F, Fut>(mut op: F, config: &RetryConfig) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut attempt: u32 = 0;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(error) if attempt >= config.max_retries => {
                tracing::debug!(attempts = attempt + 1, "Retry budget exhausted");
                return Err(error);
            }
            Err(_) => {
                let delay = calculate_retry_delay(attempt, config);
                tracing::debug!(
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    "Operation failed; retrying after backoff"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}

/// Hooks into a retry sequence.
pub trait RetryObserver<E> {
    /// Return `false` to stop retrying and surface `error` immediately.
    fn should_retry(&mut self, _error: &E, _attempt: u32) -> bool {
        true
    }

    /// Called after a failed attempt, just before sleeping `delay`.
    fn on_retry(&mut self, _error: &E, _attempt: u32, _delay: Duration) {}
}

/// Observer that retries every failure.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysRetry;

impl<E> RetryObserver<E> for AlwaysRetry {}

/// Like [`retry_with_backoff`], but abandons the sequence when `cancel`
/// fires, whether an attempt is in flight or a delay is pending.
pub async fn retry_with_backoff_cancellable<T, E, F, Fut>(
    op: F,
    config: &RetryConfig,
    cancel: &CancellationToken,
) -> Result<T, RetryError<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    retry_with_observer(op, config, cancel, &mut AlwaysRetry).await
}

/// Cancellable retry loop with an observer that can veto retries.
pub async fn retry_with_observer<T, E, F, Fut, O>(
    mut op: F,
    config: &RetryConfig,
    cancel: &CancellationToken,
    observer: &mut O,
) -> Result<T, RetryError<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    O: RetryObserver<E> + ?Sized,
{
    let mut attempt: u32 = 0;
    loop {
        if cancel.is_cancelled() {
            return Err(RetryError::Cancelled { attempts: attempt });
        }

        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::debug!(attempt, "Retry cancelled during attempt");
                return Err(RetryError::Cancelled { attempts: attempt + 1 });
            }
            outcome = op() => outcome,
        };

        let error = match outcome {
            Ok(value) => return Ok(value),
            Err(error) => error,
        };
        let attempts = attempt + 1;

        if attempt >= config.max_retries {
            tracing::debug!(attempts, "Retry budget exhausted");
            return Err(RetryError::Exhausted { attempts, error });
        }
        if !observer.should_retry(&error, attempt) {
            tracing::debug!(attempts, "Failure is not retryable");
            return Err(RetryError::Aborted { attempts, error });
        }

        let delay = calculate_retry_delay(attempt, config);
        observer.on_retry(&error, attempt, delay);
        tracing::debug!(
            attempt,
            delay_ms = delay.as_millis() as u64,
            "Operation failed; retrying after backoff"
        );

        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::debug!(attempts, "Retry cancelled during backoff");
                return Err(RetryError::Cancelled { attempts });
            }
            _ = tokio::time::sleep(delay) => {}
        }
        attempt += 1;
    }
}
