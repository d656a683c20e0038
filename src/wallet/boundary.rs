//! Typed failure channel between wallet operations and the presentation
//! layer.
//!
//! Operations run through [`WalletBoundary::run`], which retries transient
//! failures and publishes progress on a `watch` channel. Final failures come
//! back as [`WalletFailure`] values instead of escaping as ambient errors.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use super::errors::{WalletErrorKind, WalletFailure};
use super::retry::{RetryConfig, RetryObserver, retry_with_observer};
use crate::error::RetryError;

/// Snapshot of the wallet connection as shown to the user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletConnectionState {
    pub is_connected: bool,
    pub is_connecting: bool,
    pub has_error: bool,
    pub error_message: Option<String>,
    pub retry_count: u32,
}

#[derive(Debug)]
pub struct WalletBoundary {
    config: RetryConfig,
    state: watch::Sender<WalletConnectionState>,
}

impl WalletBoundary {
    pub fn new(config: RetryConfig) -> (Self, watch::Receiver<WalletConnectionState>) {
        let (state, rx) = watch::channel(WalletConnectionState::default());
        (Self { config, state }, rx)
    }

    pub fn subscribe(&self) -> watch::Receiver<WalletConnectionState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> WalletConnectionState {
        self.state.borrow().clone()
    }

    /// Run a wallet operation with retries.
    ///
    /// Rejections, insufficient funds and chain mismatches fail on the first
    /// attempt. Cancellation returns the state to idle without flagging an
    /// error.
    pub async fn run<T, E, F, Fut>(
        &self,
        op: F,
        cancel: &CancellationToken,
    ) -> Result<T, WalletFailure>
    where
        E: Display,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        self.state.send_modify(|s| {
            s.is_connecting = true;
            s.has_error = false;
            s.error_message = None;
            s.retry_count = 0;
        });

        let mut observer = StateObserver { state: &self.state };
        let result = retry_with_observer(op, &self.config, cancel, &mut observer).await;

        match result {
            Ok(value) => {
                self.state.send_modify(|s| {
                    s.is_connected = true;
                    s.is_connecting = false;
                });
                Ok(value)
            }
            Err(RetryError::Cancelled { attempts }) => {
                tracing::debug!(attempts, "Wallet operation cancelled");
                self.state.send_modify(|s| s.is_connecting = false);
                Err(WalletFailure::cancelled())
            }
            Err(RetryError::Exhausted { attempts, error } | RetryError::Aborted { attempts, error }) => {
                let failure = WalletFailure::from_error(&error);
                tracing::warn!(
                    code = failure.code,
                    attempts,
                    error = %failure.message,
                    "Wallet operation failed"
                );
                self.state.send_modify(|s| {
                    s.is_connecting = false;
                    s.has_error = true;
                    s.error_message = Some(failure.user_message.clone());
                });
                Err(failure)
            }
        }
    }

    /// Clear any error and return to the idle, disconnected state.
    pub fn reset(&self) {
        self.state.send_replace(WalletConnectionState::default());
    }
}

struct StateObserver<'a> {
    state: &'a watch::Sender<WalletConnectionState>,
}

impl<E: Display> RetryObserver<E> for StateObserver<'_> {
    fn should_retry(&mut self, error: &E, _attempt: u32) -> bool {
        WalletErrorKind::classify(&error.to_string()).is_retryable()
    }

    fn on_retry(&mut self, error: &E, attempt: u32, delay: Duration) {
        tracing::debug!(
            attempt,
            delay_ms = delay.as_millis() as u64,
            error = %error,
            "Retrying wallet operation"
        );
        self.state.send_modify(|s| s.retry_count += 1);
    }
}
