//! Wallet-side helpers: retry with backoff, error classification, address
//! formatting, debouncing and the typed failure boundary.

mod boundary;
mod debounce;
mod errors;
mod format;
mod retry;

pub use boundary::{WalletBoundary, WalletConnectionState};
pub use debounce::Debouncer;
pub use errors::{
    WalletErrorKind, WalletFailure, is_wallet_error, unknown_wallet_error_message,
    wallet_error_message,
};
pub use format::{format_wallet_address, format_wallet_address_default};
pub use retry::{
    AlwaysRetry, RetryConfig, RetryObserver, calculate_retry_delay, retry_with_backoff,
    retry_with_backoff_cancellable, retry_with_observer,
};
