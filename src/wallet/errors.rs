//! Wallet failure classification and user-facing messages.
//!
//! These are substring heuristics over error text. They never fail; text
//! that matches nothing falls through to a generic description.

use std::fmt::Display;
use std::sync::LazyLock;

use aho_corasick::AhoCorasick;
use serde::Serialize;

const WALLET_KEYWORDS: [&str; 12] = [
    "wallet",
    "sign",
    "signature",
    "transaction",
    "user rejected",
    "user denied",
    "connection",
    "network",
    "chain",
    "metamask",
    "coinbase",
    "walletconnect",
];

static WALLET_KEYWORD_MATCHER: LazyLock<AhoCorasick> = LazyLock::new(|| {
    AhoCorasick::builder()
        .ascii_case_insensitive(true)
        .build(WALLET_KEYWORDS)
        .expect("valid wallet keyword patterns")
});

pub const USER_REJECTED_MESSAGE: &str = "Transaction was rejected by user";
pub const INSUFFICIENT_FUNDS_MESSAGE: &str = "Insufficient funds for transaction";
pub const NETWORK_MESSAGE: &str =
    "Network connection issue. Please check your internet connection.";
pub const CHAIN_MISMATCH_MESSAGE: &str =
    "Chain mismatch. Please ensure you are on the correct network.";
pub const WALLET_CONNECTION_MESSAGE: &str =
    "Wallet connection issue. Please try reconnecting your wallet.";
pub const GENERIC_WALLET_MESSAGE: &str = "An error occurred with your wallet";
pub const UNKNOWN_ERROR_MESSAGE: &str = "An unknown error occurred";
pub const CANCELLED_MESSAGE: &str = "Wallet operation was cancelled";

/// Whether the error text mentions a wallet-related keyword.
pub fn is_wallet_error(error: &(impl Display + ?Sized)) -> bool {
    WALLET_KEYWORD_MATCHER.is_match(&error.to_string())
}

/// User-facing message for a wallet failure.
///
/// Matching is case-sensitive, so provider text such as `"Network Error"`
/// is shown as-is.
pub fn wallet_error_message(error: &(impl Display + ?Sized)) -> String {
    let raw = error.to_string();
    match WalletErrorKind::match_text(&raw).user_message() {
        Some(message) => message.to_string(),
        None if raw.is_empty() => GENERIC_WALLET_MESSAGE.to_string(),
        None => raw,
    }
}

/// Message for the case where no error value exists at all.
pub fn unknown_wallet_error_message() -> &'static str {
    UNKNOWN_ERROR_MESSAGE
}

/// Coarse category of a wallet failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WalletErrorKind {
    UserRejected,
    InsufficientFunds,
    Network,
    ChainMismatch,
    Wallet,
    /// Abandoned by the caller; never produced by [`WalletErrorKind::classify`].
    Cancelled,
    Other,
}

impl WalletErrorKind {
    /// First matching category, checked in priority order, ignoring case.
    pub fn classify(message: &str) -> Self {
        Self::match_text(&message.to_ascii_lowercase())
    }

    fn match_text(text: &str) -> Self {
        if text.contains("user rejected") || text.contains("user denied") {
            Self::UserRejected
        } else if text.contains("insufficient funds") {
            Self::InsufficientFunds
        } else if text.contains("network") {
            Self::Network
        } else if text.contains("chain") {
            Self::ChainMismatch
        } else if text.contains("wallet") {
            Self::Wallet
        } else {
            Self::Other
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Self::UserRejected => "wallet.user_rejected",
            Self::InsufficientFunds => "wallet.insufficient_funds",
            Self::Network => "wallet.network",
            Self::ChainMismatch => "wallet.chain_mismatch",
            Self::Wallet => "wallet.connection",
            Self::Cancelled => "wallet.cancelled",
            Self::Other => "wallet.unknown",
        }
    }

    /// Retrying cannot fix a refusal, an empty balance or a wrong network.
    pub fn is_retryable(self) -> bool {
        !matches!(
            self,
            Self::UserRejected | Self::InsufficientFunds | Self::ChainMismatch
        )
    }

    fn user_message(self) -> Option<&'static str> {
        match self {
            Self::UserRejected => Some(USER_REJECTED_MESSAGE),
            Self::InsufficientFunds => Some(INSUFFICIENT_FUNDS_MESSAGE),
            Self::Network => Some(NETWORK_MESSAGE),
            Self::ChainMismatch => Some(CHAIN_MISMATCH_MESSAGE),
            Self::Wallet => Some(WALLET_CONNECTION_MESSAGE),
            Self::Cancelled => Some(CANCELLED_MESSAGE),
            Self::Other => None,
        }
    }
}

/// Typed failure handed from wallet operations to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(rename_all = "camelCase")]
#[error("{user_message}")]
pub struct WalletFailure {
    pub kind: WalletErrorKind,
    pub code: &'static str,
    pub retryable: bool,
    /// Raw error text as produced by the wallet provider.
    pub message: String,
    pub user_message: String,
}

impl WalletFailure {
    pub fn from_error(error: &(impl Display + ?Sized)) -> Self {
        let message = error.to_string();
        let kind = WalletErrorKind::classify(&message);
        Self {
            kind,
            code: kind.code(),
            retryable: kind.is_retryable(),
            user_message: wallet_error_message(&message),
            message,
        }
    }

    pub fn cancelled() -> Self {
        let kind = WalletErrorKind::Cancelled;
        Self {
            kind,
            code: kind.code(),
            retryable: kind.is_retryable(),
            message: CANCELLED_MESSAGE.to_string(),
            user_message: CANCELLED_MESSAGE.to_string(),
        }
    }
}
