//! Error types for the Waya mini-app service.

/// Top-level error type for the service.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Server error: {0}")]
    Server(#[from] ServerError),
}

/// Configuration-related errors.
///
/// Only server and retry settings can fail to resolve. Manifest overrides
/// never produce a `ConfigError`; bad values fall back to defaults instead.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),
}

/// HTTP server errors.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Server {name} failed to start: {reason}")]
    StartupFailed { name: String, reason: String },

    #[error("Server {name} stopped unexpectedly: {reason}")]
    Serve { name: String, reason: String },
}

/// Failure of a retried operation.
///
/// `E` is the operation's own error type; it is handed back untouched so the
/// caller sees exactly what the last attempt produced.
#[derive(Debug, thiserror::Error)]
pub enum RetryError<E> {
    #[error("operation failed after {attempts} attempt(s): {error}")]
    Exhausted { attempts: u32, error: E },

    #[error("operation failed with a non-retryable error after {attempts} attempt(s): {error}")]
    Aborted { attempts: u32, error: E },

    #[error("operation cancelled after {attempts} attempt(s)")]
    Cancelled { attempts: u32 },
}

impl<E> RetryError<E> {
    /// Number of times the operation was invoked.
    pub fn attempts(&self) -> u32 {
        match self {
            Self::Exhausted { attempts, .. }
            | Self::Aborted { attempts, .. }
            | Self::Cancelled { attempts } => *attempts,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }

    /// The last operation error, if the sequence ended on one.
    pub fn into_inner(self) -> Option<E> {
        match self {
            Self::Exhausted { error, .. } | Self::Aborted { error, .. } => Some(error),
            Self::Cancelled { .. } => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retry_error_exposes_last_failure() {
        let err: RetryError<String> = RetryError::Exhausted {
            attempts: 3,
            error: "network down".to_string(),
        };
        assert_eq!(err.attempts(), 3);
        assert!(!err.is_cancelled());
        assert_eq!(
            err.to_string(),
            "operation failed after 3 attempt(s): network down"
        );
        assert_eq!(err.into_inner().as_deref(), Some("network down"));
    }

    #[test]
    fn cancelled_retry_has_no_inner_error() {
        let err: RetryError<String> = RetryError::Cancelled { attempts: 1 };
        assert!(err.is_cancelled());
        assert!(err.into_inner().is_none());
    }

    #[test]
    fn config_error_names_the_key() {
        let err = Error::from(ConfigError::InvalidValue {
            key: "MINIAPP_PORT".to_string(),
            message: "must be a valid port number".to_string(),
        });
        assert_eq!(
            err.to_string(),
            "Configuration error: Invalid configuration value for MINIAPP_PORT: must be a valid port number"
        );
    }
}
