use std::time::Duration;

use crate::config::helpers::parse_optional_env;
use crate::error::ConfigError;
use crate::settings::Settings;
use crate::wallet::RetryConfig;

impl RetryConfig {
    /// Resolve wallet retry tuning with env var > TOML settings > default priority.
    pub(crate) fn resolve(settings: &Settings) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let r = &settings.retry;

        let max_retries = parse_optional_env::<u32>(
            "WALLET_RETRY_MAX_RETRIES",
            "must be a non-negative integer",
        )?
        .or(r.max_retries)
        .unwrap_or(defaults.max_retries);

        let base_delay_ms = parse_optional_env::<u64>(
            "WALLET_RETRY_BASE_DELAY_MS",
            "must be a non-negative integer",
        )?
        .or(r.base_delay_ms);

        let max_delay_ms = parse_optional_env::<u64>(
            "WALLET_RETRY_MAX_DELAY_MS",
            "must be a non-negative integer",
        )?
        .or(r.max_delay_ms);

        let backoff_multiplier = parse_optional_env::<f64>(
            "WALLET_RETRY_BACKOFF_MULTIPLIER",
            "must be a number",
        )?
        .or(r.backoff_multiplier)
        .unwrap_or(defaults.backoff_multiplier);
        // Delays must strictly grow until they reach the cap.
        if !backoff_multiplier.is_finite() || backoff_multiplier <= 1.0 {
            return Err(ConfigError::InvalidValue {
                key: "WALLET_RETRY_BACKOFF_MULTIPLIER".to_string(),
                message: "must be a finite number > 1".to_string(),
            });
        }

        let base_delay = base_delay_ms
            .map(Duration::from_millis)
            .unwrap_or(defaults.base_delay);
        let max_delay = max_delay_ms
            .map(Duration::from_millis)
            .unwrap_or(defaults.max_delay);
        if max_delay < base_delay {
            return Err(ConfigError::InvalidValue {
                key: "WALLET_RETRY_MAX_DELAY_MS".to_string(),
                message: format!(
                    "must be >= base delay ({} ms)",
                    base_delay.as_millis()
                ),
            });
        }

        Ok(Self {
            max_retries,
            base_delay,
            max_delay,
            backoff_multiplier,
        })
    }
}
