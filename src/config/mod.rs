//! Configuration for the Waya mini-app service.
//!
//! Settings are loaded with priority: env var > TOML config file > default.
//! Env files (`./.env`, `~/.waya-miniapp/.env`) are loaded via dotenvy
//! before anything is resolved.
//!
//! Manifest overrides are collected verbatim into [`ManifestConfig`] and
//! never fail to resolve. Server and retry settings are strict and report
//! bad values as [`ConfigError::InvalidValue`].

pub(crate) mod helpers;
mod manifest;
mod retry;
mod server;

use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::settings::Settings;
use crate::wallet::RetryConfig;

pub use self::manifest::ManifestConfig;
pub use self::server::ServerConfig;

#[cfg(test)]
pub(crate) static ENV_MUTEX: std::sync::Mutex<()> = std::sync::Mutex::new(());

/// Main configuration for the service.
#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub manifest: ManifestConfig,
    pub retry: RetryConfig,
}

impl Config {
    /// Load configuration from env files, env vars and the default TOML file.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_with_toml(None)
    }

    /// Load from env with an optional TOML config file overlay.
    pub fn from_env_with_toml(toml_path: Option<&Path>) -> Result<Self, ConfigError> {
        crate::bootstrap::load_env_files();
        let settings = Self::load_settings(toml_path)?;
        Self::build(&settings)
    }

    /// Load the TOML settings file.
    ///
    /// If `explicit_path` is `Some`, loads from that path (errors are fatal).
    /// If `None`, tries the default path `~/.waya-miniapp/config.toml` (a
    /// missing or broken default file only logs a warning).
    fn load_settings(explicit_path: Option<&Path>) -> Result<Settings, ConfigError> {
        let path = explicit_path
            .map(PathBuf::from)
            .unwrap_or_else(Settings::default_toml_path);

        match Settings::load_toml(&path) {
            Ok(Some(settings)) => {
                tracing::debug!("Loaded TOML config from {}", path.display());
                Ok(settings)
            }
            Ok(None) => {
                if explicit_path.is_some() {
                    return Err(ConfigError::ParseError(format!(
                        "Config file not found: {}",
                        path.display()
                    )));
                }
                Ok(Settings::default())
            }
            Err(e) => {
                if explicit_path.is_some() {
                    return Err(ConfigError::ParseError(format!(
                        "Failed to load config file {}: {}",
                        path.display(),
                        e
                    )));
                }
                tracing::warn!("Failed to load default config file: {}", e);
                Ok(Settings::default())
            }
        }
    }

    /// Build config from settings.
    pub fn build(settings: &Settings) -> Result<Self, ConfigError> {
        Ok(Self {
            server: ServerConfig::resolve(settings)?,
            manifest: ManifestConfig::resolve(settings),
            retry: RetryConfig::resolve(settings)?,
        })
    }
}
