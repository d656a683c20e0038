//! Optional TOML settings file.
//!
//! Stored at `~/.waya-miniapp/config.toml` unless a path is given on the
//! command line. Values here sit between env vars (which win) and built-in
//! defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Settings loaded from the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,

    #[serde(default)]
    pub manifest: ManifestSettings,

    #[serde(default)]
    pub retry: RetrySettings,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ServerSettings {
    #[serde(default)]
    pub host: Option<String>,

    #[serde(default)]
    pub port: Option<u16>,
}

/// Manifest overrides. Every field is optional; absent means "use default".
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ManifestSettings {
    /// Public origin the manifest advertises (e.g. `https://app.example.com`).
    #[serde(default, alias = "origin")]
    pub public_url: Option<String>,

    #[serde(default)]
    pub account_association_header: Option<String>,
    #[serde(default)]
    pub account_association_payload: Option<String>,
    #[serde(default)]
    pub account_association_signature: Option<String>,

    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tagline: Option<String>,

    #[serde(default)]
    pub home_url: Option<String>,
    #[serde(default)]
    pub icon_url: Option<String>,
    #[serde(default)]
    pub splash_image_url: Option<String>,
    #[serde(default)]
    pub splash_background_color: Option<String>,
    #[serde(default)]
    pub webhook_url: Option<String>,
    #[serde(default)]
    pub hero_image_url: Option<String>,

    #[serde(default)]
    pub og_title: Option<String>,
    #[serde(default)]
    pub og_description: Option<String>,
    #[serde(default)]
    pub og_image_url: Option<String>,

    #[serde(default, alias = "category")]
    pub primary_category: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub required_chains: Option<Vec<String>>,
    #[serde(default, alias = "screenshots")]
    pub screenshot_urls: Option<Vec<String>>,

    #[serde(default)]
    pub noindex: Option<bool>,
}

/// Retry tuning for wallet operations. Delays are in milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct RetrySettings {
    #[serde(default)]
    pub max_retries: Option<u32>,
    #[serde(default)]
    pub base_delay_ms: Option<u64>,
    #[serde(default)]
    pub max_delay_ms: Option<u64>,
    #[serde(default)]
    pub backoff_multiplier: Option<f64>,
}

impl Settings {
    /// `~/.waya-miniapp/config.toml`.
    pub fn default_toml_path() -> PathBuf {
        crate::bootstrap::miniapp_home_dir().join("config.toml")
    }

    /// Load settings from a TOML file.
    ///
    /// Returns `Ok(None)` when the file does not exist.
    pub fn load_toml(path: &Path) -> Result<Option<Self>, String> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(format!("failed to read {}: {e}", path.display())),
        };
        toml::from_str(&content)
            .map(Some)
            .map_err(|e| format!("invalid TOML in {}: {e}", path.display()))
    }
}
