//! Mini-app manifest generation.
//!
//! [`ManifestBuilder`] turns a [`ManifestConfig`] plus the requesting origin
//! into the descriptor served at `/.well-known/farcaster.json`. Building never
//! fails: every malformed or unsafe override is replaced by a computed
//! default so hosts always receive a usable document.

mod sanitize;

use serde::Serialize;

use crate::config::ManifestConfig;

pub use self::sanitize::{FALLBACK_ORIGIN, Origin, is_disallowed_host};

/// `Cache-Control` value attached to served manifests.
pub const MANIFEST_CACHE_CONTROL: &str =
    "public, max-age=300, s-maxage=300, stale-while-revalidate=600";

pub const MANIFEST_VERSION: &str = "1";

pub const DEFAULT_NAME: &str = "Waya Mini App";
pub const DEFAULT_SUBTITLE: &str = "Waya on Farcaster and Base";
pub const DEFAULT_DESCRIPTION: &str =
    "Waya Mini App powered by Li.Fi, available on Farcaster and Base.";
pub const DEFAULT_TAGLINE: &str = "Trade across chains with Waya using Li.Fi";
pub const DEFAULT_SPLASH_BACKGROUND_COLOR: &str = "#FFFFFF";
pub const DEFAULT_TAGS: [&str; 5] = ["waya", "miniapp", "farcaster", "base", "lifi"];

const ICON_PATH: &str = "icon.png";
const SPLASH_PATH: &str = "splash.png";
const WEBHOOK_PATH: &str = "api/webhook";
const HERO_PATH: &str = "hero.png";
const SCREENSHOT_PATH: &str = "screenshot.png";

/// Manifest document served to the hosting platform.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ManifestDescriptor {
    pub account_association: AccountAssociation,
    pub frame: Frame,
}

/// Domain ownership attestation. Emitted verbatim, empty strings included.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct AccountAssociation {
    pub header: String,
    pub payload: String,
    pub signature: String,
}

impl AccountAssociation {
    /// True when all three parts are present.
    pub fn is_complete(&self) -> bool {
        !self.header.is_empty() && !self.payload.is_empty() && !self.signature.is_empty()
    }
}

/// Presentation metadata. Empty strings and lists are never serialized.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Frame {
    pub version: &'static str,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub home_url: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub icon_url: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub splash_image_url: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub splash_background_color: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub webhook_url: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub subtitle: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub screenshot_urls: Vec<String>,
    pub primary_category: PrimaryCategory,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub hero_image_url: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub tagline: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub og_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub og_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub og_image_url: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub required_chains: Vec<String>,
    pub noindex: bool,
}

/// Closed set of categories the hosting platform recognises.
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum PrimaryCategory {
    Games,
    #[default]
    Social,
    Finance,
    Utility,
    Productivity,
    HealthFitness,
    NewsMedia,
    Music,
    Shopping,
    Education,
    DeveloperTools,
    Entertainment,
    ArtCreativity,
}

impl PrimaryCategory {
    pub const ALL: [Self; 13] = [
        Self::Games,
        Self::Social,
        Self::Finance,
        Self::Utility,
        Self::Productivity,
        Self::HealthFitness,
        Self::NewsMedia,
        Self::Music,
        Self::Shopping,
        Self::Education,
        Self::DeveloperTools,
        Self::Entertainment,
        Self::ArtCreativity,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Games => "games",
            Self::Social => "social",
            Self::Finance => "finance",
            Self::Utility => "utility",
            Self::Productivity => "productivity",
            Self::HealthFitness => "health-fitness",
            Self::NewsMedia => "news-media",
            Self::Music => "music",
            Self::Shopping => "shopping",
            Self::Education => "education",
            Self::DeveloperTools => "developer-tools",
            Self::Entertainment => "entertainment",
            Self::ArtCreativity => "art-creativity",
        }
    }

    /// Case-insensitive lookup of a category identifier.
    pub fn parse(value: &str) -> Option<Self> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == normalized)
    }

    /// Parse an override, falling back to the default for anything unknown.
    pub fn sanitize(value: Option<&str>) -> Self {
        match value {
            Some(raw) => Self::parse(raw).unwrap_or_else(|| {
                tracing::debug!(category = raw, "Unknown primary category; using default");
                Self::default()
            }),
            None => Self::default(),
        }
    }
}

impl std::fmt::Display for PrimaryCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Builds manifest descriptors from a fixed configuration.
///
/// Cheap to clone and safe to share across request handlers.
#[derive(Debug, Clone, Default)]
pub struct ManifestBuilder {
    config: ManifestConfig,
}

impl ManifestBuilder {
    pub fn new(config: ManifestConfig) -> Self {
        Self { config }
    }

    /// Pick the configured public origin, else the request's, and normalize it.
    pub fn resolve_origin(&self, request_origin: Option<&str>) -> Origin {
        let candidate = self
            .config
            .public_url
            .as_deref()
            .map(|v| v.trim().trim_end_matches('/'))
            .filter(|v| !v.is_empty())
            .or(request_origin);
        Origin::normalize(candidate)
    }

    /// Build the manifest for a request arriving from `request_origin`
    /// (`scheme://host[:port]`).
    pub fn build(&self, request_origin: Option<&str>) -> ManifestDescriptor {
        let origin = self.resolve_origin(request_origin);
        let cfg = &self.config;

        let account_association = AccountAssociation {
            header: cfg.account_association_header.clone().unwrap_or_default(),
            payload: cfg.account_association_payload.clone().unwrap_or_default(),
            signature: cfg.account_association_signature.clone().unwrap_or_default(),
        };

        let screenshot_urls = {
            let resolved: Vec<String> = parse_list(cfg.screenshot_urls.as_deref())
                .iter()
                .filter_map(|raw| resolve_url_field(&origin, "screenshotUrls", Some(raw)))
                .collect();
            if resolved.is_empty() {
                vec![origin.with_suffix(SCREENSHOT_PATH)]
            } else {
                resolved
            }
        };

        let tags = {
            let parsed = parse_list(cfg.tags.as_deref());
            if parsed.is_empty() {
                DEFAULT_TAGS.iter().map(|t| t.to_string()).collect()
            } else {
                parsed
            }
        };

        let splash_background_color = match cfg.splash_background_color.as_deref().map(str::trim)
        {
            Some(color) if sanitize::is_hex_color(color) => color.to_string(),
            Some(color) => {
                tracing::debug!(color, "Invalid splash background color; using default");
                DEFAULT_SPLASH_BACKGROUND_COLOR.to_string()
            }
            None => DEFAULT_SPLASH_BACKGROUND_COLOR.to_string(),
        };

        let frame = Frame {
            version: MANIFEST_VERSION,
            name: text_or(cfg.name.as_deref(), DEFAULT_NAME),
            home_url: url_or_default(&origin, "homeUrl", cfg.home_url.as_deref(), ""),
            icon_url: url_or_default(&origin, "iconUrl", cfg.icon_url.as_deref(), ICON_PATH),
            splash_image_url: url_or_default(
                &origin,
                "splashImageUrl",
                cfg.splash_image_url.as_deref(),
                SPLASH_PATH,
            ),
            splash_background_color,
            webhook_url: url_or_default(
                &origin,
                "webhookUrl",
                cfg.webhook_url.as_deref(),
                WEBHOOK_PATH,
            ),
            subtitle: text_or(cfg.subtitle.as_deref(), DEFAULT_SUBTITLE),
            description: text_or(cfg.description.as_deref(), DEFAULT_DESCRIPTION),
            screenshot_urls,
            primary_category: PrimaryCategory::sanitize(cfg.primary_category.as_deref()),
            tags,
            hero_image_url: url_or_default(
                &origin,
                "heroImageUrl",
                cfg.hero_image_url.as_deref(),
                HERO_PATH,
            ),
            tagline: text_or(cfg.tagline.as_deref(), DEFAULT_TAGLINE),
            og_title: optional_text(cfg.og_title.as_deref()),
            og_description: optional_text(cfg.og_description.as_deref()),
            og_image_url: resolve_url_field(&origin, "ogImageUrl", cfg.og_image_url.as_deref()),
            required_chains: parse_list(cfg.required_chains.as_deref()),
            noindex: parse_flag(cfg.noindex.as_deref()),
        };

        tracing::debug!(
            origin = %origin,
            account_association = account_association.is_complete(),
            "Built mini-app manifest"
        );

        ManifestDescriptor {
            account_association,
            frame,
        }
    }
}

/// Split a comma-separated override, trimming and dropping empty entries.
pub fn parse_list(raw: Option<&str>) -> Vec<String> {
    raw.map(|value| {
        value
            .split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

fn parse_flag(raw: Option<&str>) -> bool {
    raw.map(|v| v.trim().to_ascii_lowercase())
        .is_some_and(|v| matches!(v.as_str(), "true" | "1" | "yes" | "on"))
}

fn optional_text(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn text_or(raw: Option<&str>, default: &str) -> String {
    optional_text(raw).unwrap_or_else(|| default.to_string())
}

fn resolve_url_field(origin: &Origin, field: &'static str, raw: Option<&str>) -> Option<String> {
    let resolved = origin.resolve(raw);
    if resolved.is_none()
        && let Some(raw) = raw.filter(|v| !v.trim().is_empty())
    {
        tracing::debug!(field, value = raw, "Rejected manifest URL override");
    }
    resolved
}

fn url_or_default(origin: &Origin, field: &'static str, raw: Option<&str>, suffix: &str) -> String {
    resolve_url_field(origin, field, raw).unwrap_or_else(|| origin.with_suffix(suffix))
}
