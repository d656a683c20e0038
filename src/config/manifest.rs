use crate::config::helpers::first_non_empty_env;
use crate::settings::Settings;

/// Raw manifest overrides handed to [`crate::manifest::ManifestBuilder`].
///
/// Values are unvalidated strings exactly as configured; list fields are
/// comma-separated. The builder owns all sanitization, so any combination
/// of values here is acceptable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManifestConfig {
    pub public_url: Option<String>,

    pub account_association_header: Option<String>,
    pub account_association_payload: Option<String>,
    pub account_association_signature: Option<String>,

    pub name: Option<String>,
    pub subtitle: Option<String>,
    pub description: Option<String>,
    pub tagline: Option<String>,

    pub home_url: Option<String>,
    pub icon_url: Option<String>,
    pub splash_image_url: Option<String>,
    pub splash_background_color: Option<String>,
    pub webhook_url: Option<String>,
    pub hero_image_url: Option<String>,

    pub og_title: Option<String>,
    pub og_description: Option<String>,
    pub og_image_url: Option<String>,

    pub primary_category: Option<String>,
    pub tags: Option<String>,
    pub required_chains: Option<String>,
    pub screenshot_urls: Option<String>,

    pub noindex: Option<String>,
}

// Alias lists are in precedence order: the first non-empty var wins.
pub(crate) const PUBLIC_URL_ENV: &[&str] = &["NEXT_PUBLIC_URL", "PUBLIC_URL"];
pub(crate) const HEADER_ENV: &[&str] = &["FARCASTER_HEADER", "FARCASTER_ACCOUNT_ASSOCIATION_HEADER"];
pub(crate) const PAYLOAD_ENV: &[&str] =
    &["FARCASTER_PAYLOAD", "FARCASTER_ACCOUNT_ASSOCIATION_PAYLOAD"];
pub(crate) const SIGNATURE_ENV: &[&str] =
    &["FARCASTER_SIGNATURE", "FARCASTER_ACCOUNT_ASSOCIATION_SIGNATURE"];
pub(crate) const NAME_ENV: &[&str] = &["NEXT_PUBLIC_APP_NAME", "NEXT_PUBLIC_ONCHAINKIT_PROJECT_NAME"];
pub(crate) const SUBTITLE_ENV: &[&str] = &["NEXT_PUBLIC_APP_SUBTITLE"];
pub(crate) const DESCRIPTION_ENV: &[&str] = &["NEXT_PUBLIC_APP_DESCRIPTION"];
pub(crate) const TAGLINE_ENV: &[&str] = &["NEXT_PUBLIC_APP_TAGLINE"];
pub(crate) const HOME_URL_ENV: &[&str] = &["NEXT_PUBLIC_APP_HOME_URL"];
pub(crate) const ICON_URL_ENV: &[&str] = &["NEXT_PUBLIC_APP_ICON", "NEXT_PUBLIC_ICON_URL"];
pub(crate) const SPLASH_IMAGE_ENV: &[&str] =
    &["NEXT_PUBLIC_APP_SPLASH_IMAGE", "NEXT_PUBLIC_SPLASH_IMAGE_URL"];
pub(crate) const SPLASH_COLOR_ENV: &[&str] = &["NEXT_PUBLIC_SPLASH_BACKGROUND_COLOR"];
pub(crate) const WEBHOOK_URL_ENV: &[&str] = &["NEXT_PUBLIC_APP_WEBHOOK_URL", "FARCASTER_WEBHOOK_URL"];
pub(crate) const HERO_IMAGE_ENV: &[&str] = &["NEXT_PUBLIC_APP_HERO_IMAGE"];
pub(crate) const OG_TITLE_ENV: &[&str] = &["NEXT_PUBLIC_APP_OG_TITLE"];
pub(crate) const OG_DESCRIPTION_ENV: &[&str] = &["NEXT_PUBLIC_APP_OG_DESCRIPTION"];
pub(crate) const OG_IMAGE_ENV: &[&str] = &["NEXT_PUBLIC_APP_OG_IMAGE"];
pub(crate) const CATEGORY_ENV: &[&str] = &["NEXT_PUBLIC_APP_PRIMARY_CATEGORY"];
pub(crate) const TAGS_ENV: &[&str] = &["NEXT_PUBLIC_APP_TAGS"];
pub(crate) const REQUIRED_CHAINS_ENV: &[&str] = &["NEXT_PUBLIC_APP_REQUIRED_CHAINS"];
pub(crate) const SCREENSHOTS_ENV: &[&str] = &["NEXT_PUBLIC_APP_SCREENSHOT_URLS"];
pub(crate) const NOINDEX_ENV: &[&str] = &["NEXT_PUBLIC_APP_NOINDEX"];

impl ManifestConfig {
    /// Resolve overrides with env var > TOML settings priority.
    ///
    /// Never fails: an unreadable env var is treated as unset.
    pub(crate) fn resolve(settings: &Settings) -> Self {
        let m = &settings.manifest;
        Self {
            public_url: lookup(PUBLIC_URL_ENV, m.public_url.as_deref()),
            account_association_header: lookup(
                HEADER_ENV,
                m.account_association_header.as_deref(),
            ),
            account_association_payload: lookup(
                PAYLOAD_ENV,
                m.account_association_payload.as_deref(),
            ),
            account_association_signature: lookup(
                SIGNATURE_ENV,
                m.account_association_signature.as_deref(),
            ),
            name: lookup(NAME_ENV, m.name.as_deref()),
            subtitle: lookup(SUBTITLE_ENV, m.subtitle.as_deref()),
            description: lookup(DESCRIPTION_ENV, m.description.as_deref()),
            tagline: lookup(TAGLINE_ENV, m.tagline.as_deref()),
            home_url: lookup(HOME_URL_ENV, m.home_url.as_deref()),
            icon_url: lookup(ICON_URL_ENV, m.icon_url.as_deref()),
            splash_image_url: lookup(SPLASH_IMAGE_ENV, m.splash_image_url.as_deref()),
            splash_background_color: lookup(
                SPLASH_COLOR_ENV,
                m.splash_background_color.as_deref(),
            ),
            webhook_url: lookup(WEBHOOK_URL_ENV, m.webhook_url.as_deref()),
            hero_image_url: lookup(HERO_IMAGE_ENV, m.hero_image_url.as_deref()),
            og_title: lookup(OG_TITLE_ENV, m.og_title.as_deref()),
            og_description: lookup(OG_DESCRIPTION_ENV, m.og_description.as_deref()),
            og_image_url: lookup(OG_IMAGE_ENV, m.og_image_url.as_deref()),
            primary_category: lookup(CATEGORY_ENV, m.primary_category.as_deref()),
            tags: lookup(TAGS_ENV, m.tags.as_ref().map(|v| v.join(",")).as_deref()),
            required_chains: lookup(
                REQUIRED_CHAINS_ENV,
                m.required_chains.as_ref().map(|v| v.join(",")).as_deref(),
            ),
            screenshot_urls: lookup(
                SCREENSHOTS_ENV,
                m.screenshot_urls.as_ref().map(|v| v.join(",")).as_deref(),
            ),
            noindex: lookup(NOINDEX_ENV, m.noindex.map(|b| b.to_string()).as_deref()),
        }
    }
}

fn lookup(keys: &[&str], fallback: Option<&str>) -> Option<String> {
    let from_env = first_non_empty_env(keys).unwrap_or_else(|e| {
        tracing::debug!(keys = ?keys, "Ignoring unreadable manifest env var: {}", e);
        None
    });
    from_env.or_else(|| {
        fallback
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ENV_MUTEX;

    const ALL_KEYS: &[&[&str]] = &[
        PUBLIC_URL_ENV,
        HEADER_ENV,
        PAYLOAD_ENV,
        SIGNATURE_ENV,
        NAME_ENV,
        SUBTITLE_ENV,
        DESCRIPTION_ENV,
        TAGLINE_ENV,
        HOME_URL_ENV,
        ICON_URL_ENV,
        SPLASH_IMAGE_ENV,
        SPLASH_COLOR_ENV,
        WEBHOOK_URL_ENV,
        HERO_IMAGE_ENV,
        OG_TITLE_ENV,
        OG_DESCRIPTION_ENV,
        OG_IMAGE_ENV,
        CATEGORY_ENV,
        TAGS_ENV,
        REQUIRED_CHAINS_ENV,
        SCREENSHOTS_ENV,
        NOINDEX_ENV,
    ];

    fn clear_manifest_env() {
        // SAFETY: Guarded by ENV_MUTEX in tests.
        unsafe {
            for keys in ALL_KEYS {
                for key in *keys {
                    std::env::remove_var(key);
                }
            }
        }
    }

    #[test]
    fn resolves_to_all_none_without_env_or_settings() {
        let _guard = ENV_MUTEX.lock().expect("env mutex poisoned");
        clear_manifest_env();

        let cfg = ManifestConfig::resolve(&Settings::default());
        assert_eq!(cfg, ManifestConfig::default());
    }

    #[test]
    fn short_alias_wins_over_long_account_association_name() {
        let _guard = ENV_MUTEX.lock().expect("env mutex poisoned");
        clear_manifest_env();

        // SAFETY: Guarded by ENV_MUTEX in tests.
        unsafe {
            std::env::set_var("FARCASTER_HEADER", "short-header");
            std::env::set_var("FARCASTER_ACCOUNT_ASSOCIATION_HEADER", "long-header");
            std::env::set_var("FARCASTER_ACCOUNT_ASSOCIATION_PAYLOAD", "long-payload");
            std::env::set_var("FARCASTER_SIGNATURE", "   ");
            std::env::set_var("FARCASTER_ACCOUNT_ASSOCIATION_SIGNATURE", "\"long-sig\"");
        }

        let cfg = ManifestConfig::resolve(&Settings::default());
        assert_eq!(cfg.account_association_header.as_deref(), Some("short-header"));
        assert_eq!(cfg.account_association_payload.as_deref(), Some("long-payload"));
        // Blank short alias falls through to the long one.
        assert_eq!(cfg.account_association_signature.as_deref(), Some("long-sig"));

        clear_manifest_env();
    }

    #[test]
    fn env_overrides_toml_settings() {
        let _guard = ENV_MUTEX.lock().expect("env mutex poisoned");
        clear_manifest_env();

        // SAFETY: Guarded by ENV_MUTEX in tests.
        unsafe {
            std::env::set_var("NEXT_PUBLIC_APP_NAME", "Env Name");
        }

        let mut settings = Settings::default();
        settings.manifest.name = Some("Toml Name".to_string());
        settings.manifest.subtitle = Some("Toml Subtitle".to_string());
        settings.manifest.tags = Some(vec!["a".to_string(), "b".to_string()]);
        settings.manifest.noindex = Some(true);

        let cfg = ManifestConfig::resolve(&settings);
        assert_eq!(cfg.name.as_deref(), Some("Env Name"));
        assert_eq!(cfg.subtitle.as_deref(), Some("Toml Subtitle"));
        assert_eq!(cfg.tags.as_deref(), Some("a,b"));
        assert_eq!(cfg.noindex.as_deref(), Some("true"));

        clear_manifest_env();
    }
}
