//! Origin and URL sanitization for manifest fields.
//!
//! Every URL that leaves the builder is absolute `https` with a public-looking
//! DNS hostname. Anything else is rejected here and replaced by the caller.

use std::sync::LazyLock;

use regex::Regex;
use url::{Host, Url};

/// Origin advertised when neither configuration nor the request yields a
/// usable public origin.
pub const FALLBACK_ORIGIN: &str = "https://waya-miniapp.vercel.app";

static DOTTED_QUAD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{1,3}(?:\.\d{1,3}){3}$").expect("valid regex"));

static HEX_COLOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^#(?:[0-9a-fA-F]{3}|[0-9a-fA-F]{6})$").expect("valid regex")
});

/// Normalized public origin (`https://host[:port][/path]`, no trailing slash).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Origin {
    url: Url,
    rendered: String,
}

impl Origin {
    /// Normalize a candidate origin, falling back to [`FALLBACK_ORIGIN`].
    pub fn normalize(candidate: Option<&str>) -> Self {
        if let Some(raw) = candidate.map(str::trim).filter(|v| !v.is_empty()) {
            if let Some(mut url) = parse_public_https(raw) {
                url.set_query(None);
                url.set_fragment(None);
                return Self::from_url(url);
            }
            tracing::debug!(origin = raw, "Unusable manifest origin; using fallback");
        }
        Self::fallback()
    }

    pub fn fallback() -> Self {
        Self::from_url(Url::parse(FALLBACK_ORIGIN).expect("valid fallback origin"))
    }

    fn from_url(mut url: Url) -> Self {
        // Relative overrides resolve under the origin's path, not beside it.
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        let rendered = url.as_str().trim_end_matches('/').to_string();
        Self { url, rendered }
    }

    pub fn as_str(&self) -> &str {
        &self.rendered
    }

    /// `{origin}/{suffix}`, or the origin itself for an empty suffix.
    pub fn with_suffix(&self, suffix: &str) -> String {
        let suffix = suffix.trim_start_matches('/');
        if suffix.is_empty() {
            self.rendered.clone()
        } else {
            format!("{}/{}", self.rendered, suffix)
        }
    }

    /// Resolve an override against this origin and sanitize it.
    ///
    /// Returns `None` when the override is absent, unparsable, or points at a
    /// disallowed host.
    pub fn resolve(&self, raw: Option<&str>) -> Option<String> {
        let raw = raw.map(str::trim).filter(|v| !v.is_empty())?;
        let joined = self.url.join(raw).ok()?;
        let url = sanitize(joined)?;
        Some(render(&url))
    }
}

impl std::fmt::Display for Origin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.rendered)
    }
}

/// Whether a hostname must never appear in the manifest.
///
/// Rejects `localhost`, bare dotted-quad IPv4 and anything containing a
/// colon (IPv6 literals).
pub fn is_disallowed_host(host: &str) -> bool {
    let host = host.trim().trim_end_matches('.').to_ascii_lowercase();
    let host = host
        .strip_prefix('[')
        .and_then(|h| h.strip_suffix(']'))
        .unwrap_or(&host);
    host.is_empty() || host == "localhost" || DOTTED_QUAD.is_match(host) || host.contains(':')
}

pub fn is_hex_color(value: &str) -> bool {
    HEX_COLOR.is_match(value)
}

/// Parse an absolute origin, accepting a bare `host[:port]` as `https`.
fn parse_public_https(raw: &str) -> Option<Url> {
    let url = match Url::parse(raw) {
        Ok(url) => url,
        Err(url::ParseError::RelativeUrlWithoutBase) => Url::parse(&format!("https://{raw}")).ok()?,
        Err(_) => return None,
    };
    sanitize(url)
}

/// Force `https`, then reject userinfo and non-public hosts.
fn sanitize(mut url: Url) -> Option<Url> {
    if url.scheme() != "https" && url.set_scheme("https").is_err() {
        return None;
    }
    if !url.username().is_empty() || url.password().is_some() {
        return None;
    }
    match url.host() {
        Some(Host::Domain(domain)) if !is_disallowed_host(domain) => Some(url),
        _ => None,
    }
}

fn render(url: &Url) -> String {
    if url.path() == "/" && url.query().is_none() && url.fragment().is_none() {
        url.as_str().trim_end_matches('/').to_string()
    } else {
        url.as_str().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_is_forced_to_https_without_trailing_slash() {
        let origin = Origin::normalize(Some("http://waya.example/"));
        assert_eq!(origin.as_str(), "https://waya.example");

        let origin = Origin::normalize(Some("https://waya.example/app/?q=1#top"));
        assert_eq!(origin.as_str(), "https://waya.example/app");
    }

    #[test]
    fn bare_host_origin_is_treated_as_https() {
        let origin = Origin::normalize(Some("waya.example"));
        assert_eq!(origin.as_str(), "https://waya.example");
    }

    #[test]
    fn local_and_numeric_origins_fall_back() {
        for candidate in [
            "http://localhost:3000",
            "https://LOCALHOST",
            "http://127.0.0.1:8080",
            "http://[::1]:3000",
            "http://10.0.0.7",
            "not a url at all",
            "mailto:team@waya.example",
            "https://user:pw@waya.example",
        ] {
            assert_eq!(
                Origin::normalize(Some(candidate)).as_str(),
                FALLBACK_ORIGIN,
                "{candidate} should fall back"
            );
        }
        assert_eq!(Origin::normalize(None).as_str(), FALLBACK_ORIGIN);
        assert_eq!(Origin::normalize(Some("  ")).as_str(), FALLBACK_ORIGIN);
    }

    #[test]
    fn resolve_handles_relative_and_absolute_overrides() {
        let origin = Origin::normalize(Some("https://waya.example"));
        assert_eq!(
            origin.resolve(Some("/brand/icon.png")).as_deref(),
            Some("https://waya.example/brand/icon.png")
        );
        assert_eq!(
            origin.resolve(Some("http://cdn.waya.example/hero.png")).as_deref(),
            Some("https://cdn.waya.example/hero.png")
        );
        assert_eq!(
            origin.resolve(Some("https://cdn.waya.example")).as_deref(),
            Some("https://cdn.waya.example")
        );
    }

    #[test]
    fn resolve_rejects_local_hosts() {
        let origin = Origin::normalize(Some("https://waya.example"));
        assert_eq!(origin.resolve(Some("http://localhost/icon.png")), None);
        assert_eq!(origin.resolve(Some("https://192.168.1.20/icon.png")), None);
        assert_eq!(origin.resolve(Some("https://[2001:db8::1]/icon.png")), None);
        assert_eq!(
            origin.resolve(Some("ftp://files.waya.example/x")).as_deref(),
            Some("https://files.waya.example/x")
        );
        assert_eq!(origin.resolve(Some("data:text/plain,hi")), None);
        assert_eq!(origin.resolve(Some("")), None);
        assert_eq!(origin.resolve(None), None);
    }

    #[test]
    fn relative_overrides_stay_under_origin_path() {
        let origin = Origin::normalize(Some("https://waya.example/app"));
        assert_eq!(origin.as_str(), "https://waya.example/app");
        assert_eq!(
            origin.resolve(Some("icon.png")).as_deref(),
            Some("https://waya.example/app/icon.png")
        );
        assert_eq!(origin.with_suffix("icon.png"), "https://waya.example/app/icon.png");
    }

    #[test]
    fn suffixes_join_with_single_slash() {
        let origin = Origin::normalize(Some("https://waya.example/"));
        assert_eq!(origin.with_suffix("icon.png"), "https://waya.example/icon.png");
        assert_eq!(origin.with_suffix("/hero.png"), "https://waya.example/hero.png");
        assert_eq!(origin.with_suffix(""), "https://waya.example");
    }

    #[test]
    fn host_heuristics() {
        assert!(is_disallowed_host("localhost"));
        assert!(is_disallowed_host("localhost."));
        assert!(is_disallowed_host("203.0.113.9"));
        assert!(is_disallowed_host("[fe80::1]"));
        assert!(is_disallowed_host(""));
        assert!(!is_disallowed_host("waya.example"));
        assert!(!is_disallowed_host("1.2.3.example"));
    }

    #[test]
    fn hex_colors() {
        assert!(is_hex_color("#FFFFFF"));
        assert!(is_hex_color("#0af"));
        assert!(!is_hex_color("white"));
        assert!(!is_hex_color("#GGGGGG"));
        assert!(!is_hex_color("#FFFFFFFF"));
    }
}
