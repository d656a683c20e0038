//! Bootstrap helpers.
//!
//! Env files are loaded before any configuration is resolved so that every
//! resolver sees the same process environment.
//!
//! File: `~/.waya-miniapp/.env` (standard dotenvy format)

use std::path::PathBuf;

/// `~/.waya-miniapp`, or `./.waya-miniapp` when no home directory is known.
pub fn miniapp_home_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".waya-miniapp")
}

/// Path to the service-specific `.env` file: `~/.waya-miniapp/.env`.
pub fn miniapp_env_path() -> PathBuf {
    miniapp_home_dir().join(".env")
}

/// Load `./.env` and then `~/.waya-miniapp/.env`.
///
/// dotenvy never overwrites existing vars, so the effective priority is:
///
///   explicit env vars > `./.env` > `~/.waya-miniapp/.env`
pub fn load_env_files() {
    match dotenvy::dotenv() {
        Ok(path) => tracing::debug!(path = %path.display(), "Loaded .env"),
        Err(e) if e.not_found() => {}
        Err(e) => tracing::warn!("Failed to load ./.env: {}", e),
    }

    let path = miniapp_env_path();
    if path.exists()
        && let Err(e) = dotenvy::from_path(&path)
    {
        tracing::warn!("Failed to load {}: {}", path.display(), e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn env_path_lives_under_home_dir() {
        let path = miniapp_env_path();
        assert!(path.ends_with(".waya-miniapp/.env"));
        assert_eq!(path.parent(), Some(miniapp_home_dir().as_path()));
    }

    #[test]
    fn quoted_account_association_values_survive_dotenv_parsing() {
        let dir = tempdir().unwrap();
        let env_path = dir.path().join(".env");

        // Signatures are base64url and may end in `=`; quoting keeps them intact.
        std::fs::write(
            &env_path,
            "FARCASTER_ACCOUNT_ASSOCIATION_SIGNATURE=\"MHg0Zm==\"\nNEXT_PUBLIC_URL=https://waya.example\n",
        )
        .unwrap();

        let parsed: Vec<(String, String)> = dotenvy::from_path_iter(&env_path)
            .unwrap()
            .filter_map(|r| r.ok())
            .collect();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].0, "FARCASTER_ACCOUNT_ASSOCIATION_SIGNATURE");
        assert_eq!(parsed[0].1, "MHg0Zm==");
        assert_eq!(parsed[1].1, "https://waya.example");
    }
}
