use std::net::{IpAddr, SocketAddr};

use crate::config::helpers::{optional_env, parse_optional_env};
use crate::error::ConfigError;
use crate::settings::Settings;

/// HTTP listener configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl ServerConfig {
    pub(crate) fn resolve(settings: &Settings) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let host = optional_env("MINIAPP_HOST")?
            .or_else(|| settings.server.host.clone())
            .unwrap_or(defaults.host);

        // `PORT` is what most PaaS runtimes inject.
        let port = match parse_optional_env::<u16>("MINIAPP_PORT", "must be a valid port number")? {
            Some(port) => Some(port),
            None => parse_optional_env::<u16>("PORT", "must be a valid port number")?,
        }
        .or(settings.server.port)
        .unwrap_or(defaults.port);

        Ok(Self { host, port })
    }

    /// Socket address to bind.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip: IpAddr = self.host.parse().map_err(|e| ConfigError::InvalidValue {
            key: "MINIAPP_HOST".to_string(),
            message: format!("must be an IP address: {e}"),
        })?;
        Ok(SocketAddr::new(ip, self.port))
    }
}
