//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `CATALOG_HOST` - Bind address (default: 0.0.0.0)
//! - `CATALOG_PORT` - Listen port (default: 8080)
//! - `CATALOG_SEED_PATH` - Seed document `{"products": [...]}` (default: bundled seed)

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use thiserror::Error;

const DEFAULT_PORT: u16 = 8080;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// API server configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Seed document to load at startup; `None` uses the bundled seed
    pub seed_path: Option<PathBuf>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            seed_path: None,
        }
    }
}

impl ApiConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through `lookup` (the environment, or a map in tests).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let host = match non_empty(lookup("CATALOG_HOST")) {
            Some(raw) => raw
                .parse::<IpAddr>()
                .map_err(|e| ConfigError::InvalidEnvVar("CATALOG_HOST".to_string(), format!("{e}")))?,
            None => defaults.host,
        };

        let port = match non_empty(lookup("CATALOG_PORT")) {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|e| ConfigError::InvalidEnvVar("CATALOG_PORT".to_string(), format!("{e}")))?,
            None => defaults.port,
        };

        let seed_path = non_empty(lookup("CATALOG_SEED_PATH")).map(PathBuf::from);

        Ok(Self {
            host,
            port,
            seed_path,
        })
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let cfg = ApiConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(cfg, ApiConfig::default());
        assert_eq!(cfg.socket_addr().to_string(), "0.0.0.0:8080");
    }

    #[test]
    fn reads_all_variables() {
        let cfg = ApiConfig::from_lookup(lookup(&[
            ("CATALOG_HOST", "127.0.0.1"),
            ("CATALOG_PORT", "3000"),
            ("CATALOG_SEED_PATH", "/srv/seed.json"),
        ]))
        .unwrap();
        assert_eq!(cfg.socket_addr().to_string(), "127.0.0.1:3000");
        assert_eq!(cfg.seed_path, Some(PathBuf::from("/srv/seed.json")));
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let cfg = ApiConfig::from_lookup(lookup(&[("CATALOG_PORT", "  "), ("CATALOG_SEED_PATH", "")])).unwrap();
        assert_eq!(cfg.port, 8080);
        assert_eq!(cfg.seed_path, None);
    }

    #[test]
    fn invalid_port_is_reported() {
        let err = ApiConfig::from_lookup(lookup(&[("CATALOG_PORT", "eighty")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref name, _) if name == "CATALOG_PORT"));
    }
}
