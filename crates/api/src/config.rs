//! Process configuration read from the environment.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use thiserror::Error;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_BASE_PATH: &str = "/";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("PORT must be a number between 0 and 65535, got '{0}'")]
    InvalidPort(String),

    #[error("BIND_ADDR must be an IP address, got '{0}'")]
    InvalidBindAddr(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub bind_addr: IpAddr,
    pub port: u16,
    /// Prefix all routes are mounted under; always `/` or `/segment(/segment)*`.
    pub base_path: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_addr: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            base_path: DEFAULT_BASE_PATH.to_string(),
        }
    }
}

impl ApiConfig {
    /// Read `PORT`, `BIND_ADDR` and `BASE_PATH`; unset or empty values use the defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(port) = non_empty(lookup("PORT")) {
            config.port = port
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidPort(port.clone()))?;
        }

        if let Some(addr) = non_empty(lookup("BIND_ADDR")) {
            config.bind_addr = addr
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidBindAddr(addr.clone()))?;
        }

        if let Some(base) = non_empty(lookup("BASE_PATH")) {
            config.base_path = normalize_base_path(&base);
        }

        Ok(config)
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_addr, self.port)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// `"api/v1/"` → `"/api/v1"`, `""` or `"///"` → `"/"`.
pub fn normalize_base_path(raw: &str) -> String {
    let segments: Vec<&str> = raw.split('/').filter(|s| !s.trim().is_empty()).collect();
    if segments.is_empty() {
        "/".to_string()
    } else {
        format!("/{}", segments.join("/"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<ApiConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ApiConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config, ApiConfig::default());
        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:8080");
    }

    #[test]
    fn reads_all_variables() {
        let config = config_from(&[
            ("PORT", "9000"),
            ("BIND_ADDR", "127.0.0.1"),
            ("BASE_PATH", "cash-book/"),
        ])
        .unwrap();
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:9000");
        assert_eq!(config.base_path, "/cash-book");
    }

    #[test]
    fn empty_values_fall_back_to_defaults() {
        let config = config_from(&[("PORT", ""), ("BASE_PATH", " ")]).unwrap();
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.base_path, "/");
    }

    #[test]
    fn invalid_port_is_an_error() {
        let err = config_from(&[("PORT", "eighty")]).unwrap_err();
        assert_eq!(err, ConfigError::InvalidPort("eighty".to_string()));
        assert!(config_from(&[("PORT", "70000")]).is_err());
    }

    #[test]
    fn base_path_normalisation() {
        assert_eq!(normalize_base_path("/"), "/");
        assert_eq!(normalize_base_path("///"), "/");
        assert_eq!(normalize_base_path("/api/"), "/api");
        assert_eq!(normalize_base_path("api//v1"), "/api/v1");
    }
}
