//! HTTP Server Configuration
//!
//! Bind address and browser origins for the `/users` surface. Values are
//! checked once at load time; the server only consumes the parsed forms.

use std::net::{IpAddr, SocketAddr};

use axum::http::HeaderValue;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Rejected `http` section
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HttpConfigError {
    #[error("http.host must be an IP address, got '{0}'")]
    InvalidHost(String),

    #[error("http.port must not be 0")]
    ZeroPort,

    #[error("http.cors_origins entry '{0}' is not an http(s) origin")]
    InvalidOrigin(String),
}

/// HTTP server configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpServerConfig {
    /// Address to bind (default: "0.0.0.0")
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind (default: 3002)
    #[serde(default = "default_port")]
    pub port: u16,

    /// Origins allowed by CORS. Empty allows any origin, which is what the
    /// legacy browser client relies on.
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3002
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
        }
    }
}

impl HttpServerConfig {
    /// Check the bind address and every CORS origin
    pub fn validate(&self) -> Result<(), HttpConfigError> {
        if self.port == 0 {
            return Err(HttpConfigError::ZeroPort);
        }
        self.bind_addr()?;
        self.allowed_origins()?;
        Ok(())
    }

    /// Parsed bind address
    pub fn bind_addr(&self) -> Result<SocketAddr, HttpConfigError> {
        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|_| HttpConfigError::InvalidHost(self.host.clone()))?;
        Ok(SocketAddr::new(ip, self.port))
    }

    /// CORS origins as header values. `None` means any origin.
    pub fn allowed_origins(&self) -> Result<Option<Vec<HeaderValue>>, HttpConfigError> {
        if self.cors_origins.is_empty() {
            return Ok(None);
        }

        self.cors_origins
            .iter()
            .map(|origin| parse_origin(origin))
            .collect::<Result<Vec<_>, _>>()
            .map(Some)
    }
}

fn parse_origin(origin: &str) -> Result<HeaderValue, HttpConfigError> {
    let invalid = || HttpConfigError::InvalidOrigin(origin.to_string());

    let rest = origin
        .strip_prefix("https://")
        .or_else(|| origin.strip_prefix("http://"))
        .ok_or_else(invalid)?;

    // An origin is scheme + host[:port]; browsers never send a path.
    if rest.is_empty() || rest.contains('/') {
        return Err(invalid());
    }

    origin.parse::<HeaderValue>().map_err(|_| invalid())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = HttpServerConfig::default();
        assert_eq!(config.bind_addr().unwrap(), "0.0.0.0:3002".parse().unwrap());
        assert_eq!(config.allowed_origins().unwrap(), None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: HttpServerConfig = serde_json::from_str(r#"{"port": 9000}"#).unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 9000);
    }

    #[test]
    fn test_hostname_is_rejected() {
        let config = HttpServerConfig {
            host: "localhost".to_string(),
            ..HttpServerConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(HttpConfigError::InvalidHost("localhost".to_string()))
        );
    }

    #[test]
    fn test_zero_port_is_rejected() {
        let config = HttpServerConfig {
            port: 0,
            ..HttpServerConfig::default()
        };
        assert_eq!(config.validate(), Err(HttpConfigError::ZeroPort));
    }

    #[test]
    fn test_origins_are_parsed() {
        let config = HttpServerConfig {
            cors_origins: vec![
                "http://localhost:5173".to_string(),
                "https://app.example.com".to_string(),
            ],
            ..HttpServerConfig::default()
        };
        let origins = config.allowed_origins().unwrap().unwrap();
        assert_eq!(origins.len(), 2);
        assert_eq!(origins[0], "http://localhost:5173");
    }

    #[test]
    fn test_origin_with_path_or_scheme_missing_is_rejected() {
        for bad in ["localhost:5173", "http://", "https://app.example.com/login"] {
            let config = HttpServerConfig {
                cors_origins: vec![bad.to_string()],
                ..HttpServerConfig::default()
            };
            assert_eq!(
                config.validate(),
                Err(HttpConfigError::InvalidOrigin(bad.to_string()))
            );
        }
    }
}
