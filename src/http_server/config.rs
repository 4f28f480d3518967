//! HTTP Server Configuration
//!
//! Bind host, port and CORS origins for the agent's HTTP surface.

use axum::http::HeaderValue;
use serde::{Deserialize, Serialize};

use crate::config::{ConfigError, ConfigResult, ENV_CORS_ORIGINS};

/// HTTP server configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpServerConfig {
    /// Host to bind to (default: "0.0.0.0")
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind to (default: 8000)
    #[serde(default = "default_port")]
    pub port: u16,

    /// CORS allowed origins; empty allows any origin
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
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
    /// Create a new config with specified port
    pub fn with_port(port: u16) -> Self {
        Self {
            port,
            ..Default::default()
        }
    }

    /// Get the socket address string
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Parse every configured CORS origin.
    ///
    /// An origin must be an absolute `http`/`https` URL; the first one that
    /// is not fails the whole list.
    pub fn allowed_origins(&self) -> ConfigResult<Vec<HeaderValue>> {
        self.cors_origins.iter().map(|o| parse_origin(o)).collect()
    }
}

fn parse_origin(origin: &str) -> ConfigResult<HeaderValue> {
    let invalid = |reason: String| ConfigError::InvalidValue {
        var: ENV_CORS_ORIGINS,
        value: origin.to_string(),
        reason,
    };

    let url = reqwest::Url::parse(origin).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return Err(invalid("origin must be an http:// or https:// URL".to_string()));
    }

    HeaderValue::from_str(origin).map_err(|e| invalid(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = HttpServerConfig::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8000);
        assert!(config.cors_origins.is_empty());
    }

    #[test]
    fn test_socket_addr() {
        let config = HttpServerConfig::with_port(8080);
        assert_eq!(config.socket_addr(), "0.0.0.0:8080");
    }

    #[test]
    fn test_allowed_origins() {
        let config = HttpServerConfig {
            cors_origins: vec!["http://localhost:5173".into(), "https://app.test".into()],
            ..Default::default()
        };
        let origins = config.allowed_origins().unwrap();
        assert_eq!(origins.len(), 2);
        assert_eq!(origins[0], "http://localhost:5173");
    }

    #[test]
    fn test_malformed_origin_rejected() {
        for bad in ["localhost:5173", "app.test", "ftp://files.test"] {
            let config = HttpServerConfig {
                cors_origins: vec![bad.into()],
                ..Default::default()
            };
            assert!(matches!(
                config.allowed_origins(),
                Err(ConfigError::InvalidValue { var: ENV_CORS_ORIGINS, .. })
            ));
        }
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let config: HttpServerConfig = serde_json::from_str(r#"{"port": 9000}"#).unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 9000);
    }
}
