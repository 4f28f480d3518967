//! Service Configuration
//!
//! Everything is read from the environment (optionally seeded from `.env`).
//! Blank values count as unset. Missing model settings disable the model tier
//! instead of failing startup; malformed numbers do fail startup.

use std::fmt;
use std::time::Duration;

use thiserror::Error;

use crate::http_server::HttpServerConfig;

pub const ENV_NORTH_URL: &str = "NORTH_EVALUATE_URL";
pub const ENV_NORTH_TIMEOUT: &str = "NORTH_EVALUATE_TIMEOUT_SECS";
pub const ENV_MODEL_API_KEY: &str = "AZURE_OPENAI_API_KEY";
pub const ENV_MODEL_ENDPOINT: &str = "AZURE_OPENAI_ENDPOINT";
pub const ENV_MODEL_DEPLOYMENT: &str = "AZURE_OPENAI_CHAT_DEPLOYMENT_NAME";
pub const ENV_MODEL_API_VERSION: &str = "AZURE_OPENAI_API_VERSION";
pub const ENV_MODEL_TIMEOUT: &str = "AZURE_OPENAI_TIMEOUT_SECS";
pub const ENV_HOST: &str = "NORTH_AGENT_HOST";
pub const ENV_PORT: &str = "NORTH_AGENT_PORT";
pub const ENV_CORS_ORIGINS: &str = "NORTH_AGENT_CORS_ORIGINS";

pub const DEFAULT_NORTH_URL: &str = "http://localhost:7071/api/EvaluateNorth";
pub const DEFAULT_NORTH_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_MODEL_API_VERSION: &str = "2024-10-21";
pub const DEFAULT_MODEL_TIMEOUT_SECS: u64 = 60;

/// Configuration errors (fatal at startup)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{var}={value:?}: {reason}")]
    InvalidValue {
        var: &'static str,
        value: String,
        reason: String,
    },

    #[error("invalid URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("cannot build HTTP client: {0}")]
    HttpClient(String),
}

/// Result type for configuration
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Where and how to reach the North evaluator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NorthConfig {
    pub url: String,
    pub timeout: Duration,
}

impl Default for NorthConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_NORTH_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_NORTH_TIMEOUT_SECS),
        }
    }
}

/// Azure OpenAI deployment used by the model tier
#[derive(Clone, PartialEq, Eq)]
pub struct ModelConfig {
    pub api_key: String,
    pub endpoint: String,
    pub deployment: String,
    pub api_version: String,
    pub timeout: Duration,
}

// Keeps the key out of logs and panics
impl fmt::Debug for ModelConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelConfig")
            .field("api_key", &"<redacted>")
            .field("endpoint", &self.endpoint)
            .field("deployment", &self.deployment)
            .field("api_version", &self.api_version)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Fully resolved service configuration
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub north: NorthConfig,
    /// `None` runs the service in deterministic-only mode
    pub model: Option<ModelConfig>,
    /// Names of required model variables that were not set
    pub missing_model_settings: Vec<&'static str>,
    pub http: HttpServerConfig,
}

impl ServiceConfig {
    /// Read configuration from the process environment
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup` (variable name -> value)
    pub fn from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let north = NorthConfig {
            url: get(ENV_NORTH_URL)
                .unwrap_or_else(|| DEFAULT_NORTH_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            timeout: parse_secs(ENV_NORTH_TIMEOUT, get(ENV_NORTH_TIMEOUT), DEFAULT_NORTH_TIMEOUT_SECS)?,
        };

        let api_key = get(ENV_MODEL_API_KEY);
        let endpoint = get(ENV_MODEL_ENDPOINT);
        let deployment = get(ENV_MODEL_DEPLOYMENT);

        let missing_model_settings: Vec<&'static str> = [
            (ENV_MODEL_API_KEY, api_key.is_none()),
            (ENV_MODEL_ENDPOINT, endpoint.is_none()),
            (ENV_MODEL_DEPLOYMENT, deployment.is_none()),
        ]
        .into_iter()
        .filter_map(|(name, missing)| missing.then_some(name))
        .collect();

        let model = match (api_key, endpoint, deployment) {
            (Some(api_key), Some(endpoint), Some(deployment)) => Some(ModelConfig {
                api_key,
                endpoint: endpoint.trim_end_matches('/').to_string(),
                deployment,
                api_version: get(ENV_MODEL_API_VERSION)
                    .unwrap_or_else(|| DEFAULT_MODEL_API_VERSION.to_string()),
                timeout: parse_secs(
                    ENV_MODEL_TIMEOUT,
                    get(ENV_MODEL_TIMEOUT),
                    DEFAULT_MODEL_TIMEOUT_SECS,
                )?,
            }),
            _ => None,
        };

        let mut http = HttpServerConfig::default();
        if let Some(host) = get(ENV_HOST) {
            http.host = host;
        }
        if let Some(port) = get(ENV_PORT) {
            http.port = port.parse().map_err(|e: std::num::ParseIntError| {
                ConfigError::InvalidValue {
                    var: ENV_PORT,
                    value: port.clone(),
                    reason: e.to_string(),
                }
            })?;
        }
        if let Some(origins) = get(ENV_CORS_ORIGINS) {
            http.cors_origins = origins
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(String::from)
                .collect();
            http.allowed_origins()?;
        }

        Ok(Self {
            north,
            model,
            missing_model_settings,
            http,
        })
    }

    /// Whether the model tier can be attempted
    pub fn model_enabled(&self) -> bool {
        self.model.is_some()
    }
}

fn parse_secs(var: &'static str, raw: Option<String>, default: u64) -> ConfigResult<Duration> {
    let Some(raw) = raw else {
        return Ok(Duration::from_secs(default));
    };

    match raw.parse::<u64>() {
        Ok(0) => Err(ConfigError::InvalidValue {
            var,
            value: raw,
            reason: "timeout must be at least one second".to_string(),
        }),
        Ok(secs) => Ok(Duration::from_secs(secs)),
        Err(e) => Err(ConfigError::InvalidValue {
            var,
            value: raw,
            reason: e.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> ConfigResult<ServiceConfig> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServiceConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();

        assert_eq!(config.north.url, DEFAULT_NORTH_URL);
        assert_eq!(config.north.timeout, Duration::from_secs(30));
        assert!(config.model.is_none());
        assert!(!config.model_enabled());
        assert_eq!(config.http.port, 8000);
        assert_eq!(
            config.missing_model_settings,
            vec![ENV_MODEL_API_KEY, ENV_MODEL_ENDPOINT, ENV_MODEL_DEPLOYMENT]
        );
    }

    #[test]
    fn test_north_overrides() {
        let config = load(&[
            (ENV_NORTH_URL, "https://north.example.com/api/EvaluateNorth/"),
            (ENV_NORTH_TIMEOUT, "5"),
        ])
        .unwrap();

        assert_eq!(config.north.url, "https://north.example.com/api/EvaluateNorth");
        assert_eq!(config.north.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_full_model_settings_enable_model() {
        let config = load(&[
            (ENV_MODEL_API_KEY, "secret"),
            (ENV_MODEL_ENDPOINT, "https://acme.openai.azure.com/"),
            (ENV_MODEL_DEPLOYMENT, "gpt-4o"),
        ])
        .unwrap();

        let model = config.model.unwrap();
        assert_eq!(model.endpoint, "https://acme.openai.azure.com");
        assert_eq!(model.deployment, "gpt-4o");
        assert_eq!(model.api_version, DEFAULT_MODEL_API_VERSION);
        assert_eq!(model.timeout, Duration::from_secs(60));
        assert!(config.missing_model_settings.is_empty());
    }

    #[test]
    fn test_partial_model_settings_disable_model() {
        let config = load(&[
            (ENV_MODEL_API_KEY, "secret"),
            (ENV_MODEL_DEPLOYMENT, "   "),
        ])
        .unwrap();

        assert!(config.model.is_none());
        assert_eq!(
            config.missing_model_settings,
            vec![ENV_MODEL_ENDPOINT, ENV_MODEL_DEPLOYMENT]
        );
    }

    #[test]
    fn test_invalid_timeout_fails() {
        let err = load(&[(ENV_NORTH_TIMEOUT, "soon")]).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue { var: ENV_NORTH_TIMEOUT, .. }
        ));

        let err = load(&[(ENV_NORTH_TIMEOUT, "0")]).unwrap_err();
        assert!(err.to_string().contains("at least one second"));
    }

    #[test]
    fn test_http_overrides() {
        let config = load(&[
            (ENV_HOST, "127.0.0.1"),
            (ENV_PORT, "9090"),
            (ENV_CORS_ORIGINS, "http://a.test, http://b.test,"),
        ])
        .unwrap();

        assert_eq!(config.http.socket_addr(), "127.0.0.1:9090");
        assert_eq!(config.http.cors_origins, vec!["http://a.test", "http://b.test"]);
    }

    #[test]
    fn test_malformed_cors_origin_fails() {
        let err = load(&[(ENV_CORS_ORIGINS, "http://a.test,localhost:5173")]).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue { var: ENV_CORS_ORIGINS, ref value, .. } if value == "localhost:5173"
        ));
    }

    #[test]
    fn test_invalid_port_fails() {
        assert!(load(&[(ENV_PORT, "70000")]).is_err());
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let model = ModelConfig {
            api_key: "super-secret".into(),
            endpoint: "https://e".into(),
            deployment: "d".into(),
            api_version: "v".into(),
            timeout: Duration::from_secs(1),
        };
        let debug = format!("{:?}", model);
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("<redacted>"));
    }
}
