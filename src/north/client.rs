//! HTTP client for the North `EvaluateNorth` endpoint

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use super::decision::{Change, Decision};
use super::errors::{EvaluationResult, RemoteEvaluationError};
use super::DecisionSource;
use crate::config::{ConfigError, ConfigResult};

/// Longest slice of an error body carried into an error message
const MAX_ERROR_BODY: usize = 512;

/// Calls the North evaluator once per change, no retries.
#[derive(Debug, Clone)]
pub struct NorthClient {
    http: reqwest::Client,
    url: String,
    timeout: Duration,
}

impl NorthClient {
    /// Build a client for `url` with a per-request `timeout`.
    ///
    /// A trailing `/` on the URL is dropped. The URL must be absolute.
    pub fn new(url: impl Into<String>, timeout: Duration) -> ConfigResult<Self> {
        let url = url.into().trim_end_matches('/').to_string();
        reqwest::Url::parse(&url).map_err(|e| ConfigError::InvalidUrl {
            url: url.clone(),
            reason: e.to_string(),
        })?;

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;

        Ok(Self { http, url, timeout })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn classify(&self, err: reqwest::Error) -> RemoteEvaluationError {
        if err.is_timeout() {
            RemoteEvaluationError::Timeout {
                url: self.url.clone(),
                timeout_ms: self.timeout.as_millis() as u64,
            }
        } else {
            RemoteEvaluationError::Transport {
                url: self.url.clone(),
                reason: err.to_string(),
            }
        }
    }
}

/// Parse a response body into a decision object
fn parse_decision(bytes: &[u8]) -> EvaluationResult<Decision> {
    let value: Value = serde_json::from_slice(bytes)
        .map_err(|e| RemoteEvaluationError::InvalidBody(e.to_string()))?;

    match value {
        Value::Object(decision) => Ok(decision),
        other => Err(RemoteEvaluationError::InvalidBody(format!(
            "expected a JSON object, got {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn truncate(body: &str) -> String {
    if body.len() <= MAX_ERROR_BODY {
        return body.to_string();
    }
    let mut end = MAX_ERROR_BODY;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}

#[async_trait]
impl DecisionSource for NorthClient {
    async fn evaluate(&self, change: &Change) -> EvaluationResult<Decision> {
        let response = self
            .http
            .post(&self.url)
            .json(change)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(|e| self.classify(e))?;

        if !status.is_success() {
            return Err(RemoteEvaluationError::Status {
                status: status.as_u16(),
                body: truncate(&String::from_utf8_lossy(&bytes)),
            });
        }

        parse_decision(&bytes)
    }
}
