//! Azure OpenAI chat-completions agent

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::errors::{ModelResult, ModelUnavailableError};
use super::{Agent, AGENT_NAME};
use crate::config::ModelConfig;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    messages: [ChatMessage<'a>; 2],
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    refusal: Option<String>,
}

/// Agent backed by an Azure OpenAI chat deployment.
///
/// The system instructions are fixed at construction; each call sends them
/// together with one user prompt.
pub struct AzureOpenAiAgent {
    http: reqwest::Client,
    api_key: String,
    url: String,
    instructions: String,
    timeout_ms: u64,
}

impl AzureOpenAiAgent {
    pub fn new(config: &ModelConfig, instructions: impl Into<String>) -> ModelResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ModelUnavailableError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            api_key: config.api_key.clone(),
            url: completions_url(config),
            instructions: instructions.into(),
            timeout_ms: config.timeout.as_millis() as u64,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

/// `{endpoint}/openai/deployments/{deployment}/chat/completions?api-version=...`
fn completions_url(config: &ModelConfig) -> String {
    format!(
        "{}/openai/deployments/{}/chat/completions?api-version={}",
        config.endpoint.trim_end_matches('/'),
        config.deployment,
        config.api_version
    )
}

/// Pull the first choice's text out of a completion body
fn extract_text(body: &str) -> ModelResult<String> {
    let response: ChatResponse = serde_json::from_str(body)
        .map_err(|e| ModelUnavailableError::InvalidResponse(e.to_string()))?;

    let message = response
        .choices
        .into_iter()
        .next()
        .map(|c| c.message)
        .ok_or_else(|| ModelUnavailableError::InvalidResponse("no choices".to_string()))?;

    if let Some(refusal) = message.refusal.filter(|r| !r.trim().is_empty()) {
        return Err(ModelUnavailableError::InvalidResponse(format!(
            "model refused: {}",
            refusal
        )));
    }

    match message.content {
        Some(text) if !text.trim().is_empty() => Ok(text),
        _ => Err(ModelUnavailableError::EmptyResponse),
    }
}

#[async_trait]
impl Agent for AzureOpenAiAgent {
    fn name(&self) -> &str {
        AGENT_NAME
    }

    async fn run(&self, prompt: &str) -> ModelResult<String> {
        let request = ChatRequest {
            messages: [
                ChatMessage {
                    role: "system",
                    content: &self.instructions,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
        };

        let classify = |e: reqwest::Error| {
            if e.is_timeout() {
                ModelUnavailableError::Timeout {
                    timeout_ms: self.timeout_ms,
                }
            } else {
                ModelUnavailableError::Transport(e.to_string())
            }
        };

        let response = self
            .http
            .post(&self.url)
            .header("api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(classify)?;

        let status = response.status();
        let body = response.text().await.map_err(classify)?;

        if !status.is_success() {
            return Err(ModelUnavailableError::Api {
                status: status.as_u16(),
                body,
            });
        }

        extract_text(&body)
    }
}
