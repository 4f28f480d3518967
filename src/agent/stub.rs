use async_trait::async_trait;

use super::errors::{ModelResult, ModelUnavailableError};
use super::Agent;

/// Canned agent, no network. Returns the same outcome for every prompt.
#[derive(Debug, Clone)]
pub struct StubAgent {
    outcome: ModelResult<String>,
}

impl StubAgent {
    /// Always answers with `text`
    pub fn replying(text: impl Into<String>) -> Self {
        Self {
            outcome: Ok(text.into()),
        }
    }

    /// Always fails with `error`
    pub fn failing(error: ModelUnavailableError) -> Self {
        Self { outcome: Err(error) }
    }
}

#[async_trait]
impl Agent for StubAgent {
    fn name(&self) -> &str {
        "StubAgent"
    }

    async fn run(&self, _prompt: &str) -> ModelResult<String> {
        self.outcome.clone()
    }
}
