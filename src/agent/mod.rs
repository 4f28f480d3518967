//! # Model Agent
//!
//! The language-model seam used by the explanation resolver.
//!
//! An [`AgentHandle`] is built once at startup from [`ModelConfig`] and shared
//! read-only by every request. No handle means the model tier is disabled.
//!
//! [`ModelConfig`]: crate::config::ModelConfig

mod azure;
mod errors;
#[cfg(test)]
mod stub;

pub use azure::AzureOpenAiAgent;
pub use errors::{ModelResult, ModelUnavailableError};
#[cfg(test)]
pub use stub::StubAgent;

use std::sync::Arc;

use async_trait::async_trait;

/// Name the governance agent presents to the model provider
pub const AGENT_NAME: &str = "NorthGovernanceAgent";

/// A configured language-model client
#[async_trait]
pub trait Agent: Send + Sync {
    /// Display name, used in logs
    fn name(&self) -> &str;

    /// Send one prompt and return the completion text.
    async fn run(&self, prompt: &str) -> ModelResult<String>;
}

/// Process-wide, immutable agent reference
pub type AgentHandle = Arc<dyn Agent>;
