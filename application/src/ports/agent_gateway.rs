//! Agent gateway port
//!
//! Defines the interface for calling external reasoning providers.
//! Implementations (adapters) live in the infrastructure layer; routing
//! from agent identity to provider is an infrastructure concern too.

use async_trait::async_trait;
use quantizer_domain::AgentId;
use thiserror::Error;

/// Errors that can occur on a provider call
#[derive(Error, Debug, Clone)]
pub enum AgentError {
    /// Required credential or endpoint is absent. Never retried and never
    /// preceded by a network attempt.
    #[error("Provider not configured: {0}")]
    Configuration(String),

    /// Non-success response or transport failure
    #[error("Provider request failed ({status}): {message}")]
    Provider { status: u16, message: String },

    /// The bounded per-call timeout expired
    #[error("Provider request timed out")]
    Timeout,
}

impl AgentError {
    pub fn provider(status: u16, message: impl Into<String>) -> Self {
        AgentError::Provider {
            status,
            message: message.into(),
        }
    }
}

/// Gateway for agent communication
///
/// `call` is pure request/response: one system prompt, one user prompt,
/// one trimmed answer. The local backbone is reached through the same
/// port via [`AgentId::LocalLlm`], which is also where unknown identities
/// fall back.
#[async_trait]
pub trait AgentGateway: Send + Sync {
    /// Send one prompt to the provider behind `agent` and return the
    /// trimmed primary text of its response.
    async fn call(
        &self,
        agent: &AgentId,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, AgentError>;

    /// Discover model names served by the local backbone
    async fn available_models(&self) -> Result<Vec<String>, AgentError>;

    /// Short-budget connectivity check against the backbone
    async fn probe(&self) -> Result<(), AgentError>;
}
