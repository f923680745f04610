//! Provider adapters for external reasoning endpoints

pub mod anthropic;
pub mod gemini;
pub mod ollama;
pub mod openai;
pub mod routing;

use async_trait::async_trait;
use quantizer_application::AgentError;

/// Which provider an adapter speaks to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProviderKind {
    /// Local self-hosted backbone (also the evaluator/examiner endpoint)
    #[default]
    Ollama,
    Gemini,
    OpenAi,
    Anthropic,
}

/// One provider implementation: pure request/response, no state.
///
/// Adapters differ only in wire shape. Every implementation must fail
/// fast with [`AgentError::Configuration`] when its credential or
/// endpoint is absent, surface non-success responses as
/// [`AgentError::Provider`], and return the trimmed primary text of the
/// vendor envelope (or the `"..."` placeholder when it is empty).
#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    fn kind(&self) -> ProviderKind;

    async fn call(&self, system_prompt: &str, user_prompt: &str) -> Result<String, AgentError>;

    /// Model discovery; only the backbone supports it
    async fn available_models(&self) -> Result<Vec<String>, AgentError> {
        Err(AgentError::Configuration(
            "model discovery is only available on the local backbone".to_string(),
        ))
    }

    /// Short-budget connectivity check; only the backbone supports it
    async fn probe(&self) -> Result<(), AgentError> {
        Err(AgentError::Configuration(
            "connectivity probe is only available on the local backbone".to_string(),
        ))
    }
}

/// Placeholder returned when a call succeeded but the primary text field
/// came back absent or blank
pub(crate) const EMPTY_TEXT_PLACEHOLDER: &str = "...";

/// Normalize a vendor's primary text field: trim, placeholder when blank
pub(crate) fn normalize_text(text: Option<String>) -> String {
    match text {
        Some(t) => {
            let trimmed = t.trim();
            if trimmed.is_empty() {
                EMPTY_TEXT_PLACEHOLDER.to_string()
            } else {
                trimmed.to_string()
            }
        }
        None => EMPTY_TEXT_PLACEHOLDER.to_string(),
    }
}

/// Map a transport failure onto the agent error taxonomy
pub(crate) fn transport_error(e: reqwest::Error) -> AgentError {
    if e.is_timeout() {
        AgentError::Timeout
    } else {
        AgentError::Provider {
            status: e.status().map(|s| s.as_u16()).unwrap_or(0),
            message: e.to_string(),
        }
    }
}

/// Turn a non-success HTTP response into a provider error, carrying a
/// snippet of the body when the vendor sent one
pub(crate) async fn status_error(response: reqwest::Response) -> AgentError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    let message = if body.trim().is_empty() {
        "no response body".to_string()
    } else {
        quantizer_domain::truncate_snippet(body.trim(), 200)
    };
    AgentError::Provider { status, message }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_trims_primary_text() {
        assert_eq!(normalize_text(Some("  answer  ".to_string())), "answer");
    }

    #[test]
    fn normalize_substitutes_placeholder() {
        assert_eq!(normalize_text(None), "...");
        assert_eq!(normalize_text(Some("   ".to_string())), "...");
    }
}
