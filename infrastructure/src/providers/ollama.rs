//! Ollama adapter - local backbone over the /api/chat endpoint.
//!
//! The backbone serves three roles: fallback provider for agents with no
//! dedicated vendor, evaluator for reasoning scores, and examiner for
//! follow-up questions. It is the only adapter that supports model
//! discovery and the short connectivity probe.

use super::{ProviderAdapter, ProviderKind, normalize_text, status_error, transport_error};
use crate::config::BackboneConfig;
use async_trait::async_trait;
use quantizer_application::AgentError;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    stream: bool,
}

#[derive(Deserialize)]
struct ChatResponse {
    message: Option<ResponseMessage>,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<TagEntry>,
}

#[derive(Deserialize)]
struct TagEntry {
    name: String,
}

/// Adapter for a local Ollama server
pub struct OllamaAdapter {
    base_url: String,
    model: String,
    client: reqwest::Client,
    probe_client: reqwest::Client,
}

impl OllamaAdapter {
    pub fn from_config(config: &BackboneConfig) -> Self {
        Self::new(
            format!("http://{}:{}", config.host, config.port),
            &config.model,
            Duration::from_secs(config.request_timeout_secs),
            Duration::from_secs(config.probe_timeout_secs),
        )
    }

    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        request_timeout: Duration,
        probe_timeout: Duration,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            model: model.into(),
            client: reqwest::Client::builder()
                .timeout(request_timeout)
                .build()
                .unwrap_or_default(),
            probe_client: reqwest::Client::builder()
                .timeout(probe_timeout)
                .build()
                .unwrap_or_default(),
        }
    }
}

#[async_trait]
impl ProviderAdapter for OllamaAdapter {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Ollama
    }

    async fn call(&self, system_prompt: &str, user_prompt: &str) -> Result<String, AgentError> {
        if self.model.is_empty() {
            return Err(AgentError::Configuration(
                "no backbone model configured; set backbone.model or pick one from `models`"
                    .to_string(),
            ));
        }

        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: user_prompt,
                },
            ],
            stream: false,
        };

        debug!("Calling backbone model {}", self.model);
        let response = self
            .client
            .post(format!("{}/api/chat", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            return Err(status_error(response).await);
        }

        let body: ChatResponse = response.json().await.map_err(transport_error)?;
        Ok(normalize_text(body.message.and_then(|m| m.content)))
    }

    async fn available_models(&self) -> Result<Vec<String>, AgentError> {
        let response = self
            .client
            .get(format!("{}/api/tags", self.base_url))
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            return Err(status_error(response).await);
        }

        let body: TagsResponse = response.json().await.map_err(transport_error)?;
        Ok(body.models.into_iter().map(|m| m.name).collect())
    }

    async fn probe(&self) -> Result<(), AgentError> {
        let response = self
            .probe_client
            .get(format!("{}/api/tags", self.base_url))
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            return Err(status_error(response).await);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_model_is_a_configuration_error() {
        let adapter = OllamaAdapter::new(
            "http://localhost:11434",
            "",
            Duration::from_secs(1),
            Duration::from_secs(1),
        );

        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        let result = rt.block_on(adapter.call("system", "user"));
        assert!(matches!(result, Err(AgentError::Configuration(_))));
    }

    #[test]
    fn chat_request_serializes_without_streaming() {
        let request = ChatRequest {
            model: "qwen3:8b",
            messages: vec![ChatMessage {
                role: "user",
                content: "hi",
            }],
            stream: false,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "qwen3:8b");
        assert_eq!(json["stream"], false);
        assert_eq!(json["messages"][0]["role"], "user");
    }

    #[test]
    fn tags_response_tolerates_missing_models() {
        let body: TagsResponse = serde_json::from_str("{}").unwrap();
        assert!(body.models.is_empty());
    }
}
