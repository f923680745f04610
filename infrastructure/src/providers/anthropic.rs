//! Anthropic adapter - the messages API with explicit version header

use super::{ProviderAdapter, ProviderKind, normalize_text, status_error, transport_error};
use crate::config::AnthropicConfig;
use async_trait::async_trait;
use quantizer_application::AgentError;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: Vec<Message<'a>>,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    text: Option<String>,
}

/// Adapter for the Anthropic messages API
pub struct AnthropicAdapter {
    base_url: String,
    model: String,
    api_key: Option<String>,
    api_version: String,
    max_tokens: u32,
    client: reqwest::Client,
}

impl AnthropicAdapter {
    pub fn from_config(config: &AnthropicConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            model: config.model.clone(),
            api_key: config.resolve_key(),
            api_version: config.api_version.clone(),
            max_tokens: config.max_tokens,
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(60))
                .build()
                .unwrap_or_default(),
        }
    }
}

#[async_trait]
impl ProviderAdapter for AnthropicAdapter {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Anthropic
    }

    async fn call(&self, system_prompt: &str, user_prompt: &str) -> Result<String, AgentError> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            AgentError::Configuration("no Anthropic API key configured".to_string())
        })?;

        let request = MessagesRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            system: system_prompt,
            messages: vec![Message {
                role: "user",
                content: user_prompt,
            }],
        };

        debug!("Calling Anthropic model {}", self.model);
        let response = self
            .client
            .post(format!("{}/messages", self.base_url))
            .header("x-api-key", api_key)
            .header("anthropic-version", &self.api_version)
            .json(&request)
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            return Err(status_error(response).await);
        }

        let body: MessagesResponse = response.json().await.map_err(transport_error)?;
        let text = body.content.into_iter().find_map(|b| b.text);
        Ok(normalize_text(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_text_block_is_extracted() {
        let raw = r#"{"content":[{"type":"text","text":"hello"}]}"#;
        let body: MessagesResponse = serde_json::from_str(raw).unwrap();
        let text = body.content.into_iter().find_map(|b| b.text);
        assert_eq!(normalize_text(text), "hello");
    }

    #[test]
    fn request_carries_system_prompt_top_level() {
        let request = MessagesRequest {
            model: "m",
            max_tokens: 64,
            system: "sys",
            messages: vec![Message {
                role: "user",
                content: "u",
            }],
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["system"], "sys");
        assert_eq!(json["messages"][0]["role"], "user");
    }
}
