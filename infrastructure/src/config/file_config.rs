//! Configuration schema.
//!
//! Every section has working defaults so the engine starts against a
//! stock local backbone with no file at all. API keys resolve from the
//! environment first; the inline `api_key` field exists for local
//! experiments and is never written back to disk.

use serde::{Deserialize, Serialize};

/// Root configuration document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub backbone: BackboneConfig,
    pub providers: ProviderConfigs,
    pub pods: PodDefaults,
}

/// Local backbone endpoint (Ollama)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackboneConfig {
    pub host: String,
    pub port: u16,
    /// Model served by the backbone; empty until the operator picks one
    pub model: String,
    pub request_timeout_secs: u64,
    pub probe_timeout_secs: u64,
}

impl Default for BackboneConfig {
    fn default() -> Self {
        Self {
            host: "192.168.0.202".to_string(),
            port: 11434,
            model: String::new(),
            request_timeout_secs: 60,
            probe_timeout_secs: 4,
        }
    }
}

/// Vendor provider credentials and endpoints
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfigs {
    pub gemini: GeminiConfig,
    pub openai: OpenAiConfig,
    pub anthropic: AnthropicConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeminiConfig {
    pub api_key_env: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key_env: "GEMINI_API_KEY".to_string(),
            api_key: None,
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            model: "gemini-2.0-flash".to_string(),
        }
    }
}

impl GeminiConfig {
    pub fn resolve_key(&self) -> Option<String> {
        resolve_key(&self.api_key_env, self.api_key.as_deref())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenAiConfig {
    pub api_key_env: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key_env: "OPENAI_API_KEY".to_string(),
            api_key: None,
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
        }
    }
}

impl OpenAiConfig {
    pub fn resolve_key(&self) -> Option<String> {
        resolve_key(&self.api_key_env, self.api_key.as_deref())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnthropicConfig {
    pub api_key_env: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub api_version: String,
    pub max_tokens: u32,
}

impl Default for AnthropicConfig {
    fn default() -> Self {
        Self {
            api_key_env: "ANTHROPIC_API_KEY".to_string(),
            api_key: None,
            base_url: "https://api.anthropic.com/v1".to_string(),
            model: "claude-sonnet-4-20250514".to_string(),
            api_version: "2023-06-01".to_string(),
            max_tokens: 8192,
        }
    }
}

impl AnthropicConfig {
    pub fn resolve_key(&self) -> Option<String> {
        resolve_key(&self.api_key_env, self.api_key.as_deref())
    }
}

/// Pod defaults applied at creation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PodDefaults {
    pub max_turns: u32,
}

impl Default for PodDefaults {
    fn default() -> Self {
        Self { max_turns: 10 }
    }
}

/// Environment variable wins over the inline key; blanks count as unset
fn resolve_key(env_name: &str, inline: Option<&str>) -> Option<String> {
    if let Ok(value) = std::env::var(env_name) {
        let trimmed = value.trim();
        if !trimmed.is_empty() {
            return Some(trimmed.to_string());
        }
    }
    inline
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string)
}
