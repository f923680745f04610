//! Configuration for the quantizer engine

pub mod file_config;
pub mod loader;

pub use file_config::{
    AnthropicConfig, BackboneConfig, FileConfig, GeminiConfig, OpenAiConfig, PodDefaults,
    ProviderConfigs,
};
pub use loader::ConfigLoader;
