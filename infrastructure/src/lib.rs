//! Infrastructure layer for quantizer
//!
//! Adapters for external reasoning providers, the routing gateway that
//! maps agent identities onto them, the configuration loader, and the
//! dataset artifact writer.

pub mod config;
pub mod export;
pub mod providers;

pub use config::{ConfigLoader, FileConfig};
pub use export::writer::{ExportWriteError, write_dataset};
pub use providers::{
    ProviderAdapter, ProviderKind, anthropic::AnthropicAdapter, gemini::GeminiAdapter,
    ollama::OllamaAdapter, openai::OpenAiAdapter, routing::RoutingGateway,
};

use std::sync::Arc;

/// Wire every provider adapter from config into a routing gateway
pub fn build_gateway(config: &FileConfig) -> RoutingGateway {
    let providers: Vec<Arc<dyn ProviderAdapter>> = vec![
        Arc::new(OllamaAdapter::from_config(&config.backbone)),
        Arc::new(GeminiAdapter::from_config(&config.providers.gemini)),
        Arc::new(OpenAiAdapter::from_config(&config.providers.openai)),
        Arc::new(AnthropicAdapter::from_config(&config.providers.anthropic)),
    ];
    RoutingGateway::new(providers)
}
