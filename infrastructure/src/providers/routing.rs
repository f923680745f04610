//! Routing gateway - maps agent identities onto provider adapters.
//!
//! The routing table is static: agents backed by a dedicated vendor go
//! to that vendor's adapter, everything else falls through to the local
//! backbone. A missing adapter also falls back to the backbone, so the
//! engine keeps running with nothing but an Ollama server configured.

use super::{ProviderAdapter, ProviderKind};
use async_trait::async_trait;
use quantizer_application::{AgentError, AgentGateway};
use quantizer_domain::AgentId;
use std::sync::Arc;
use tracing::debug;

fn provider_for(agent: &AgentId) -> ProviderKind {
    match agent {
        AgentId::Gemini => ProviderKind::Gemini,
        AgentId::ChatGpt => ProviderKind::OpenAi,
        AgentId::Claude => ProviderKind::Anthropic,
        AgentId::Grok | AgentId::Copilot | AgentId::LocalLlm | AgentId::PiecesOs => {
            ProviderKind::Ollama
        }
    }
}

/// Gateway that dispatches each agent call to its provider adapter
pub struct RoutingGateway {
    providers: Vec<Arc<dyn ProviderAdapter>>,
}

impl RoutingGateway {
    pub fn new(providers: Vec<Arc<dyn ProviderAdapter>>) -> Self {
        Self { providers }
    }

    fn find(&self, kind: ProviderKind) -> Option<&Arc<dyn ProviderAdapter>> {
        self.providers.iter().find(|p| p.kind() == kind)
    }

    /// Adapter for an agent, falling back to the backbone when the
    /// dedicated provider is not wired in
    fn resolve(&self, agent: &AgentId) -> Result<&Arc<dyn ProviderAdapter>, AgentError> {
        let kind = provider_for(agent);
        if let Some(adapter) = self.find(kind) {
            return Ok(adapter);
        }
        debug!("No {:?} adapter registered, routing {} to backbone", kind, agent);
        self.backbone()
    }

    fn backbone(&self) -> Result<&Arc<dyn ProviderAdapter>, AgentError> {
        self.find(ProviderKind::Ollama).ok_or_else(|| {
            AgentError::Configuration("no backbone adapter registered".to_string())
        })
    }
}

#[async_trait]
impl AgentGateway for RoutingGateway {
    async fn call(
        &self,
        agent: &AgentId,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, AgentError> {
        self.resolve(agent)?.call(system_prompt, user_prompt).await
    }

    async fn available_models(&self) -> Result<Vec<String>, AgentError> {
        self.backbone()?.available_models().await
    }

    async fn probe(&self) -> Result<(), AgentError> {
        self.backbone()?.probe().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Adapter that records nothing and answers with its kind's name
    struct FixedAdapter {
        kind: ProviderKind,
        reply: &'static str,
    }

    #[async_trait]
    impl ProviderAdapter for FixedAdapter {
        fn kind(&self) -> ProviderKind {
            self.kind
        }

        async fn call(&self, _system: &str, _user: &str) -> Result<String, AgentError> {
            Ok(self.reply.to_string())
        }

        async fn probe(&self) -> Result<(), AgentError> {
            Ok(())
        }
    }

    fn gateway_with(kinds: &[(ProviderKind, &'static str)]) -> RoutingGateway {
        RoutingGateway::new(
            kinds
                .iter()
                .map(|(kind, reply)| {
                    Arc::new(FixedAdapter { kind: *kind, reply }) as Arc<dyn ProviderAdapter>
                })
                .collect(),
        )
    }

    #[tokio::test]
    async fn dedicated_vendors_are_routed_directly() {
        let gateway = gateway_with(&[
            (ProviderKind::Ollama, "ollama"),
            (ProviderKind::Gemini, "gemini"),
            (ProviderKind::OpenAi, "openai"),
            (ProviderKind::Anthropic, "anthropic"),
        ]);

        assert_eq!(gateway.call(&AgentId::Gemini, "", "").await.unwrap(), "gemini");
        assert_eq!(gateway.call(&AgentId::ChatGpt, "", "").await.unwrap(), "openai");
        assert_eq!(gateway.call(&AgentId::Claude, "", "").await.unwrap(), "anthropic");
    }

    #[tokio::test]
    async fn backbone_agents_route_to_ollama() {
        let gateway = gateway_with(&[(ProviderKind::Ollama, "ollama")]);

        for agent in [
            AgentId::Grok,
            AgentId::Copilot,
            AgentId::LocalLlm,
            AgentId::PiecesOs,
        ] {
            assert_eq!(gateway.call(&agent, "", "").await.unwrap(), "ollama");
        }
    }

    #[tokio::test]
    async fn missing_vendor_falls_back_to_backbone() {
        let gateway = gateway_with(&[(ProviderKind::Ollama, "ollama")]);
        assert_eq!(gateway.call(&AgentId::Claude, "", "").await.unwrap(), "ollama");
    }

    #[tokio::test]
    async fn no_backbone_at_all_is_a_configuration_error() {
        let gateway = gateway_with(&[(ProviderKind::Gemini, "gemini")]);
        let result = gateway.call(&AgentId::Grok, "", "").await;
        assert!(matches!(result, Err(AgentError::Configuration(_))));
    }

    #[tokio::test]
    async fn probe_targets_the_backbone() {
        let gateway = gateway_with(&[(ProviderKind::Ollama, "ollama")]);
        assert!(gateway.probe().await.is_ok());
    }
}
