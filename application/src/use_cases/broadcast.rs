//! Broadcast use case - fan out one prompt across many pods.
//!
//! Each pod runs its own independent exchange with no ordering guarantee
//! between pods and no shared mutable state beyond the registry. Busy
//! pods reject individually; one pod's failure never touches another.

use crate::ports::agent_gateway::AgentGateway;
use crate::use_cases::run_exchange::{ExchangeError, RunExchangeUseCase};
use quantizer_domain::{Pod, PodId, PromptContract};
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{info, warn};

/// Per-pod results of one broadcast
pub struct BroadcastReport {
    pub results: Vec<(PodId, Result<Option<Pod>, ExchangeError>)>,
}

impl BroadcastReport {
    /// Pods whose exchange completed and committed
    pub fn completed(&self) -> usize {
        self.results
            .iter()
            .filter(|(_, r)| matches!(r, Ok(Some(_))))
            .count()
    }

    /// Pods rejected because an exchange was already in flight
    pub fn rejected_busy(&self) -> usize {
        self.results
            .iter()
            .filter(|(_, r)| matches!(r, Err(ExchangeError::Domain(e)) if e.is_busy()))
            .count()
    }
}

/// Use case for triggering exchanges concurrently across pods
pub struct BroadcastUseCase<G: AgentGateway + 'static> {
    exchange: Arc<RunExchangeUseCase<G>>,
}

impl<G: AgentGateway + 'static> BroadcastUseCase<G> {
    pub fn new(exchange: Arc<RunExchangeUseCase<G>>) -> Self {
        Self { exchange }
    }

    /// Issue one independent exchange per pod, in parallel
    pub async fn execute(
        &self,
        pod_ids: Vec<PodId>,
        prompt: &str,
        contract: &PromptContract,
    ) -> BroadcastReport {
        info!("Broadcasting prompt to {} pods", pod_ids.len());

        let mut join_set = JoinSet::new();
        for pod_id in pod_ids {
            let exchange = Arc::clone(&self.exchange);
            let prompt = prompt.to_string();
            let contract = contract.clone();

            join_set.spawn(async move {
                let result = exchange.execute(&pod_id, &prompt, &contract).await;
                (pod_id, result)
            });
        }

        let mut results = Vec::new();
        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((pod_id, result)) => {
                    if let Err(e) = &result {
                        warn!("Pod {} exchange failed: {}", pod_id, e);
                    }
                    results.push((pod_id, result));
                }
                Err(e) => {
                    warn!("Task join error: {}", e);
                }
            }
        }

        BroadcastReport { results }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::agent_gateway::AgentError;
    use crate::registry::PodRegistry;
    use async_trait::async_trait;
    use quantizer_domain::AgentId;

    /// Gateway that answers every call with a fixed scripted text
    struct UniformGateway;

    #[async_trait]
    impl AgentGateway for UniformGateway {
        async fn call(
            &self,
            agent: &AgentId,
            system_prompt: &str,
            _user_prompt: &str,
        ) -> Result<String, AgentError> {
            if *agent == AgentId::LocalLlm {
                if system_prompt.contains("Socratic") {
                    return Ok("Follow-up?".to_string());
                }
                return Ok("80".to_string());
            }
            Ok("an answer".to_string())
        }

        async fn available_models(&self) -> Result<Vec<String>, AgentError> {
            Ok(vec![])
        }

        async fn probe(&self) -> Result<(), AgentError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn broadcast_runs_all_pods_independently() {
        let gateway = Arc::new(UniformGateway);
        let registry = Arc::new(PodRegistry::new(10));
        let mut ids = Vec::new();
        for _ in 0..3 {
            ids.push(registry.create_pod(AgentId::default_pair(), None).await.id);
        }

        let exchange = Arc::new(RunExchangeUseCase::new(gateway, Arc::clone(&registry)));
        let broadcast = BroadcastUseCase::new(exchange);
        let contract = PromptContract::new("c-1", "base");

        let report = broadcast.execute(ids.clone(), "prompt", &contract).await;
        assert_eq!(report.results.len(), 3);
        assert_eq!(report.completed(), 3);

        for id in &ids {
            let pod = registry.get(id).await.unwrap();
            assert_eq!(pod.transcript.len(), 4);
            assert_eq!(pod.run_count, 1);
        }
    }

    #[tokio::test]
    async fn busy_pod_is_rejected_inside_broadcast() {
        let gateway = Arc::new(UniformGateway);
        let registry = Arc::new(PodRegistry::new(10));
        let free = registry.create_pod(AgentId::default_pair(), None).await;
        let busy = registry.create_pod(AgentId::default_pair(), None).await;
        registry.begin_exchange(&busy.id, "claimed").await.unwrap();

        let exchange = Arc::new(RunExchangeUseCase::new(gateway, Arc::clone(&registry)));
        let broadcast = BroadcastUseCase::new(exchange);
        let contract = PromptContract::new("c-1", "base");

        let report = broadcast
            .execute(vec![free.id.clone(), busy.id.clone()], "prompt", &contract)
            .await;

        assert_eq!(report.completed(), 1);
        assert_eq!(report.rejected_busy(), 1);
    }
}
