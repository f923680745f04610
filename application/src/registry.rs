//! Pod registry - the single owner of all live pod state.
//!
//! Every mutation goes through this registry so the "one in-flight
//! exchange per pod" rule and the removal-while-in-flight rule are
//! enforced in one place: `begin_exchange` is an atomic check-and-claim,
//! and `fail_exchange`/`finalize_exchange` are check-then-act commits
//! that become no-ops when the pod was removed mid-flight.

use quantizer_domain::{
    AgentId, DomainError, Pod, PodId, PodStatus, TurnId, TurnRecord, blend_signal,
    truncate_snippet,
};
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Most recent "architect needed" event, surfaced to the operator layer
#[derive(Debug, Clone)]
pub struct ArchitectAlert {
    pub pod_name: String,
    pub text: String,
}

/// Snapshot handed to the TurnProtocol when it claims a pod
#[derive(Debug, Clone)]
pub struct ExchangeTicket {
    pub pod_id: PodId,
    pub pod_name: String,
    pub agents: [AgentId; 2],
    /// Transcript length before this exchange's user turn was appended;
    /// drives the difficulty ramp.
    pub prior_turns: usize,
    pub run_number: u32,
}

/// Result of a completed exchange, committed in one finalize step
#[derive(Debug, Clone)]
pub struct ExchangeOutcome {
    pub turns: Vec<TurnRecord>,
    pub avg_reasoning: u8,
}

/// Owner of the set of live pods
pub struct PodRegistry {
    pods: RwLock<HashMap<PodId, Pod>>,
    architect_alert: Mutex<Option<ArchitectAlert>>,
    pod_counter: AtomicU64,
    turn_counter: AtomicU64,
    default_max_turns: u32,
}

impl PodRegistry {
    pub fn new(default_max_turns: u32) -> Self {
        Self {
            pods: RwLock::new(HashMap::new()),
            architect_alert: Mutex::new(None),
            pod_counter: AtomicU64::new(0),
            turn_counter: AtomicU64::new(0),
            default_max_turns,
        }
    }

    /// Mint a transcript-unique turn id
    pub fn next_turn_id(&self) -> String {
        format!("turn-{}", self.turn_counter.fetch_add(1, Ordering::Relaxed) + 1)
    }

    /// Create a new pod with the `Browser-NN` naming scheme
    pub async fn create_pod(&self, agents: [AgentId; 2], max_turns: Option<u32>) -> Pod {
        let n = self.pod_counter.fetch_add(1, Ordering::Relaxed) + 1;
        let pod = Pod::new(
            format!("pod-{}", n),
            format!("Browser-{:02}", n),
            agents,
            max_turns.unwrap_or(self.default_max_turns),
        );
        info!(
            "Pod {} launched: {} <-> {}",
            pod.name, pod.agents[0], pod.agents[1]
        );
        self.pods.write().await.insert(pod.id.clone(), pod.clone());
        pod
    }

    /// Remove a pod. Any in-flight exchange keeps running but its final
    /// commit will find nothing to mutate.
    pub async fn remove_pod(&self, id: &PodId) -> bool {
        let removed = self.pods.write().await.remove(id).is_some();
        if removed {
            info!("Pod {} terminated", id);
        }
        removed
    }

    pub async fn get(&self, id: &PodId) -> Option<Pod> {
        self.pods.read().await.get(id).cloned()
    }

    pub async fn list(&self) -> Vec<Pod> {
        let mut pods: Vec<Pod> = self.pods.read().await.values().cloned().collect();
        pods.sort_by(|a, b| a.name.cmp(&b.name));
        pods
    }

    /// Atomically claim a pod for one exchange.
    ///
    /// Rejects (does not queue) when the pod is already awaiting a reply
    /// or has reached its turn ceiling. On success the operator prompt is
    /// appended as a `user` turn and the pod enters `Running`.
    pub async fn begin_exchange(
        &self,
        id: &PodId,
        prompt: &str,
    ) -> Result<ExchangeTicket, DomainError> {
        let mut pods = self.pods.write().await;
        let pod = pods
            .get_mut(id)
            .ok_or_else(|| DomainError::PodNotFound(id.to_string()))?;

        if pod.is_awaiting_reply {
            return Err(DomainError::PodBusy(pod.name.clone()));
        }
        if pod.at_turn_limit() {
            return Err(DomainError::TurnLimitReached(pod.name.clone()));
        }

        let prior_turns = pod.transcript.len();
        let run_number = pod.run_count + 1;
        pod.transcript.push(
            TurnRecord::user(self.next_turn_id(), prompt).with_run_number(run_number),
        );
        pod.is_awaiting_reply = true;
        pod.status = PodStatus::Running;
        pod.needs_architect = false;

        Ok(ExchangeTicket {
            pod_id: pod.id.clone(),
            pod_name: pod.name.clone(),
            agents: pod.agents.clone(),
            prior_turns,
            run_number,
        })
    }

    /// Terminal provider failure: record the turns produced so far plus
    /// one synthetic error turn, move the pod to `Error`, and release the
    /// re-entrancy guard. No-op if the pod was removed.
    pub async fn fail_exchange(
        &self,
        id: &PodId,
        completed_turns: Vec<TurnRecord>,
        agent: AgentId,
        message: impl Into<String>,
    ) -> Option<Pod> {
        let mut pods = self.pods.write().await;
        let Some(pod) = pods.get_mut(id) else {
            debug!("fail_exchange: pod {} no longer registered", id);
            return None;
        };

        pod.transcript.extend(completed_turns);
        pod.transcript.push(
            TurnRecord::error(self.next_turn_id(), agent, message)
                .with_run_number(pod.run_count + 1),
        );
        pod.status = PodStatus::Error;
        pod.is_awaiting_reply = false;
        Some(pod.clone())
    }

    /// Commit a completed exchange: append its turns, fold the average
    /// reasoning score into the signal, advance the counters, and release
    /// the re-entrancy guard. No-op if the pod was removed mid-flight.
    pub async fn finalize_exchange(&self, id: &PodId, outcome: ExchangeOutcome) -> Option<Pod> {
        let mut pods = self.pods.write().await;
        let Some(pod) = pods.get_mut(id) else {
            debug!("finalize_exchange: pod {} no longer registered", id);
            return None;
        };

        pod.transcript.extend(outcome.turns);
        pod.signal_strength = blend_signal(pod.signal_strength, outcome.avg_reasoning);
        pod.current_turn = (pod.current_turn + 1).min(pod.max_turns);
        pod.run_count += 1;
        pod.is_awaiting_reply = false;
        pod.status = if pod.at_turn_limit() {
            PodStatus::Idle
        } else {
            PodStatus::Running
        };

        info!(
            "Pod {} insight aggregated (signal {}%): {}",
            pod.name,
            pod.signal_strength,
            truncate_snippet(pod.last_message().unwrap_or(""), 40)
        );
        Some(pod.clone())
    }

    /// Flag a pod whose agent asked for the architect. Check-then-act:
    /// silently does nothing for a removed pod.
    pub async fn mark_architect(&self, id: &PodId) {
        if let Some(pod) = self.pods.write().await.get_mut(id) {
            pod.needs_architect = true;
        }
    }

    /// Crown one turn, un-crowning any previous holder in the same pod
    pub async fn crown_turn(&self, id: &PodId, turn_id: &TurnId) -> Result<(), DomainError> {
        let mut pods = self.pods.write().await;
        let pod = pods
            .get_mut(id)
            .ok_or_else(|| DomainError::PodNotFound(id.to_string()))?;
        pod.crown_turn(turn_id)
    }

    /// Record the most recent architect alert (replacing any prior one)
    pub fn record_architect_alert(&self, alert: ArchitectAlert) {
        if let Ok(mut slot) = self.architect_alert.lock() {
            *slot = Some(alert);
        }
    }

    /// Read the current architect alert without clearing it
    pub fn architect_alert(&self) -> Option<ArchitectAlert> {
        self.architect_alert.lock().ok().and_then(|slot| slot.clone())
    }

    /// Read and clear the current architect alert
    pub fn take_architect_alert(&self) -> Option<ArchitectAlert> {
        self.architect_alert.lock().ok().and_then(|mut slot| slot.take())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> PodRegistry {
        PodRegistry::new(10)
    }

    fn outcome(avg: u8) -> ExchangeOutcome {
        ExchangeOutcome {
            turns: vec![],
            avg_reasoning: avg,
        }
    }

    #[tokio::test]
    async fn create_names_pods_sequentially() {
        let registry = registry();
        let a = registry.create_pod(AgentId::default_pair(), None).await;
        let b = registry.create_pod(AgentId::default_pair(), Some(3)).await;
        assert_eq!(a.name, "Browser-01");
        assert_eq!(b.name, "Browser-02");
        assert_eq!(a.max_turns, 10);
        assert_eq!(b.max_turns, 3);
    }

    #[tokio::test]
    async fn begin_appends_user_turn_and_claims_pod() {
        let registry = registry();
        let pod = registry.create_pod(AgentId::default_pair(), None).await;

        let ticket = registry.begin_exchange(&pod.id, "hello").await.unwrap();
        assert_eq!(ticket.prior_turns, 0);
        assert_eq!(ticket.run_number, 1);

        let pod = registry.get(&pod.id).await.unwrap();
        assert!(pod.is_awaiting_reply);
        assert_eq!(pod.status, PodStatus::Running);
        assert_eq!(pod.transcript.len(), 1);
        assert_eq!(pod.transcript[0].text, "hello");
    }

    #[tokio::test]
    async fn busy_pod_rejects_second_exchange_without_mutation() {
        let registry = registry();
        let pod = registry.create_pod(AgentId::default_pair(), None).await;
        registry.begin_exchange(&pod.id, "first").await.unwrap();

        let err = registry.begin_exchange(&pod.id, "second").await.unwrap_err();
        assert!(err.is_busy());

        let pod = registry.get(&pod.id).await.unwrap();
        assert_eq!(pod.transcript.len(), 1, "rejected prompt must not be buffered");
    }

    #[tokio::test]
    async fn turn_limit_blocks_new_exchanges() {
        let registry = registry();
        let pod = registry.create_pod(AgentId::default_pair(), Some(1)).await;

        registry.begin_exchange(&pod.id, "only run").await.unwrap();
        registry.finalize_exchange(&pod.id, outcome(80)).await.unwrap();

        let err = registry.begin_exchange(&pod.id, "too many").await.unwrap_err();
        assert!(matches!(err, DomainError::TurnLimitReached(_)));

        let pod = registry.get(&pod.id).await.unwrap();
        assert_eq!(pod.status, PodStatus::Idle, "pod must leave Running at the ceiling");
        assert_eq!(pod.current_turn, 1);
    }

    #[tokio::test]
    async fn finalize_blends_signal_and_advances_counters() {
        let registry = registry();
        let pod = registry.create_pod(AgentId::default_pair(), None).await;

        registry.begin_exchange(&pod.id, "q").await.unwrap();
        let pod = registry.finalize_exchange(&pod.id, outcome(80)).await.unwrap();
        assert_eq!(pod.signal_strength, 40);
        assert_eq!(pod.current_turn, 1);
        assert_eq!(pod.run_count, 1);
        assert!(!pod.is_awaiting_reply);
        assert_eq!(pod.status, PodStatus::Running);
    }

    #[tokio::test]
    async fn finalize_after_removal_is_noop() {
        let registry = registry();
        let pod = registry.create_pod(AgentId::default_pair(), None).await;
        registry.begin_exchange(&pod.id, "q").await.unwrap();

        assert!(registry.remove_pod(&pod.id).await);
        assert!(registry.finalize_exchange(&pod.id, outcome(80)).await.is_none());
        assert!(registry.fail_exchange(&pod.id, vec![], AgentId::Gemini, "late").await.is_none());
        assert!(registry.get(&pod.id).await.is_none());
    }

    #[tokio::test]
    async fn fail_records_error_turn_and_releases_guard() {
        let registry = registry();
        let pod = registry.create_pod(AgentId::default_pair(), None).await;
        registry.begin_exchange(&pod.id, "q").await.unwrap();

        let pod = registry
            .fail_exchange(&pod.id, vec![], AgentId::Gemini, "HTTP 500")
            .await
            .unwrap();
        assert_eq!(pod.status, PodStatus::Error);
        assert!(!pod.is_awaiting_reply);
        assert_eq!(pod.transcript.len(), 2);
        assert_eq!(pod.transcript[1].reasoning_score, Some(0));
        assert_eq!(pod.current_turn, 0, "failed exchange does not advance the turn count");
    }

    #[tokio::test]
    async fn architect_alert_is_read_and_cleared() {
        let registry = registry();
        registry.record_architect_alert(ArchitectAlert {
            pod_name: "Browser-01".to_string(),
            text: "need the architect".to_string(),
        });

        assert_eq!(registry.architect_alert().unwrap().pod_name, "Browser-01");
        assert!(registry.take_architect_alert().is_some());
        assert!(registry.take_architect_alert().is_none());
    }

    #[tokio::test]
    async fn begin_clears_architect_flag() {
        let registry = registry();
        let pod = registry.create_pod(AgentId::default_pair(), None).await;
        registry.mark_architect(&pod.id).await;
        assert!(registry.get(&pod.id).await.unwrap().needs_architect);

        registry.begin_exchange(&pod.id, "again").await.unwrap();
        assert!(!registry.get(&pod.id).await.unwrap().needs_architect);
    }
}
