//! Run Exchange use case - the per-pod turn protocol.
//!
//! One invocation drives a strictly sequential exchange:
//! Agent A call -> score A -> examiner question -> Agent B call -> score B
//! -> finalize. The registry guards re-entrancy at entry and commits the
//! result check-then-act, so a pod removed mid-flight is simply never
//! mutated again.

use crate::ports::agent_gateway::{AgentError, AgentGateway};
use crate::registry::{ArchitectAlert, ExchangeOutcome, ExchangeTicket, PodRegistry};
use crate::scoring::{ExaminerGenerator, ReasoningScorer};
use quantizer_domain::{
    AgentId, DomainError, Pod, PodId, PromptContract, PromptTemplate, TurnRecord, difficulty_for,
    escalate, split_reasoning, truncate_snippet,
};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Case-insensitive token an agent uses to request human intervention
const ARCHITECT_TOKEN: &str = "architect";

/// Max characters of agent output carried in an architect alert
const ALERT_SNIPPET_CHARS: usize = 80;

/// Errors terminal for one exchange (never for the pod's future runs)
#[derive(Error, Debug)]
pub enum ExchangeError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Agent {agent} call failed: {source}")]
    Agent {
        agent: AgentId,
        source: AgentError,
    },
}

/// Use case for running one full exchange on a pod
pub struct RunExchangeUseCase<G: AgentGateway + 'static> {
    gateway: Arc<G>,
    registry: Arc<PodRegistry>,
    scorer: ReasoningScorer<G>,
    examiner: ExaminerGenerator<G>,
}

impl<G: AgentGateway + 'static> RunExchangeUseCase<G> {
    pub fn new(gateway: Arc<G>, registry: Arc<PodRegistry>) -> Self {
        Self {
            scorer: ReasoningScorer::new(Arc::clone(&gateway)),
            examiner: ExaminerGenerator::new(Arc::clone(&gateway)),
            gateway,
            registry,
        }
    }

    /// Drive one exchange on `pod_id` for the operator prompt.
    ///
    /// Returns the updated pod, or `Ok(None)` when the pod was removed
    /// while the exchange was in flight (the result is discarded).
    pub async fn execute(
        &self,
        pod_id: &PodId,
        prompt: &str,
        contract: &PromptContract,
    ) -> Result<Option<Pod>, ExchangeError> {
        let ticket = self.registry.begin_exchange(pod_id, prompt).await?;
        let [agent_a, agent_b] = ticket.agents.clone();

        let difficulty = difficulty_for(ticket.prior_turns);
        let next_difficulty = escalate(difficulty);
        info!(
            "Pod {}: exchange start ({} -> {}, difficulty {})",
            ticket.pod_name, agent_a, agent_b, difficulty
        );

        // Agent A
        let system_a = PromptTemplate::agent_system(contract, difficulty);
        let raw_a = match self.gateway.call(&agent_a, &system_a, prompt).await {
            Ok(text) => text,
            Err(e) => return self.abort(&ticket, vec![], agent_a, e).await,
        };
        self.check_architect(&ticket, &raw_a).await;

        let (thinking_a, answer_a) = split_reasoning(&raw_a);
        let score_a = self
            .scorer
            .score(prompt, pick_reasoning(&thinking_a, &answer_a))
            .await;
        let turn_a = TurnRecord::agent(
            self.registry.next_turn_id(),
            agent_a.clone(),
            answer_a.clone(),
            Some(thinking_a),
            score_a,
            difficulty,
        )
        .with_run_number(ticket.run_number);

        // Examiner follow-up
        let question = self
            .examiner
            .next_question(prompt, &answer_a, next_difficulty, &agent_b)
            .await;
        let examiner_turn =
            TurnRecord::examiner(self.registry.next_turn_id(), &question, next_difficulty)
                .with_run_number(ticket.run_number);

        // Agent B
        let system_b = PromptTemplate::agent_system(contract, next_difficulty);
        let raw_b = match self.gateway.call(&agent_b, &system_b, &question).await {
            Ok(text) => text,
            Err(e) => {
                return self
                    .abort(&ticket, vec![turn_a, examiner_turn], agent_b, e)
                    .await;
            }
        };
        self.check_architect(&ticket, &raw_b).await;

        let (thinking_b, answer_b) = split_reasoning(&raw_b);
        let score_b = self
            .scorer
            .score(&question, pick_reasoning(&thinking_b, &answer_b))
            .await;
        let turn_b = TurnRecord::agent(
            self.registry.next_turn_id(),
            agent_b.clone(),
            answer_b,
            Some(thinking_b),
            score_b,
            next_difficulty,
        )
        .with_run_number(ticket.run_number);

        // Finalize
        let avg_reasoning = ((score_a as f64 + score_b as f64) / 2.0).round() as u8;
        let outcome = ExchangeOutcome {
            turns: vec![turn_a, examiner_turn, turn_b],
            avg_reasoning,
        };

        match self.registry.finalize_exchange(pod_id, outcome).await {
            Some(pod) => Ok(Some(pod)),
            None => {
                debug!(
                    "Pod {} removed mid-exchange; result discarded",
                    ticket.pod_name
                );
                Ok(None)
            }
        }
    }

    /// Terminal agent failure: record one synthetic error turn and stop
    /// the exchange without calling any later step.
    async fn abort(
        &self,
        ticket: &ExchangeTicket,
        completed_turns: Vec<TurnRecord>,
        agent: AgentId,
        error: AgentError,
    ) -> Result<Option<Pod>, ExchangeError> {
        warn!(
            "Pod {}: {} call failed: {}",
            ticket.pod_name, agent, error
        );
        self.registry
            .fail_exchange(
                &ticket.pod_id,
                completed_turns,
                agent.clone(),
                format!("{} call failed: {}", agent, error),
            )
            .await;
        Err(ExchangeError::Agent {
            agent,
            source: error,
        })
    }

    /// Side-channel escalation: an agent naming the architect flags the
    /// pod and records an alert, but the turn still completes normally.
    async fn check_architect(&self, ticket: &ExchangeTicket, raw_output: &str) {
        if !raw_output.to_lowercase().contains(ARCHITECT_TOKEN) {
            return;
        }
        warn!("Pod {}: agent requested the architect", ticket.pod_name);
        self.registry.mark_architect(&ticket.pod_id).await;
        self.registry.record_architect_alert(ArchitectAlert {
            pod_name: ticket.pod_name.clone(),
            text: truncate_snippet(raw_output, ALERT_SNIPPET_CHARS),
        });
    }
}

/// Score the shown reasoning trace when present, the bare answer otherwise
fn pick_reasoning<'a>(thinking: &'a str, answer: &'a str) -> &'a str {
    if thinking.is_empty() { answer } else { thinking }
}
