//! Backbone-assisted scoring and examiner generation.
//!
//! Both services degrade instead of failing: reasoning quality is an
//! enrichment signal and the follow-up question must never stall the
//! exchange, so every failure path here produces a usable value.

use crate::ports::agent_gateway::AgentGateway;
use quantizer_domain::{
    AgentId, NEUTRAL_REASONING_SCORE, PromptTemplate, parse_reasoning_score,
};
use std::sync::Arc;
use tracing::warn;

/// Scores a reasoning transcript 0-100 via the local backbone
pub struct ReasoningScorer<G: AgentGateway> {
    gateway: Arc<G>,
}

impl<G: AgentGateway> ReasoningScorer<G> {
    pub fn new(gateway: Arc<G>) -> Self {
        Self { gateway }
    }

    /// Ask the backbone to rate the reasoning shown for `problem`.
    ///
    /// Any failure (network, missing integer) degrades to the neutral
    /// default rather than propagating.
    pub async fn score(&self, problem: &str, reasoning: &str) -> u8 {
        let request = PromptTemplate::scoring_request(problem, reasoning);
        let response = match self
            .gateway
            .call(&AgentId::LocalLlm, PromptTemplate::scoring_system(), &request)
            .await
        {
            Ok(text) => text,
            Err(e) => {
                warn!("Reasoning scorer degraded ({}); using neutral default", e);
                return NEUTRAL_REASONING_SCORE;
            }
        };

        match parse_reasoning_score(&response) {
            Some(score) => score,
            None => {
                warn!("No integer in backbone score response; using neutral default");
                NEUTRAL_REASONING_SCORE
            }
        }
    }
}

/// Produces the next, harder follow-up question via the local backbone
pub struct ExaminerGenerator<G: AgentGateway> {
    gateway: Arc<G>,
}

impl<G: AgentGateway> ExaminerGenerator<G> {
    pub fn new(gateway: Arc<G>) -> Self {
        Self { gateway }
    }

    /// Generate a follow-up question for `next_agent` at the escalated
    /// difficulty. Falls back to a deterministic templated question when
    /// the backbone is unreachable.
    pub async fn next_question(
        &self,
        topic: &str,
        prior_answer: &str,
        next_difficulty: u8,
        next_agent: &AgentId,
    ) -> String {
        let request = PromptTemplate::examiner_request(topic, prior_answer, next_difficulty);
        match self
            .gateway
            .call(&AgentId::LocalLlm, PromptTemplate::examiner_system(), &request)
            .await
        {
            Ok(question) if !question.trim().is_empty() => question.trim().to_string(),
            Ok(_) => PromptTemplate::examiner_fallback(next_agent, next_difficulty),
            Err(e) => {
                warn!("Examiner degraded ({}); using templated question", e);
                PromptTemplate::examiner_fallback(next_agent, next_difficulty)
            }
        }
    }
}
