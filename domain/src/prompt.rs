//! Prompt templates for the exchange flow

use crate::agent::AgentId;
use crate::contract::PromptContract;

/// Templates for generating prompts at each exchange step
pub struct PromptTemplate;

impl PromptTemplate {
    /// System prompt for a conversational agent, rendered from an
    /// immutable contract snapshot taken at exchange start.
    pub fn agent_system(contract: &PromptContract, difficulty: u8) -> String {
        let mut prompt = format!(
            "{}\n\nShow your reasoning inside <thinking></thinking> tags before \
             your final answer. Current difficulty level: {}/10.",
            contract.base_prompt, difficulty
        );

        if !contract.constraints.is_empty() {
            prompt.push_str("\n\nConstraints:");
            for constraint in &contract.constraints {
                prompt.push_str(&format!("\n- {}", constraint));
            }
        }

        if !contract.examples.is_empty() {
            prompt.push_str("\n\nExamples of the work expected:");
            for example in &contract.examples {
                prompt.push_str(&format!("\n- {}", example));
            }
        }

        prompt
    }

    /// System prompt for the backbone when scoring a reasoning trace
    pub fn scoring_system() -> &'static str {
        r#"You are a strict evaluator of reasoning quality.
Rate how well the reasoning shows its work: a high score means an explicit
step-by-step derivation; a low score means a bare assertion.
Judge only the visible reasoning, never the correctness of the answer.
Respond with a single integer from 0 to 100 and nothing else."#
    }

    /// User prompt for a scoring request
    pub fn scoring_request(problem: &str, reasoning: &str) -> String {
        format!(
            r#"Problem under discussion:
{}

Reasoning to evaluate:
{}

Score (0-100):"#,
            problem, reasoning
        )
    }

    /// System prompt for the backbone when generating a follow-up question
    pub fn examiner_system() -> &'static str {
        r#"You are a Socratic examiner escalating a technical discussion.
Given the previous answer, produce one harder follow-up question that
probes the weakest or least-supported step of that answer.
Reply with the question only - no preamble, no commentary."#
    }

    /// User prompt for an examiner request
    pub fn examiner_request(topic: &str, prior_answer: &str, next_difficulty: u8) -> String {
        format!(
            r#"Topic: {}

Previous answer:
{}

Produce a single follow-up question at difficulty {}/10."#,
            topic, prior_answer, next_difficulty
        )
    }

    /// Deterministic fallback question when the backbone is unreachable.
    /// The protocol must never stall on the examiner step.
    pub fn examiner_fallback(next_agent: &AgentId, next_difficulty: u8) -> String {
        format!(
            "{}, challenge the previous answer: identify its weakest assumption \
             and defend or refute it with explicit step-by-step reasoning \
             (difficulty {}/10).",
            next_agent, next_difficulty
        )
    }
}
