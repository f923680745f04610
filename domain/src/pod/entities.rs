//! Pod domain entities

use crate::agent::AgentId;
use crate::core::error::DomainError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Unique pod identifier (Value Object)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PodId(String);

impl PodId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PodId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique turn identifier (Value Object)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TurnId(String);

impl TurnId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TurnId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle state of a pod
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PodStatus {
    Idle,
    Running,
    Syncing,
    Error,
}

impl std::fmt::Display for PodStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PodStatus::Idle => "Idle",
            PodStatus::Running => "Running",
            PodStatus::Syncing => "Syncing",
            PodStatus::Error => "Error",
        };
        write!(f, "{}", s)
    }
}

/// Who produced a turn in the transcript
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    /// Operator (or broadcast) prompt
    User,
    /// Backbone-generated follow-up question
    Examiner,
    /// One of the pod's two agents
    Agent(AgentId),
}

impl Role {
    /// Agent turns carry reasoning scores; user and examiner turns do not
    pub fn is_scorable(&self) -> bool {
        matches!(self, Role::Agent(_))
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Examiner => write!(f, "examiner"),
            Role::Agent(a) => write!(f, "{}", a),
        }
    }
}

/// One entry in a pod's transcript (Entity)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnRecord {
    pub id: TurnId,
    pub role: Role,
    /// Final answer / conclusion text
    pub text: String,
    /// Extracted reasoning trace, when the agent exposed one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thinking: Option<String>,
    pub timestamp: DateTime<Utc>,
    /// 0-100 reasoning quality, decoupled from answer correctness
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reasoning_score: Option<u8>,
    /// 1-10 escalating difficulty level
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<u8>,
    /// Which run of the current prompt this came from
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_number: Option<u32>,
    /// Operator marked this reasoning path as the winner
    #[serde(default)]
    pub crowned: bool,
}

impl TurnRecord {
    fn base(id: impl Into<String>, role: Role, text: impl Into<String>) -> Self {
        Self {
            id: TurnId::new(id),
            role,
            text: text.into(),
            thinking: None,
            timestamp: Utc::now(),
            reasoning_score: None,
            difficulty: None,
            run_number: None,
            crowned: false,
        }
    }

    /// Operator prompt turn
    pub fn user(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self::base(id, Role::User, text)
    }

    /// Backbone examiner question turn
    pub fn examiner(id: impl Into<String>, text: impl Into<String>, difficulty: u8) -> Self {
        let mut turn = Self::base(id, Role::Examiner, text);
        turn.difficulty = Some(difficulty);
        turn
    }

    /// Scored agent answer turn
    pub fn agent(
        id: impl Into<String>,
        agent: AgentId,
        text: impl Into<String>,
        thinking: Option<String>,
        reasoning_score: u8,
        difficulty: u8,
    ) -> Self {
        let mut turn = Self::base(id, Role::Agent(agent), text);
        turn.thinking = thinking.filter(|t| !t.is_empty());
        turn.reasoning_score = Some(reasoning_score.min(100));
        turn.difficulty = Some(difficulty.clamp(1, 10));
        turn
    }

    /// Synthetic turn recording a terminal provider failure
    pub fn error(id: impl Into<String>, agent: AgentId, message: impl Into<String>) -> Self {
        let mut turn = Self::base(id, Role::Agent(agent), message);
        turn.reasoning_score = Some(0);
        turn
    }

    pub fn with_run_number(mut self, run_number: u32) -> Self {
        self.run_number = Some(run_number);
        self
    }
}

/// One independent two-agent conversation session (Entity)
///
/// Invariants upheld by the mutation methods:
/// - `signal_strength` stays in 0..=100
/// - `current_turn` never exceeds `max_turns`
/// - at most one transcript turn is crowned at any time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pod {
    pub id: PodId,
    pub name: String,
    pub agents: [AgentId; 2],
    pub status: PodStatus,
    pub transcript: Vec<TurnRecord>,
    /// Rolling 0-100 quality estimate derived from reasoning scores
    pub signal_strength: u8,
    pub current_turn: u32,
    pub max_turns: u32,
    pub run_count: u32,
    /// Re-entrancy guard: one in-flight exchange per pod
    pub is_awaiting_reply: bool,
    /// An agent asked for the human operator by name
    pub needs_architect: bool,
}

impl Pod {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        agents: [AgentId; 2],
        max_turns: u32,
    ) -> Self {
        Self {
            id: PodId::new(id),
            name: name.into(),
            agents,
            status: PodStatus::Idle,
            transcript: Vec::new(),
            signal_strength: 0,
            current_turn: 0,
            max_turns,
            run_count: 0,
            is_awaiting_reply: false,
            needs_architect: false,
        }
    }

    /// The most recent transcript text, if any
    pub fn last_message(&self) -> Option<&str> {
        self.transcript.last().map(|t| t.text.as_str())
    }

    /// True once the turn ceiling is reached
    pub fn at_turn_limit(&self) -> bool {
        self.current_turn >= self.max_turns
    }

    /// Crown one turn as the best reasoning path, un-crowning any
    /// previously crowned turn in this pod.
    pub fn crown_turn(&mut self, turn_id: &TurnId) -> Result<(), DomainError> {
        if !self.transcript.iter().any(|t| &t.id == turn_id) {
            return Err(DomainError::TurnNotFound(turn_id.to_string()));
        }
        for turn in &mut self.transcript {
            turn.crowned = &turn.id == turn_id;
        }
        Ok(())
    }

    /// The currently crowned turn, if the operator marked one
    pub fn crowned_turn(&self) -> Option<&TurnRecord> {
        self.transcript.iter().find(|t| t.crowned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pod_with_turns() -> Pod {
        let mut pod = Pod::new("pod-1", "Browser-01", AgentId::default_pair(), 10);
        pod.transcript.push(TurnRecord::user("t-1", "question"));
        pod.transcript.push(TurnRecord::agent(
            "t-2",
            AgentId::Gemini,
            "answer one",
            None,
            80,
            1,
        ));
        pod.transcript.push(TurnRecord::agent(
            "t-3",
            AgentId::Claude,
            "answer two",
            Some("step by step".to_string()),
            70,
            2,
        ));
        pod
    }

    #[test]
    fn crowning_is_exclusive() {
        let mut pod = pod_with_turns();
        pod.crown_turn(&TurnId::new("t-2")).unwrap();
        assert_eq!(pod.crowned_turn().unwrap().id.as_str(), "t-2");

        pod.crown_turn(&TurnId::new("t-3")).unwrap();
        let crowned: Vec<_> = pod.transcript.iter().filter(|t| t.crowned).collect();
        assert_eq!(crowned.len(), 1);
        assert_eq!(crowned[0].id.as_str(), "t-3");
    }

    #[test]
    fn crowning_unknown_turn_fails() {
        let mut pod = pod_with_turns();
        assert!(matches!(
            pod.crown_turn(&TurnId::new("t-99")),
            Err(DomainError::TurnNotFound(_))
        ));
        assert!(pod.crowned_turn().is_none());
    }

    #[test]
    fn agent_turn_clamps_score_and_difficulty() {
        let turn = TurnRecord::agent("t-1", AgentId::Grok, "x", None, 150, 99);
        assert_eq!(turn.reasoning_score, Some(100));
        assert_eq!(turn.difficulty, Some(10));
    }

    #[test]
    fn error_turn_scores_zero() {
        let turn = TurnRecord::error("t-1", AgentId::Gemini, "HTTP 500");
        assert_eq!(turn.reasoning_score, Some(0));
        assert!(turn.role.is_scorable());
    }

    #[test]
    fn empty_thinking_is_dropped() {
        let turn = TurnRecord::agent("t-1", AgentId::Claude, "x", Some(String::new()), 50, 1);
        assert!(turn.thinking.is_none());
    }

    #[test]
    fn turn_limit_detection() {
        let mut pod = Pod::new("pod-1", "Browser-01", AgentId::default_pair(), 2);
        assert!(!pod.at_turn_limit());
        pod.current_turn = 2;
        assert!(pod.at_turn_limit());
    }
}
