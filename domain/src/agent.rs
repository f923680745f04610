//! Agent identity value object

use serde::{Deserialize, Serialize};

/// The external reasoning agents a pod can pair (Value Object)
///
/// Identities that have no dedicated cloud provider route to the local
/// backbone, which also serves as the evaluator/examiner.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgentId {
    Gemini,
    Grok,
    Claude,
    ChatGpt,
    Copilot,
    LocalLlm,
    PiecesOs,
}

impl AgentId {
    /// Get the string identifier for this agent
    pub fn as_str(&self) -> &str {
        match self {
            AgentId::Gemini => "Gemini",
            AgentId::Grok => "Grok",
            AgentId::Claude => "Claude",
            AgentId::ChatGpt => "ChatGPT",
            AgentId::Copilot => "Copilot",
            AgentId::LocalLlm => "LocalLLM",
            AgentId::PiecesOs => "PiecesOS",
        }
    }

    /// All known agent identities
    pub fn all() -> Vec<AgentId> {
        vec![
            AgentId::Gemini,
            AgentId::Grok,
            AgentId::Claude,
            AgentId::ChatGpt,
            AgentId::Copilot,
            AgentId::LocalLlm,
            AgentId::PiecesOs,
        ]
    }

    /// Default pairing for a new pod
    pub fn default_pair() -> [AgentId; 2] {
        [AgentId::Gemini, AgentId::Claude]
    }
}

impl std::fmt::Display for AgentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for AgentId {
    type Err = crate::core::error::DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "gemini" => Ok(AgentId::Gemini),
            "grok" => Ok(AgentId::Grok),
            "claude" => Ok(AgentId::Claude),
            "chatgpt" | "gpt" => Ok(AgentId::ChatGpt),
            "copilot" => Ok(AgentId::Copilot),
            "localllm" | "local" => Ok(AgentId::LocalLlm),
            "piecesos" | "pieces" => Ok(AgentId::PiecesOs),
            _ => Err(crate::core::error::DomainError::InvalidAgent(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("gemini".parse::<AgentId>().unwrap(), AgentId::Gemini);
        assert_eq!("CLAUDE".parse::<AgentId>().unwrap(), AgentId::Claude);
        assert_eq!("ChatGPT".parse::<AgentId>().unwrap(), AgentId::ChatGpt);
    }

    #[test]
    fn unknown_agent_is_rejected() {
        assert!("skynet".parse::<AgentId>().is_err());
    }

    #[test]
    fn display_round_trips() {
        for agent in AgentId::all() {
            let parsed: AgentId = agent.as_str().parse().unwrap();
            assert_eq!(parsed, agent);
        }
    }
}
