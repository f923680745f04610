//! Prompt contract - the versioned prompt template + constraints object

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Versioned, append-evolvable prompt contract (Entity)
///
/// Mutations happen only through [`PromptContract::apply`], which bumps
/// `version` and refreshes `last_updated`. The TurnProtocol consumes a
/// snapshot taken at exchange start, so operator edits never race an
/// in-flight exchange.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptContract {
    pub id: String,
    pub version: u32,
    pub base_prompt: String,
    pub constraints: Vec<String>,
    pub examples: Vec<String>,
    pub evolution_score: f64,
    pub last_updated: DateTime<Utc>,
}

impl PromptContract {
    pub fn new(id: impl Into<String>, base_prompt: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            version: 1,
            base_prompt: base_prompt.into(),
            constraints: Vec::new(),
            examples: Vec::new(),
            evolution_score: 0.0,
            last_updated: Utc::now(),
        }
    }

    pub fn with_constraints(mut self, constraints: Vec<String>) -> Self {
        self.constraints = constraints;
        self
    }

    pub fn with_examples(mut self, examples: Vec<String>) -> Self {
        self.examples = examples;
        self
    }

    /// Merge a partial update, incrementing the version
    pub fn apply(&mut self, update: ContractUpdate) {
        if let Some(base_prompt) = update.base_prompt {
            self.base_prompt = base_prompt;
        }
        if let Some(constraints) = update.constraints {
            self.constraints = constraints;
        }
        if let Some(examples) = update.examples {
            self.examples = examples;
        }
        if let Some(score) = update.evolution_score {
            self.evolution_score = score;
        }
        self.version += 1;
        self.last_updated = Utc::now();
    }
}

/// Partial operator edit to a contract
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContractUpdate {
    pub base_prompt: Option<String>,
    pub constraints: Option<Vec<String>>,
    pub examples: Option<Vec<String>>,
    pub evolution_score: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_bumps_version_and_timestamp() {
        let mut contract = PromptContract::new("contract-1", "base");
        let before = contract.last_updated;
        let v = contract.version;

        contract.apply(ContractUpdate {
            base_prompt: Some("evolved".to_string()),
            ..Default::default()
        });

        assert_eq!(contract.version, v + 1);
        assert_eq!(contract.base_prompt, "evolved");
        assert!(contract.last_updated >= before);
    }

    #[test]
    fn empty_update_still_counts_as_mutation() {
        let mut contract = PromptContract::new("contract-1", "base");
        contract.apply(ContractUpdate::default());
        assert_eq!(contract.version, 2);
        assert_eq!(contract.base_prompt, "base");
    }

    #[test]
    fn partial_update_leaves_other_fields() {
        let mut contract = PromptContract::new("contract-1", "base")
            .with_constraints(vec!["c1".to_string()])
            .with_examples(vec!["e1".to_string()]);

        contract.apply(ContractUpdate {
            constraints: Some(vec!["c2".to_string(), "c3".to_string()]),
            ..Default::default()
        });

        assert_eq!(contract.constraints.len(), 2);
        assert_eq!(contract.examples, vec!["e1".to_string()]);
        assert_eq!(contract.base_prompt, "base");
    }
}
