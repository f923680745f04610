//! Training-record export - selection of crowned turns.
//!
//! Pure selection logic: given pod snapshots, find every crowned turn and
//! rebuild its instruction context from the transcript. Writing the
//! artifact to disk lives in the infrastructure layer.

use crate::pod::entities::{Pod, Role, TurnRecord};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One portable training record in instruction/output form
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingRecord {
    /// The operator prompt that started the run
    pub instruction: String,
    /// The examiner question the crowned answer responded to, if any
    pub input: String,
    /// The crowned answer text
    pub output: String,
    /// The crowned answer's reasoning trace
    pub thinking: String,
    pub meta: RecordMeta,
}

/// Provenance for a training record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordMeta {
    pub pod: String,
    pub agents: Vec<String>,
    /// The agent that produced the crowned answer
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reasoning_score: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_number: Option<u32>,
    pub timestamp: DateTime<Utc>,
    pub contract_version: u32,
}

/// Select every crowned turn across all pods and build its record.
///
/// A crowned turn's instruction is the nearest preceding `user` turn by
/// timestamp; among equal timestamps the latest preceding one wins. An
/// empty result means nothing was crowned - that is not an error.
pub fn collect_crowned(pods: &[Pod], contract_version: u32) -> Vec<TrainingRecord> {
    let mut records = Vec::new();

    for pod in pods {
        for (index, turn) in pod.transcript.iter().enumerate() {
            if !turn.crowned {
                continue;
            }
            records.push(build_record(pod, index, turn, contract_version));
        }
    }

    records
}

fn build_record(
    pod: &Pod,
    crowned_index: usize,
    crowned: &TurnRecord,
    contract_version: u32,
) -> TrainingRecord {
    let instruction = nearest_preceding(pod, crowned_index, crowned.timestamp, |role| {
        *role == Role::User
    });
    let input = nearest_preceding(pod, crowned_index, crowned.timestamp, |role| {
        *role == Role::Examiner
    });

    TrainingRecord {
        instruction: instruction.map(|t| t.text.clone()).unwrap_or_default(),
        input: input.map(|t| t.text.clone()).unwrap_or_default(),
        output: crowned.text.clone(),
        thinking: crowned.thinking.clone().unwrap_or_default(),
        meta: RecordMeta {
            pod: pod.name.clone(),
            agents: pod.agents.iter().map(|a| a.to_string()).collect(),
            model: crowned.role.to_string(),
            difficulty: crowned.difficulty,
            reasoning_score: crowned.reasoning_score,
            run_number: crowned.run_number,
            timestamp: crowned.timestamp,
            contract_version,
        },
    }
}

/// Latest turn before `crowned_index` matching `pred` whose timestamp does
/// not exceed the crowned turn's. Scanning backwards makes the tie break
/// "latest preceding" by construction.
fn nearest_preceding<'a>(
    pod: &'a Pod,
    crowned_index: usize,
    crowned_at: DateTime<Utc>,
    pred: impl Fn(&Role) -> bool,
) -> Option<&'a TurnRecord> {
    pod.transcript[..crowned_index]
        .iter()
        .rev()
        .find(|t| pred(&t.role) && t.timestamp <= crowned_at)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::AgentId;

    fn pod_with_run() -> Pod {
        let mut pod = Pod::new("pod-1", "Browser-01", [AgentId::Gemini, AgentId::Claude], 10);
        pod.transcript.push(TurnRecord::user("t-1", "explain flux pinning"));
        pod.transcript.push(TurnRecord::agent(
            "t-2",
            AgentId::Gemini,
            "first answer",
            Some("trace a".to_string()),
            80,
            1,
        ));
        pod.transcript
            .push(TurnRecord::examiner("t-3", "why does it scale?", 2));
        pod.transcript.push(
            TurnRecord::agent(
                "t-4",
                AgentId::Claude,
                "second answer",
                Some("trace b".to_string()),
                70,
                2,
            )
            .with_run_number(1),
        );
        pod
    }

    #[test]
    fn nothing_crowned_yields_empty_list() {
        let pods = vec![pod_with_run()];
        assert!(collect_crowned(&pods, 5).is_empty());
    }

    #[test]
    fn crowned_turn_recovers_instruction_and_input() {
        let mut pod = pod_with_run();
        pod.crown_turn(&crate::pod::entities::TurnId::new("t-4")).unwrap();

        let records = collect_crowned(&[pod], 5);
        assert_eq!(records.len(), 1);

        let record = &records[0];
        assert_eq!(record.instruction, "explain flux pinning");
        assert_eq!(record.input, "why does it scale?");
        assert_eq!(record.output, "second answer");
        assert_eq!(record.thinking, "trace b");
        assert_eq!(record.meta.model, "Claude");
        assert_eq!(record.meta.contract_version, 5);
        assert_eq!(record.meta.run_number, Some(1));
        assert_eq!(record.meta.agents, vec!["Gemini", "Claude"]);
    }

    #[test]
    fn latest_preceding_user_turn_wins_on_equal_timestamps() {
        let mut pod = Pod::new("pod-1", "Browser-01", AgentId::default_pair(), 10);
        let shared = Utc::now();

        let mut first = TurnRecord::user("t-1", "older prompt");
        first.timestamp = shared;
        let mut second = TurnRecord::user("t-2", "newer prompt");
        second.timestamp = shared;
        let mut answer = TurnRecord::agent("t-3", AgentId::Gemini, "answer", None, 90, 1);
        answer.timestamp = shared;

        pod.transcript.extend([first, second, answer]);
        pod.crown_turn(&crate::pod::entities::TurnId::new("t-3")).unwrap();

        let records = collect_crowned(&[pod], 1);
        assert_eq!(records[0].instruction, "newer prompt");
    }

    #[test]
    fn crowned_first_agent_turn_has_empty_input() {
        let mut pod = pod_with_run();
        pod.crown_turn(&crate::pod::entities::TurnId::new("t-2")).unwrap();

        let records = collect_crowned(&[pod], 1);
        assert_eq!(records[0].instruction, "explain flux pinning");
        assert_eq!(records[0].input, "");
        assert_eq!(records[0].meta.model, "Gemini");
    }

    #[test]
    fn selection_spans_multiple_pods() {
        let mut a = pod_with_run();
        a.crown_turn(&crate::pod::entities::TurnId::new("t-2")).unwrap();
        let mut b = pod_with_run();
        b.name = "Browser-02".to_string();
        b.crown_turn(&crate::pod::entities::TurnId::new("t-4")).unwrap();

        let records = collect_crowned(&[a, b], 2);
        assert_eq!(records.len(), 2);
        let pods: Vec<_> = records.iter().map(|r| r.meta.pod.as_str()).collect();
        assert!(pods.contains(&"Browser-01"));
        assert!(pods.contains(&"Browser-02"));
    }
}
