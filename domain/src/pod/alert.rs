//! Alert classification - pure derivation over a pod snapshot.
//!
//! The classification is recomputed on every read and never stored, so it
//! cannot drift from the underlying pod fields.

use super::entities::{Pod, PodStatus};
use crate::reasoning::NEUTRAL_REASONING_SCORE;
use serde::{Deserialize, Serialize};

/// Operator-actionable alert state for a pod
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlertLevel {
    /// Error status or an agent asked for the architect
    Red,
    /// Recent reasoning quality is poor
    Yellow,
    /// Exchanges are progressing normally
    Green,
    /// Pod is idle or syncing; nothing to act on
    Blue,
}

impl std::fmt::Display for AlertLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            AlertLevel::Red => "Red",
            AlertLevel::Yellow => "Yellow",
            AlertLevel::Green => "Green",
            AlertLevel::Blue => "Blue",
        };
        write!(f, "{}", s)
    }
}

/// How many trailing scorable turns feed the quality window
const WINDOW: usize = 4;

/// Mean score below this is a Yellow alert
const YELLOW_THRESHOLD: f64 = 55.0;

/// Minimum qualifying turns before Yellow can trigger
const MIN_QUALIFYING: usize = 2;

/// Classify a pod into its alert state.
///
/// Blue for Idle/Syncing, Red for Error or an architect request, then
/// Yellow/Green from the mean reasoning score of the last four agent
/// turns (missing scores count as the neutral default).
pub fn classify(pod: &Pod) -> AlertLevel {
    if matches!(pod.status, PodStatus::Idle | PodStatus::Syncing) {
        return AlertLevel::Blue;
    }
    if pod.status == PodStatus::Error || pod.needs_architect {
        return AlertLevel::Red;
    }

    let recent: Vec<u8> = pod
        .transcript
        .iter()
        .rev()
        .filter(|t| t.role.is_scorable())
        .take(WINDOW)
        .map(|t| t.reasoning_score.unwrap_or(NEUTRAL_REASONING_SCORE))
        .collect();

    if recent.len() >= MIN_QUALIFYING {
        let mean = recent.iter().map(|&s| s as f64).sum::<f64>() / recent.len() as f64;
        if mean < YELLOW_THRESHOLD {
            return AlertLevel::Yellow;
        }
    }

    AlertLevel::Green
}
