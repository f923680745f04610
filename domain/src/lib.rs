//! Domain layer for quantizer
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Pod
//!
//! A pod is one independent two-agent conversation session with its own
//! transcript, rolling signal strength, and alert classification.
//!
//! ## Exchange
//!
//! One full turn cycle: Agent A answers, the backbone scores its reasoning,
//! an examiner question escalates difficulty, Agent B answers, and both
//! scores fold into the pod's signal strength.

pub mod agent;
pub mod contract;
pub mod core;
pub mod export;
pub mod pod;
pub mod prompt;
pub mod reasoning;
pub mod util;

// Re-export commonly used types
pub use agent::AgentId;
pub use contract::{ContractUpdate, PromptContract};
pub use core::error::DomainError;
pub use export::{RecordMeta, TrainingRecord, collect_crowned};
pub use pod::{
    alert::{AlertLevel, classify},
    entities::{Pod, PodId, PodStatus, Role, TurnId, TurnRecord},
};
pub use prompt::PromptTemplate;
pub use reasoning::{
    NEUTRAL_REASONING_SCORE, blend_signal, difficulty_for, escalate, parse_reasoning_score,
    split_reasoning,
};
pub use util::truncate_snippet;
