//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Pod not found: {0}")]
    PodNotFound(String),

    #[error("Pod {0} is busy with an in-flight exchange")]
    PodBusy(String),

    #[error("Pod {0} has reached its turn ceiling")]
    TurnLimitReached(String),

    #[error("Turn not found: {0}")]
    TurnNotFound(String),

    #[error("Invalid agent identity: {0}")]
    InvalidAgent(String),
}

impl DomainError {
    /// Check if this error is the busy-rejection signal
    pub fn is_busy(&self) -> bool {
        matches!(self, DomainError::PodBusy(_))
    }
}
