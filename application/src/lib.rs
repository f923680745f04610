//! Application layer for quantizer
//!
//! Use cases orchestrating the exchange protocol, plus the ports
//! (interfaces) that infrastructure adapters implement.

pub mod ports;
pub mod registry;
pub mod scoring;
pub mod use_cases;

pub use ports::agent_gateway::{AgentError, AgentGateway};
pub use registry::{ArchitectAlert, ExchangeOutcome, ExchangeTicket, PodRegistry};
pub use scoring::{ExaminerGenerator, ReasoningScorer};
pub use use_cases::broadcast::{BroadcastReport, BroadcastUseCase};
pub use use_cases::export_dataset::{ExportDatasetUseCase, ExportOutcome};
pub use use_cases::run_exchange::{ExchangeError, RunExchangeUseCase};
