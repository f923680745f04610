//! Export Dataset use case - collect crowned turns into training records.
//!
//! Selection is pure domain logic; this use case snapshots the registry
//! and distinguishes "nothing crowned" from a real result so callers can
//! report it without treating it as an error.

use crate::registry::PodRegistry;
use quantizer_domain::{TrainingRecord, collect_crowned};
use std::sync::Arc;
use tracing::info;

/// Result of an export request
pub enum ExportOutcome {
    /// At least one crowned turn was found
    Records(Vec<TrainingRecord>),
    /// No turn is crowned anywhere; nothing to export (not an error)
    NothingCrowned,
}

impl ExportOutcome {
    pub fn records(&self) -> &[TrainingRecord] {
        match self {
            ExportOutcome::Records(records) => records,
            ExportOutcome::NothingCrowned => &[],
        }
    }
}

/// Use case for exporting operator-crowned turns
pub struct ExportDatasetUseCase {
    registry: Arc<PodRegistry>,
}

impl ExportDatasetUseCase {
    pub fn new(registry: Arc<PodRegistry>) -> Self {
        Self { registry }
    }

    pub async fn execute(&self, contract_version: u32) -> ExportOutcome {
        let pods = self.registry.list().await;
        let records = collect_crowned(&pods, contract_version);

        if records.is_empty() {
            info!("Export requested but no turn is crowned");
            return ExportOutcome::NothingCrowned;
        }

        info!("Exporting {} crowned records", records.len());
        ExportOutcome::Records(records)
    }
}
