//! Write crowned training records to a timestamped JSON artifact

use chrono::Utc;
use quantizer_domain::TrainingRecord;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum ExportWriteError {
    #[error("failed to write dataset file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to serialize dataset: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Serialize records as pretty JSON into
/// `dataset-v{version}-{timestamp}.json` under `dir`, creating the
/// directory if needed. Returns the path of the written file.
pub fn write_dataset(
    dir: &Path,
    contract_version: u32,
    records: &[TrainingRecord],
) -> Result<PathBuf, ExportWriteError> {
    fs::create_dir_all(dir)?;

    let stamp = Utc::now().format("%Y%m%d-%H%M%S");
    let path = dir.join(format!("dataset-v{contract_version}-{stamp}.json"));

    let json = serde_json::to_string_pretty(records)?;
    fs::write(&path, json)?;

    info!("Wrote {} records to {}", records.len(), path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use quantizer_domain::{AgentId, RecordMeta};

    fn sample_record() -> TrainingRecord {
        TrainingRecord {
            instruction: "prove it".to_string(),
            input: String::new(),
            output: "the proof".to_string(),
            thinking: "first consider".to_string(),
            meta: RecordMeta {
                pod: "Browser-01".to_string(),
                agents: vec![AgentId::Gemini.to_string(), AgentId::Claude.to_string()],
                model: AgentId::Gemini.to_string(),
                difficulty: Some(3),
                reasoning_score: Some(88),
                run_number: Some(2),
                timestamp: Utc::now(),
                contract_version: 4,
            },
        }
    }

    #[test]
    fn writes_a_versioned_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let records = vec![sample_record()];

        let path = write_dataset(dir.path(), 4, &records).unwrap();
        let name = path.file_name().unwrap().to_string_lossy();
        assert!(name.starts_with("dataset-v4-"));
        assert!(name.ends_with(".json"));

        let raw = fs::read_to_string(&path).unwrap();
        let parsed: Vec<TrainingRecord> = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].output, "the proof");
        assert_eq!(parsed[0].meta.contract_version, 4);
    }

    #[test]
    fn creates_missing_directories() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("exports").join("today");

        let path = write_dataset(&nested, 1, &[sample_record()]).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn empty_record_set_still_writes_valid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_dataset(dir.path(), 2, &[]).unwrap();
        let raw = fs::read_to_string(&path).unwrap();
        assert_eq!(raw.trim(), "[]");
    }
}
