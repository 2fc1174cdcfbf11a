use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path, path::PathBuf};

/// What to do with the remaining batteries once one of them fails.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Stop the run at the first failed battery.
    #[default]
    FailFast,
    /// Record the failure and continue with the next battery.
    BestEffort,
}

/// Everything an ingestion run needs, passed explicitly to the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct IngestConfig {
    pub battery_ids: Vec<String>,
    pub dataset_root: PathBuf,
    pub database_path: PathBuf,
    /// Summary description becomes `"<battery_id> <dataset_label>"`.
    pub dataset_label: String,
    pub failure_policy: FailurePolicy,
    /// Rows shown per relation by `inspect`.
    pub preview_limit: usize,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            battery_ids: vec!["B0005".into(), "B0006".into(), "B0007".into()],
            dataset_root: PathBuf::from("./data"),
            database_path: PathBuf::from("./database/ev_health_data.db"),
            dataset_label: "NASA Battery Dataset".into(),
            failure_policy: FailurePolicy::FailFast,
            preview_limit: 10,
        }
    }
}

impl IngestConfig {
    /// Load from a JSON file. A missing file yields the defaults; a file that
    /// exists but cannot be read or parsed is an error.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config {}", path.display()))
    }

    pub fn describe(&self, battery_id: &str) -> String {
        format!("{battery_id} {}", self.dataset_label)
    }
}
