use std::path::PathBuf;

use thiserror::Error;

use crate::models::CycleType;

/// Failures that abort the processing of a single battery.
#[derive(Error, Debug)]
pub enum IngestError {
    #[error("missing {cycle_type} input for {battery_id} at {}", .path.display())]
    MissingInput {
        battery_id: String,
        cycle_type: CycleType,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed {cycle_type} input for {battery_id} in {}: {message}", .path.display())]
    MalformedInput {
        battery_id: String,
        cycle_type: CycleType,
        path: PathBuf,
        message: String,
    },

    #[error("cycle {cycle_id} of {battery_id} has no samples")]
    EmptyCycle { battery_id: String, cycle_id: i64 },

    #[error("store rejected writes for {battery_id}: {message}")]
    StoreWrite { battery_id: String, message: String },
}

impl IngestError {
    pub fn battery_id(&self) -> &str {
        match self {
            IngestError::MissingInput { battery_id, .. }
            | IngestError::MalformedInput { battery_id, .. }
            | IngestError::EmptyCycle { battery_id, .. }
            | IngestError::StoreWrite { battery_id, .. } => battery_id,
        }
    }

    pub(crate) fn store_write(battery_id: &str, err: anyhow::Error) -> Self {
        IngestError::StoreWrite {
            battery_id: battery_id.to_string(),
            message: format!("{err:#}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ingest_error_display() {
        let err = IngestError::MalformedInput {
            battery_id: "B0005".to_string(),
            cycle_type: CycleType::Discharge,
            path: PathBuf::from("data/B0005/B0005_discharge_data.csv"),
            message: "missing column Capacity".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "malformed discharge input for B0005 in data/B0005/B0005_discharge_data.csv: missing column Capacity"
        );

        let err = IngestError::EmptyCycle {
            battery_id: "B0006".to_string(),
            cycle_id: 4,
        };
        assert_eq!(err.to_string(), "cycle 4 of B0006 has no samples");
        assert_eq!(err.battery_id(), "B0006");

        let err = IngestError::store_write("B0007", anyhow::anyhow!("database is locked"));
        assert_eq!(
            err.to_string(),
            "store rejected writes for B0007: database is locked"
        );
    }

    #[test]
    fn test_missing_input_keeps_io_source() {
        let err = IngestError::MissingInput {
            battery_id: "B0005".to_string(),
            cycle_type: CycleType::Charge,
            path: PathBuf::from("data/B0005/B0005_charge_data.csv"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };
        let source = std::error::Error::source(&err).map(|s| s.to_string());
        assert_eq!(source.as_deref(), Some("not found"));
        assert!(err.to_string().starts_with("missing charge input for B0005"));
    }
}
