use std::fmt;

use serde::{Deserialize, Serialize};

/// Which half of the charge/discharge protocol a measurement belongs to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum CycleType {
    Charge,
    Discharge,
}

impl CycleType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CycleType::Charge => "charge",
            CycleType::Discharge => "discharge",
        }
    }
}

impl fmt::Display for CycleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// One row as read from the data source, before any in-cycle indexing.
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    pub cycle_id: i64,
    pub voltage: f64,
    pub current: f64,
    pub temperature: f64,
    /// Only discharge rows are expected to carry a capacity reading.
    pub capacity: Option<f64>,
}

/// A measurement tagged with its battery, type and zero-based position
/// within its cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct RawSample {
    pub battery_id: String,
    pub cycle_id: i64,
    pub relative_time: i64,
    pub voltage: f64,
    pub current: f64,
    pub temperature: f64,
    pub capacity: Option<f64>,
    pub cycle_type: CycleType,
}
