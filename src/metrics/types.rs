use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BatteryMetrics {
    pub battery_id: String,
    pub charge_rows: usize,
    pub discharge_rows: usize,
    pub cycles: usize,
    pub plot_rows_written: usize,
    pub load_ms: u64,
    pub extract_ms: u64,
    pub db_write_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BatteryFailure {
    pub battery_id: String,
    pub error: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub batteries: Vec<BatteryMetrics>,
    pub failures: Vec<BatteryFailure>,
    pub total_cycles: usize,
    pub total_plot_rows: usize,
}

impl RunReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}
