//! Per-battery summary and the write batch handed to the store.

use serde::{Deserialize, Serialize};

use super::{CycleRecord, PlotPoint};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatterySummary {
    pub battery_id: String,
    /// Distinct discharge cycle ids.
    pub total_cycles: i64,
    pub description: String,
}

/// Everything one battery contributes to the store, written atomically.
#[derive(Debug, Clone)]
pub struct BatteryBatch {
    pub summary: BatterySummary,
    pub cycle_records: Vec<CycleRecord>,
    /// Charge rows first, then discharge rows, each in read order.
    pub plot_points: Vec<PlotPoint>,
}

impl BatteryBatch {
    pub fn battery_id(&self) -> &str {
        &self.summary.battery_id
    }
}
