//! Indicator row model for the `battery_cycles` relation.

use serde::{Deserialize, Serialize};

use crate::features::HealthIndicators;

/// One row per discharge cycle of a battery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CycleRecord {
    pub battery_id: String,
    pub cycle_id: i64,
    /// Peak discharge capacity; `None` when the cycle carried no reading.
    pub soh: Option<f64>,
    pub indicators: HealthIndicators,
}
