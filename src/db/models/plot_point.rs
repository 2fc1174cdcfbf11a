use serde::{Deserialize, Serialize};

use crate::models::{CycleType, RawSample};

/// One raw-trace row in `cycle_plot_data`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlotPoint {
    pub battery_id: String,
    pub cycle_id: i64,
    pub time_step: i64,
    pub voltage: f64,
    pub current: f64,
    pub temperature: f64,
    pub cycle_type: CycleType,
}

impl From<&RawSample> for PlotPoint {
    fn from(sample: &RawSample) -> Self {
        Self {
            battery_id: sample.battery_id.clone(),
            cycle_id: sample.cycle_id,
            time_step: sample.relative_time,
            voltage: sample.voltage,
            current: sample.current,
            temperature: sample.temperature,
            cycle_type: sample.cycle_type,
        }
    }
}
