pub mod battery;
pub mod cycle_record;
pub mod plot_point;

pub use battery::{BatteryBatch, BatterySummary};
pub use cycle_record::CycleRecord;
pub use plot_point::PlotPoint;
