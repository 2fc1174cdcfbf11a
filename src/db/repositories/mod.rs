pub mod batteries;
pub mod battery_cycles;
pub mod cycle_plot_data;

pub use batteries::{BatteryRepository, BatteryWriteStats};
pub use battery_cycles::CycleRecordRepository;
pub use cycle_plot_data::PlotPointRepository;
