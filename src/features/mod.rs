pub mod grouping;
pub mod indicators;

pub use grouping::{assign_relative_time, distinct_cycle_count, group_cycles, CycleGroup};
pub use indicators::{extract_health_indicators, state_of_health, EmptyCycleError, HealthIndicators};
