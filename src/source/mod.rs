//! Input side of the pipeline: where raw per-battery measurements come from.

pub mod csv_source;

pub use csv_source::CsvDirectorySource;

use crate::error::IngestError;
use crate::models::{CycleType, Measurement};

/// A tabular source of per-row measurements for one battery and type.
///
/// Rows must be returned in their stored order; in-cycle relative time is
/// derived from that order.
pub trait MeasurementSource {
    fn load(&self, battery_id: &str, cycle_type: CycleType)
        -> Result<Vec<Measurement>, IngestError>;
}
