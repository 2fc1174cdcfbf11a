pub mod sample;

pub use sample::{CycleType, Measurement, RawSample};
