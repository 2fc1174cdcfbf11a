use std::collections::{BTreeMap, HashMap};

use crate::models::{CycleType, Measurement, RawSample};

/// All samples of one cycle, in the order they were read.
#[derive(Debug, Clone)]
pub struct CycleGroup {
    pub cycle_id: i64,
    pub samples: Vec<RawSample>,
}

impl CycleGroup {
    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }
}

/// Tag measurements with their battery and type and number them within
/// their cycle.
///
/// Indices are assigned per `cycle_id` in input order, so rows of two
/// interleaved cycles each count from zero. Callers must pass rows in the
/// order they were read; reordering first changes every downstream HI1.
pub fn assign_relative_time(
    battery_id: &str,
    cycle_type: CycleType,
    measurements: Vec<Measurement>,
) -> Vec<RawSample> {
    let mut next_index: HashMap<i64, i64> = HashMap::new();

    measurements
        .into_iter()
        .map(|m| {
            let slot = next_index.entry(m.cycle_id).or_insert(0);
            let relative_time = *slot;
            *slot += 1;

            RawSample {
                battery_id: battery_id.to_string(),
                cycle_id: m.cycle_id,
                relative_time,
                voltage: m.voltage,
                current: m.current,
                temperature: m.temperature,
                capacity: m.capacity,
                cycle_type,
            }
        })
        .collect()
}

/// Split samples into per-cycle groups, ascending by `cycle_id`.
///
/// Within a group the original order is kept. Every returned group holds at
/// least one sample.
pub fn group_cycles(samples: &[RawSample]) -> Vec<CycleGroup> {
    let mut groups: BTreeMap<i64, Vec<RawSample>> = BTreeMap::new();
    for sample in samples {
        groups
            .entry(sample.cycle_id)
            .or_default()
            .push(sample.clone());
    }

    groups
        .into_iter()
        .map(|(cycle_id, samples)| CycleGroup { cycle_id, samples })
        .collect()
}

/// Number of distinct cycle ids among the samples.
pub fn distinct_cycle_count(samples: &[RawSample]) -> usize {
    let mut ids: Vec<i64> = samples.iter().map(|s| s.cycle_id).collect();
    ids.sort_unstable();
    ids.dedup();
    ids.len()
}
