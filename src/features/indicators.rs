//! Health indicator extraction for a single discharge cycle.
//!
//! Pure functions over plain sample slices; no storage or I/O dependencies.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::RawSample;

/// The cycle handed to the extractor had no samples.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("cannot extract health indicators from an empty cycle")]
pub struct EmptyCycleError;

/// The nine scalar health indicators of one discharge cycle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HealthIndicators {
    /// HI1: relative time of the first temperature maximum
    pub peak_temp_time: f64,
    /// HI2: highest temperature
    pub peak_temp: f64,
    /// HI3: mean temperature
    pub avg_temp: f64,
    /// HI4: voltage of the first sample
    pub initial_voltage: f64,
    /// HI5: voltage of the last sample
    pub final_voltage: f64,
    /// HI6: initial minus final voltage, signed
    pub voltage_drop: f64,
    /// HI7: mean voltage
    pub avg_voltage: f64,
    /// HI8: mean signed current
    pub avg_current: f64,
    /// HI9: largest absolute current
    pub peak_current: f64,
}

impl HealthIndicators {
    /// `battery_cycles` column names, in storage order.
    pub const COLUMNS: [&'static str; 9] = [
        "HI1_peak_temp_time",
        "HI2_peak_temp",
        "HI3_avg_temp",
        "HI4_initial_voltage",
        "HI5_final_voltage",
        "HI6_voltage_drop",
        "HI7_avg_voltage",
        "HI8_avg_current",
        "HI9_peak_current",
    ];

    /// Column names in storage order, paired with values.
    pub fn named(&self) -> [(&'static str, f64); 9] {
        let [c1, c2, c3, c4, c5, c6, c7, c8, c9] = Self::COLUMNS;
        [
            (c1, self.peak_temp_time),
            (c2, self.peak_temp),
            (c3, self.avg_temp),
            (c4, self.initial_voltage),
            (c5, self.final_voltage),
            (c6, self.voltage_drop),
            (c7, self.avg_voltage),
            (c8, self.avg_current),
            (c9, self.peak_current),
        ]
    }
}

/// Reduce an ordered cycle to its nine health indicators.
///
/// Samples must be in arrival order. Ties on peak temperature resolve to the
/// earliest sample.
pub fn extract_health_indicators(
    samples: &[RawSample],
) -> Result<HealthIndicators, EmptyCycleError> {
    let (first, last) = match (samples.first(), samples.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return Err(EmptyCycleError),
    };

    let mut peak = first;
    let mut temp_sum = 0.0;
    let mut voltage_sum = 0.0;
    let mut current_sum = 0.0;
    let mut peak_current = first.current.abs();

    for sample in samples {
        // Strict comparison keeps the first occurrence on ties.
        if sample.temperature > peak.temperature {
            peak = sample;
        }
        temp_sum += sample.temperature;
        voltage_sum += sample.voltage;
        current_sum += sample.current;
        peak_current = peak_current.max(sample.current.abs());
    }

    let n = samples.len() as f64;

    Ok(HealthIndicators {
        peak_temp_time: peak.relative_time as f64,
        peak_temp: peak.temperature,
        avg_temp: temp_sum / n,
        initial_voltage: first.voltage,
        final_voltage: last.voltage,
        voltage_drop: first.voltage - last.voltage,
        avg_voltage: voltage_sum / n,
        avg_current: current_sum / n,
        peak_current,
    })
}

/// Peak capacity over the cycle, used as the SOH proxy.
///
/// Rows without a capacity reading are skipped; `None` when no row has one.
pub fn state_of_health(samples: &[RawSample]) -> Option<f64> {
    samples
        .iter()
        .filter_map(|s| s.capacity)
        .fold(None, |acc, cap| match acc {
            Some(best) if best >= cap => Some(best),
            _ => Some(cap),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CycleType;

    fn sample(t: i64, voltage: f64, current: f64, temperature: f64) -> RawSample {
        RawSample {
            battery_id: "B0001".to_string(),
            cycle_id: 1,
            relative_time: t,
            voltage,
            current,
            temperature,
            capacity: Some(1.8),
            cycle_type: CycleType::Discharge,
        }
    }

    fn create_test_cycle() -> Vec<RawSample> {
        vec![
            sample(0, 4.2, -2.0, 24.0),
            sample(1, 4.0, -2.0, 26.5),
            sample(2, 3.8, -1.9, 25.0),
        ]
    }

    #[test]
    fn test_reference_cycle() {
        let hi = extract_health_indicators(&create_test_cycle()).unwrap();

        assert_eq!(hi.peak_temp_time, 1.0);
        assert_eq!(hi.peak_temp, 26.5);
        assert!((hi.avg_temp - 25.1667).abs() < 1e-3);
        assert_eq!(hi.initial_voltage, 4.2);
        assert_eq!(hi.final_voltage, 3.8);
        assert!((hi.voltage_drop - 0.4).abs() < 1e-12);
        assert!((hi.avg_voltage - 4.0).abs() < 1e-12);
        assert!((hi.avg_current - (-1.9667)).abs() < 1e-3);
        assert_eq!(hi.peak_current, 2.0);
        assert_eq!(state_of_health(&create_test_cycle()), Some(1.8));
    }

    #[test]
    fn test_endpoint_voltages_are_exact() {
        let cycle = create_test_cycle();
        let hi = extract_health_indicators(&cycle).unwrap();

        assert_eq!(hi.initial_voltage, cycle[0].voltage);
        assert_eq!(hi.final_voltage, cycle[2].voltage);
        assert_eq!(hi.voltage_drop, cycle[0].voltage - cycle[2].voltage);
    }

    #[test]
    fn test_voltage_drop_is_signed() {
        let cycle = vec![sample(0, 3.6, -1.0, 24.0), sample(1, 3.9, -1.0, 24.0)];
        let hi = extract_health_indicators(&cycle).unwrap();

        assert!(hi.voltage_drop < 0.0);
    }

    #[test]
    fn test_single_sample_cycle() {
        let cycle = vec![sample(0, 3.95, -2.01, 23.4)];
        let hi = extract_health_indicators(&cycle).unwrap();

        assert_eq!(hi.voltage_drop, 0.0);
        assert_eq!(hi.avg_voltage, 3.95);
        assert_eq!(hi.avg_temp, 23.4);
        assert_eq!(hi.avg_current, -2.01);
        assert_eq!(hi.peak_current, 2.01);
        assert_eq!(hi.peak_temp_time, 0.0);
        for (name, value) in hi.named() {
            assert!(value.is_finite(), "{name} is not finite");
        }
    }

    #[test]
    fn test_empty_cycle_is_rejected() {
        assert_eq!(extract_health_indicators(&[]), Err(EmptyCycleError));
    }

    #[test]
    fn test_peak_temperature_tie_takes_first() {
        let cycle = vec![
            sample(0, 4.1, -2.0, 24.0),
            sample(1, 4.0, -2.0, 30.0),
            sample(2, 3.9, -2.0, 29.0),
            sample(3, 3.8, -2.0, 30.0),
        ];
        let hi = extract_health_indicators(&cycle).unwrap();

        assert_eq!(hi.peak_temp_time, 1.0);
        assert_eq!(hi.peak_temp, 30.0);
    }

    #[test]
    fn test_bounds_hold_for_every_sample() {
        let cycle = vec![
            sample(0, 4.19, 0.002, 24.3),
            sample(1, 4.05, -2.01, 24.9),
            sample(2, 3.97, -2.01, 26.1),
            sample(3, 3.71, 1.4, 33.8),
            sample(4, 3.20, -0.5, 31.2),
            sample(5, 3.55, 0.0006, 29.0),
        ];
        let hi = extract_health_indicators(&cycle).unwrap();

        let min_t = cycle.iter().map(|s| s.temperature).fold(f64::MAX, f64::min);
        let max_t = cycle.iter().map(|s| s.temperature).fold(f64::MIN, f64::max);
        for s in &cycle {
            assert!(hi.peak_temp >= s.temperature);
            assert!(hi.peak_current >= s.current.abs());
        }
        assert!(hi.avg_temp >= min_t && hi.avg_temp <= max_t);
        assert_eq!(hi.peak_current, 2.01);
        assert_eq!(hi.peak_temp_time, 3.0);
    }

    #[test]
    fn test_peak_current_uses_magnitude() {
        let cycle = vec![sample(0, 4.0, 1.5, 24.0), sample(1, 3.9, -2.5, 24.0)];
        let hi = extract_health_indicators(&cycle).unwrap();

        assert_eq!(hi.peak_current, 2.5);
        assert_eq!(hi.avg_current, -0.5);
    }

    #[test]
    fn test_state_of_health_skips_missing_capacity() {
        let mut cycle = create_test_cycle();
        cycle[0].capacity = None;
        cycle[1].capacity = Some(1.85);
        cycle[2].capacity = Some(1.79);
        assert_eq!(state_of_health(&cycle), Some(1.85));

        for s in &mut cycle {
            s.capacity = None;
        }
        assert_eq!(state_of_health(&cycle), None);
    }

    #[test]
    fn test_named_columns_follow_storage_order() {
        let hi = extract_health_indicators(&create_test_cycle()).unwrap();
        let names: Vec<_> = hi.named().iter().map(|(n, _)| *n).collect();

        assert_eq!(names, HealthIndicators::COLUMNS);
        assert_eq!(names[0], "HI1_peak_temp_time");
        assert_eq!(names[8], "HI9_peak_current");
        assert_eq!(hi.named()[5].1, hi.voltage_drop);
    }
}
