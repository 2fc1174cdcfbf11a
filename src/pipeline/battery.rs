//! Turns one battery's raw tables into the rows the store persists.

use std::time::Instant;

use crate::{
    config::IngestConfig,
    db::models::{BatteryBatch, BatterySummary, CycleRecord, PlotPoint},
    error::IngestError,
    features::{
        assign_relative_time, distinct_cycle_count, extract_health_indicators, group_cycles,
        state_of_health,
    },
    metrics::BatteryMetrics,
    models::{CycleType, RawSample},
    source::MeasurementSource,
};

const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_warn};

/// Load, index, group and reduce one battery. No store access.
pub fn prepare_battery<S: MeasurementSource>(
    source: &S,
    config: &IngestConfig,
    battery_id: &str,
) -> Result<(BatteryBatch, BatteryMetrics), IngestError> {
    let load_started = Instant::now();
    let charge = assign_relative_time(
        battery_id,
        CycleType::Charge,
        source.load(battery_id, CycleType::Charge)?,
    );
    let discharge = assign_relative_time(
        battery_id,
        CycleType::Discharge,
        source.load(battery_id, CycleType::Discharge)?,
    );
    let load_ms = load_started.elapsed().as_millis() as u64;
    log_debug!(
        "{battery_id}: read {} charge rows, {} discharge rows",
        charge.len(),
        discharge.len()
    );

    let extract_started = Instant::now();
    let cycle_records = build_cycle_records(battery_id, &discharge)?;
    let extract_ms = extract_started.elapsed().as_millis() as u64;

    let summary = BatterySummary {
        battery_id: battery_id.to_string(),
        total_cycles: distinct_cycle_count(&discharge) as i64,
        description: config.describe(battery_id),
    };

    let plot_points: Vec<PlotPoint> = charge
        .iter()
        .chain(discharge.iter())
        .map(PlotPoint::from)
        .collect();

    let metrics = BatteryMetrics {
        battery_id: battery_id.to_string(),
        charge_rows: charge.len(),
        discharge_rows: discharge.len(),
        cycles: cycle_records.len(),
        plot_rows_written: 0,
        load_ms,
        extract_ms,
        db_write_ms: 0,
    };

    Ok((
        BatteryBatch {
            summary,
            cycle_records,
            plot_points,
        },
        metrics,
    ))
}

/// One indicator row per discharge cycle, ascending by cycle id.
pub fn build_cycle_records(
    battery_id: &str,
    discharge: &[RawSample],
) -> Result<Vec<CycleRecord>, IngestError> {
    group_cycles(discharge)
        .into_iter()
        .map(|group| {
            let indicators =
                extract_health_indicators(&group.samples).map_err(|_| IngestError::EmptyCycle {
                    battery_id: battery_id.to_string(),
                    cycle_id: group.cycle_id,
                })?;

            let soh = state_of_health(&group.samples);
            if soh.is_none() {
                log_warn!(
                    "{battery_id}: discharge cycle {} has no Capacity readings; SOH stored as NULL",
                    group.cycle_id
                );
            }

            Ok(CycleRecord {
                battery_id: battery_id.to_string(),
                cycle_id: group.cycle_id,
                soh,
                indicators,
            })
        })
        .collect()
}
