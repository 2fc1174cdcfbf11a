//! Manual verification view of the store: previews plus row counts.

use std::fmt::Write;

use anyhow::Result;

use crate::db::{Database, Table};

/// Render the first `limit` rows of the indicator and trace relations, every
/// summary row, then a count per relation.
pub async fn render_overview(db: &Database, limit: usize) -> Result<String> {
    let mut out = String::new();

    writeln!(out, "\nBattery Cycles Table (HIs + SOH):")?;
    writeln!(
        out,
        "{:<10} {:>8} {:>8} {:>6} {:>8} {:>8} {:>7} {:>7} {:>7} {:>7} {:>7} {:>8}",
        "battery", "cycle", "SOH", "HI1", "HI2", "HI3", "HI4", "HI5", "HI6", "HI7", "HI8", "HI9"
    )?;
    for record in db.preview_battery_cycles(limit).await? {
        let hi = &record.indicators;
        let soh = record
            .soh
            .map(|v| format!("{v:.4}"))
            .unwrap_or_else(|| "NULL".into());
        writeln!(
            out,
            "{:<10} {:>8} {:>8} {:>6.0} {:>8.3} {:>8.3} {:>7.4} {:>7.4} {:>7.4} {:>7.4} {:>7.4} {:>8.4}",
            record.battery_id,
            record.cycle_id,
            soh,
            hi.peak_temp_time,
            hi.peak_temp,
            hi.avg_temp,
            hi.initial_voltage,
            hi.final_voltage,
            hi.voltage_drop,
            hi.avg_voltage,
            hi.avg_current,
            hi.peak_current,
        )?;
    }

    writeln!(out, "\nCycle Plot Data (Voltage/Current/Temp):")?;
    writeln!(
        out,
        "{:<10} {:>8} {:>9} {:>9} {:>9} {:>11} {:<9}",
        "battery", "cycle", "time_step", "voltage", "current", "temperature", "type"
    )?;
    for point in db.preview_cycle_plot_data(limit).await? {
        writeln!(
            out,
            "{:<10} {:>8} {:>9} {:>9.4} {:>9.4} {:>11.3} {:<9}",
            point.battery_id,
            point.cycle_id,
            point.time_step,
            point.voltage,
            point.current,
            point.temperature,
            point.cycle_type,
        )?;
    }

    writeln!(out, "\nBattery Metadata:")?;
    for battery in db.list_batteries().await? {
        writeln!(
            out,
            "{:<10} {:>6} {}",
            battery.battery_id, battery.total_cycles, battery.description
        )?;
    }

    writeln!(out, "\nRecord Counts:")?;
    for table in Table::ALL {
        writeln!(out, "{table}: {} records", db.count_rows(table).await?)?;
    }

    Ok(out)
}
