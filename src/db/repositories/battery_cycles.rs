use anyhow::Result;
use rusqlite::{params, Connection, Row, ToSql};

use crate::db::{models::CycleRecord, Database};
use crate::features::HealthIndicators;

const SELECT_COLUMNS: &str = "SELECT
    battery_id,
    cycle_id,
    SOH,
    HI1_peak_temp_time,
    HI2_peak_temp,
    HI3_avg_temp,
    HI4_initial_voltage,
    HI5_final_voltage,
    HI6_voltage_drop,
    HI7_avg_voltage,
    HI8_avg_current,
    HI9_peak_current
FROM battery_cycles";

fn row_to_cycle_record(row: &Row) -> Result<CycleRecord, rusqlite::Error> {
    Ok(CycleRecord {
        battery_id: row.get("battery_id")?,
        cycle_id: row.get("cycle_id")?,
        soh: row.get("SOH")?,
        indicators: HealthIndicators {
            peak_temp_time: row.get("HI1_peak_temp_time")?,
            peak_temp: row.get("HI2_peak_temp")?,
            avg_temp: row.get("HI3_avg_temp")?,
            initial_voltage: row.get("HI4_initial_voltage")?,
            final_voltage: row.get("HI5_final_voltage")?,
            voltage_drop: row.get("HI6_voltage_drop")?,
            avg_voltage: row.get("HI7_avg_voltage")?,
            avg_current: row.get("HI8_avg_current")?,
            peak_current: row.get("HI9_peak_current")?,
        },
    })
}

pub struct CycleRecordRepository<'a> {
    conn: &'a Connection,
}

impl<'a> CycleRecordRepository<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Append indicator rows. Wrap in a transaction for atomicity.
    pub fn insert_many(&self, records: &[CycleRecord]) -> Result<usize> {
        let placeholders = vec!["?"; 3 + HealthIndicators::COLUMNS.len()].join(", ");
        let mut stmt = self.conn.prepare_cached(&format!(
            "INSERT INTO battery_cycles (battery_id, cycle_id, SOH, {}) VALUES ({placeholders})",
            HealthIndicators::COLUMNS.join(", ")
        ))?;

        for record in records {
            let named = record.indicators.named();
            let mut values: Vec<&dyn ToSql> =
                vec![&record.battery_id, &record.cycle_id, &record.soh];
            values.extend(named.iter().map(|(_, value)| value as &dyn ToSql));
            stmt.execute(values.as_slice())?;
        }

        Ok(records.len())
    }

    pub fn delete_for_battery(&self, battery_id: &str) -> Result<usize> {
        let removed = self.conn.execute(
            "DELETE FROM battery_cycles WHERE battery_id = ?1",
            params![battery_id],
        )?;
        Ok(removed)
    }

    pub fn for_battery(&self, battery_id: &str) -> Result<Vec<CycleRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "{SELECT_COLUMNS} WHERE battery_id = ?1 ORDER BY cycle_id ASC"
        ))?;
        let records = stmt
            .query_map(params![battery_id], row_to_cycle_record)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(records)
    }

    /// First rows in storage order.
    pub fn preview(&self, limit: usize) -> Result<Vec<CycleRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{SELECT_COLUMNS} ORDER BY rowid LIMIT ?1"))?;
        let records = stmt
            .query_map(params![crate::db::helpers::to_i64(limit)?], row_to_cycle_record)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(records)
    }
}

impl Database {
    /// Indicator rows of one battery, ascending by cycle id.
    pub async fn cycle_records_for_battery(&self, battery_id: &str) -> Result<Vec<CycleRecord>> {
        let battery_id = battery_id.to_string();
        self.execute(move |conn| CycleRecordRepository::new(conn).for_battery(&battery_id))
            .await
    }

    pub async fn preview_battery_cycles(&self, limit: usize) -> Result<Vec<CycleRecord>> {
        self.execute(move |conn| CycleRecordRepository::new(conn).preview(limit))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;

    #[test]
    fn test_insert_keeps_each_indicator_in_its_column() {
        let mut conn = Connection::open_in_memory().unwrap();
        run_migrations(&mut conn).unwrap();

        let record = CycleRecord {
            battery_id: "B0005".to_string(),
            cycle_id: 2,
            soh: Some(1.85),
            indicators: HealthIndicators {
                peak_temp_time: 1.0,
                peak_temp: 2.0,
                avg_temp: 3.0,
                initial_voltage: 4.0,
                final_voltage: 5.0,
                voltage_drop: 6.0,
                avg_voltage: 7.0,
                avg_current: 8.0,
                peak_current: 9.0,
            },
        };
        let repo = CycleRecordRepository::new(&conn);
        assert_eq!(repo.insert_many(std::slice::from_ref(&record)).unwrap(), 1);

        let drop_column: f64 = conn
            .query_row(
                "SELECT HI6_voltage_drop FROM battery_cycles WHERE cycle_id = 2",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(drop_column, 6.0);
        assert_eq!(repo.for_battery("B0005").unwrap(), vec![record]);
    }
}
