use anyhow::Result;
use rusqlite::{params, Connection, Row};

use crate::db::{
    helpers::{conversion_error, parse_cycle_type, to_i64},
    models::PlotPoint,
    Database,
};
use crate::models::CycleType;

fn row_to_plot_point(row: &Row) -> Result<PlotPoint, rusqlite::Error> {
    let type_str: String = row.get("type")?;

    Ok(PlotPoint {
        battery_id: row.get("battery_id")?,
        cycle_id: row.get("cycle_id")?,
        time_step: row.get("time_step")?,
        voltage: row.get("voltage")?,
        current: row.get("current")?,
        temperature: row.get("temperature")?,
        cycle_type: parse_cycle_type(&type_str).map_err(|e| conversion_error(6, e))?,
    })
}

pub struct PlotPointRepository<'a> {
    conn: &'a Connection,
}

impl<'a> PlotPointRepository<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Append raw-trace rows. Wrap in a transaction for atomicity.
    pub fn insert_many(&self, points: &[PlotPoint]) -> Result<usize> {
        let mut stmt = self.conn.prepare_cached(
            "INSERT INTO cycle_plot_data (battery_id, cycle_id, time_step, voltage, current, temperature, type)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )?;

        for point in points {
            stmt.execute(params![
                point.battery_id,
                point.cycle_id,
                point.time_step,
                point.voltage,
                point.current,
                point.temperature,
                point.cycle_type.as_str(),
            ])?;
        }

        Ok(points.len())
    }

    pub fn delete_for_battery(&self, battery_id: &str) -> Result<usize> {
        let removed = self.conn.execute(
            "DELETE FROM cycle_plot_data WHERE battery_id = ?1",
            params![battery_id],
        )?;
        Ok(removed)
    }

    /// Trace of one cycle, ordered by time step.
    pub fn for_cycle(
        &self,
        battery_id: &str,
        cycle_id: i64,
        cycle_type: CycleType,
    ) -> Result<Vec<PlotPoint>> {
        let mut stmt = self.conn.prepare(
            "SELECT battery_id, cycle_id, time_step, voltage, current, temperature, type
             FROM cycle_plot_data
             WHERE battery_id = ?1 AND cycle_id = ?2 AND type = ?3
             ORDER BY time_step ASC",
        )?;
        let points = stmt
            .query_map(
                params![battery_id, cycle_id, cycle_type.as_str()],
                row_to_plot_point,
            )?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(points)
    }

    pub fn preview(&self, limit: usize) -> Result<Vec<PlotPoint>> {
        let mut stmt = self.conn.prepare(
            "SELECT battery_id, cycle_id, time_step, voltage, current, temperature, type
             FROM cycle_plot_data
             ORDER BY rowid
             LIMIT ?1",
        )?;
        let points = stmt
            .query_map(params![to_i64(limit)?], row_to_plot_point)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(points)
    }
}

impl Database {
    pub async fn plot_points_for_cycle(
        &self,
        battery_id: &str,
        cycle_id: i64,
        cycle_type: CycleType,
    ) -> Result<Vec<PlotPoint>> {
        let battery_id = battery_id.to_string();
        self.execute(move |conn| {
            PlotPointRepository::new(conn).for_cycle(&battery_id, cycle_id, cycle_type)
        })
        .await
    }

    pub async fn preview_cycle_plot_data(&self, limit: usize) -> Result<Vec<PlotPoint>> {
        self.execute(move |conn| PlotPointRepository::new(conn).preview(limit))
            .await
    }
}
