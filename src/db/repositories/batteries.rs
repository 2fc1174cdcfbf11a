use anyhow::{Context, Result};
use rusqlite::{params, Connection};

use crate::db::{
    models::{BatteryBatch, BatterySummary},
    repositories::{CycleRecordRepository, PlotPointRepository},
    Database,
};

pub struct BatteryRepository<'a> {
    conn: &'a Connection,
}

impl<'a> BatteryRepository<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Insert or replace the summary row keyed by battery id.
    pub fn upsert(&self, summary: &BatterySummary) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO batteries (battery_id, total_cycles, description)
             VALUES (?1, ?2, ?3)",
            params![summary.battery_id, summary.total_cycles, summary.description],
        )?;
        Ok(())
    }

    pub fn list(&self) -> Result<Vec<BatterySummary>> {
        let mut stmt = self.conn.prepare(
            "SELECT battery_id, total_cycles, description
             FROM batteries
             ORDER BY battery_id ASC",
        )?;
        let batteries = stmt
            .query_map([], |row| {
                Ok(BatterySummary {
                    battery_id: row.get(0)?,
                    total_cycles: row.get(1)?,
                    description: row.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(batteries)
    }
}

/// Row counts produced by one battery write.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatteryWriteStats {
    pub cycle_rows: usize,
    pub plot_rows: usize,
    pub replaced_rows: usize,
}

impl Database {
    /// Write one battery's indicator rows, raw trace and summary in a single
    /// transaction.
    ///
    /// With `replace_existing`, rows previously stored for the battery are
    /// removed inside the same transaction first.
    pub async fn write_battery(
        &self,
        batch: BatteryBatch,
        replace_existing: bool,
    ) -> Result<BatteryWriteStats> {
        self.execute(move |conn| {
            let battery_id = batch.battery_id().to_string();
            let tx = conn
                .transaction()
                .with_context(|| format!("failed to open write transaction for {battery_id}"))?;

            let mut stats = BatteryWriteStats::default();
            {
                let cycles = CycleRecordRepository::new(&tx);
                let plots = PlotPointRepository::new(&tx);
                let batteries = BatteryRepository::new(&tx);

                if replace_existing {
                    stats.replaced_rows += cycles.delete_for_battery(&battery_id)?;
                    stats.replaced_rows += plots.delete_for_battery(&battery_id)?;
                }

                stats.cycle_rows = cycles
                    .insert_many(&batch.cycle_records)
                    .context("failed to insert battery_cycles rows")?;
                stats.plot_rows = plots
                    .insert_many(&batch.plot_points)
                    .context("failed to insert cycle_plot_data rows")?;
                batteries
                    .upsert(&batch.summary)
                    .context("failed to upsert batteries row")?;
            }

            tx.commit()
                .with_context(|| format!("failed to commit writes for {battery_id}"))?;
            Ok(stats)
        })
        .await
    }

    pub async fn list_batteries(&self) -> Result<Vec<BatterySummary>> {
        self.execute(|conn| BatteryRepository::new(conn).list()).await
    }
}
