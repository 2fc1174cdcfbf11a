//! Ingestion orchestration: reset the store, then process each configured
//! battery in list order.

pub mod battery;

pub use battery::{build_cycle_records, prepare_battery};

use std::time::Instant;

use anyhow::{Context, Result};

use crate::{
    config::{FailurePolicy, IngestConfig},
    db::Database,
    error::IngestError,
    metrics::{BatteryMetrics, IngestMetrics, RunReport},
    source::{CsvDirectorySource, MeasurementSource},
};

const ENABLE_LOGS: bool = true;

use crate::{log_error, log_info};

pub struct IngestionPipeline<S: MeasurementSource = CsvDirectorySource> {
    config: IngestConfig,
    db: Database,
    source: S,
}

impl IngestionPipeline<CsvDirectorySource> {
    /// Pipeline reading CSV files under `config.dataset_root`.
    pub fn new(config: IngestConfig, db: Database) -> Self {
        let source = CsvDirectorySource::new(config.dataset_root.clone());
        Self::with_source(config, db, source)
    }
}

impl<S: MeasurementSource> IngestionPipeline<S> {
    pub fn with_source(config: IngestConfig, db: Database, source: S) -> Self {
        Self {
            config,
            db,
            source,
        }
    }

    /// Destructive rebuild: drop and recreate all relations, then ingest.
    pub async fn build(&self) -> Result<RunReport> {
        self.db.reset().await.context("failed to reset store")?;
        self.ingest_all(false).await
    }

    /// Additive ingest: keep the store and replace only the configured
    /// batteries' rows.
    pub async fn ingest(&self) -> Result<RunReport> {
        self.ingest_all(true).await
    }

    async fn ingest_all(&self, replace_existing: bool) -> Result<RunReport> {
        let metrics = IngestMetrics::new();
        for battery_id in &self.config.battery_ids {
            log_info!("Processing {battery_id}...");

            match self.process_battery(battery_id, replace_existing).await {
                Ok(battery) => {
                    log_info!(
                        "{battery_id} processed: {} cycles, {} trace rows",
                        battery.cycles,
                        battery.plot_rows_written
                    );
                    metrics.record_battery(battery).await;
                }
                Err(err) => {
                    let failed_id = err.battery_id().to_string();
                    let err = anyhow::Error::new(err);
                    log_error!("{failed_id} failed: {err:#}");
                    metrics.record_failure(&failed_id, &err).await;

                    if self.config.failure_policy == FailurePolicy::FailFast {
                        return Err(err.context(format!("ingestion aborted at {failed_id}")));
                    }
                }
            }
        }

        let report = metrics.report().await;
        log_info!(
            "Run {} finished: {} batteries ingested, {} failed",
            report.run_id,
            report.batteries.len(),
            report.failures.len()
        );
        Ok(report)
    }

    async fn process_battery(
        &self,
        battery_id: &str,
        replace_existing: bool,
    ) -> Result<BatteryMetrics, IngestError> {
        let (batch, mut metrics) = prepare_battery(&self.source, &self.config, battery_id)?;

        let write_started = Instant::now();
        let stats = self
            .db
            .write_battery(batch, replace_existing)
            .await
            .map_err(|err| IngestError::store_write(battery_id, err))?;
        metrics.db_write_ms = write_started.elapsed().as_millis() as u64;
        metrics.plot_rows_written = stats.plot_rows;

        Ok(metrics)
    }
}
