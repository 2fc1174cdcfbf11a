mod types;

pub use types::{BatteryFailure, BatteryMetrics, RunReport};

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use uuid::Uuid;

/// Collects per-battery outcomes of one ingestion run.
pub struct IngestMetrics {
    inner: Mutex<MetricsState>,
}

struct MetricsState {
    run_id: Uuid,
    started_at: DateTime<Utc>,
    batteries: Vec<BatteryMetrics>,
    failures: Vec<BatteryFailure>,
}

impl IngestMetrics {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(MetricsState {
                run_id: Uuid::new_v4(),
                started_at: Utc::now(),
                batteries: Vec::new(),
                failures: Vec::new(),
            }),
        }
    }

    pub async fn record_battery(&self, metrics: BatteryMetrics) {
        let mut state = self.inner.lock().await;
        state.batteries.push(metrics);
    }

    pub async fn record_failure(&self, battery_id: &str, error: &anyhow::Error) {
        let mut state = self.inner.lock().await;
        state.failures.push(BatteryFailure {
            battery_id: battery_id.to_string(),
            error: format!("{error:#}"),
        });
    }

    /// Snapshot of everything recorded so far, stamped with the current time.
    pub async fn report(&self) -> RunReport {
        let state = self.inner.lock().await;

        RunReport {
            run_id: state.run_id,
            started_at: state.started_at,
            finished_at: Utc::now(),
            batteries: state.batteries.clone(),
            failures: state.failures.clone(),
            total_cycles: state.batteries.iter().map(|b| b.cycles).sum(),
            total_plot_rows: state.batteries.iter().map(|b| b.plot_rows_written).sum(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_report_totals() {
        let metrics = IngestMetrics::new();
        metrics
            .record_battery(BatteryMetrics {
                battery_id: "B0005".into(),
                cycles: 168,
                plot_rows_written: 1000,
                ..Default::default()
            })
            .await;
        metrics
            .record_battery(BatteryMetrics {
                battery_id: "B0006".into(),
                cycles: 2,
                plot_rows_written: 20,
                ..Default::default()
            })
            .await;

        let report = metrics.report().await;
        assert_eq!(report.total_cycles, 170);
        assert_eq!(report.total_plot_rows, 1020);
        assert!(report.is_clean());
        assert!(report.finished_at >= report.started_at);
    }

    #[tokio::test]
    async fn test_failures_mark_report_unclean() {
        let metrics = IngestMetrics::new();
        let err = anyhow::anyhow!("missing discharge input").context("ingestion aborted");
        metrics.record_failure("B0007", &err).await;

        let first = metrics.report().await;
        assert!(!first.is_clean());
        assert_eq!(first.failures.len(), 1);
        assert_eq!(first.failures[0].battery_id, "B0007");
        assert_eq!(
            first.failures[0].error,
            "ingestion aborted: missing discharge input"
        );
        assert_eq!(first.total_cycles, 0);

        let second = metrics.report().await;
        assert_eq!(first.run_id, second.run_id);
        assert_eq!(first.started_at, second.started_at);
    }
}
