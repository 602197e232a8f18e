// src/pipeline.rs
//! The detection cycle: aggregate, decide, maybe alert.
//!
//! `run_ingestion` (in `ingest`) and `run_detection` here are the two
//! externally schedulable entry points. The calling harness owns cadence;
//! each call runs to completion as one sequential unit of work with no state
//! carried in-process between invocations (the alert gate is the one explicit
//! exception, and it persists through a state file).

use chrono::Utc;
use metrics::{counter, describe_counter, describe_gauge, gauge};
use once_cell::sync::OnceCell;

use crate::aggregate::{bucket_by_hour, DetectionWindow};
use crate::detect::{self, DetectorConfig};
use crate::error::PipelineError;
use crate::model::AnomalyVerdict;
use crate::notify::cooldown::AlertGate;
use crate::notify::{format_alert, Notifier};
use crate::store::PostStore;

fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("detect_runs_total", "Detection cycles that produced a verdict.");
        describe_counter!(
            "detect_skipped_total",
            "Detection cycles skipped on a degenerate sample."
        );
        describe_counter!("alerts_sent_total", "Alerts handed to the notification sink.");
        describe_counter!(
            "alerts_suppressed_total",
            "Anomalies suppressed by the cooldown gate."
        );
        describe_counter!("alert_send_errors_total", "Failed alert deliveries.");
        describe_gauge!("detect_last_std_dev", "Std-dev computed by the last cycle.");
    });
}

#[derive(Debug, Clone, Copy)]
pub struct DetectionConfig {
    /// Width of the detection window in hours.
    pub window_hours: u32,
    pub detector: DetectorConfig,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            window_hours: 6,
            detector: DetectorConfig::default(),
        }
    }
}

/// Run one detection cycle.
///
/// Returns `Ok(Some(verdict))` when a verdict was computed (anomalous or
/// not), `Ok(None)` when the sample was too thin to judge, and `Err` on a
/// store failure — fail closed, no alert on partial data. A notification
/// failure never bubbles up: the verdict still counts as computed.
pub async fn run_detection(
    store: &dyn PostStore,
    notifier: &dyn Notifier,
    gate: &mut AlertGate,
    cfg: &DetectionConfig,
) -> Result<Option<AnomalyVerdict>, PipelineError> {
    ensure_metrics_described();

    let now = Utc::now();
    let window = DetectionWindow::ending_at(now, cfg.window_hours);
    let records = store.query_range(window.start, window.end).await?;
    tracing::debug!(
        records = records.len(),
        start = %window.start,
        end = %window.end,
        "window scan"
    );

    let buckets = bucket_by_hour(window, &records);
    let verdict = match detect::evaluate(buckets, &cfg.detector) {
        Ok(v) => v,
        Err(PipelineError::DegenerateSample { active, required }) => {
            tracing::info!(active, required, "not enough bucket data; detection skipped");
            counter!("detect_skipped_total").increment(1);
            return Ok(None);
        }
        Err(e) => return Err(e),
    };

    counter!("detect_runs_total").increment(1);
    gauge!("detect_last_std_dev").set(verdict.std_dev);

    if !verdict.is_anomalous {
        tracing::debug!(std_dev = verdict.std_dev, mean = verdict.mean, "dispersion within bounds");
        return Ok(Some(verdict));
    }

    if !gate.should_alert(now) {
        tracing::info!(
            last_alert = ?gate.last_alert_ts(),
            std_dev = verdict.std_dev,
            "anomaly inside cooldown; alert suppressed"
        );
        counter!("alerts_suppressed_total").increment(1);
        return Ok(Some(verdict));
    }

    let message = format_alert(&verdict, cfg.window_hours);
    match notifier.send(&message).await {
        Ok(()) => {
            gate.record_alert(now);
            counter!("alerts_sent_total").increment(1);
            tracing::info!(std_dev = verdict.std_dev, mean = verdict.mean, "alert sent");
        }
        Err(e) => {
            tracing::warn!(error = %e, "alert delivery failed");
            counter!("alert_send_errors_total").increment(1);
        }
    }

    Ok(Some(verdict))
}
