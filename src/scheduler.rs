// src/scheduler.rs
//! Interval tasks driving the two entry points. Cadence lives here, not in
//! the pipeline: each tick is one complete, independent invocation, and a
//! failed tick simply waits for the next one.

use std::path::PathBuf;
use std::sync::Arc;

use metrics::counter;
use tokio::task::JoinHandle;

use crate::notify::cooldown::{AlertGate, DEFAULT_STATE_PATH};
use crate::notify::Notifier;
use crate::pipeline::{run_detection, DetectionConfig};
use crate::search::SearchProvider;
use crate::store::PostStore;

pub fn spawn_ingest_scheduler(
    provider: Arc<dyn SearchProvider>,
    store: Arc<dyn PostStore>,
    queries: Vec<String>,
    lookback: chrono::Duration,
    interval_secs: u64,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(std::time::Duration::from_secs(interval_secs));
        loop {
            ticker.tick().await;
            let summary =
                crate::ingest::run_ingestion(provider.as_ref(), store.as_ref(), &queries, lookback)
                    .await;
            counter!("ingest_runs_total").increment(1);
            tracing::info!(
                target: "ingest",
                fetched = summary.fetched,
                inserted = summary.inserted,
                "ingest tick"
            );
        }
    })
}

pub fn spawn_detection_scheduler(
    store: Arc<dyn PostStore>,
    notifier: Arc<dyn Notifier>,
    cfg: DetectionConfig,
    cooldown_secs: i64,
    interval_secs: u64,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let state_path = PathBuf::from(DEFAULT_STATE_PATH);
        let mut gate = AlertGate::load(cooldown_secs, &state_path).await;
        let mut ticker = tokio::time::interval(std::time::Duration::from_secs(interval_secs));
        loop {
            ticker.tick().await;
            let last_alert_before = gate.last_alert_ts();
            match run_detection(store.as_ref(), notifier.as_ref(), &mut gate, &cfg).await {
                Ok(Some(v)) => tracing::debug!(
                    target: "detect",
                    std_dev = v.std_dev,
                    anomalous = v.is_anomalous,
                    "detection tick"
                ),
                Ok(None) => {}
                Err(e) => tracing::warn!(target: "detect", error = %e, "detection tick failed"),
            }
            if gate.last_alert_ts() != last_alert_before {
                gate.persist(&state_path).await;
            }
        }
    })
}
