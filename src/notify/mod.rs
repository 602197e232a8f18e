// src/notify/mod.rs
pub mod cooldown;
pub mod webhook;

use crate::error::PipelineError;
use crate::model::AnomalyVerdict;

/// Delivery transport for alert messages. A failed send maps to
/// `PipelineError::Notification`; the detection cycle logs it and moves on —
/// an undelivered alert is a degraded outcome, not a pipeline failure.
#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, message: &str) -> Result<(), PipelineError>;
}

/// Render the alert message handed to the sink.
pub fn format_alert(verdict: &AnomalyVerdict, window_hours: u32) -> String {
    let counts: Vec<u64> = verdict.buckets.iter().map(|b| b.count).collect();
    format!(
        "Elevated hashtag activity. Distribution over past {window_hours}h: {counts:?}. \
         Mean {:.2}/h, standard deviation {:.2}.",
        verdict.mean, verdict.std_dev
    )
}

/// Sink that only logs. Used when no webhook is configured.
pub struct LogNotifier;

#[async_trait::async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, message: &str) -> Result<(), PipelineError> {
        tracing::info!(%message, "alert (log sink)");
        Ok(())
    }
}
