// tests/detection_fail_closed.rs
//
// A store read failure aborts the whole cycle: no verdict, no alert.
// No alert beats an alert computed on partial data.

use std::sync::Mutex;

use chrono::{DateTime, Utc};

use hashtag_burst_monitor::error::PipelineError;
use hashtag_burst_monitor::model::PostRecord;
use hashtag_burst_monitor::notify::cooldown::AlertGate;
use hashtag_burst_monitor::notify::Notifier;
use hashtag_burst_monitor::pipeline::{run_detection, DetectionConfig};
use hashtag_burst_monitor::store::PostStore;

struct BrokenStore;

#[async_trait::async_trait]
impl PostStore for BrokenStore {
    async fn put_if_absent(&self, _record: PostRecord) -> Result<bool, PipelineError> {
        Ok(true)
    }

    async fn query_range(
        &self,
        _start: DateTime<Utc>,
        _end: DateTime<Utc>,
    ) -> Result<Vec<PostRecord>, PipelineError> {
        Err(PipelineError::persistence("table unavailable"))
    }
}

#[derive(Default)]
struct RecordingNotifier {
    sent: Mutex<Vec<String>>,
}

#[async_trait::async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, message: &str) -> Result<(), PipelineError> {
        self.sent.lock().unwrap().push(message.to_string());
        Ok(())
    }
}

#[tokio::test]
async fn store_read_failure_yields_no_verdict_and_no_alert() {
    let notifier = RecordingNotifier::default();
    let mut gate = AlertGate::new(18_000);

    let err = run_detection(&BrokenStore, &notifier, &mut gate, &DetectionConfig::default())
        .await
        .unwrap_err();

    assert!(matches!(err, PipelineError::Persistence(_)));
    assert!(notifier.sent.lock().unwrap().is_empty());
    assert_eq!(gate.last_alert_ts(), None);
}
