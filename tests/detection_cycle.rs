// tests/detection_cycle.rs
//
// Full detection cycles against a seeded store: verdict, alert hand-off,
// cooldown suppression, swallowed delivery failures, degenerate samples.

use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};

use hashtag_burst_monitor::aggregate::truncate_to_hour;
use hashtag_burst_monitor::detect::DetectorConfig;
use hashtag_burst_monitor::error::PipelineError;
use hashtag_burst_monitor::model::PostRecord;
use hashtag_burst_monitor::notify::cooldown::AlertGate;
use hashtag_burst_monitor::notify::Notifier;
use hashtag_burst_monitor::pipeline::{run_detection, DetectionConfig};
use hashtag_burst_monitor::store::memory::MemoryStore;
use hashtag_burst_monitor::store::PostStore;

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

struct FailingNotifier;

#[async_trait::async_trait]
impl Notifier for FailingNotifier {
    async fn send(&self, _message: &str) -> Result<(), PipelineError> {
        Err(PipelineError::notification("gateway returned 503"))
    }
}

fn cfg() -> DetectionConfig {
    DetectionConfig {
        window_hours: 6,
        detector: DetectorConfig {
            threshold: 5.0,
            min_active_buckets: 2,
        },
    }
}

fn record(id: String, created_at: DateTime<Utc>) -> PostRecord {
    PostRecord {
        id,
        created_at,
        text: "#awsoutage is it down?".into(),
        hashtags_matched: vec!["awsoutage".into()],
        ingested_at: Utc::now(),
    }
}

/// Three quiet hours plus one burst hour, all comfortably inside the window
/// even if the wall-clock hour flips mid-test.
async fn seed_burst(store: &MemoryStore) {
    let end = truncate_to_hour(Utc::now());
    for (i, offset_mins) in [270i64, 210, 150].iter().enumerate() {
        store
            .put_if_absent(record(format!("quiet-{i}"), end - Duration::minutes(*offset_mins)))
            .await
            .unwrap();
    }
    for i in 0..50 {
        store
            .put_if_absent(record(format!("burst-{i}"), end - Duration::minutes(90)))
            .await
            .unwrap();
    }
}

#[tokio::test]
async fn anomaly_sends_one_alert_then_cooldown_suppresses() {
    let store = MemoryStore::new();
    seed_burst(&store).await;

    let notifier = RecordingNotifier::default();
    let mut gate = AlertGate::new(18_000);

    let verdict = run_detection(&store, &notifier, &mut gate, &cfg())
        .await
        .unwrap()
        .expect("burst window should produce a verdict");
    assert!(verdict.is_anomalous);
    assert!(verdict.std_dev > 5.0);
    assert_eq!(notifier.sent.lock().unwrap().len(), 1);
    assert!(gate.last_alert_ts().is_some());

    // Second cycle still sees the burst, but the gate holds it back.
    let verdict2 = run_detection(&store, &notifier, &mut gate, &cfg())
        .await
        .unwrap()
        .unwrap();
    assert!(verdict2.is_anomalous);
    assert_eq!(notifier.sent.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn zero_cooldown_alerts_every_cycle() {
    let store = MemoryStore::new();
    seed_burst(&store).await;

    let notifier = RecordingNotifier::default();
    let mut gate = AlertGate::new(0);

    for _ in 0..2 {
        run_detection(&store, &notifier, &mut gate, &cfg())
            .await
            .unwrap();
    }
    assert_eq!(notifier.sent.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn delivery_failure_is_swallowed_and_gate_stays_open() {
    let store = MemoryStore::new();
    seed_burst(&store).await;

    let mut gate = AlertGate::new(18_000);
    let verdict = run_detection(&store, &FailingNotifier, &mut gate, &cfg())
        .await
        .expect("a failed send must not fail the cycle")
        .unwrap();

    assert!(verdict.is_anomalous);
    // Nothing went out, so the cooldown must not have started.
    assert_eq!(gate.last_alert_ts(), None);
}

#[tokio::test]
async fn quiet_window_produces_calm_verdict_and_no_alert() {
    let store = MemoryStore::new();
    let end = truncate_to_hour(Utc::now());
    for i in 0..4i64 {
        store
            .put_if_absent(record(
                format!("steady-{i}"),
                end - Duration::minutes(30 + i * 60),
            ))
            .await
            .unwrap();
    }

    let notifier = RecordingNotifier::default();
    let mut gate = AlertGate::new(18_000);
    let verdict = run_detection(&store, &notifier, &mut gate, &cfg())
        .await
        .unwrap()
        .unwrap();

    assert!(!verdict.is_anomalous);
    assert!(notifier.sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn single_active_hour_skips_detection() {
    let store = MemoryStore::new();
    let end = truncate_to_hour(Utc::now());
    store
        .put_if_absent(record("lonely".into(), end - Duration::minutes(90)))
        .await
        .unwrap();

    let notifier = RecordingNotifier::default();
    let mut gate = AlertGate::new(18_000);
    let outcome = run_detection(&store, &notifier, &mut gate, &cfg())
        .await
        .unwrap();

    assert!(outcome.is_none());
    assert!(notifier.sent.lock().unwrap().is_empty());
}
