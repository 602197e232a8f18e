// src/notify/cooldown.rs
//! Cooldown gate so a sustained burst does not spam subscribers.
//!
//! A spike can take hours to stabilize and the detector re-fires every few
//! minutes while it lasts. The gate lets the first alert through, suppresses
//! the rest of the cooldown window, and persists its state to a small JSON
//! file so a restart does not re-alert.
//! - First alert always allowed.
//! - State is updated explicitly via `record_alert` after a successful send.

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_STATE_PATH: &str = "state/last_alert.json";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct GateState {
    last_alert_ts: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default)]
pub struct AlertGate {
    cooldown: ChronoDuration,
    state: GateState,
}

impl AlertGate {
    /// `cooldown_secs` < 0 is treated as 0 (no cooldown).
    pub fn new(cooldown_secs: i64) -> Self {
        Self {
            cooldown: ChronoDuration::seconds(cooldown_secs.max(0)),
            state: GateState::default(),
        }
    }

    /// Check if we may alert at `now`. Does NOT mutate state.
    pub fn should_alert(&self, now: DateTime<Utc>) -> bool {
        match self.state.last_alert_ts {
            None => true,
            Some(ts) => now.signed_duration_since(ts) >= self.cooldown,
        }
    }

    /// Record that an alert was sent at `now`.
    pub fn record_alert(&mut self, now: DateTime<Utc>) {
        self.state.last_alert_ts = Some(now);
    }

    pub fn last_alert_ts(&self) -> Option<DateTime<Utc>> {
        self.state.last_alert_ts
    }

    /// Load persisted state if the file exists; a fresh gate otherwise.
    pub async fn load(cooldown_secs: i64, path: &Path) -> Self {
        let mut gate = Self::new(cooldown_secs);
        if let Ok(s) = tokio::fs::read_to_string(path).await {
            gate.state = serde_json::from_str(&s).unwrap_or_default();
        }
        gate
    }

    /// Best-effort persist; failures are logged, never fatal.
    pub async fn persist(&self, path: &Path) {
        if let Some(dir) = path.parent() {
            if let Err(e) = tokio::fs::create_dir_all(dir).await {
                tracing::warn!("gate state dir: {e:#}");
                return;
            }
        }
        match serde_json::to_vec_pretty(&self.state) {
            Ok(bytes) => {
                if let Err(e) = tokio::fs::write(path, bytes).await {
                    tracing::warn!("write gate state: {e:#}");
                }
            }
            Err(e) => tracing::warn!("encode gate state: {e:#}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn first_alert_passes() {
        let gate = AlertGate::new(18_000);
        let now = Utc.with_ymd_and_hms(2022, 12, 7, 9, 0, 0).unwrap();
        assert!(gate.should_alert(now));
    }

    #[test]
    fn inside_cooldown_blocked() {
        let mut gate = AlertGate::new(18_000);
        let t0 = Utc.with_ymd_and_hms(2022, 12, 7, 9, 0, 0).unwrap();
        gate.record_alert(t0);
        let t1 = t0 + ChronoDuration::minutes(30);
        assert!(!gate.should_alert(t1));
    }

    #[test]
    fn after_cooldown_passes() {
        let mut gate = AlertGate::new(18_000);
        let t0 = Utc.with_ymd_and_hms(2022, 12, 7, 9, 0, 0).unwrap();
        gate.record_alert(t0);
        let t_after = t0 + ChronoDuration::seconds(18_000 + 5);
        assert!(gate.should_alert(t_after));
    }

    #[tokio::test]
    async fn state_survives_persist_and_load() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("last_alert.json");

        let mut gate = AlertGate::new(18_000);
        let t0 = Utc.with_ymd_and_hms(2022, 12, 7, 9, 0, 0).unwrap();
        gate.record_alert(t0);
        gate.persist(&path).await;

        let reloaded = AlertGate::load(18_000, &path).await;
        assert_eq!(reloaded.last_alert_ts(), Some(t0));
        assert!(!reloaded.should_alert(t0 + ChronoDuration::minutes(10)));
    }

    #[tokio::test]
    async fn missing_state_file_yields_fresh_gate() {
        let tmp = tempfile::tempdir().unwrap();
        let gate = AlertGate::load(18_000, &tmp.path().join("nope.json")).await;
        assert_eq!(gate.last_alert_ts(), None);
    }
}
