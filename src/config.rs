// src/config.rs
//! Env-driven runtime configuration. The binary loads `.env` (dotenvy)
//! before reading this.

use std::str::FromStr;

use anyhow::Result;

use crate::detect::DetectorConfig;
use crate::pipeline::DetectionConfig;

/// The hashtag the original deployment tracked; used when nothing is
/// configured so a bare `cargo run` still does something sensible.
const FALLBACK_HASHTAG: &str = "awsoutage";

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Tracked hashtag queries, normalized (lowercase, no `#`).
    pub hashtags: Vec<String>,
    /// How far back each search scopes its first page, in hours.
    pub lookback_hours: u32,
    /// Width of the detection window, in hours.
    pub window_hours: u32,
    pub std_dev_threshold: f64,
    pub min_active_buckets: usize,
    pub alert_cooldown_secs: i64,
    pub ingest_interval_secs: u64,
    pub detect_interval_secs: u64,
    pub listen_addr: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let mut hashtags = crate::ingest::config::load_tracked_default()?;
        if hashtags.is_empty() {
            tracing::warn!(
                fallback = FALLBACK_HASHTAG,
                "no tracked hashtags configured; using fallback"
            );
            hashtags.push(FALLBACK_HASHTAG.to_string());
        }

        Ok(Self {
            hashtags,
            lookback_hours: env_parse("QUERY_LOOKBACK_HOURS", 1),
            window_hours: env_parse("DETECT_WINDOW_HOURS", 6),
            std_dev_threshold: env_parse("STD_DEV_THRESHOLD", 100.0),
            min_active_buckets: env_parse("MIN_ACTIVE_BUCKETS", 2),
            alert_cooldown_secs: env_parse("ALERT_COOLDOWN_SECS", 18_000), // 5h
            ingest_interval_secs: env_parse("INGEST_INTERVAL_SECS", 300),
            detect_interval_secs: env_parse("DETECT_INTERVAL_SECS", 300),
            listen_addr: std::env::var("LISTEN_ADDR")
                .unwrap_or_else(|_| "0.0.0.0:8000".to_string()),
        })
    }

    pub fn detection(&self) -> DetectionConfig {
        DetectionConfig {
            window_hours: self.window_hours,
            detector: DetectorConfig {
                threshold: self.std_dev_threshold,
                min_active_buckets: self.min_active_buckets,
            },
        }
    }
}

fn env_parse<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
