// src/model.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One ingested post. `id` is the natural key and the idempotency token:
/// a given id is stored at most once and the record is never mutated after
/// the initial write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostRecord {
    pub id: String,
    /// When the post was authored (UTC), NOT when we ingested it.
    /// Aggregation buckets on this field.
    pub created_at: DateTime<Utc>,
    pub text: String,
    /// Which tracked hashtags the text matched. Informational payload,
    /// never used in the statistic.
    pub hashtags_matched: Vec<String>,
    /// Local processing time, kept for observability only.
    pub ingested_at: DateTime<Utc>,
}

/// One fixed hour of the detection window. Derived in memory each cycle,
/// never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourBucket {
    /// Start of the hour, truncated to the hour boundary.
    pub bucket_start: DateTime<Utc>,
    /// Posts whose `created_at` falls in `[bucket_start, bucket_start + 1h)`.
    pub count: u64,
}

/// Output of one detection cycle: the decision plus the data that produced it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnomalyVerdict {
    pub is_anomalous: bool,
    pub std_dev: f64,
    pub mean: f64,
    pub buckets: Vec<HourBucket>,
}
