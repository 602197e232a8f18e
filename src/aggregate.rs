// src/aggregate.rs
//! Hour bucketing over the detection window.

use chrono::{DateTime, Duration, Utc};

use crate::model::{HourBucket, PostRecord};

/// Floor `ts` to the start of its hour.
pub fn truncate_to_hour(ts: DateTime<Utc>) -> DateTime<Utc> {
    let secs = ts.timestamp();
    let floored = secs - secs.rem_euclid(3600);
    DateTime::<Utc>::from_timestamp(floored, 0).unwrap_or(ts)
}

/// The detection window, aligned down to the hour so every bucket covers a
/// full hour. The in-progress partial hour is excluded on purpose: it would
/// otherwise sit permanently undercounted at the tail and drag the statistic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetectionWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub hours: u32,
}

impl DetectionWindow {
    pub fn ending_at(now: DateTime<Utc>, hours: u32) -> Self {
        let end = truncate_to_hour(now);
        Self {
            start: end - Duration::hours(i64::from(hours)),
            end,
            hours,
        }
    }
}

/// Bucket `records` into exactly `window.hours` consecutive one-hour buckets,
/// chronological order. Zero-count buckets stay explicit: sparse data must
/// not shrink the sample the statistic runs on, or the dispersion is biased.
/// Records outside the window are ignored.
pub fn bucket_by_hour(window: DetectionWindow, records: &[PostRecord]) -> Vec<HourBucket> {
    let mut buckets: Vec<HourBucket> = (0..window.hours)
        .map(|i| HourBucket {
            bucket_start: window.start + Duration::hours(i64::from(i)),
            count: 0,
        })
        .collect();

    for r in records {
        if r.created_at < window.start || r.created_at >= window.end {
            continue;
        }
        let idx = ((r.created_at - window.start).num_seconds() / 3600) as usize;
        if let Some(b) = buckets.get_mut(idx) {
            b.count += 1;
        }
    }
    buckets
}
