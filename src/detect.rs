// src/detect.rs
//! Dispersion statistic and the anomaly decision.
//!
//! Standard deviation is the *population* form (divide by N, not N-1).
//! N is the window's hour count, small and fixed, and the population form
//! keeps the result deterministic; the sample form would shift results
//! noticeably at N < 30. Tests assume the same convention.

use crate::error::PipelineError;
use crate::model::{AnomalyVerdict, HourBucket};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectorConfig {
    /// Absolute std-dev cutover in posts-per-hour. Deliberately not
    /// normalized against the mean: a relative threshold reintroduces
    /// instability at low baseline volumes.
    pub threshold: f64,
    /// Minimum number of non-zero buckets before a verdict is computed.
    pub min_active_buckets: usize,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            threshold: 100.0,
            min_active_buckets: 2,
        }
    }
}

/// Decide whether `buckets` constitute an anomaly.
///
/// Fails with `DegenerateSample` when too few buckets carry data: a single
/// post in a single hour is not anomalous, it is an empty sample.
pub fn evaluate(
    buckets: Vec<HourBucket>,
    cfg: &DetectorConfig,
) -> Result<AnomalyVerdict, PipelineError> {
    let active = buckets.iter().filter(|b| b.count > 0).count();
    if buckets.is_empty() || active < cfg.min_active_buckets {
        return Err(PipelineError::DegenerateSample {
            active,
            required: cfg.min_active_buckets,
        });
    }

    let n = buckets.len() as f64;
    let mean = buckets.iter().map(|b| b.count as f64).sum::<f64>() / n;
    let variance = buckets
        .iter()
        .map(|b| {
            let d = b.count as f64 - mean;
            d * d
        })
        .sum::<f64>()
        / n;
    let std_dev = variance.sqrt();

    Ok(AnomalyVerdict {
        // Strictly exceeds: sitting exactly on the threshold is not a burst.
        is_anomalous: std_dev > cfg.threshold,
        std_dev,
        mean,
        buckets,
    })
}
