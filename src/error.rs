// src/error.rs
use thiserror::Error;

/// Failure taxonomy for the pipeline.
///
/// Every variant is scoped to a single invocation; the next scheduled run is
/// the recovery mechanism, so nothing here is fatal to the process.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Search provider unreachable, or it rejected the request
    /// (auth/rate-limit/HTTP error).
    #[error("search provider unavailable: {0}")]
    UpstreamUnavailable(String),

    /// Store read or write failure.
    #[error("store operation failed: {0}")]
    Persistence(String),

    /// Alert delivery failure. Logged and swallowed by the detection cycle;
    /// the verdict itself still counts as computed.
    #[error("alert delivery failed: {0}")]
    Notification(String),

    /// Not enough populated buckets to compute a meaningful statistic.
    /// A deliberate no-op outcome, not a failure.
    #[error("degenerate sample: {active} active buckets, need {required}")]
    DegenerateSample { active: usize, required: usize },
}

impl PipelineError {
    pub fn upstream(e: impl std::fmt::Display) -> Self {
        Self::UpstreamUnavailable(e.to_string())
    }

    pub fn persistence(e: impl std::fmt::Display) -> Self {
        Self::Persistence(e.to_string())
    }

    pub fn notification(e: impl std::fmt::Display) -> Self {
        Self::Notification(e.to_string())
    }
}
