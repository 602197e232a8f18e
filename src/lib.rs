// src/lib.rs
// Public library surface for integration tests (and the binaries).

pub mod aggregate;
pub mod config;
pub mod detect;
pub mod error;
pub mod ingest;
pub mod metrics;
pub mod model;
pub mod notify;
pub mod pipeline;
pub mod scheduler;
pub mod search;
pub mod store;

// ---- Re-exports for stable public API ----
pub use crate::error::PipelineError;
pub use crate::ingest::{run_ingestion, IngestSummary};
pub use crate::model::{AnomalyVerdict, HourBucket, PostRecord};
pub use crate::notify::{cooldown::AlertGate, Notifier};
pub use crate::pipeline::{run_detection, DetectionConfig};
pub use crate::search::{SearchItem, SearchProvider};
pub use crate::store::{memory::MemoryStore, PostStore};
