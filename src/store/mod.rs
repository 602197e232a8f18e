// src/store/mod.rs
pub mod memory;

use chrono::{DateTime, Utc};

use crate::error::PipelineError;
use crate::model::PostRecord;

/// Adapter over whatever durable store the surrounding system provides.
///
/// The core only needs an atomic conditional insert and a `created_at` range
/// scan; keying and indexing strategy belong to the store. Cross-run dedup
/// lives behind `put_if_absent` because the ingestor has no memory of prior
/// runs — an in-memory seen-set cannot survive across invocations.
#[async_trait::async_trait]
pub trait PostStore: Send + Sync {
    /// Insert `record` unless a record with the same id already exists.
    /// Returns `true` when the record was newly inserted; a key collision is
    /// a no-op reported as `false`, not an error.
    async fn put_if_absent(&self, record: PostRecord) -> Result<bool, PipelineError>;

    /// All records with `created_at` in `[start, end)`, in no particular order.
    async fn query_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<PostRecord>, PipelineError>;
}
