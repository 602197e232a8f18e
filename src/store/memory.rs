// src/store/memory.rs
//! In-process store used by the default binary and tests. Durable backends
//! plug in behind the same trait.

use std::collections::{btree_map::Entry, BTreeMap};
use std::sync::Mutex;

use chrono::{DateTime, Utc};

use crate::error::PipelineError;
use crate::model::PostRecord;
use crate::store::PostStore;

/// Thread-safe map keyed by post id.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<BTreeMap<String, PostRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().expect("store mutex poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait::async_trait]
impl PostStore for MemoryStore {
    async fn put_if_absent(&self, record: PostRecord) -> Result<bool, PipelineError> {
        let mut map = self.inner.lock().expect("store mutex poisoned");
        match map.entry(record.id.clone()) {
            Entry::Occupied(_) => Ok(false),
            Entry::Vacant(slot) => {
                slot.insert(record);
                Ok(true)
            }
        }
    }

    async fn query_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<PostRecord>, PipelineError> {
        let map = self.inner.lock().expect("store mutex poisoned");
        Ok(map
            .values()
            .filter(|r| r.created_at >= start && r.created_at < end)
            .cloned()
            .collect())
    }
}
