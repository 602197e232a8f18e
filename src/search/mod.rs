// src/search/mod.rs
pub mod recent;

use chrono::{DateTime, Utc};

use crate::error::PipelineError;

/// One raw item from the search provider, before it becomes a `PostRecord`.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SearchItem {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub text: String,
}

/// The upstream search API, already authenticated — the core never sees
/// credentials. Zero results is a normal outcome, not an error.
#[async_trait::async_trait]
pub trait SearchProvider: Send + Sync {
    async fn search(
        &self,
        query: &str,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<SearchItem>, PipelineError>;
}
