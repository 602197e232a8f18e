// src/search/recent.rs
//! HTTP client for the provider's recent-search endpoint.
//!
//! The first page is scoped with `start_time`; follow-up pages carry the
//! `next_token` the provider handed back instead. Paging stops when the
//! provider stops returning tokens, or at `max_pages` — consecutive polls
//! overlap anyway, so a truncated run only defers items to the next tick.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::time::Duration;

use crate::error::PipelineError;
use crate::search::{SearchItem, SearchProvider};

const DEFAULT_BASE_URL: &str = "https://api.twitter.com/2/tweets/search/recent";

/// Provider-side cap on `max_results` per page.
const PAGE_SIZE_MAX: u32 = 100;
const PAGE_SIZE_MIN: u32 = 10;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    data: Vec<ApiItem>,
    #[serde(default)]
    meta: Meta,
}

#[derive(Debug, Deserialize)]
struct ApiItem {
    id: String,
    text: String,
    created_at: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct Meta {
    #[serde(default)]
    result_count: u64,
    next_token: Option<String>,
}

pub struct RecentSearchClient {
    base_url: String,
    bearer_token: String,
    client: reqwest::Client,
    page_size: u32,
    max_pages: u32,
}

impl RecentSearchClient {
    pub fn new(bearer_token: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .expect("http client");
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            bearer_token,
            client,
            page_size: PAGE_SIZE_MAX,
            max_pages: 10,
        }
    }

    /// Point at a different endpoint (tests, mock servers).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_page_size(mut self, n: u32) -> Self {
        self.page_size = n.clamp(PAGE_SIZE_MIN, PAGE_SIZE_MAX);
        self
    }

    pub fn with_page_cap(mut self, n: u32) -> Self {
        self.max_pages = n.max(1);
        self
    }

    async fn fetch_page(
        &self,
        query: &str,
        since: Option<DateTime<Utc>>,
        next_token: Option<&str>,
    ) -> Result<String, PipelineError> {
        let mut params: Vec<(&str, String)> = vec![
            ("query", query.to_string()),
            ("max_results", self.page_size.to_string()),
            ("tweet.fields", "created_at".to_string()),
        ];
        // First page anchors on start_time; every later page rides the token.
        match next_token {
            Some(token) => params.push(("next_token", token.to_string())),
            None => {
                if let Some(since) = since {
                    params.push(("start_time", since.to_rfc3339()));
                }
            }
        }

        let resp = self
            .client
            .get(&self.base_url)
            .bearer_auth(&self.bearer_token)
            .query(&params)
            .send()
            .await
            .map_err(PipelineError::upstream)?
            .error_for_status()
            .map_err(PipelineError::upstream)?;

        resp.text().await.map_err(PipelineError::upstream)
    }
}

/// Decode one page body into items plus the continuation token, if any.
/// Items with a missing or unparseable `created_at` are dropped with a
/// warning; a timestamp we cannot bucket on is useless downstream.
fn decode_page(body: &str) -> Result<(Vec<SearchItem>, Option<String>), PipelineError> {
    let page: SearchResponse = serde_json::from_str(body).map_err(PipelineError::upstream)?;

    let mut items = Vec::with_capacity(page.data.len());
    for raw in page.data {
        let Some(ts) = raw.created_at.as_deref() else {
            tracing::warn!(id = %raw.id, "search item without created_at; dropped");
            continue;
        };
        match DateTime::parse_from_rfc3339(ts) {
            Ok(dt) => items.push(SearchItem {
                id: raw.id,
                created_at: dt.with_timezone(&Utc),
                text: raw.text,
            }),
            Err(e) => {
                tracing::warn!(id = %raw.id, error = %e, "unparseable created_at; dropped");
            }
        }
    }

    tracing::debug!(
        result_count = page.meta.result_count,
        has_next = page.meta.next_token.is_some(),
        "search page decoded"
    );
    Ok((items, page.meta.next_token))
}

#[async_trait::async_trait]
impl SearchProvider for RecentSearchClient {
    async fn search(
        &self,
        query: &str,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<SearchItem>, PipelineError> {
        let mut out = Vec::new();
        let mut next_token: Option<String> = None;

        for page_no in 0..self.max_pages {
            let body = self.fetch_page(query, since, next_token.as_deref()).await?;
            let (mut items, token) = decode_page(&body)?;
            out.append(&mut items);

            match token {
                Some(t) => next_token = Some(t),
                None => return Ok(out),
            }
            if page_no + 1 == self.max_pages {
                tracing::debug!(query, pages = self.max_pages, "page cap reached");
            }
        }
        Ok(out)
    }
}
