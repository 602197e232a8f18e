// src/ingest/mod.rs
pub mod config;

use chrono::{Duration, Utc};
use metrics::{counter, describe_counter, describe_gauge, gauge};
use once_cell::sync::OnceCell;
use regex::Regex;

use crate::model::PostRecord;
use crate::search::SearchProvider;
use crate::store::PostStore;

/// One-time metrics registration (so series show up on /metrics).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("ingest_fetched_total", "Items returned by the search provider.");
        describe_counter!("ingest_inserted_total", "Items newly written to the store.");
        describe_counter!(
            "ingest_duplicates_total",
            "Items already present in the store (no-op writes)."
        );
        describe_counter!(
            "ingest_query_errors_total",
            "Tracked queries that failed upstream."
        );
        describe_counter!(
            "ingest_write_errors_total",
            "Records that failed to persist."
        );
        describe_gauge!(
            "ingest_last_run_ts",
            "Unix ts when ingestion last completed."
        );
    });
}

/// Counters for one ingestion run. `fetched - inserted` is the cross-run
/// duplicate rate, the number to watch when tuning the schedule interval
/// against the provider's look-back window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestSummary {
    pub fetched: usize,
    pub inserted: usize,
    pub failed_queries: usize,
    pub failed_writes: usize,
}

/// Collapse whitespace and trim. Post text arrives with newlines and odd
/// spacing; we store a single-line form.
pub fn normalize_text(s: &str) -> String {
    static RE_WS: OnceCell<Regex> = OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| Regex::new(r"\s+").unwrap());
    re_ws.replace_all(s, " ").trim().to_string()
}

/// All `#tag` tokens in `text`, lowercased, without the `#`.
fn hashtags_in(text: &str) -> Vec<String> {
    static RE_TAG: OnceCell<Regex> = OnceCell::new();
    let re_tag = RE_TAG.get_or_init(|| Regex::new(r"#(\w+)").unwrap());
    re_tag
        .captures_iter(&text.to_lowercase())
        .map(|c| c[1].to_string())
        .collect()
}

/// Which of the tracked hashtags appear in `text`. The fetching query is
/// always included, so no record ends up with an empty match list even when
/// the provider matched on something we do not tokenize (e.g. quoted text).
pub fn matched_hashtags(text: &str, query: &str, tracked: &[String]) -> Vec<String> {
    let present = hashtags_in(text);
    let fetching = query.trim_start_matches('#').to_lowercase();

    let mut out = vec![fetching.clone()];
    for tag in tracked {
        let tag = tag.trim_start_matches('#').to_lowercase();
        if tag != fetching && present.iter().any(|p| *p == tag) {
            out.push(tag);
        }
    }
    out
}

/// Run ingestion once for every tracked query.
///
/// Failures are isolated two ways: a dead provider for one hashtag never
/// stops the others, and a failed write skips that record only. Partial
/// success is fine — re-running re-fetches the overlap and every
/// already-stored id lands as a no-op, never a duplicate.
pub async fn run_ingestion(
    provider: &dyn SearchProvider,
    store: &dyn PostStore,
    queries: &[String],
    lookback: Duration,
) -> IngestSummary {
    ensure_metrics_described();

    let since = Utc::now() - lookback;
    let mut summary = IngestSummary::default();

    for query in queries {
        let query = query.trim();
        if query.is_empty() {
            tracing::warn!("empty tracked query skipped");
            continue;
        }

        let items = match provider.search(query, Some(since)).await {
            Ok(items) => items,
            Err(e) => {
                tracing::warn!(error = %e, query, "search failed; remaining queries continue");
                counter!("ingest_query_errors_total").increment(1);
                summary.failed_queries += 1;
                continue;
            }
        };

        summary.fetched += items.len();
        counter!("ingest_fetched_total").increment(items.len() as u64);

        for item in items {
            let record = PostRecord {
                id: item.id,
                created_at: item.created_at,
                hashtags_matched: matched_hashtags(&item.text, query, queries),
                text: normalize_text(&item.text),
                ingested_at: Utc::now(),
            };
            match store.put_if_absent(record).await {
                Ok(true) => {
                    summary.inserted += 1;
                    counter!("ingest_inserted_total").increment(1);
                }
                Ok(false) => {
                    counter!("ingest_duplicates_total").increment(1);
                }
                Err(e) => {
                    tracing::warn!(error = %e, "store write failed; record skipped");
                    counter!("ingest_write_errors_total").increment(1);
                    summary.failed_writes += 1;
                }
            }
        }
    }

    gauge!("ingest_last_run_ts").set(Utc::now().timestamp().max(0) as f64);
    tracing::info!(
        fetched = summary.fetched,
        inserted = summary.inserted,
        failed_queries = summary.failed_queries,
        failed_writes = summary.failed_writes,
        "ingestion run complete"
    );
    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_collapses_whitespace() {
        assert_eq!(normalize_text("  big\n\noutage   now  "), "big outage now");
    }

    #[test]
    fn fetching_query_is_always_matched() {
        let tracked = vec!["awsoutage".to_string(), "clouddown".to_string()];
        let out = matched_hashtags("nothing tagged here", "awsoutage", &tracked);
        assert_eq!(out, vec!["awsoutage".to_string()]);
    }

    #[test]
    fn other_tracked_tags_match_case_insensitively() {
        let tracked = vec!["awsoutage".to_string(), "clouddown".to_string()];
        let out = matched_hashtags("everything is on fire #CloudDown", "#awsoutage", &tracked);
        assert_eq!(out, vec!["awsoutage".to_string(), "clouddown".to_string()]);
    }

    #[test]
    fn untracked_tags_are_ignored() {
        let tracked = vec!["awsoutage".to_string()];
        let out = matched_hashtags("#devops #awsoutage", "awsoutage", &tracked);
        assert_eq!(out, vec!["awsoutage".to_string()]);
    }
}
