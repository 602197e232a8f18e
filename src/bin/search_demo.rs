//! One-off recent-search against the live provider; prints matching items.
//! Usage: `search_demo [hashtag]` (defaults to awsoutage). Needs
//! SEARCH_BEARER_TOKEN in the environment or .env.

use anyhow::Context;
use chrono::Utc;

use hashtag_burst_monitor::search::recent::RecentSearchClient;
use hashtag_burst_monitor::search::SearchProvider;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt().with_target(false).init();

    let query = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "awsoutage".to_string());
    let bearer =
        std::env::var("SEARCH_BEARER_TOKEN").context("SEARCH_BEARER_TOKEN is required")?;

    let client = RecentSearchClient::new(bearer);
    let since = Utc::now() - chrono::Duration::hours(1);
    let items = client.search(&query, Some(since)).await?;

    println!("{} results for #{query} in the last hour", items.len());
    for item in items {
        println!("{}  {}  {}", item.id, item.created_at.to_rfc3339(), item.text);
    }
    Ok(())
}
