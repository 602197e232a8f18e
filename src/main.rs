//! Hashtag Burst Monitor — binary entrypoint.
//! Wires the store, search client, and notifier, spawns the two interval
//! schedulers, and serves /metrics.

use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use hashtag_burst_monitor::config::AppConfig;
use hashtag_burst_monitor::metrics::Metrics;
use hashtag_burst_monitor::notify::webhook::WebhookNotifier;
use hashtag_burst_monitor::notify::{LogNotifier, Notifier};
use hashtag_burst_monitor::search::recent::RecentSearchClient;
use hashtag_burst_monitor::search::SearchProvider;
use hashtag_burst_monitor::store::memory::MemoryStore;
use hashtag_burst_monitor::store::PostStore;
use hashtag_burst_monitor::scheduler;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();
    init_tracing();

    let cfg = AppConfig::from_env()?;
    tracing::info!(
        hashtags = ?cfg.hashtags,
        window_hours = cfg.window_hours,
        threshold = cfg.std_dev_threshold,
        "starting hashtag burst monitor"
    );

    let metrics = Metrics::init(cfg.window_hours);

    let bearer = std::env::var("SEARCH_BEARER_TOKEN")
        .context("SEARCH_BEARER_TOKEN is required (the search client must arrive authenticated)")?;
    let provider: Arc<dyn SearchProvider> = Arc::new(RecentSearchClient::new(bearer));

    // In-process store by default; durable backends plug in behind the trait.
    let store: Arc<dyn PostStore> = Arc::new(MemoryStore::new());

    let notifier: Arc<dyn Notifier> = match std::env::var("ALERT_WEBHOOK_URL") {
        Ok(url) => Arc::new(WebhookNotifier::new(url)),
        Err(_) => {
            tracing::warn!("ALERT_WEBHOOK_URL not set; alerts go to the log only");
            Arc::new(LogNotifier)
        }
    };

    let _ingest = scheduler::spawn_ingest_scheduler(
        provider,
        store.clone(),
        cfg.hashtags.clone(),
        chrono::Duration::hours(i64::from(cfg.lookback_hours)),
        cfg.ingest_interval_secs,
    );
    let _detect = scheduler::spawn_detection_scheduler(
        store,
        notifier,
        cfg.detection(),
        cfg.alert_cooldown_secs,
        cfg.detect_interval_secs,
    );

    let listener = tokio::net::TcpListener::bind(&cfg.listen_addr)
        .await
        .with_context(|| format!("binding {}", cfg.listen_addr))?;
    tracing::info!(addr = %cfg.listen_addr, "metrics endpoint up");
    axum::serve(listener, metrics.router()).await?;
    Ok(())
}
