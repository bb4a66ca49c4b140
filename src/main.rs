//! Quiz feed service — binary entrypoint.
//! Loads the sheet source list, ingests once, and serves the catalog as JSON.

use shuttle_axum::ShuttleAxum;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use tracnghiem_feed::ingest::config::{load_sources_default, IngestConfig};
use tracnghiem_feed::metrics::Metrics;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("tracnghiem_feed=info,ingest=info,warn"));

    // Shuttle may have installed a subscriber already; keep theirs if so.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .try_init();
}

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();
    init_tracing();

    let cfg = load_sources_default().unwrap_or_else(|e| {
        tracing::warn!(error = ?e, "quiz sources config unreadable; using built-in sources");
        IngestConfig::default_seed()
    });
    tracing::info!(
        sources = cfg.sources.len(),
        refresh_secs = cfg.refresh_secs,
        "starting quiz feed"
    );

    let metrics = match Metrics::init() {
        Ok(m) => Some(m),
        Err(e) => {
            tracing::warn!(error = ?e, "metrics disabled");
            None
        }
    };

    let router = tracnghiem_feed::app(&cfg, metrics.as_ref()).await?;
    Ok(router.into())
}
