// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod api;
pub mod catalog;
pub mod ingest;
pub mod metrics;

// ---- Re-exports for stable public API ----
pub use crate::api::create_router as router;
pub use crate::catalog::{Catalog, Snapshot};
pub use crate::ingest::fetch_quiz_data;
pub use crate::ingest::types::{Category, QuizRecord, QuizType, SheetProvider};

use std::time::Duration;

use crate::ingest::config::IngestConfig;

/// Build the full in-process app: JSON API plus `/metrics` when a recorder is
/// given. Ingests once before returning, then starts the refresh task when
/// `refresh_secs > 0`.
pub async fn app(
    cfg: &IngestConfig,
    metrics: Option<&crate::metrics::Metrics>,
) -> anyhow::Result<axum::Router> {
    let snapshot = Snapshot::new(Catalog::default());
    let providers = cfg.build_providers()?;
    ingest::scheduler::refresh_once(&providers, &snapshot).await;

    if cfg.refresh_secs > 0 {
        ingest::scheduler::spawn_refresh_task(
            cfg.build_providers()?,
            snapshot.clone(),
            Duration::from_secs(cfg.refresh_secs),
        );
    }

    let state = api::AppState::new(snapshot, providers);
    let mut router = api::create_router(state);
    if let Some(m) = metrics {
        router = router.merge(m.router());
    }
    Ok(router)
}
