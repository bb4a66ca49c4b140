// src/ingest/scheduler.rs
use std::time::Duration;

use metrics::counter;
use tokio::task::JoinHandle;

use crate::catalog::{Catalog, Snapshot};
use crate::ingest::types::SheetProvider;

/// Ingest once and swap the result into `snapshot`.
/// Returns the number of records ingested (the swap may still be refused).
pub async fn refresh_once(providers: &[Box<dyn SheetProvider>], snapshot: &Snapshot) -> usize {
    let records = crate::ingest::run_once(providers).await;
    let n = records.len();
    let now = chrono::Utc::now().timestamp().max(0) as u64;
    let swapped = snapshot.replace(Catalog::new(records, now));
    counter!("ingest_runs_total").increment(1);
    if !swapped {
        tracing::warn!(target: "ingest", "ingest returned nothing; keeping previous snapshot");
    }
    n
}

/// Re-ingest every `interval`. The first run happens one interval from now;
/// callers ingest up front with [`refresh_once`].
pub fn spawn_refresh_task(
    providers: Vec<Box<dyn SheetProvider>>,
    snapshot: Snapshot,
    interval: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let start = tokio::time::Instant::now() + interval;
        let mut ticker = tokio::time::interval_at(start, interval);
        loop {
            ticker.tick().await;
            let n = refresh_once(&providers, &snapshot).await;
            tracing::info!(target: "ingest", records = n, "scheduled refresh tick");
        }
    })
}
