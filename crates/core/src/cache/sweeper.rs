//! Background task that periodically deletes expired summaries.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use super::ttl::SummaryCache;

pub const DEFAULT_INITIAL_DELAY: Duration = Duration::from_secs(5);
pub const DEFAULT_PERIOD: Duration = Duration::from_secs(60 * 60);

/// Spawn the sweeper: one pass after `initial_delay`, then one every `period`.
///
/// A failed pass is logged and the loop keeps going. Abort the returned
/// handle to stop it.
pub fn spawn_sweeper(cache: SummaryCache, initial_delay: Duration, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval_at(Instant::now() + initial_delay, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;

            match cache.sweep().await {
                Ok(report) => tracing::debug!(
                    scanned = report.scanned,
                    removed = report.removed,
                    skipped = report.skipped,
                    "cache sweep finished"
                ),
                Err(e) => tracing::error!(error = %e, "cache sweep failed"),
            }
        }
    })
}
