//! Install bookkeeping and usage statistics.
//!
//! Settings live in the same key-value namespace as the summary cache, under
//! keys that never carry the cache prefix.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::Error;
use crate::cache::{CACHE_TTL_MS, KeyValueStore, SummaryCache};

pub const VERSION_KEY: &str = "sumlifyVersion";
pub const INSTALL_DATE_KEY: &str = "installDate";
pub const SUMMARY_COUNT_KEY: &str = "summaryCount";
pub const LAST_UPDATE_KEY: &str = "lastUpdateDate";
const CACHE_EXPIRY_KEY: &str = "cacheExpiry";
const AUTO_CACHE_KEY: &str = "autoCache";
const NOTIFICATIONS_KEY: &str = "notifications";

/// What happened on this launch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchKind {
    /// No version was recorded; defaults were written.
    Installed,
    /// A different version was recorded before.
    Updated { previous: String },
    Unchanged,
}

/// Usage statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub summary_count: u64,
    pub cached_summaries: usize,
    /// Milliseconds since the Unix epoch.
    pub install_date: i64,
    pub version: String,
}

/// Record a launch of `version`, writing first-install defaults when needed.
pub async fn record_launch(store: &dyn KeyValueStore, version: &str, now: DateTime<Utc>) -> Result<LaunchKind, Error> {
    let recorded = store.get_one(VERSION_KEY).await?;
    let now_ms = now.timestamp_millis();

    let kind = match recorded.as_ref().and_then(Value::as_str) {
        None => {
            store
                .set(
                    [
                        (VERSION_KEY, json!(version)),
                        (INSTALL_DATE_KEY, json!(now_ms)),
                        (SUMMARY_COUNT_KEY, json!(0)),
                        (CACHE_EXPIRY_KEY, json!(CACHE_TTL_MS)),
                        (AUTO_CACHE_KEY, json!(true)),
                        (NOTIFICATIONS_KEY, json!(true)),
                    ]
                    .into_iter()
                    .map(|(k, v)| (k.to_string(), v))
                    .collect(),
                )
                .await?;
            tracing::info!(version, "first launch, default settings written");
            LaunchKind::Installed
        }
        Some(previous) if previous != version => {
            let previous = previous.to_string();
            store
                .set(
                    [(VERSION_KEY, json!(version)), (LAST_UPDATE_KEY, json!(now_ms))]
                        .into_iter()
                        .map(|(k, v)| (k.to_string(), v))
                        .collect(),
                )
                .await?;
            tracing::info!(from = %previous, to = version, "updated");
            LaunchKind::Updated { previous }
        }
        Some(_) => LaunchKind::Unchanged,
    };

    Ok(kind)
}

/// Bump the produced-summary counter and return the new value. Concurrent
/// calls never lose an increment.
pub async fn increment_summary_count(store: &dyn KeyValueStore) -> Result<u64, Error> {
    store.increment(SUMMARY_COUNT_KEY).await
}

/// Collect usage statistics. Missing settings fall back to `now` and `version`.
pub async fn stats(cache: &SummaryCache, version: &str) -> Result<Stats, Error> {
    let store = cache.store();
    let data = store
        .get(&[
            SUMMARY_COUNT_KEY.to_string(),
            INSTALL_DATE_KEY.to_string(),
            VERSION_KEY.to_string(),
        ])
        .await?;

    Ok(Stats {
        summary_count: data.get(SUMMARY_COUNT_KEY).and_then(Value::as_u64).unwrap_or(0),
        cached_summaries: cache.count().await?,
        install_date: data
            .get(INSTALL_DATE_KEY)
            .and_then(Value::as_i64)
            .unwrap_or_else(|| cache.now().timestamp_millis()),
        version: data
            .get(VERSION_KEY)
            .and_then(Value::as_str)
            .unwrap_or(version)
            .to_string(),
    })
}
