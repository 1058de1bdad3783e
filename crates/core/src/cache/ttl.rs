//! TTL summary cache.
//!
//! Entries are valid for [`CACHE_TTL_MS`] after they were written. Expired
//! entries are not removed on read; [`SummaryCache::sweep`] deletes them in
//! batches, and callers check [`SummaryCache::is_valid`] before trusting a hit.

use std::sync::Arc;

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::clock::{Clock, SystemClock};
use super::key::CacheKey;
use super::store::KeyValueStore;
use crate::Error;

/// Validity window of a cached summary: 24 hours.
pub const CACHE_TTL_MS: i64 = 24 * 60 * 60 * 1000;

/// A cached summary and where it came from.
///
/// Serialized with the field names the browser extension used, so existing
/// stores remain readable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct CacheEntry {
    /// The summary text as returned by the producer.
    #[serde(rename = "summary")]
    pub payload: String,

    /// Write time, milliseconds since the Unix epoch on the wire.
    #[serde(rename = "timestamp", with = "chrono::serde::ts_milliseconds")]
    #[schemars(with = "i64")]
    pub created_at: DateTime<Utc>,

    /// The page URL the summary was produced for.
    #[serde(rename = "url")]
    pub source_identifier: String,

    /// Page title.
    #[serde(rename = "title", default)]
    pub label: String,

    /// Host of the page, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
}

impl CacheEntry {
    /// Build an entry. `created_at` is replaced by the write time on `put`.
    pub fn new(payload: impl Into<String>, source_identifier: impl Into<String>, label: impl Into<String>) -> Self {
        let source_identifier = source_identifier.into();
        let domain = url::Url::parse(&source_identifier)
            .ok()
            .and_then(|u| u.host_str().map(str::to_string));
        Self {
            payload: payload.into(),
            created_at: DateTime::<Utc>::default(),
            source_identifier,
            label: label.into(),
            domain,
        }
    }

    /// Whether the entry is still inside its validity window at `now`.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        (now - self.created_at).num_milliseconds() < CACHE_TTL_MS
    }

    /// When the entry stops being valid.
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.created_at + chrono::TimeDelta::milliseconds(CACHE_TTL_MS)
    }
}

/// Outcome of a sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct SweepReport {
    /// Cache keys examined.
    pub scanned: usize,
    /// Expired entries deleted.
    pub removed: usize,
    /// Entries that could not be decoded and were left alone.
    pub skipped: usize,
}

/// Summary cache over a shared key-value namespace.
#[derive(Clone)]
pub struct SummaryCache {
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
}

impl SummaryCache {
    /// Create a cache over `store` using the system clock.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_clock(store, Arc::new(SystemClock))
    }

    pub fn with_clock(store: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// The backing store, shared with settings.
    pub fn store(&self) -> &Arc<dyn KeyValueStore> {
        &self.store
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Look up an entry. Read failures and undecodable values count as a miss.
    pub async fn get(&self, key: &CacheKey) -> Option<CacheEntry> {
        let value = match self.store.get_one(key.as_str()).await {
            Ok(value) => value?,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "cache read failed, treating as miss");
                return None;
            }
        };

        match serde_json::from_value(value) {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "cache entry is malformed, treating as miss");
                None
            }
        }
    }

    /// Look up an entry and return it only while it is valid.
    pub async fn get_valid(&self, key: &CacheKey) -> Option<CacheEntry> {
        self.get(key).await.filter(|entry| self.is_valid(entry))
    }

    /// Write `entry` under `key`, stamping it with the current time.
    ///
    /// Last write wins; any existing entry is replaced.
    pub async fn put(&self, key: &CacheKey, mut entry: CacheEntry) -> Result<CacheEntry, Error> {
        entry.created_at = self.clock.now().trunc_subsecs(3);
        let value = serde_json::to_value(&entry)?;
        self.store.set_one(key.as_str(), value).await?;

        tracing::debug!(key = %key, "cached summary");
        Ok(entry)
    }

    /// Whether `entry` is still inside the TTL window.
    pub fn is_valid(&self, entry: &CacheEntry) -> bool {
        entry.is_valid_at(self.clock.now())
    }

    /// Delete the entry under `key`. Missing keys are not an error.
    pub async fn invalidate(&self, key: &CacheKey) -> Result<(), Error> {
        self.store.remove(&[key.as_str().to_string()]).await?;
        tracing::debug!(key = %key, "invalidated cache entry");
        Ok(())
    }

    /// Delete every expired cache entry.
    ///
    /// Only keys under the cache prefix are considered. Entries that fail to
    /// decode are skipped rather than aborting the sweep.
    pub async fn sweep(&self) -> Result<SweepReport, Error> {
        let all = self.store.get_all().await?;
        let now = self.clock.now();
        let mut report = SweepReport::default();
        let mut expired = Vec::new();

        for (key, value) in all {
            if !CacheKey::is_cache_key(&key) {
                continue;
            }
            report.scanned += 1;

            match serde_json::from_value::<CacheEntry>(value) {
                Ok(entry) if !entry.is_valid_at(now) => expired.push(key),
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!(key = %key, error = %e, "skipping malformed cache entry during sweep");
                    report.skipped += 1;
                }
            }
        }

        if !expired.is_empty() {
            self.store.remove(&expired).await?;
            tracing::info!(removed = expired.len(), "cleaned up expired cache entries");
        }
        report.removed = expired.len();

        Ok(report)
    }

    /// Delete every cache entry, leaving other keys alone. Returns the number removed.
    pub async fn clear_all(&self) -> Result<usize, Error> {
        let keys = self.cache_keys().await?;
        if !keys.is_empty() {
            self.store.remove(&keys).await?;
        }
        tracing::info!(removed = keys.len(), "cleared all cached summaries");
        Ok(keys.len())
    }

    /// Number of cache entries, valid or not.
    pub async fn count(&self) -> Result<usize, Error> {
        Ok(self.cache_keys().await?.len())
    }

    async fn cache_keys(&self) -> Result<Vec<String>, Error> {
        let all: std::collections::HashMap<String, Value> = self.store.get_all().await?;
        Ok(all.into_keys().filter(|k| CacheKey::is_cache_key(k)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CacheDb, KeyScope, ManualClock, MemoryStore, derive_key};
    use chrono::TimeDelta;
    use serde_json::json;
    use std::collections::HashMap;

    fn start() -> DateTime<Utc> {
        DateTime::from_timestamp_millis(1_735_689_600_000).unwrap()
    }

    fn fixture() -> (SummaryCache, Arc<ManualClock>, MemoryStore) {
        let store = MemoryStore::new();
        let clock = Arc::new(ManualClock::new(start()));
        let cache = SummaryCache::with_clock(Arc::new(store.clone()), clock.clone());
        (cache, clock, store)
    }

    fn entry(url: &str) -> CacheEntry {
        CacheEntry::new("## Summary\n- point", url, "A page")
    }

    #[tokio::test]
    async fn test_put_then_get() {
        let (cache, _, _) = fixture();
        let key = derive_key("https://example.com/articles/my-post", KeyScope::Page);

        let written = cache.put(&key, entry("https://example.com/articles/my-post")).await.unwrap();
        assert_eq!(written.created_at, start());
        assert_eq!(written.domain.as_deref(), Some("example.com"));

        let read = cache.get(&key).await.unwrap();
        assert_eq!(read, written);
        assert!(cache.is_valid(&read));
    }

    #[tokio::test]
    async fn test_get_missing_is_none() {
        let (cache, _, _) = fixture();
        let key = derive_key("https://example.com/none", KeyScope::Page);
        assert!(cache.get(&key).await.is_none());
    }

    #[tokio::test]
    async fn test_validity_boundary_is_strict() {
        let (cache, clock, _) = fixture();
        let key = derive_key("https://example.com/p", KeyScope::Page);
        cache.put(&key, entry("https://example.com/p")).await.unwrap();

        clock.advance(TimeDelta::milliseconds(CACHE_TTL_MS - 1));
        let hit = cache.get(&key).await.unwrap();
        assert!(cache.is_valid(&hit));
        assert!(cache.get_valid(&key).await.is_some());

        clock.advance(TimeDelta::milliseconds(1));
        assert!(!cache.is_valid(&hit));
        assert!(cache.get_valid(&key).await.is_none());
        // Expired entries stay readable until swept.
        assert!(cache.get(&key).await.is_some());

        let report = cache.sweep().await.unwrap();
        assert_eq!(report.removed, 1);
        assert!(cache.get(&key).await.is_none());
    }

    #[tokio::test]
    async fn test_put_overwrites_and_restamps() {
        let (cache, clock, _) = fixture();
        let key = derive_key("https://example.com/p", KeyScope::Page);
        cache.put(&key, entry("https://example.com/p")).await.unwrap();

        clock.advance(TimeDelta::hours(2));
        let mut newer = entry("https://example.com/p");
        newer.payload = "second".to_string();
        cache.put(&key, newer).await.unwrap();

        let read = cache.get(&key).await.unwrap();
        assert_eq!(read.payload, "second");
        assert_eq!(read.created_at, start() + TimeDelta::hours(2));
    }

    #[tokio::test]
    async fn test_put_truncates_to_millis() {
        let store = MemoryStore::new();
        let cache = SummaryCache::new(Arc::new(store));
        let key = derive_key("https://example.com/now", KeyScope::Page);

        let written = cache.put(&key, entry("https://example.com/now")).await.unwrap();
        let read = cache.get(&key).await.unwrap();
        assert_eq!(read.created_at, written.created_at);
    }

    #[tokio::test]
    async fn test_invalidate() {
        let (cache, _, _) = fixture();
        let key = derive_key("https://example.com/p", KeyScope::Page);
        cache.put(&key, entry("https://example.com/p")).await.unwrap();

        cache.invalidate(&key).await.unwrap();
        assert!(cache.get(&key).await.is_none());

        // Invalidating again is a no-op.
        cache.invalidate(&key).await.unwrap();
    }

    #[tokio::test]
    async fn test_sweep_removes_only_expired_cache_entries() {
        let (cache, clock, store) = fixture();
        store.set_one("summaryCount", json!(7)).await.unwrap();
        store
            .set_one("installDate", json!(start().timestamp_millis() - CACHE_TTL_MS * 10))
            .await
            .unwrap();

        let old = derive_key("https://example.com/old", KeyScope::Page);
        cache.put(&old, entry("https://example.com/old")).await.unwrap();

        clock.advance(TimeDelta::hours(20));
        let fresh = derive_key("https://example.com/fresh", KeyScope::Page);
        cache.put(&fresh, entry("https://example.com/fresh")).await.unwrap();

        clock.advance(TimeDelta::hours(5));
        let report = cache.sweep().await.unwrap();

        assert_eq!(report, SweepReport { scanned: 2, removed: 1, skipped: 0 });
        assert!(cache.get(&old).await.is_none());
        assert!(cache.get(&fresh).await.is_some());
        assert_eq!(store.get_one("summaryCount").await.unwrap(), Some(json!(7)));
        assert!(store.get_one("installDate").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_sweep_skips_malformed_entries() {
        let (cache, clock, store) = fixture();
        store
            .set_one("summary_broken.example", json!({"summary": "no timestamp"}))
            .await
            .unwrap();
        let key = derive_key("https://example.com/p", KeyScope::Page);
        cache.put(&key, entry("https://example.com/p")).await.unwrap();

        clock.advance(TimeDelta::days(2));
        let report = cache.sweep().await.unwrap();

        assert_eq!(report, SweepReport { scanned: 2, removed: 1, skipped: 1 });
        assert!(store.get_one("summary_broken.example").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_malformed_entry_reads_as_miss() {
        let (cache, _, store) = fixture();
        store.set_one("summary_example.com", json!("not an object")).await.unwrap();
        let key = derive_key("https://example.com", KeyScope::Page);
        assert!(cache.get(&key).await.is_none());
    }

    #[tokio::test]
    async fn test_clear_all_counts_only_cache_entries() {
        let (cache, _, store) = fixture();
        for path in ["a", "b", "c"] {
            let url = format!("https://example.com/{path}");
            cache.put(&derive_key(&url, KeyScope::Page), entry(&url)).await.unwrap();
        }
        store
            .set(HashMap::from([
                ("darkMode".to_string(), json!(true)),
                ("geminiApiKey".to_string(), json!("AIza-test")),
            ]))
            .await
            .unwrap();

        let removed = cache.clear_all().await.unwrap();
        assert_eq!(removed, 3);
        assert_eq!(cache.count().await.unwrap(), 0);
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn test_sweep_and_put_interleave_by_key() {
        let (cache, clock, _) = fixture();
        let stale = derive_key("https://example.com/stale", KeyScope::Page);
        cache.put(&stale, entry("https://example.com/stale")).await.unwrap();
        clock.advance(TimeDelta::days(1));

        let (report, written) = tokio::join!(cache.sweep(), async {
            let key = derive_key("https://example.com/new", KeyScope::Page);
            cache.put(&key, entry("https://example.com/new")).await.map(|_| key)
        });

        assert_eq!(report.unwrap().removed, 1);
        assert!(cache.get(&written.unwrap()).await.is_some());
    }

    #[tokio::test]
    async fn test_entry_wire_format() {
        let mut e = entry("https://example.com/p");
        e.created_at = start();
        let value = serde_json::to_value(&e).unwrap();
        assert_eq!(value["summary"], "## Summary\n- point");
        assert_eq!(value["timestamp"], json!(1_735_689_600_000i64));
        assert_eq!(value["url"], "https://example.com/p");
        assert_eq!(value["title"], "A page");
        assert_eq!(value["domain"], "example.com");
    }

    #[tokio::test]
    async fn test_works_over_sqlite() {
        let db = CacheDb::open_in_memory().await.unwrap();
        let clock = Arc::new(ManualClock::new(start()));
        let cache = SummaryCache::with_clock(Arc::new(db), clock.clone());
        let key = derive_key("https://example.com/sqlite", KeyScope::Page);

        cache.put(&key, entry("https://example.com/sqlite")).await.unwrap();
        assert!(cache.get_valid(&key).await.is_some());

        clock.advance(TimeDelta::milliseconds(CACHE_TTL_MS));
        assert_eq!(cache.sweep().await.unwrap().removed, 1);
        assert_eq!(cache.count().await.unwrap(), 0);
    }

    #[test]
    fn test_expires_at() {
        let mut e = entry("https://example.com/p");
        e.created_at = start();
        assert_eq!(e.expires_at(), start() + TimeDelta::hours(24));
    }
}
