//! cache_purge tool implementation.
//!
//! Removes one page's summary, every expired summary, or every summary.
//! Settings stored alongside the cache are never removed.

use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use sumlify_core::{Error, KeyScope, KeyValueStore, derive_key};

use crate::handler::AppState;
use crate::tools::{json_result, page_identity};

/// Parameters for the cache_purge tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CachePurgeParams {
    /// Remove the summary cached for this URL.
    pub url: Option<String>,

    /// Key scope used with `url`.
    #[serde(default)]
    pub scope: KeyScope,

    /// Remove every summary older than 24 hours.
    #[serde(default)]
    pub expired: bool,

    /// Remove every cached summary.
    #[serde(default)]
    pub all: bool,
}

/// Output from the cache_purge tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CachePurgeOutput {
    /// Number of entries deleted.
    pub deleted: usize,
    /// Entries the expiry sweep could not decode and left in place.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub skipped: usize,
}

fn is_zero(n: &usize) -> bool {
    *n == 0
}

pub async fn purge_impl(state: &AppState, params: CachePurgeParams) -> Result<CallToolResult, McpError> {
    if params.url.is_none() && !params.expired && !params.all {
        return Err(Error::InvalidInput("At least one of url, expired, or all must be specified".to_string()).into());
    }

    let mut output = CachePurgeOutput { deleted: 0, skipped: 0 };

    if params.all {
        output.deleted = state.cache.clear_all().await?;
        tracing::info!(deleted = output.deleted, "cleared summary cache");
        return json_result(&output);
    }

    if let Some(url) = params.url.as_deref() {
        let key = derive_key(page_identity(url)?.as_str(), params.scope);
        // Raw lookup: entries that no longer decode are removed too.
        let present = state.cache.store().get_one(key.as_str()).await?.is_some();
        state.cache.invalidate(&key).await?;
        if present {
            output.deleted += 1;
        }
    }

    if params.expired {
        let report = state.cache.sweep().await?;
        output.deleted += report.removed;
        output.skipped = report.skipped;
    }

    json_result(&output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::testing::{Harness, harness, output};
    use chrono::TimeDelta;
    use serde_json::json;
    use sumlify_core::CacheEntry;

    async fn seed(h: &Harness, url: &str) {
        h.state
            .cache
            .put(&derive_key(url, KeyScope::Page), CacheEntry::new("s", url, ""))
            .await
            .unwrap();
    }

    fn params() -> CachePurgeParams {
        CachePurgeParams { url: None, scope: KeyScope::Page, expired: false, all: false }
    }

    #[tokio::test]
    async fn test_purge_requires_a_criterion() {
        let h = harness();
        let err = purge_impl(&h.state, params()).await.unwrap_err();
        assert_eq!(err.code.0, -32602);
    }

    #[tokio::test]
    async fn test_purge_url() {
        let h = harness();
        seed(&h, "https://example.com/a").await;
        seed(&h, "https://example.com/b").await;

        let p = CachePurgeParams { url: Some("https://example.com/a".into()), ..params() };
        let out: CachePurgeOutput = output(&purge_impl(&h.state, p.clone()).await.unwrap());
        assert_eq!(out.deleted, 1);
        assert_eq!(h.state.cache.count().await.unwrap(), 1);

        let again: CachePurgeOutput = output(&purge_impl(&h.state, p).await.unwrap());
        assert_eq!(again.deleted, 0);
    }

    #[tokio::test]
    async fn test_purge_url_removes_malformed_entry() {
        let h = harness();
        h.store.set_one("summary_example.com/p", json!("garbage")).await.unwrap();

        let p = CachePurgeParams { url: Some("example.com/p".into()), ..params() };
        let out: CachePurgeOutput = output(&purge_impl(&h.state, p).await.unwrap());
        assert_eq!(out.deleted, 1);
        assert_eq!(h.store.get_one("summary_example.com/p").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_purge_expired() {
        let h = harness();
        seed(&h, "https://example.com/old").await;
        h.clock.advance(TimeDelta::hours(25));
        seed(&h, "https://example.com/new").await;

        let p = CachePurgeParams { expired: true, ..params() };
        let out: CachePurgeOutput = output(&purge_impl(&h.state, p).await.unwrap());
        assert_eq!(out.deleted, 1);
        assert_eq!(out.skipped, 0);
        assert!(h.state.cache.get(&derive_key("https://example.com/new", KeyScope::Page)).await.is_some());
    }

    #[tokio::test]
    async fn test_purge_all_keeps_settings() {
        let h = harness();
        seed(&h, "https://example.com/a").await;
        seed(&h, "https://example.com/b").await;
        h.store.set_one("summaryCount", json!(7)).await.unwrap();

        let p = CachePurgeParams { all: true, ..params() };
        let out: CachePurgeOutput = output(&purge_impl(&h.state, p).await.unwrap());
        assert_eq!(out.deleted, 2);
        assert_eq!(h.store.get_one("summaryCount").await.unwrap(), Some(json!(7)));
    }
}
