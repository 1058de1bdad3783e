//! cache_get tool implementation.

use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use sumlify_core::{CacheEntry, Error, KeyScope, derive_key};

use crate::handler::AppState;
use crate::tools::{json_result, page_identity};

/// Parameters for the cache_get tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheGetParams {
    /// URL whose summary to look up.
    pub url: String,

    /// `page` (default) keys on host, path, query and fragment; `path` on host and path only.
    #[serde(default)]
    pub scope: KeyScope,
}

/// Output from the cache_get tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheGetOutput {
    pub cache_key: String,
    pub entry: CacheEntry,
    /// Whether the entry is younger than 24 hours.
    pub valid: bool,
    /// Milliseconds since the Unix epoch.
    pub expires_at: i64,
}

/// Expired entries are still returned, flagged `valid: false`, until a sweep removes them.
pub async fn get_impl(state: &AppState, params: CacheGetParams) -> Result<CallToolResult, McpError> {
    let page = page_identity(&params.url)?;
    let url = page.as_str();
    let key = derive_key(url, params.scope);

    let Some(entry) = state.cache.get(&key).await else {
        return Err(Error::CacheMiss(format!("no cached summary for {url} (key {key})")).into());
    };

    let output = CacheGetOutput {
        valid: state.cache.is_valid(&entry),
        expires_at: entry.expires_at().timestamp_millis(),
        cache_key: key.into_string(),
        entry,
    };
    json_result(&output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::testing::{harness, output, start};
    use chrono::TimeDelta;

    #[tokio::test]
    async fn test_cache_get_hit() {
        let h = harness();
        let url = "https://example.com/a?x=1";
        let key = derive_key(url, KeyScope::Page);
        h.state.cache.put(&key, CacheEntry::new("sum", url, "A")).await.unwrap();

        let params = CacheGetParams { url: url.into(), scope: KeyScope::Page };
        let out: CacheGetOutput = output(&get_impl(&h.state, params).await.unwrap());
        assert_eq!(out.cache_key, "summary_example.com/a?x=1");
        assert_eq!(out.entry.payload, "sum");
        assert_eq!(out.entry.domain.as_deref(), Some("example.com"));
        assert!(out.valid);
        assert_eq!(out.expires_at, (start() + TimeDelta::days(1)).timestamp_millis());
    }

    #[tokio::test]
    async fn test_cache_get_expired_is_flagged() {
        let h = harness();
        let url = "https://example.com/a";
        h.state
            .cache
            .put(&derive_key(url, KeyScope::Page), CacheEntry::new("sum", url, "A"))
            .await
            .unwrap();
        h.clock.advance(TimeDelta::days(2));

        let params = CacheGetParams { url: url.into(), scope: KeyScope::Page };
        let out: CacheGetOutput = output(&get_impl(&h.state, params).await.unwrap());
        assert!(!out.valid);
    }

    #[tokio::test]
    async fn test_cache_get_scopes_differ() {
        let h = harness();
        let url = "https://example.com/a?x=1";
        h.state
            .cache
            .put(&derive_key(url, KeyScope::Page), CacheEntry::new("sum", url, "A"))
            .await
            .unwrap();

        let params = CacheGetParams { url: url.into(), scope: KeyScope::Path };
        let err = get_impl(&h.state, params).await.unwrap_err();
        assert_eq!(err.code.0, -32001);
    }

    #[tokio::test]
    async fn test_cache_get_scheme_less_url() {
        let h = harness();
        let url = "https://example.com/guide";
        h.state
            .cache
            .put(&derive_key(url, KeyScope::Page), CacheEntry::new("sum", url, "Guide"))
            .await
            .unwrap();

        let params = CacheGetParams { url: "example.com/guide".into(), scope: KeyScope::Page };
        let out: CacheGetOutput = output(&get_impl(&h.state, params).await.unwrap());
        assert_eq!(out.cache_key, "summary_example.com/guide");

        let params = CacheGetParams { url: "example.com/other".into(), scope: KeyScope::Page };
        assert_eq!(get_impl(&h.state, params).await.unwrap_err().code.0, -32001);
    }

    #[tokio::test]
    async fn test_cache_get_miss() {
        let h = harness();
        let params = CacheGetParams { url: "https://nowhere.example/".into(), scope: KeyScope::default() };
        let err = get_impl(&h.state, params).await.unwrap_err();
        assert_eq!(err.code.0, -32001);
    }
}
