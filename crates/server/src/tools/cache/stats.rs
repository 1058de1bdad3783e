//! cache_stats tool implementation.

use rmcp::{ErrorData as McpError, model::CallToolResult};
use sumlify_core::settings;

use crate::handler::{AppState, VERSION};
use crate::tools::json_result;

pub async fn stats_impl(state: &AppState) -> Result<CallToolResult, McpError> {
    let stats = settings::stats(&state.cache, VERSION).await?;
    json_result(&stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::testing::{harness, output, start};
    use sumlify_core::{CacheEntry, KeyScope, Stats, derive_key};

    #[tokio::test]
    async fn test_stats_after_launch() {
        let h = harness();
        settings::record_launch(&h.store, VERSION, start()).await.unwrap();
        settings::increment_summary_count(&h.store).await.unwrap();
        settings::increment_summary_count(&h.store).await.unwrap();
        for url in ["https://a.example/", "https://b.example/"] {
            h.state
                .cache
                .put(&derive_key(url, KeyScope::Page), CacheEntry::new("s", url, ""))
                .await
                .unwrap();
        }

        let stats: Stats = output(&stats_impl(&h.state).await.unwrap());
        assert_eq!(stats.summary_count, 2);
        assert_eq!(stats.cached_summaries, 2);
        assert_eq!(stats.install_date, start().timestamp_millis());
        assert_eq!(stats.version, VERSION);
    }
}
