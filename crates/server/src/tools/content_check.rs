//! content_check tool implementation.
//!
//! Fingerprints a page's main text and compares it with the fingerprint from
//! the previous check of the same URL. A change drops the page's cached
//! summaries under both key scopes so the next summary reflects the new text.

use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use sumlify_core::{ContentFingerprint, KeyScope, derive_key};

use super::{json_result, page_html, page_identity};
use crate::handler::AppState;

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ContentCheckParams {
    pub url: String,

    /// Current page HTML. When absent the page is fetched.
    #[serde(default)]
    pub html: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ContentCheckOutput {
    pub fingerprint: String,
    /// False on the first check of a URL.
    pub changed: bool,
    /// Cache keys removed because the content changed.
    pub invalidated: Vec<String>,
}

pub async fn check_impl(state: &AppState, params: ContentCheckParams) -> Result<CallToolResult, McpError> {
    let page = page_identity(&params.url)?;
    let url = page.as_str();
    let (page_url, html) = page_html(state, &page, params.html).await?;
    let extracted = state.extractor.extract(&html, &page_url)?;

    let fingerprint = ContentFingerprint::of(&extracted.text);
    let changed = state.tracker.observe(url, &fingerprint).await;

    let mut invalidated = Vec::new();
    if changed {
        for scope in [KeyScope::Page, KeyScope::Path] {
            let key = derive_key(url, scope);
            if invalidated.iter().any(|k| k == key.as_str()) {
                continue;
            }
            state.cache.invalidate(&key).await?;
            invalidated.push(key.into_string());
        }
        tracing::info!(%url, %fingerprint, keys = ?invalidated, "page content changed, cached summaries dropped");
    }

    json_result(&ContentCheckOutput { fingerprint: fingerprint.to_string(), changed, invalidated })
}
