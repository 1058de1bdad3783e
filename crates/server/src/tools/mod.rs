//! MCP tool implementations.
//!
//! Each tool takes the shared [`AppState`](crate::handler::AppState) and its
//! parameters, and returns pretty-printed JSON as text content.

pub mod cache;
pub mod content_check;
pub mod summarize;
pub mod web_extract;

pub use content_check::ContentCheckParams;
pub use summarize::SummarizePageParams;
pub use web_extract::WebExtractParams;

use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use serde::Serialize;
use sumlify_client::fetch::canonicalize;
use sumlify_core::Error;
use url::Url;

use crate::handler::AppState;

pub(crate) fn json_result<T: Serialize>(output: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(output).map_err(Error::from)?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

/// The URL a page is cached and tracked under.
///
/// Canonical form (scheme defaulted to https, host lowercased) with the
/// caller's fragment kept. Fragments separate page-scope entries.
pub(crate) fn page_identity(url: &str) -> Result<Url, Error> {
    let url = url.trim();
    if url.is_empty() {
        return Err(Error::InvalidInput("url cannot be empty".into()));
    }

    let mut identity = canonicalize(url).map_err(|e| Error::InvalidUrl(e.to_string()))?;
    if let Some((_, fragment)) = url.split_once('#')
        && !fragment.is_empty()
    {
        identity.set_fragment(Some(fragment));
    }
    Ok(identity)
}

/// HTML for `page`: the caller's copy when given, otherwise fetched.
pub(crate) async fn page_html(state: &AppState, page: &Url, html: Option<String>) -> Result<(Url, String), Error> {
    match html {
        Some(html) => {
            let mut page_url = page.clone();
            page_url.set_fragment(None);
            Ok((page_url, html))
        }
        None => {
            let response = state.fetcher.fetch(page.as_str()).await?;
            if !response.is_html() {
                tracing::warn!(url = %page, content_type = ?response.content_type, "page is not HTML, extracting anyway");
            }
            let text = response.text();
            Ok((response.final_url, text))
        }
    }
}
