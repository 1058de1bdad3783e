//! web_extract tool implementation.
//!
//! Runs the same main-content extraction used for summaries over HTML the
//! client provides. No network I/O is performed.

use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use sumlify_client::{ExtractedPage, fetch::canonicalize, language_name};
use sumlify_core::Error;
use url::Url;

use super::json_result;
use crate::handler::AppState;

/// Input parameters for web_extract tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct WebExtractParams {
    /// The raw HTML content to extract from.
    pub html: String,

    /// URL the HTML was loaded from. Used for the domain and language fallback.
    #[serde(default)]
    pub url: Option<String>,
}

/// Output structure for web_extract tool.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct WebExtractOutput {
    #[serde(flatten)]
    pub page: ExtractedPage,
    /// English name of the detected language.
    pub language_name: &'static str,
}

pub async fn extract_impl(state: &AppState, params: WebExtractParams) -> Result<CallToolResult, McpError> {
    if params.html.trim().is_empty() {
        return Err(Error::InvalidInput("html cannot be empty".into()).into());
    }

    let url = match params.url.as_deref().map(str::trim).filter(|u| !u.is_empty()) {
        Some(raw) => canonicalize(raw).map_err(|e| Error::InvalidUrl(e.to_string()))?,
        None => Url::parse("about:blank").map_err(|e| Error::InvalidUrl(e.to_string()))?,
    };

    let page = state.extractor.extract(&params.html, &url)?;
    let output = WebExtractOutput { language_name: language_name(&page.metadata.language), page };
    json_result(&output)
}
