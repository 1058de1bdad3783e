//! MCP server handler implementation.
//!
//! Holds the shared state and routes tool calls to the implementations in
//! [`crate::tools`].
use std::sync::Arc;

use crate::tools::{
    ContentCheckParams, SummarizePageParams, WebExtractParams,
    cache::{CacheGetParams, CachePurgeParams},
};

use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{
        tool::{ToolCallContext, ToolRouter},
        wrapper::Parameters,
    },
    model::{
        CallToolRequestParam, CallToolResult, Implementation, ListToolsResult, PaginatedRequestParam, ProtocolVersion,
        ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
    tool, tool_router,
};
use sumlify_client::{Extractor, FetchClient, FetchConfig, MarkdownRenderer, ScraperExtractor, Summarizer};
use sumlify_core::{AppConfig, ChangeTracker, Error, SummaryCache};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Everything a tool call needs.
pub struct AppState {
    pub config: AppConfig,
    pub cache: SummaryCache,
    pub tracker: ChangeTracker,
    pub fetcher: FetchClient,
    pub extractor: Arc<dyn Extractor>,
    /// `None` when no API key is configured; summarizing then fails with `MISSING_API_KEY`.
    pub summarizer: Option<Arc<dyn Summarizer>>,
    pub renderer: MarkdownRenderer,
}

impl AppState {
    pub fn new(config: AppConfig, cache: SummaryCache, summarizer: Option<Arc<dyn Summarizer>>) -> Result<Self, Error> {
        let fetcher = FetchClient::new(FetchConfig::from(&config))?;
        Ok(Self {
            config,
            cache,
            tracker: ChangeTracker::new(),
            fetcher,
            extractor: Arc::new(ScraperExtractor::new()),
            summarizer,
            renderer: MarkdownRenderer::new()?,
        })
    }

    pub fn summarizer(&self) -> Result<&dyn Summarizer, Error> {
        self.summarizer
            .as_deref()
            .ok_or_else(|| Error::MissingApiKey("set SUMLIFY_GEMINI_API_KEY to enable summaries".into()))
    }
}

#[derive(Clone)]
pub struct SumlifyServer {
    state: Arc<AppState>,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl SumlifyServer {
    pub fn new(state: AppState) -> Self {
        Self { state: Arc::new(state), tool_router: Self::tool_router() }
    }

    #[tool(
        description = "Summarize a web page. Returns the cached summary while it is less than 24 hours old; \
                       otherwise extracts the main content, asks Gemini for a summary in the page's language \
                       and caches it. Pass `html` to skip fetching; set `force_refresh` to bypass the cache."
    )]
    async fn summarize_page(&self, params: Parameters<SummarizePageParams>) -> Result<CallToolResult, McpError> {
        crate::tools::summarize::summarize_impl(&self.state, params.0).await
    }

    #[tool(description = "Look up the cached summary for a URL, with its age and validity.")]
    async fn cache_get(&self, params: Parameters<CacheGetParams>) -> Result<CallToolResult, McpError> {
        crate::tools::cache::get_impl(&self.state, params.0).await
    }

    #[tool(
        description = "Delete cached summaries: the entry for `url`, all `expired` entries, or `all` entries. \
                       Settings are never touched."
    )]
    async fn cache_purge(&self, params: Parameters<CachePurgeParams>) -> Result<CallToolResult, McpError> {
        crate::tools::cache::purge_impl(&self.state, params.0).await
    }

    #[tool(description = "Usage statistics: summaries produced, cached summaries, install date and version.")]
    async fn cache_stats(&self) -> Result<CallToolResult, McpError> {
        crate::tools::cache::stats_impl(&self.state).await
    }

    #[tool(
        description = "Fingerprint a page's main text and compare it with the previous check. When it changed, \
                       the page's cached summaries are invalidated."
    )]
    async fn content_check(&self, params: Parameters<ContentCheckParams>) -> Result<CallToolResult, McpError> {
        crate::tools::content_check::check_impl(&self.state, params.0).await
    }

    #[tool(
        description = "Extract main text, metadata and a content-sufficiency check from HTML. No network requests \
                       are made."
    )]
    async fn web_extract(&self, params: Parameters<WebExtractParams>) -> Result<CallToolResult, McpError> {
        crate::tools::web_extract::extract_impl(&self.state, params.0).await
    }
}

impl ServerHandler for SumlifyServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation { name: "sumlify".into(), version: VERSION.into(), ..Default::default() },
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            instructions: Some(
                "Summarizes web pages with Gemini and caches summaries for 24 hours per page URL.".into(),
            ),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self, _request: Option<PaginatedRequestParam>, _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, rmcp::model::ErrorData> {
        Ok(ListToolsResult { meta: None, tools: self.tool_router.list_all(), next_cursor: None })
    }

    async fn call_tool(
        &self, request: CallToolRequestParam, context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, rmcp::model::ErrorData> {
        self.tool_router
            .call(ToolCallContext::new(self, request, context))
            .await
    }
}
