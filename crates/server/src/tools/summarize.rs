//! summarize_page tool implementation.
//!
//! Cache first: a valid entry under the page key is returned as-is. On a miss
//! (or with `force_refresh`) the page is extracted, summarized in its own
//! language and written back to the cache.

use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use sumlify_client::prompt::{build_prompt, language_name};
use sumlify_core::{CacheEntry, Error, KeyScope, derive_key, settings};

use super::{json_result, page_html, page_identity};
use crate::handler::AppState;

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SummarizePageParams {
    /// The page URL. Also the cache identity, fragment and query included.
    pub url: String,

    /// Page HTML as the caller sees it. When absent the page is fetched.
    #[serde(default)]
    pub html: Option<String>,

    /// Ignore any cached summary and produce a new one.
    #[serde(default)]
    pub force_refresh: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SummarizePageOutput {
    pub cache_key: String,
    /// The summary as Markdown.
    pub summary: String,
    /// The summary rendered to HTML.
    pub summary_html: String,
    /// Whether the summary came from the cache.
    pub cached: bool,
    /// When the summary was produced, milliseconds since the Unix epoch.
    pub created_at: i64,
    pub expires_at: i64,
    pub title: String,
    /// Detected page language, absent for cached summaries.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

impl SummarizePageOutput {
    fn new(state: &AppState, cache_key: String, entry: &CacheEntry, cached: bool, language: Option<String>) -> Self {
        Self {
            cache_key,
            summary_html: state.renderer.render(&entry.payload),
            summary: entry.payload.clone(),
            cached,
            created_at: entry.created_at.timestamp_millis(),
            expires_at: entry.expires_at().timestamp_millis(),
            title: entry.label.clone(),
            language,
        }
    }
}

pub async fn summarize_impl(state: &AppState, params: SummarizePageParams) -> Result<CallToolResult, McpError> {
    let page = page_identity(&params.url)?;
    let url = page.as_str();
    let key = derive_key(url, KeyScope::Page);

    if !params.force_refresh
        && let Some(entry) = state.cache.get_valid(&key).await
    {
        tracing::debug!(%key, "serving cached summary");
        return json_result(&SummarizePageOutput::new(state, key.into_string(), &entry, true, None));
    }

    let (page_url, html) = page_html(state, &page, params.html).await?;
    let extracted = state.extractor.extract(&html, &page_url)?;

    let chars = extracted.text.chars().count();
    if chars < state.config.min_content_chars {
        return Err(Error::InsufficientContent(format!(
            "page has {chars} characters of text, at least {} are needed",
            state.config.min_content_chars
        ))
        .into());
    }

    let summarizer = state.summarizer()?;
    let language = extracted.metadata.language.clone();
    tracing::info!(%url, language = language_name(&language), chars, "summarizing page");

    let prompt = build_prompt(&language, &extracted.text, state.config.max_prompt_chars);
    let summary = summarizer.summarize(&prompt).await?;

    let entry = CacheEntry::new(summary, url, extracted.metadata.title.clone());
    let entry = match state.cache.put(&key, entry.clone()).await {
        Ok(written) => written,
        Err(e) => {
            tracing::warn!(%key, error = %e, "failed to cache summary");
            CacheEntry { created_at: state.cache.now(), ..entry }
        }
    };

    if let Err(e) = settings::increment_summary_count(state.cache.store().as_ref()).await {
        tracing::warn!(error = %e, "failed to update summary count");
    }

    json_result(&SummarizePageOutput::new(state, key.into_string(), &entry, false, Some(language)))
}
