//! Client code for sumlify.
//!
//! Page fetching, main-content extraction, prompt construction, the Gemini
//! summary producer and summary rendering. Used by the MCP server.

pub mod extract;
pub mod fetch;
pub mod gemini;
pub mod prompt;
pub mod render;

pub use extract::{
    ContentStatus, ExtractedPage, Extractor, PageMetadata, ScraperExtractor, content_status, extract_main_content,
    page_metadata,
};
pub use fetch::{FetchClient, FetchConfig, FetchResponse};
pub use gemini::{GeminiClient, GeminiConfig, GeminiError, Summarizer};
pub use prompt::{build_prompt, language_name};
pub use render::MarkdownRenderer;
