//! Readable content extraction.
//!
//! ### Main content
//! - Boilerplate (scripts, navigation, ads, sidebars, comment and cookie
//!   blocks) is excluded from the text.
//! - Content containers are tried in priority order (`main`, `article`,
//!   `[role="main"]`, ...); the first with more than 200 characters wins,
//!   otherwise the whole body is used.
//! - Whitespace is collapsed to single spaces.
//!
//! ### Metadata
//! - Title, description, author, publish date, word count and the page
//!   language (see [`detect_language`]).
//!
//! ### Stable Abstraction
//! - Tools depend on the `Extractor` trait, not on scraper.

pub mod content;
pub mod metadata;
pub mod status;

pub use content::{collapse_whitespace, extract_main_content};
pub use metadata::{PageMetadata, detect_language, page_metadata};
pub use status::{ContentStatus, content_status};

use scraper::Html;
use serde::Serialize;
use sumlify_core::Error;
use url::Url;

/// Everything extracted from one page.
#[derive(Debug, Clone, Serialize, schemars::JsonSchema)]
pub struct ExtractedPage {
    /// Main content text, whitespace collapsed.
    pub text: String,
    pub metadata: PageMetadata,
    pub status: ContentStatus,
}

/// Stable extractor trait for content extraction.
pub trait Extractor: Send + Sync {
    fn extract(&self, html: &str, url: &Url) -> Result<ExtractedPage, Error>;
}

/// Extractor over the scraper HTML parser.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScraperExtractor;

impl ScraperExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Extractor for ScraperExtractor {
    fn extract(&self, html: &str, url: &Url) -> Result<ExtractedPage, Error> {
        if html.trim().is_empty() {
            return Err(Error::ExtractFailed("document is empty".into()));
        }

        let document = Html::parse_document(html);
        let text = content::main_content(&document);
        let metadata = metadata::metadata_of(&document, url);
        let status = content_status(&text);

        tracing::debug!(
            %url,
            chars = status.content_length,
            words = status.word_count,
            language = %metadata.language,
            "extracted page"
        );

        Ok(ExtractedPage { text, metadata, status })
    }
}
