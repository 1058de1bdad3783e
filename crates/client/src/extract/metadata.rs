//! Page metadata and language detection.

use scraper::Html;
use serde::{Deserialize, Serialize};
use url::Url;

use super::content::{full_body_text, selector};

const DEFAULT_LANGUAGE: &str = "en";

/// Hosts like `tr.wikipedia.org` name their language in the first label.
const LANGUAGE_SUBDOMAINS: &[&str] = &[
    "tr", "en", "de", "fr", "es", "it", "pt", "ru", "ja", "ko", "zh", "ar", "hi", "th", "vi",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PageMetadata {
    pub title: String,
    pub url: String,
    pub domain: String,
    pub description: String,
    pub author: String,
    pub publish_date: String,
    /// Words in the whole body, boilerplate included.
    pub word_count: usize,
    /// Language tag as declared by the page, e.g. `en-US`.
    pub language: String,
}

/// Read metadata from `html` served at `url`.
pub fn page_metadata(html: &str, url: &Url) -> PageMetadata {
    let document = Html::parse_document(html);
    metadata_of(&document, url)
}

pub(crate) fn metadata_of(document: &Html, url: &Url) -> PageMetadata {
    let title = selector("title")
        .and_then(|sel| document.select(&sel).next())
        .map(|t| t.text().collect::<String>().trim().to_string())
        .unwrap_or_default();

    let publish_date = meta_content(document, "article:published_time")
        .or_else(|| meta_content(document, "date"))
        .unwrap_or_default();

    PageMetadata {
        title,
        url: url.to_string(),
        domain: url.host_str().unwrap_or_default().to_string(),
        description: meta_content(document, "description").unwrap_or_default(),
        author: meta_content(document, "author").unwrap_or_default(),
        publish_date,
        word_count: full_body_text(document).split_whitespace().count(),
        language: detect_language(document, url),
    }
}

/// Page language, from the first source that has one:
///
/// 1. `<html lang>`
/// 2. `<meta name|property="language">`
/// 3. `<meta name|property="content-language">`
/// 4. A known language subdomain
/// 5. `en`
pub fn detect_language(document: &Html, url: &Url) -> String {
    let html_lang = selector("html")
        .and_then(|sel| document.select(&sel).next())
        .and_then(|el| el.value().attr("lang"))
        .map(str::trim)
        .filter(|lang| !lang.is_empty())
        .map(str::to_string);

    html_lang
        .or_else(|| meta_content(document, "language"))
        .or_else(|| meta_content(document, "content-language"))
        .or_else(|| language_from_host(url))
        .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string())
}

fn language_from_host(url: &Url) -> Option<String> {
    let first_label = url.host_str()?.split('.').next()?;
    LANGUAGE_SUBDOMAINS
        .contains(&first_label)
        .then(|| first_label.to_string())
}

/// `content` of the first `<meta>` whose `name` or `property` is `name`. Blank values count as absent.
fn meta_content(document: &Html, name: &str) -> Option<String> {
    let sel = selector(&format!("meta[name=\"{name}\"], meta[property=\"{name}\"]"))?;
    document
        .select(&sel)
        .next()
        .and_then(|meta| meta.value().attr("content"))
        .map(str::trim)
        .filter(|content| !content.is_empty())
        .map(str::to_string)
}
