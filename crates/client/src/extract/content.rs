//! Main-content text extraction.
//!
//! Boilerplate elements (navigation, ads, sidebars, comment sections) are
//! excluded, then the first content container with enough text wins. Falls
//! back to the whole body.

use scraper::{ElementRef, Html, Node, Selector, node::Element};

/// Elements never considered part of the main content.
pub const UNWANTED_SELECTORS: &[&str] = &[
    "script",
    "style",
    "nav",
    "header",
    "footer",
    "aside",
    ".advertisement",
    ".ads",
    ".popup",
    ".sidebar",
    "[class*=\"ad-\"]",
    "[id*=\"ad-\"]",
    "[class*=\"sidebar\"]",
    ".comments",
    ".comment-section",
    ".social-media",
    ".cookie-banner",
    ".newsletter-signup",
];

/// Content containers, most specific first.
pub const CONTENT_SELECTORS: &[&str] = &[
    "main",
    "article",
    "[role=\"main\"]",
    ".main-content",
    ".content",
    ".post-content",
    ".entry-content",
    ".article-content",
    "body",
];

/// A container needs more than this many characters to be chosen.
pub const MIN_CONTAINER_CHARS: usize = 200;

const BLOCK_TAGS: &[&str] = &[
    "address", "article", "blockquote", "br", "dd", "div", "dl", "dt", "figcaption", "figure", "form", "h1", "h2",
    "h3", "h4", "h5", "h6", "hr", "li", "main", "ol", "p", "pre", "section", "table", "td", "th", "tr", "ul",
];

pub(crate) fn selector(css: &str) -> Option<Selector> {
    match Selector::parse(css) {
        Ok(s) => Some(s),
        Err(e) => {
            tracing::warn!(selector = css, error = %e, "ignoring unparseable selector");
            None
        }
    }
}

/// Extract the readable main text of an HTML document.
///
/// Whitespace runs are collapsed to single spaces. Returns an empty string for
/// documents without text.
pub fn extract_main_content(html: &str) -> String {
    let document = Html::parse_document(html);
    main_content(&document)
}

pub(crate) fn main_content(document: &Html) -> String {
    let removed = removed_nodes(document);

    for css in CONTENT_SELECTORS {
        let Some(sel) = selector(css) else { continue };
        let Some(container) = document.select(&sel).find(|el| !is_removed(el, &removed)) else {
            continue;
        };

        let text = visible_text(container, &removed);
        if text.chars().count() > MIN_CONTAINER_CHARS {
            tracing::trace!(selector = css, chars = text.len(), "selected content container");
            return text;
        }
    }

    body_text(document, &removed)
}

/// All visible body text, boilerplate included. Used for page-level word counts.
pub(crate) fn full_body_text(document: &Html) -> String {
    body_text(document, &[])
}

fn body_text(document: &Html, removed: &[ElementRef<'_>]) -> String {
    selector("body")
        .and_then(|sel| document.select(&sel).next())
        .map(|body| visible_text(body, removed))
        .unwrap_or_default()
}

fn removed_nodes(document: &Html) -> Vec<ElementRef<'_>> {
    let Some(sel) = selector(&UNWANTED_SELECTORS.join(", ")) else {
        return Vec::new();
    };
    document.select(&sel).collect()
}

fn is_removed(element: &ElementRef<'_>, removed: &[ElementRef<'_>]) -> bool {
    removed.contains(element)
        || element
            .ancestors()
            .filter_map(ElementRef::wrap)
            .any(|a| removed.contains(&a))
}

/// Text of `root` with removed subtrees skipped and whitespace collapsed.
fn visible_text(root: ElementRef<'_>, removed: &[ElementRef<'_>]) -> String {
    let mut raw = String::new();
    collect_text(root, removed, &mut raw);
    collapse_whitespace(&raw)
}

fn collect_text(element: ElementRef<'_>, removed: &[ElementRef<'_>], out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(el) => {
                let Some(child_ref) = ElementRef::wrap(child) else { continue };
                if removed.contains(&child_ref) {
                    continue;
                }
                let block = is_block(el);
                if block {
                    out.push(' ');
                }
                collect_text(child_ref, removed, out);
                if block {
                    out.push(' ');
                }
            }
            _ => {}
        }
    }
}

fn is_block(el: &Element) -> bool {
    BLOCK_TAGS.contains(&el.name())
}

/// Collapse every whitespace run to one space and trim the ends.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
