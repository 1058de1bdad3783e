//! URL canonicalization for page fetches.

/// Error type for URL canonicalization failures.
#[derive(Debug, Clone, thiserror::Error)]
pub enum UrlError {
    #[error("empty URL")]
    Empty,

    /// Browser-internal and other non-web pages cannot be summarized.
    #[error("unsupported scheme: {0}")]
    UnsupportedScheme(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("URL has no host")]
    MissingHost,
}

/// Canonicalize a page URL before fetching it.
///
/// 1. Trim surrounding whitespace
/// 2. Default the scheme to `https://` when none is given
/// 3. Reject anything that is not `http` or `https`
/// 4. Lowercase the host
/// 5. Drop the fragment, which is never sent to the server
///
/// The query string is kept as-is. Cache keys are derived from the URL the
/// caller gave, not from this form, so fragments still separate cache entries.
pub fn canonicalize(input: &str) -> Result<url::Url, UrlError> {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return Err(UrlError::Empty);
    }

    let url_str = if trimmed.contains("://") || has_opaque_scheme(trimmed) {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    };

    let mut parsed = url::Url::parse(&url_str).map_err(|e| UrlError::InvalidUrl(e.to_string()))?;

    match parsed.scheme() {
        "http" | "https" => {}
        scheme => return Err(UrlError::UnsupportedScheme(scheme.to_string())),
    }

    let host = parsed.host_str().ok_or(UrlError::MissingHost)?.to_lowercase();
    parsed
        .set_host(Some(&host))
        .map_err(|e| UrlError::InvalidUrl(e.to_string()))?;

    parsed.set_fragment(None);

    Ok(parsed)
}

/// `about:blank`, `data:...` and friends have no `//` but are still schemed.
fn has_opaque_scheme(input: &str) -> bool {
    matches!(input.split_once(':'), Some((scheme, _)) if matches!(scheme, "about" | "data" | "javascript" | "mailto"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonicalize_default_scheme() {
        let url = canonicalize("example.com/post").unwrap();
        assert_eq!(url.scheme(), "https");
        assert_eq!(url.as_str(), "https://example.com/post");
    }

    #[test]
    fn test_canonicalize_lowercase_host() {
        let url = canonicalize("https://News.EXAMPLE.org/Story").unwrap();
        assert_eq!(url.host_str(), Some("news.example.org"));
        assert_eq!(url.path(), "/Story");
    }

    #[test]
    fn test_canonicalize_drops_fragment_keeps_query() {
        let url = canonicalize("https://example.com/a?x=1&y=2#comments").unwrap();
        assert_eq!(url.fragment(), None);
        assert_eq!(url.query(), Some("x=1&y=2"));
    }

    #[test]
    fn test_canonicalize_trim_whitespace() {
        let url = canonicalize("  https://example.com  ").unwrap();
        assert_eq!(url.as_str(), "https://example.com/");
    }

    #[test]
    fn test_canonicalize_rejects_browser_pages() {
        for input in ["chrome://settings", "chrome-extension://abcdef/popup.html", "about:blank", "file:///etc/hosts"] {
            assert!(
                matches!(canonicalize(input), Err(UrlError::UnsupportedScheme(_))),
                "{input} should be rejected"
            );
        }
    }

    #[test]
    fn test_canonicalize_empty() {
        assert!(matches!(canonicalize(""), Err(UrlError::Empty)));
        assert!(matches!(canonicalize("   "), Err(UrlError::Empty)));
    }

    #[test]
    fn test_canonicalize_http_allowed() {
        let url = canonicalize("http://example.com").unwrap();
        assert_eq!(url.scheme(), "http");
    }
}
