//! Cache-key derivation from page URLs.
//!
//! Keys live in a namespace shared with unrelated settings, so every summary
//! key starts with [`CACHE_PREFIX`]. Long URLs are folded into a short base-36
//! hash so the key length stays bounded.

use std::fmt;

use serde::{Deserialize, Serialize};
use url::Url;

use super::hash::short_hash;

/// Prefix shared by every summary cache key.
pub const CACHE_PREFIX: &str = "summary_";

/// Page keys hash the path + query + fragment once it exceeds this many characters.
const PAGE_THRESHOLD: usize = 50;

/// Path keys hash the path once the whole key exceeds this many characters.
const PATH_THRESHOLD: usize = 100;

const FALLBACK_HOST: &str = "unknown";

/// Granularity of a derived key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum KeyScope {
    /// Host, path, query and fragment: one entry per distinct page view.
    #[default]
    Page,
    /// Host and path only.
    Path,
}

/// A key addressing one cached summary.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(transparent)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// Whether a raw storage key belongs to the summary cache.
    pub fn is_cache_key(raw: &str) -> bool {
        raw.starts_with(CACHE_PREFIX)
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CacheKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Derive the cache key for `identifier` (normally a page URL).
///
/// Never fails: identifiers that do not parse as URLs fall back to a key built
/// from whatever looks like a host, or `unknown`.
pub fn derive_key(identifier: &str, scope: KeyScope) -> CacheKey {
    let url = match Url::parse(identifier.trim()) {
        Ok(url) => url,
        Err(e) => {
            tracing::debug!(identifier, error = %e, "identifier is not a URL, using fallback key");
            return fallback_key(identifier);
        }
    };

    let host = url.host_str().filter(|h| !h.is_empty()).unwrap_or(FALLBACK_HOST);
    let path = url.path();
    let clean_path = if path == "/" { "" } else { path.strip_suffix('/').unwrap_or(path) };

    let key = match scope {
        KeyScope::Page => {
            let mut full = clean_path.to_string();
            if let Some(query) = url.query().filter(|q| !q.is_empty()) {
                full.push('?');
                full.push_str(query);
            }
            if let Some(fragment) = url.fragment().filter(|f| !f.is_empty()) {
                full.push('#');
                full.push_str(fragment);
            }

            if full.len() > PAGE_THRESHOLD {
                format!("{CACHE_PREFIX}{host}_{}", short_hash(&full))
            } else {
                format!("{CACHE_PREFIX}{host}{}", sanitize(&full, is_page_char))
            }
        }
        KeyScope::Path => {
            let candidate = format!("{CACHE_PREFIX}{host}{}", sanitize(clean_path, is_path_char));
            if candidate.len() > PATH_THRESHOLD {
                format!("{CACHE_PREFIX}{host}_{}", short_hash(path))
            } else {
                candidate
            }
        }
    };

    CacheKey(key)
}

fn fallback_key(identifier: &str) -> CacheKey {
    let trimmed = identifier.trim();
    let rest = trimmed.split_once("://").map_or(trimmed, |(_, rest)| rest);
    let host_part = rest.split(['/', '?', '#']).next().unwrap_or_default();
    let host = sanitize(host_part, is_host_char);

    if host.is_empty() {
        CacheKey(format!("{CACHE_PREFIX}{FALLBACK_HOST}"))
    } else {
        CacheKey(format!("{CACHE_PREFIX}{host}"))
    }
}

fn sanitize(input: &str, allowed: fn(char) -> bool) -> String {
    input.chars().map(|c| if allowed(c) { c } else { '_' }).collect()
}

fn is_page_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '/' | '?' | '=' | '&' | '#')
}

fn is_path_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '/')
}

fn is_host_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_page_url() {
        let key = derive_key("https://example.com/articles/my-post", KeyScope::Page);
        assert_eq!(key.as_str(), "summary_example.com/articles/my-post");
    }

    #[test]
    fn test_root_path_has_no_suffix() {
        assert_eq!(derive_key("https://example.com/", KeyScope::Page).as_str(), "summary_example.com");
        assert_eq!(derive_key("https://example.com", KeyScope::Path).as_str(), "summary_example.com");
    }

    #[test]
    fn test_trailing_slash_removed() {
        let with = derive_key("https://example.com/docs/", KeyScope::Page);
        let without = derive_key("https://example.com/docs", KeyScope::Page);
        assert_eq!(with, without);
    }

    #[test]
    fn test_page_scope_keeps_query_and_fragment() {
        let key = derive_key("https://example.com/search?q=rust&page=2#top", KeyScope::Page);
        assert_eq!(key.as_str(), "summary_example.com/search?q=rust&page=2#top");
    }

    #[test]
    fn test_page_scope_sanitizes_disallowed_chars() {
        let key = derive_key("https://example.com/a.b/c~d?x=1;y", KeyScope::Page);
        assert_eq!(key.as_str(), "summary_example.com/a_b/c_d?x=1_y");
    }

    #[test]
    fn test_empty_query_is_ignored() {
        let key = derive_key("https://example.com/page?", KeyScope::Page);
        assert_eq!(key.as_str(), "summary_example.com/page");
    }

    #[test]
    fn test_long_page_url_is_hashed() {
        let path = format!("/{}", "a".repeat(299));
        let key = derive_key(&format!("https://example.com{path}"), KeyScope::Page);
        assert_eq!(key.as_str(), format!("summary_example.com_{}", short_hash(&path)));
    }

    #[test]
    fn test_long_query_is_hashed_with_path() {
        let url = format!("https://example.com/p?token={}", "x".repeat(60));
        let key = derive_key(&url, KeyScope::Page);
        let full = format!("/p?token={}", "x".repeat(60));
        assert_eq!(key.as_str(), format!("summary_example.com_{}", short_hash(&full)));
    }

    #[test]
    fn test_page_threshold_boundary() {
        let exactly = format!("/{}", "b".repeat(PAGE_THRESHOLD - 1));
        let key = derive_key(&format!("https://example.com{exactly}"), KeyScope::Page);
        assert_eq!(key.as_str(), format!("summary_example.com{exactly}"));

        let over = format!("/{}", "b".repeat(PAGE_THRESHOLD));
        let key = derive_key(&format!("https://example.com{over}"), KeyScope::Page);
        assert_eq!(key.as_str(), format!("summary_example.com_{}", short_hash(&over)));
    }

    #[test]
    fn test_path_scope_ignores_query_and_fragment() {
        let key = derive_key("https://example.com/docs/intro?lang=en#setup", KeyScope::Path);
        assert_eq!(key.as_str(), "summary_example.com/docs/intro");
    }

    #[test]
    fn test_path_scope_hashes_raw_path_when_key_too_long() {
        let path = format!("/{}/", "segment".repeat(20));
        let key = derive_key(&format!("https://example.com{path}"), KeyScope::Path);
        assert_eq!(key.as_str(), format!("summary_example.com_{}", short_hash(&path)));
    }

    #[test]
    fn test_key_length_is_bounded() {
        let host = "example.com";
        for len in [0usize, 10, 49, 50, 51, 120, 300, 2000] {
            let url = format!("https://{host}/{}", "z".repeat(len));
            let page = derive_key(&url, KeyScope::Page);
            assert!(page.as_str().len() <= CACHE_PREFIX.len() + host.len() + PAGE_THRESHOLD);

            let path = derive_key(&url, KeyScope::Path);
            assert!(path.as_str().len() <= PATH_THRESHOLD.max(CACHE_PREFIX.len() + host.len() + 8));
        }
    }

    #[test]
    fn test_deterministic() {
        let url = "https://news.example.org/2024/05/long-story?utm_source=feed&ref=home#comments";
        assert_eq!(derive_key(url, KeyScope::Page), derive_key(url, KeyScope::Page));
        assert_eq!(derive_key(url, KeyScope::Path), derive_key(url, KeyScope::Path));
    }

    #[test]
    fn test_host_is_lowercased() {
        let key = derive_key("https://EXAMPLE.com/Post", KeyScope::Page);
        assert_eq!(key.as_str(), "summary_example.com/Post");
    }

    #[test]
    fn test_unparseable_identifier_falls_back() {
        assert_eq!(derive_key("not a url", KeyScope::Page).as_str(), "summary_not_a_url");
        assert_eq!(derive_key("example.com/some/page", KeyScope::Page).as_str(), "summary_example.com");
        assert_eq!(derive_key("", KeyScope::Page).as_str(), "summary_unknown");
        assert_eq!(derive_key("://", KeyScope::Path).as_str(), "summary_unknown");
    }

    #[test]
    fn test_scheme_less_paths_collapse_to_host() {
        // Without a scheme the path is lost, so callers canonicalize first.
        let rust = derive_key("example.com/rust", KeyScope::Page);
        let golang = derive_key("example.com/golang", KeyScope::Page);
        assert_eq!(rust, golang);
        assert_eq!(rust.as_str(), "summary_example.com");

        assert_eq!(derive_key("https://example.com/rust", KeyScope::Page).as_str(), "summary_example.com/rust");
        assert_eq!(derive_key("example.com/rust?x=1#top", KeyScope::Path).as_str(), "summary_example.com");
    }

    #[test]
    fn test_path_scope_long_host_exceeds_threshold() {
        let host = format!("{}.example.com", (0..12).map(|i| format!("label{i:02}")).collect::<Vec<_>>().join("."));
        let url = format!("https://{host}/docs/intro");
        let key = derive_key(&url, KeyScope::Path);

        assert_eq!(key.as_str(), format!("summary_{host}_{}", short_hash("/docs/intro")));
        assert!(key.as_str().len() > PATH_THRESHOLD);
        assert!(key.as_str().len() <= CACHE_PREFIX.len() + host.len() + 1 + "zik0zk".len());
    }

    #[test]
    fn test_page_scope_long_host_short_path_is_not_hashed() {
        let host = format!("{}.example.com", (0..12).map(|i| format!("label{i:02}")).collect::<Vec<_>>().join("."));
        let key = derive_key(&format!("https://{host}/a"), KeyScope::Page);
        assert_eq!(key.as_str(), format!("summary_{host}/a"));
    }

    #[test]
    fn test_url_without_host_uses_unknown() {
        let key = derive_key("file:///tmp/page.html", KeyScope::Path);
        assert_eq!(key.as_str(), "summary_unknown/tmp/page_html");
    }

    #[test]
    fn test_is_cache_key() {
        assert!(CacheKey::is_cache_key("summary_example.com"));
        assert!(!CacheKey::is_cache_key("summaryCount"));
    }

    #[test]
    fn test_scope_serde() {
        assert_eq!(serde_json::to_string(&KeyScope::Page).unwrap(), "\"page\"");
        let scope: KeyScope = serde_json::from_str("\"path\"").unwrap();
        assert_eq!(scope, KeyScope::Path);
    }
}
