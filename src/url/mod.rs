//! URL normalization and host matching
//!
//! Discovery dedups URLs by their normalized form: scheme + host + path,
//! with the fragment and query string stripped. Two pages that differ only
//! in tracking parameters or anchors are the same page for scanning purposes.

use crate::UrlError;
use url::Url;

/// Normalizes a URL to its dedup key: scheme + host + path
///
/// The fragment and query string are removed and the host is lowercased.
/// Only HTTP and HTTPS URLs are accepted.
///
/// # Examples
///
/// ```
/// use pagesweep::url::normalize_url;
///
/// let url = normalize_url("https://Example.com/about?utm_source=x#team").unwrap();
/// assert_eq!(url, "https://example.com/about");
/// ```
pub fn normalize_url(url_str: &str) -> Result<String, UrlError> {
    let mut url = Url::parse(url_str).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().is_none() {
        return Err(UrlError::MissingHost);
    }

    url.set_fragment(None);
    url.set_query(None);

    Ok(url.to_string())
}

/// Returns true if both URLs share the same host
///
/// Cross-host links are discarded during crawling; a malformed candidate
/// simply does not match.
pub fn same_host(base: &Url, candidate: &str) -> bool {
    match Url::parse(candidate) {
        Ok(url) => match (base.host_str(), url.host_str()) {
            (Some(a), Some(b)) => a.eq_ignore_ascii_case(b),
            _ => false,
        },
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_fragment() {
        let result = normalize_url("https://example.com/page#section").unwrap();
        assert_eq!(result, "https://example.com/page");
    }

    #[test]
    fn test_strip_query() {
        let result = normalize_url("https://example.com/page?a=1&b=2").unwrap();
        assert_eq!(result, "https://example.com/page");
    }

    #[test]
    fn test_strip_query_and_fragment() {
        let result = normalize_url("https://example.com/p?q=1#frag").unwrap();
        assert_eq!(result, "https://example.com/p");
    }

    #[test]
    fn test_lowercase_host() {
        let result = normalize_url("https://EXAMPLE.COM/Page").unwrap();
        assert_eq!(result, "https://example.com/Page");
    }

    #[test]
    fn test_path_preserved() {
        let result = normalize_url("https://example.com/a/b/c").unwrap();
        assert_eq!(result, "https://example.com/a/b/c");
    }

    #[test]
    fn test_bare_host_gets_root_path() {
        let result = normalize_url("https://example.com").unwrap();
        assert_eq!(result, "https://example.com/");
    }

    #[test]
    fn test_invalid_scheme() {
        let result = normalize_url("ftp://example.com/file");
        assert!(matches!(result, Err(UrlError::InvalidScheme(_))));
    }

    #[test]
    fn test_malformed_url() {
        let result = normalize_url("not a url");
        assert!(matches!(result, Err(UrlError::Parse(_))));
    }

    #[test]
    fn test_same_host_match() {
        let base = Url::parse("https://example.com/").unwrap();
        assert!(same_host(&base, "https://example.com/other"));
        assert!(same_host(&base, "https://EXAMPLE.com/other"));
    }

    #[test]
    fn test_same_host_mismatch() {
        let base = Url::parse("https://example.com/").unwrap();
        assert!(!same_host(&base, "https://other.com/page"));
        assert!(!same_host(&base, "https://sub.example.com/page"));
        assert!(!same_host(&base, "::not-a-url::"));
    }
}
