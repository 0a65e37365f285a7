//! Sitemap locator
//!
//! Probes a fixed, ordered list of well-known sitemap paths with lightweight
//! HEAD requests, then falls back to the `Sitemap:` directive in robots.txt.
//! Every per-candidate failure is swallowed; absence is a normal outcome.

use crate::config::DiscoveryConfig;
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Well-known sitemap locations, probed in order
const SITEMAP_CANDIDATES: &[&str] = &[
    "/sitemap.xml",
    "/sitemap_index.xml",
    "/sitemap-index.xml",
    "/sitemap1.xml",
    "/sitemap/sitemap.xml",
    "/sitemapindex.xml",
];

/// Attempts to find a sitemap URL for the given site
///
/// Returns the first candidate answering HTTP 200 with an XML content type
/// (short-circuit: later candidates are not probed). If none succeed, reads
/// `/robots.txt` and validates the first `sitemap:` directive the same way.
/// Returns `None` when nothing is found; never an error.
pub async fn locate_sitemap(
    client: &Client,
    site_url: &str,
    config: &DiscoveryConfig,
) -> Option<String> {
    let base = Url::parse(site_url).ok()?;
    let probe_timeout = Duration::from_secs(config.probe_timeout_secs);

    for path in SITEMAP_CANDIDATES {
        let candidate = match base.join(path) {
            Ok(url) => url.to_string(),
            Err(_) => continue,
        };

        if probe_is_xml(client, &candidate, probe_timeout).await {
            return Some(candidate);
        }
    }

    // No well-known path worked; ask robots.txt
    let robots_url = base.join("/robots.txt").ok()?.to_string();
    let sitemap_url = sitemap_from_robots(client, &robots_url, probe_timeout).await?;

    if probe_is_xml(client, &sitemap_url, probe_timeout).await {
        return Some(sitemap_url);
    }

    None
}

/// HEAD-checks a candidate: HTTP 200 and an XML content type
///
/// Any network or timeout error counts as "not found" for this candidate
/// only.
async fn probe_is_xml(client: &Client, url: &str, probe_timeout: Duration) -> bool {
    let response = match tokio::time::timeout(probe_timeout, client.head(url).send()).await {
        Ok(Ok(response)) => response,
        Ok(Err(e)) => {
            tracing::debug!("Sitemap probe failed for {}: {}", url, e);
            return false;
        }
        Err(_) => {
            tracing::debug!("Sitemap probe timed out for {}", url);
            return false;
        }
    };

    if response.status() != reqwest::StatusCode::OK {
        return false;
    }

    response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .map(|ct| ct.contains("xml"))
        .unwrap_or(false)
}

/// Fetches robots.txt and returns the first `sitemap:` directive value
///
/// The match is case-insensitive; the value is everything after the first
/// colon, trimmed.
async fn sitemap_from_robots(client: &Client, robots_url: &str, probe_timeout: Duration) -> Option<String> {
    let response = match tokio::time::timeout(probe_timeout, client.get(robots_url).send()).await {
        Ok(Ok(response)) if response.status().is_success() => response,
        Ok(Ok(_)) | Ok(Err(_)) | Err(_) => {
            tracing::debug!("robots.txt unavailable at {}", robots_url);
            return None;
        }
    };

    let body = match tokio::time::timeout(probe_timeout, response.text()).await {
        Ok(Ok(body)) => body,
        _ => return None,
    };

    for line in body.lines() {
        let trimmed = line.trim();
        // Byte-level prefix check: a multibyte character near the start of a
        // line must not land us on a non-boundary slice
        let has_directive = trimmed
            .as_bytes()
            .get(..8)
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(b"sitemap:"));
        if has_directive {
            let value = trimmed[8..].trim();
            if !value.is_empty() {
                return Some(value.to_string());
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config() -> DiscoveryConfig {
        DiscoveryConfig {
            probe_timeout_secs: 2,
            ..Default::default()
        }
    }

    async fn client() -> Client {
        Client::builder().build().unwrap()
    }

    #[tokio::test]
    async fn test_first_candidate_wins() {
        let server = MockServer::start().await;

        Mock::given(method("HEAD"))
            .and(path("/sitemap.xml"))
            .respond_with(ResponseTemplate::new(200).insert_header("content-type", "application/xml"))
            .mount(&server)
            .await;

        // Later candidates must not be probed
        Mock::given(method("HEAD"))
            .and(path("/sitemap_index.xml"))
            .respond_with(ResponseTemplate::new(200).insert_header("content-type", "application/xml"))
            .expect(0)
            .mount(&server)
            .await;

        let found = locate_sitemap(&client().await, &server.uri(), &test_config()).await;
        assert_eq!(found, Some(format!("{}/sitemap.xml", server.uri())));
    }

    #[tokio::test]
    async fn test_non_xml_content_type_rejected() {
        let server = MockServer::start().await;

        Mock::given(method("HEAD"))
            .and(path("/sitemap.xml"))
            .respond_with(ResponseTemplate::new(200).insert_header("content-type", "text/html"))
            .mount(&server)
            .await;

        Mock::given(method("HEAD"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/robots.txt"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let found = locate_sitemap(&client().await, &server.uri(), &test_config()).await;
        assert_eq!(found, None);
    }

    #[tokio::test]
    async fn test_robots_fallback() {
        let server = MockServer::start().await;
        let sitemap_url = format!("{}/deep/custom-sitemap.xml", server.uri());

        Mock::given(method("HEAD"))
            .and(path("/deep/custom-sitemap.xml"))
            .respond_with(ResponseTemplate::new(200).insert_header("content-type", "text/xml"))
            .mount(&server)
            .await;

        Mock::given(method("HEAD"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/robots.txt"))
            .respond_with(ResponseTemplate::new(200).set_body_string(format!(
                "User-agent: *\nDisallow: /private\nSitemap: {}\n",
                sitemap_url
            )))
            .mount(&server)
            .await;

        let found = locate_sitemap(&client().await, &server.uri(), &test_config()).await;
        assert_eq!(found, Some(sitemap_url));
    }

    #[tokio::test]
    async fn test_robots_directive_is_case_insensitive() {
        let server = MockServer::start().await;
        let sitemap_url = format!("{}/s.xml", server.uri());

        Mock::given(method("HEAD"))
            .and(path("/s.xml"))
            .respond_with(ResponseTemplate::new(200).insert_header("content-type", "application/xml"))
            .mount(&server)
            .await;

        Mock::given(method("HEAD"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/robots.txt"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(format!("SITEMAP: {}", sitemap_url)),
            )
            .mount(&server)
            .await;

        let found = locate_sitemap(&client().await, &server.uri(), &test_config()).await;
        assert_eq!(found, Some(sitemap_url));
    }

    #[tokio::test]
    async fn test_robots_with_multibyte_lines_is_handled() {
        let server = MockServer::start().await;
        let sitemap_url = format!("{}/s.xml", server.uri());

        Mock::given(method("HEAD"))
            .and(path("/s.xml"))
            .respond_with(ResponseTemplate::new(200).insert_header("content-type", "text/xml"))
            .mount(&server)
            .await;

        Mock::given(method("HEAD"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        // Lines whose 8th byte falls inside a multibyte character must be
        // skipped, not sliced
        Mock::given(method("GET"))
            .and(path("/robots.txt"))
            .respond_with(ResponseTemplate::new(200).set_body_string(format!(
                "Commenté: decorative line\nUser-agent: *\nSitemap: {}\n",
                sitemap_url
            )))
            .mount(&server)
            .await;

        let found = locate_sitemap(&client().await, &server.uri(), &test_config()).await;
        assert_eq!(found, Some(sitemap_url));
    }

    #[tokio::test]
    async fn test_nothing_found_is_none() {
        let server = MockServer::start().await;

        Mock::given(method("HEAD"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/robots.txt"))
            .respond_with(ResponseTemplate::new(200).set_body_string("User-agent: *\nAllow: /"))
            .mount(&server)
            .await;

        let found = locate_sitemap(&client().await, &server.uri(), &test_config()).await;
        assert_eq!(found, None);
    }
}
