//! Fallback site crawler
//!
//! Breadth-first discovery used only when no sitemap exists. The frontier is
//! a FIFO of (url, depth) pairs, which gives exactly the required ordering:
//! smallest depth first, ties broken by discovery order. Fetches run
//! sequentially with a politeness delay so that ordering holds.
//!
//! Link extraction is intentionally shallow: a `href="https://..."` pattern
//! match, no DOM parse. Relative links and non-https links are missed by
//! design; fixing that would change which pages this scanner discovers.

use crate::config::DiscoveryConfig;
use crate::discovery::DiscoveredUrl;
use crate::url::{normalize_url, same_host};
use crate::SweepError;
use regex::Regex;
use reqwest::Client;
use std::collections::{HashSet, VecDeque};
use std::sync::OnceLock;
use std::time::Duration;
use url::Url;

fn href_regex() -> &'static Regex {
    static HREF_RE: OnceLock<Regex> = OnceLock::new();
    HREF_RE.get_or_init(|| Regex::new(r#"href="(https://[^"]+)""#).expect("valid regex"))
}

/// Crawls a site breadth-first, returning discovered URLs in discovery order
///
/// The seed is depth 0 and is excluded from the result. A newly found link
/// is kept only if it is same-host, normalizes cleanly, is not already
/// known, and sits within the depth cap. Per-page failures mark the page
/// visited and never abort the crawl. The result is capped at the page
/// budget. A malformed seed fails fast.
pub async fn crawl_site(
    client: &Client,
    base_url: &str,
    config: &DiscoveryConfig,
) -> Result<Vec<DiscoveredUrl>, SweepError> {
    let seed = normalize_url(base_url)?;
    let base = Url::parse(&seed)?;

    let delay = Duration::from_millis(config.crawl_delay_ms);
    let request_timeout = Duration::from_secs(config.request_timeout_secs);

    let mut frontier: VecDeque<(String, u32)> = VecDeque::from([(seed.clone(), 0)]);
    let mut known: HashSet<String> = HashSet::from([seed.clone()]);
    let mut visited: HashSet<String> = HashSet::new();
    let mut discovered: Vec<DiscoveredUrl> = Vec::new();
    let mut first_request = true;

    while visited.len() < config.max_urls {
        let Some((current, depth)) = frontier.pop_front() else {
            break;
        };

        // Politeness delay between requests, skipped only for the first
        if !first_request {
            tokio::time::sleep(delay).await;
        }
        first_request = false;

        tracing::debug!("Crawling {} (depth {})", current, depth);
        visited.insert(current.clone());

        let body = match fetch_page(client, &current, request_timeout).await {
            Ok(body) => body,
            Err(e) => {
                // Failed pages stay visited so they are never retried
                tracing::warn!("Failed to crawl {}: {}", current, e);
                continue;
            }
        };

        for capture in href_regex().captures_iter(&body) {
            let found = &capture[1];

            if !same_host(&base, found) {
                continue;
            }

            let normalized = match normalize_url(found) {
                Ok(normalized) => normalized,
                Err(_) => continue,
            };

            if depth + 1 <= config.max_crawl_depth && known.insert(normalized.clone()) {
                frontier.push_back((normalized.clone(), depth + 1));
                discovered.push(DiscoveredUrl {
                    url: normalized,
                    depth: depth + 1,
                });
            }
        }
    }

    discovered.truncate(config.max_urls);

    tracing::info!(
        "Crawl of {} discovered {} URL(s) after visiting {} page(s)",
        seed,
        discovered.len(),
        visited.len()
    );

    Ok(discovered)
}

async fn fetch_page(client: &Client, url: &str, timeout: Duration) -> Result<String, SweepError> {
    // The timeout wraps the whole exchange; expiry drops the in-flight
    // request, aborting the underlying connection.
    let response = tokio::time::timeout(timeout, client.get(url).send())
        .await
        .map_err(|_| SweepError::Timeout {
            url: url.to_string(),
        })?
        .map_err(|source| SweepError::Http {
            url: url.to_string(),
            source,
        })?;

    let response = response
        .error_for_status()
        .map_err(|source| SweepError::Http {
            url: url.to_string(),
            source,
        })?;

    tokio::time::timeout(timeout, response.text())
        .await
        .map_err(|_| SweepError::Timeout {
            url: url.to_string(),
        })?
        .map_err(|source| SweepError::Http {
            url: url.to_string(),
            source,
        })
}
