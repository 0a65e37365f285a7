//! Sitemap extractor
//!
//! Fetches sitemap XML and flattens it into a URL list. A sitemap-index is
//! followed recursively, child by child, concatenating results in document
//! order. A visited set bounds the recursion: a sitemap URL that has already
//! been fetched is skipped, so cyclic or self-referential indexes terminate.

use crate::config::DiscoveryConfig;
use crate::SweepError;
use regex::Regex;
use reqwest::Client;
use std::collections::HashSet;
use std::future::Future;
use std::pin::Pin;
use std::sync::OnceLock;
use std::time::Duration;

fn loc_regex() -> &'static Regex {
    static LOC_RE: OnceLock<Regex> = OnceLock::new();
    LOC_RE.get_or_init(|| Regex::new(r"(?is)<loc>\s*([^<]*?)\s*</loc>").expect("valid regex"))
}

/// Extracts all page URLs reachable from a sitemap URL
///
/// `None` yields an empty list. For a `<sitemapindex>` document every child
/// `<loc>` is extracted recursively and results are concatenated in order;
/// for a `<urlset>` the `<loc>` values are returned with empty entries
/// dropped.
pub async fn extract_urls(
    client: &Client,
    sitemap_url: Option<String>,
    config: &DiscoveryConfig,
) -> Result<Vec<String>, SweepError> {
    let Some(url) = sitemap_url else {
        return Ok(Vec::new());
    };

    let timeout = Duration::from_secs(config.request_timeout_secs);
    let mut visited = HashSet::new();
    let mut urls = Vec::new();
    extract_into(client, url, timeout, &mut visited, &mut urls).await?;
    Ok(urls)
}

/// Recursive worker; boxed because async recursion needs an indirection
fn extract_into<'a>(
    client: &'a Client,
    sitemap_url: String,
    timeout: Duration,
    visited: &'a mut HashSet<String>,
    urls: &'a mut Vec<String>,
) -> Pin<Box<dyn Future<Output = Result<(), SweepError>> + Send + 'a>> {
    Box::pin(async move {
        if !visited.insert(sitemap_url.clone()) {
            tracing::debug!("Skipping already-visited sitemap {}", sitemap_url);
            return Ok(());
        }

        let body = fetch_text(client, &sitemap_url, timeout).await?;

        let locs: Vec<String> = loc_regex()
            .captures_iter(&body)
            .filter_map(|cap| cap.get(1))
            .map(|m| m.as_str().to_string())
            .filter(|loc| !loc.is_empty())
            .collect();

        if body.to_lowercase().contains("<sitemapindex") {
            tracing::debug!(
                "Sitemap index at {} references {} child sitemap(s)",
                sitemap_url,
                locs.len()
            );
            for child in locs {
                extract_into(client, child, timeout, visited, urls).await?;
            }
        } else {
            urls.extend(locs);
        }

        Ok(())
    })
}

async fn fetch_text(client: &Client, url: &str, timeout: Duration) -> Result<String, SweepError> {
    let response = tokio::time::timeout(timeout, client.get(url).send())
        .await
        .map_err(|_| SweepError::Timeout {
            url: url.to_string(),
        })?
        .map_err(|source| SweepError::Http {
            url: url.to_string(),
            source,
        })?;

    if !response.status().is_success() {
        return Err(SweepError::Sitemap {
            url: url.to_string(),
            message: format!("HTTP {}", response.status().as_u16()),
        });
    }

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
