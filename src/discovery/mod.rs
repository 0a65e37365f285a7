//! URL discovery: sitemap lookup with a crawl fallback
//!
//! Discovery prefers a sitemap (cheap, complete, polite) and only falls back
//! to crawling when no sitemap can be located. Every network operation here
//! runs sequentially; the crawler's politeness delay and BFS ordering depend
//! on that.

mod crawler;
mod extract;
mod sitemap;

pub use crawler::crawl_site;
pub use extract::extract_urls;
pub use sitemap::locate_sitemap;

use crate::config::{DiscoveryConfig, UserAgentConfig};
use crate::{normalize_url, SweepError};
use reqwest::Client;
use std::time::Duration;

/// A page URL discovered for scanning
///
/// Uniqueness is by the normalized form (scheme+host+path). `depth` is only
/// meaningful for crawl-discovered URLs; sitemap entries are depth 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredUrl {
    pub url: String,
    pub depth: u32,
}

/// Builds the shared HTTP client with the configured user agent
///
/// Format: ScannerName/Version (+ContactURL; ContactEmail)
pub fn build_http_client(config: &UserAgentConfig) -> Result<Client, reqwest::Error> {
    let user_agent = format!(
        "{}/{} (+{}; {})",
        config.scanner_name, config.scanner_version, config.contact_url, config.contact_email
    );

    Client::builder()
        .user_agent(user_agent)
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Discovers the set of page URLs to scan for a site
///
/// Tries the sitemap route first (locate, then extract); if no sitemap is
/// found, or extraction fails outright, falls back to the BFS crawler. A
/// malformed seed URL fails fast; everything downstream degrades gracefully
/// to a possibly-empty list.
pub async fn discover_urls(
    client: &Client,
    site_url: &str,
    config: &DiscoveryConfig,
) -> Result<Vec<DiscoveredUrl>, SweepError> {
    let seed = normalize_url(site_url)?;

    if let Some(sitemap_url) = locate_sitemap(client, &seed, config).await {
        tracing::info!("Found sitemap at {}", sitemap_url);
        match extract_urls(client, Some(sitemap_url.clone()), config).await {
            Ok(urls) => {
                let mut seen = std::collections::HashSet::new();
                let discovered: Vec<DiscoveredUrl> = urls
                    .into_iter()
                    .filter_map(|raw| normalize_url(&raw).ok())
                    .filter(|normalized| seen.insert(normalized.clone()))
                    .map(|url| DiscoveredUrl { url, depth: 0 })
                    .collect();
                tracing::info!("Sitemap yielded {} unique URL(s)", discovered.len());
                return Ok(discovered);
            }
            Err(e) => {
                tracing::warn!(
                    "Sitemap extraction failed ({}), falling back to crawl",
                    e
                );
            }
        }
    } else {
        tracing::info!("No sitemap found for {}, falling back to crawl", seed);
    }

    crawl_site(client, &seed, config).await
}
