//! Pagesweep: an automated website accessibility scan pipeline
//!
//! This crate discovers pages on a target site (sitemap lookup with a crawl
//! fallback), fans per-URL audit jobs out to a bounded worker pool with
//! retry/backoff, and turns raw audit output into a scored, persisted summary.

pub mod audit;
pub mod config;
pub mod discovery;
pub mod pipeline;
pub mod processor;
pub mod queue;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for pagesweep operations
#[derive(Debug, Error)]
pub enum SweepError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Sitemap error for {url}: {message}")]
    Sitemap { url: String, message: String },

    #[error("Audit failed for {url}: {message}")]
    Audit { url: String, message: String },

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Malformed audit payload: {0}")]
    Payload(#[from] serde_json::Error),

    #[error("Job {job_id} failed after {attempts} attempts: {message}")]
    JobExhausted {
        job_id: u64,
        attempts: u32,
        message: String,
    },
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingHost,
}

/// Result type alias for pagesweep operations
pub type Result<T> = std::result::Result<T, SweepError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use pipeline::{run_scan, ScanReport};
pub use discovery::DiscoveredUrl;
pub use processor::{process_audit_results, ProcessedResult, Summary, Violation};
pub use queue::{JobHandle, JobState, ScanJob, ScanQueue};
pub use storage::{ScanStatus, ScanStore};
pub use url::{normalize_url, same_host};
