use serde::Deserialize;

/// Main configuration structure for pagesweep
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub discovery: DiscoveryConfig,
    #[serde(default)]
    pub queue: QueueConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// URL discovery configuration (sitemap probing and crawl fallback)
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DiscoveryConfig {
    /// Maximum depth for crawl-discovered URLs (seed is depth 0)
    #[serde(rename = "max-crawl-depth", default = "default_max_crawl_depth")]
    pub max_crawl_depth: u32,

    /// Total page budget for the fallback crawl
    #[serde(rename = "max-urls", default = "default_max_urls")]
    pub max_urls: usize,

    /// Politeness delay between crawl requests (milliseconds)
    #[serde(rename = "crawl-delay-ms", default = "default_crawl_delay_ms")]
    pub crawl_delay_ms: u64,

    /// Hard per-request timeout during crawling (seconds)
    #[serde(rename = "request-timeout-secs", default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Timeout for sitemap existence probes and robots.txt (seconds)
    #[serde(rename = "probe-timeout-secs", default = "default_probe_timeout_secs")]
    pub probe_timeout_secs: u64,
}

/// Scan job queue and worker pool configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QueueConfig {
    /// Number of concurrent workers consuming scan jobs
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Total attempts per job before it is marked failed
    #[serde(rename = "max-attempts", default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Base delay for exponential retry backoff (milliseconds)
    #[serde(rename = "backoff-base-ms", default = "default_backoff_base_ms")]
    pub backoff_base_ms: u64,

    /// Per-job page navigation timeout (seconds)
    #[serde(rename = "job-timeout-secs", default = "default_request_timeout_secs")]
    pub job_timeout_secs: u64,
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UserAgentConfig {
    /// Name of the scanner
    #[serde(rename = "scanner-name", default = "default_scanner_name")]
    pub scanner_name: String,

    /// Version of the scanner
    #[serde(rename = "scanner-version", default = "default_scanner_version")]
    pub scanner_version: String,

    /// URL with information about the scanner
    #[serde(rename = "contact-url", default = "default_contact_url")]
    pub contact_url: String,

    /// Email address for scanner-related contact
    #[serde(rename = "contact-email", default = "default_contact_email")]
    pub contact_email: String,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    /// Path to the SQLite database file holding scans and scan results
    #[serde(rename = "database-path", default = "default_database_path")]
    pub database_path: String,
}

fn default_max_crawl_depth() -> u32 {
    3
}

fn default_max_urls() -> usize {
    10
}

fn default_crawl_delay_ms() -> u64 {
    200
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_probe_timeout_secs() -> u64 {
    5
}

fn default_workers() -> usize {
    2
}

fn default_max_attempts() -> u32 {
    3
}

fn default_backoff_base_ms() -> u64 {
    1000
}

fn default_scanner_name() -> String {
    "Pagesweep".to_string()
}

fn default_scanner_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn default_contact_url() -> String {
    "https://example.com/pagesweep".to_string()
}

fn default_contact_email() -> String {
    "pagesweep@example.com".to_string()
}

fn default_database_path() -> String {
    "./pagesweep.db".to_string()
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            max_crawl_depth: default_max_crawl_depth(),
            max_urls: default_max_urls(),
            crawl_delay_ms: default_crawl_delay_ms(),
            request_timeout_secs: default_request_timeout_secs(),
            probe_timeout_secs: default_probe_timeout_secs(),
        }
    }
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            max_attempts: default_max_attempts(),
            backoff_base_ms: default_backoff_base_ms(),
            job_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            scanner_name: default_scanner_name(),
            scanner_version: default_scanner_version(),
            contact_url: default_contact_url(),
            contact_email: default_contact_email(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
        }
    }
}
