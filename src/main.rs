//! Pagesweep main entry point
//!
//! Command-line interface for running accessibility scans against a site.

use anyhow::Context;
use clap::Parser;
use pagesweep::audit::BuiltinAuditor;
use pagesweep::config::{load_config, Config};
use pagesweep::discovery::{build_http_client, discover_urls};
use pagesweep::pipeline::run_scan;
use pagesweep::queue::JobState;
use pagesweep::storage::SqliteStore;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Pagesweep: a site accessibility scanner
///
/// Pagesweep discovers the pages of a site through its sitemap (or a
/// polite fallback crawl), audits each page for accessibility defects,
/// and persists scored results to a local database.
#[derive(Parser, Debug)]
#[command(name = "pagesweep")]
#[command(version = "1.0.0")]
#[command(about = "A site accessibility scanner", long_about = None)]
struct Cli {
    /// Site URL to scan
    #[arg(value_name = "URL")]
    url: String,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Project identifier to attach to stored results
    #[arg(long, default_value = "default")]
    project_id: String,

    /// Scan identifier; generated from the current time when omitted
    #[arg(long)]
    scan_id: Option<String>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// List discovered URLs without scanning them
    #[arg(long)]
    discover_only: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path).with_context(|| format!("loading {}", path.display()))?
        }
        None => Config::default(),
    };

    if cli.discover_only {
        return handle_discover_only(&config, &cli.url).await;
    }

    handle_scan(&config, &cli).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("pagesweep=info,warn"),
            1 => EnvFilter::new("pagesweep=debug,info"),
            2 => EnvFilter::new("pagesweep=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles --discover-only: prints the page set without auditing
async fn handle_discover_only(config: &Config, url: &str) -> anyhow::Result<()> {
    let client = build_http_client(&config.user_agent).context("building HTTP client")?;
    let discovered = discover_urls(&client, url, &config.discovery)
        .await
        .context("discovering URLs")?;

    println!("=== Discovered URLs ===\n");
    if discovered.is_empty() {
        println!("(none beyond the seed page)");
    }
    for page in &discovered {
        println!("  {} (depth {})", page.url, page.depth);
    }
    println!("\n{} URL(s) discovered", discovered.len());

    Ok(())
}

/// Handles the main scan operation
async fn handle_scan(config: &Config, cli: &Cli) -> anyhow::Result<()> {
    let scan_id = cli
        .scan_id
        .clone()
        .unwrap_or_else(|| format!("scan-{}", chrono::Utc::now().timestamp_millis()));

    let store = SqliteStore::new(std::path::Path::new(&config.output.database_path))
        .with_context(|| format!("opening database {}", config.output.database_path))?;
    let auditor = BuiltinAuditor::new();

    tracing::info!("Starting scan {} of {}", scan_id, cli.url);
    let report = run_scan(
        config,
        Arc::new(store),
        Arc::new(auditor),
        &cli.url,
        &cli.project_id,
        &scan_id,
    )
    .await
    .context("running scan")?;

    println!("=== Scan Report: {} ===\n", report.scan_id);
    println!("Site: {}", report.site_url);
    for page in &report.pages {
        match page.state {
            JobState::Completed => {
                println!("  ✓ {} ({} attempt(s))", page.url, page.attempts);
            }
            JobState::Failed => {
                println!(
                    "  ✗ {} ({} attempt(s)): {}",
                    page.url,
                    page.attempts,
                    page.error.as_deref().unwrap_or("unknown error")
                );
            }
            _ => {
                println!("  ? {} (non-terminal state)", page.url);
            }
        }
    }
    println!(
        "\n{} completed, {} failed out of {} page(s)",
        report.completed(),
        report.failed(),
        report.pages.len()
    );
    println!("Results stored in: {}", config.output.database_path);

    if report.completed() == 0 {
        anyhow::bail!("no pages scanned successfully");
    }
    Ok(())
}
