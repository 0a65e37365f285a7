//! End-to-end scan orchestration
//!
//! Ties the layers together: discovery produces the page set, the queue
//! fans it out to the worker pool, and the report collects the terminal
//! state of every job. One call to [`run_scan`] is one full site scan.

use crate::audit::Auditor;
use crate::config::Config;
use crate::discovery::{build_http_client, discover_urls};
use crate::queue::{spawn_workers, JobState, ScanQueue, WorkerContext};
use crate::storage::ScanStore;
use crate::url::normalize_url;
use crate::{Result, SweepError};
use std::sync::Arc;
use tracing::{info, warn};

/// Terminal outcome of one page scan
#[derive(Debug, Clone)]
pub struct PageOutcome {
    pub url: String,
    pub state: JobState,
    pub attempts: u32,
    pub error: Option<String>,
}

/// Aggregate result of a full site scan
#[derive(Debug)]
pub struct ScanReport {
    pub scan_id: String,
    pub site_url: String,
    pub pages: Vec<PageOutcome>,
}

impl ScanReport {
    pub fn completed(&self) -> usize {
        self.pages
            .iter()
            .filter(|p| p.state == JobState::Completed)
            .count()
    }

    pub fn failed(&self) -> usize {
        self.pages
            .iter()
            .filter(|p| p.state == JobState::Failed)
            .count()
    }
}

/// Runs a full scan of `site_url`: discovery, queued audits, aggregation
///
/// The seed page is always scanned, even when discovery finds nothing else.
/// Discovered URLs are enqueued after the seed, deduplicated against it.
/// Returns once every job has reached a terminal state and the worker pool
/// has shut down.
pub async fn run_scan(
    config: &Config,
    store: Arc<dyn ScanStore>,
    auditor: Arc<dyn Auditor>,
    site_url: &str,
    project_id: &str,
    scan_id: &str,
) -> Result<ScanReport> {
    let seed = normalize_url(site_url)?;
    let client = build_http_client(&config.user_agent).map_err(SweepError::Reqwest)?;

    let discovered = match discover_urls(&client, &seed, &config.discovery).await {
        Ok(urls) => urls,
        Err(e) => {
            warn!("Discovery failed for {}: {}; scanning seed only", seed, e);
            Vec::new()
        }
    };
    info!(
        "Scanning {} page(s) for {} (seed + {} discovered)",
        discovered.len() + 1,
        seed,
        discovered.len()
    );

    let queue = Arc::new(ScanQueue::new());
    let mut handles = Vec::with_capacity(discovered.len() + 1);

    handles.push(queue.enqueue(&seed, project_id, scan_id));
    for page in &discovered {
        if page.url != seed {
            handles.push(queue.enqueue(&page.url, project_id, scan_id));
        }
    }
    queue.close();

    let ctx = Arc::new(WorkerContext {
        client,
        store,
        auditor,
        config: config.queue.clone(),
    });
    let workers = spawn_workers(queue, ctx);

    let mut pages = Vec::with_capacity(handles.len());
    for mut handle in handles {
        let done = handle.wait().await;
        pages.push(PageOutcome {
            url: handle.url,
            state: done.state,
            attempts: done.attempt,
            error: done.error,
        });
    }

    for worker in workers {
        if let Err(e) = worker.await {
            warn!("Worker task ended abnormally: {}", e);
        }
    }

    let report = ScanReport {
        scan_id: scan_id.to_string(),
        site_url: seed,
        pages,
    };
    info!(
        "Scan {} finished: {} completed, {} failed",
        report.scan_id,
        report.completed(),
        report.failed()
    );
    Ok(report)
}
