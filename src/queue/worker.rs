//! Worker pool executing scan jobs
//!
//! Each worker is a tokio task in a claim loop. A claimed job is executed
//! attempt by attempt; every attempt loads the page fresh, runs the audit,
//! and persists the processed result before the job is reported complete.
//! The loaded page lives only inside its attempt, so a failed attempt never
//! leaks the previous page into the retry.

use crate::audit::{Auditor, PageHandle};
use crate::config::QueueConfig;
use crate::processor::process_audit_results;
use crate::queue::{ClaimedJob, JobState, ScanJob, ScanQueue};
use crate::storage::{ScanResultRecord, ScanStatus, ScanStore};
use crate::{Result, SweepError};
use chrono::Utc;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Shared dependencies handed to every worker
pub struct WorkerContext {
    pub client: Client,
    pub store: Arc<dyn ScanStore>,
    pub auditor: Arc<dyn Auditor>,
    pub config: QueueConfig,
}

/// Spawns the fixed worker pool
///
/// Workers run until [`ScanQueue::close`] is called and the queue drains.
/// The returned handles let the caller await a clean shutdown.
pub fn spawn_workers(queue: Arc<ScanQueue>, ctx: Arc<WorkerContext>) -> Vec<JoinHandle<()>> {
    (0..ctx.config.workers)
        .map(|worker_id| {
            let queue = queue.clone();
            let ctx = ctx.clone();
            tokio::spawn(async move {
                debug!("Worker {} started", worker_id);
                while let Some(claimed) = queue.claim().await {
                    execute_job(&ctx, claimed).await;
                }
                debug!("Worker {} shutting down", worker_id);
            })
        })
        .collect()
}

/// Runs one job through its full attempt budget
async fn execute_job(ctx: &WorkerContext, claimed: ClaimedJob) {
    let ClaimedJob { job, progress } = claimed;
    let mut last_error = String::new();

    for attempt in 1..=ctx.config.max_attempts {
        if attempt > 1 {
            let backoff =
                Duration::from_millis(ctx.config.backoff_base_ms << (attempt - 2).min(16));
            info!(
                "Retrying job {} for {} in {:?} (attempt {}/{})",
                job.id, job.url, backoff, attempt, ctx.config.max_attempts
            );
            tokio::time::sleep(backoff).await;
        }

        match run_attempt(ctx, &job, attempt, &progress).await {
            Ok(()) => {
                info!("Job {} completed for {} (attempt {})", job.id, job.url, attempt);
                return;
            }
            Err(err) => {
                warn!("Job {} attempt {} failed: {}", job.id, attempt, err);
                last_error = err.to_string();
            }
        }
    }

    let exhausted = SweepError::JobExhausted {
        job_id: job.id,
        attempts: ctx.config.max_attempts,
        message: last_error,
    };
    warn!("{}", exhausted);

    if let Err(err) = ctx
        .store
        .update_scan_status(&job.scan_id, ScanStatus::Failed)
        .await
    {
        warn!("Failed to record FAILED status for scan {}: {}", job.scan_id, err);
    }
    progress.fail(ctx.config.max_attempts, exhausted.to_string());
}

/// One scan attempt: claim checkpoint, navigation, audit, persistence
///
/// Any error aborts the attempt; the caller decides whether to retry.
async fn run_attempt(
    ctx: &WorkerContext,
    job: &ScanJob,
    attempt: u32,
    progress: &super::job::ProgressSender,
) -> Result<()> {
    progress.set(JobState::InProgress, 10, attempt);
    ctx.store
        .update_scan_status(&job.scan_id, ScanStatus::InProgress)
        .await?;

    // The page handle is scoped to this attempt and dropped on every exit path
    let page = load_page(ctx, &job.url).await?;

    progress.set(JobState::Running, 50, attempt);
    ctx.store
        .update_scan_status(&job.scan_id, ScanStatus::Running)
        .await?;

    let raw = ctx.auditor.audit(&page).await?;
    progress.set(JobState::Running, 80, attempt);

    let processed = process_audit_results(&raw, &job.url);
    let record = ScanResultRecord {
        scan_id: job.scan_id.clone(),
        page_url: job.url.clone(),
        error_count: processed.summary.error_count,
        warnings: processed.summary.warning_count,
        score: processed.summary.score,
        violations: serde_json::to_value(&processed.violations)?,
        created_at: Utc::now(),
    };

    ctx.store.create_scan_result(record).await?;
    ctx.store
        .set_scan_score(&job.scan_id, processed.summary.score)
        .await?;
    ctx.store
        .update_scan_status(&job.scan_id, ScanStatus::Completed)
        .await?;

    progress.set(JobState::Completed, 100, attempt);
    Ok(())
}

/// Fetches the page body for auditing, bounded by the job timeout
async fn load_page(ctx: &WorkerContext, url: &str) -> Result<PageHandle> {
    let timeout = Duration::from_secs(ctx.config.job_timeout_secs);

    let response = tokio::time::timeout(timeout, ctx.client.get(url).send())
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

    let html = tokio::time::timeout(timeout, response.text())
        .await
        .map_err(|_| SweepError::Timeout {
            url: url.to_string(),
        })?
        .map_err(|source| SweepError::Http {
            url: url.to_string(),
            source,
        })?;

    Ok(PageHandle {
        url: url.to_string(),
        html,
    })
}
