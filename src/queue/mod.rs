//! Scan job queue and worker pool
//!
//! The queue is the only shared mutable structure in the pipeline. Jobs are
//! immutable once enqueued; the queue owns them until a worker claims one,
//! ownership transfers to the worker for the duration of execution, and on a
//! failed attempt it stays with the worker for the retry loop. Claims are
//! serialized through the queue mutex so no two workers can take the same
//! job.

mod job;
mod worker;

pub use job::{JobHandle, JobProgress, JobState, ScanJob};
pub use worker::{spawn_workers, WorkerContext};

use job::ProgressSender;
use std::collections::VecDeque;
use std::sync::Mutex;
use tokio::sync::{watch, Notify};

/// A claimed job together with its progress channel
pub(crate) struct ClaimedJob {
    pub job: ScanJob,
    pub progress: ProgressSender,
}

#[derive(Default)]
struct QueueInner {
    jobs: VecDeque<ClaimedJob>,
    next_id: u64,
    closed: bool,
}

/// Durable in-process queue of per-URL scan jobs
///
/// `enqueue` returns a [`JobHandle`] the caller can poll or await; workers
/// pull jobs via `claim` until the queue is closed and drained.
pub struct ScanQueue {
    inner: Mutex<QueueInner>,
    notify: Notify,
}

impl ScanQueue {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(QueueInner::default()),
            notify: Notify::new(),
        }
    }

    /// Enqueues one scan job and returns its handle
    ///
    /// `project_id` and `scan_id` are opaque caller-supplied identifiers;
    /// the queue never generates them.
    pub fn enqueue(&self, url: &str, project_id: &str, scan_id: &str) -> JobHandle {
        let (tx, rx) = watch::channel(JobProgress::pending());

        let mut inner = self.inner.lock().unwrap();
        inner.next_id += 1;
        let id = inner.next_id;

        let job = ScanJob {
            id,
            url: url.to_string(),
            project_id: project_id.to_string(),
            scan_id: scan_id.to_string(),
        };

        tracing::debug!("Enqueued job {} for {}", id, url);

        inner.jobs.push_back(ClaimedJob {
            job,
            progress: ProgressSender::new(tx),
        });
        drop(inner);

        self.notify.notify_one();

        JobHandle::new(id, url.to_string(), rx)
    }

    /// Claims the next job, waiting while the queue is open but empty
    ///
    /// Returns `None` once the queue is closed and drained; each worker
    /// treats that as shutdown.
    pub(crate) async fn claim(&self) -> Option<ClaimedJob> {
        loop {
            let notified = self.notify.notified();

            {
                let mut inner = self.inner.lock().unwrap();
                if let Some(claimed) = inner.jobs.pop_front() {
                    return Some(claimed);
                }
                if inner.closed {
                    return None;
                }
            }

            notified.await;
        }
    }

    /// Closes the queue; workers drain remaining jobs and then exit
    pub fn close(&self) {
        self.inner.lock().unwrap().closed = true;
        self.notify.notify_waiters();
    }

    /// Number of jobs waiting to be claimed
    pub fn pending(&self) -> usize {
        self.inner.lock().unwrap().jobs.len()
    }
}

impl Default for ScanQueue {
    fn default() -> Self {
        Self::new()
    }
}
