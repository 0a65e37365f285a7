//! Job identity, lifecycle state, and progress reporting

use tokio::sync::watch;

/// One scheduled page scan
///
/// Immutable after enqueue. `project_id` and `scan_id` are opaque strings
/// owned by the caller and are passed through to storage untouched.
#[derive(Debug, Clone)]
pub struct ScanJob {
    pub id: u64,
    pub url: String,
    pub project_id: String,
    pub scan_id: String,
}

/// Lifecycle state of a scan job
///
/// `InProgress` means a worker has claimed the job but the page has not
/// loaded yet; `Running` means the page is loaded and the audit is underway.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    Pending,
    InProgress,
    Running,
    Completed,
    Failed,
}

impl JobState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobState::Completed | JobState::Failed)
    }
}

/// Snapshot of a job's progress, published through a watch channel
///
/// `percent` is monotone within a single attempt and resets to the claim
/// checkpoint when a retry begins. `attempt` is 1-based; 0 means the job has
/// not been claimed yet.
#[derive(Debug, Clone)]
pub struct JobProgress {
    pub state: JobState,
    pub percent: u8,
    pub attempt: u32,
    pub error: Option<String>,
}

impl JobProgress {
    pub(crate) fn pending() -> Self {
        Self {
            state: JobState::Pending,
            percent: 0,
            attempt: 0,
            error: None,
        }
    }
}

/// Worker-side end of a job's progress channel
pub(crate) struct ProgressSender {
    tx: watch::Sender<JobProgress>,
}

impl ProgressSender {
    pub(crate) fn new(tx: watch::Sender<JobProgress>) -> Self {
        Self { tx }
    }

    /// Publishes a checkpoint; send errors mean every handle was dropped,
    /// which is not a worker failure
    pub(crate) fn set(&self, state: JobState, percent: u8, attempt: u32) {
        let _ = self.tx.send(JobProgress {
            state,
            percent,
            attempt,
            error: None,
        });
    }

    pub(crate) fn fail(&self, attempt: u32, message: String) {
        let _ = self.tx.send(JobProgress {
            state: JobState::Failed,
            percent: 100,
            attempt,
            error: Some(message),
        });
    }
}

/// Caller-side view of an enqueued job
///
/// Holds the receiving end of the progress channel. [`JobHandle::wait`]
/// resolves when the job reaches a terminal state.
pub struct JobHandle {
    pub id: u64,
    pub url: String,
    progress: watch::Receiver<JobProgress>,
}

impl JobHandle {
    pub(crate) fn new(id: u64, url: String, progress: watch::Receiver<JobProgress>) -> Self {
        Self { id, url, progress }
    }

    /// Current progress snapshot without waiting
    pub fn progress(&self) -> JobProgress {
        self.progress.borrow().clone()
    }

    /// Waits until the job completes or fails and returns the final snapshot
    ///
    /// If the sending side is dropped before a terminal state is published,
    /// the last observed snapshot is returned as-is.
    pub async fn wait(&mut self) -> JobProgress {
        loop {
            let snapshot = self.progress.borrow().clone();
            if snapshot.state.is_terminal() {
                return snapshot;
            }
            if self.progress.changed().await.is_err() {
                return self.progress.borrow().clone();
            }
        }
    }
}
