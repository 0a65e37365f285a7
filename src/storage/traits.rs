//! Storage trait and associated types
//!
//! Failures of any of these calls are part of a job's critical path: a write
//! that does not land means downstream state would be inconsistent, so the
//! caller treats it as a job failure subject to the retry policy.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Scan not found: {0}")]
    ScanNotFound(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Externally persisted lifecycle state of a scan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScanStatus {
    /// Scan created, no job claimed yet
    Pending,

    /// A worker has claimed a job, before page navigation
    InProgress,

    /// Page loaded, audit underway
    Running,

    /// Audit, scoring, and persistence finished
    Completed,

    /// Unrecovered error after all attempts
    Failed,
}

impl ScanStatus {
    /// Returns true if no further transitions are expected
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    /// Converts the status to its database string representation
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    /// Parses a status from its database string representation
    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "in_progress" => Some(Self::InProgress),
            "running" => Some(Self::Running),
            "completed" => Some(Self::Completed),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }
}

impl std::fmt::Display for ScanStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.to_db_string())
    }
}

/// One persisted per-page scan result row
#[derive(Debug, Clone)]
pub struct ScanResultRecord {
    pub scan_id: String,
    pub page_url: String,
    pub error_count: usize,
    pub warnings: usize,
    pub score: u8,
    /// JSON-serialized processed violations
    pub violations: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

/// The storage collaborator contract
///
/// The core calls these at defined lifecycle points and never holds scan
/// state itself beyond job execution.
#[async_trait]
pub trait ScanStore: Send + Sync {
    /// Records a lifecycle transition for a scan
    async fn update_scan_status(&self, scan_id: &str, status: ScanStatus) -> StorageResult<()>;

    /// Writes the score onto the parent scan record
    async fn set_scan_score(&self, scan_id: &str, score: u8) -> StorageResult<()>;

    /// Appends one per-page result row
    async fn create_scan_result(&self, record: ScanResultRecord) -> StorageResult<()>;
}
