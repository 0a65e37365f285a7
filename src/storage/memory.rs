//! In-memory scan store
//!
//! Records every write in arrival order so tests can assert on transition
//! sequences and result-row counts. Also usable by embedding callers that
//! handle persistence elsewhere.

use crate::storage::traits::{ScanResultRecord, ScanStatus, ScanStore, StorageResult};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Debug, Default)]
struct MemoryInner {
    /// Every status write, in arrival order
    status_log: Vec<(String, ScanStatus)>,

    /// Latest score per scan
    scores: HashMap<String, u8>,

    /// Every result row, in arrival order
    results: Vec<ScanResultRecord>,
}

/// In-memory implementation of [`ScanStore`]
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<MemoryInner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// All status writes for a scan, in the order they arrived
    pub fn status_history(&self, scan_id: &str) -> Vec<ScanStatus> {
        self.inner
            .lock()
            .unwrap()
            .status_log
            .iter()
            .filter(|(id, _)| id == scan_id)
            .map(|(_, status)| *status)
            .collect()
    }

    /// The most recent status write for a scan
    pub fn latest_status(&self, scan_id: &str) -> Option<ScanStatus> {
        self.status_history(scan_id).last().copied()
    }

    /// The latest score written for a scan
    pub fn score(&self, scan_id: &str) -> Option<u8> {
        self.inner.lock().unwrap().scores.get(scan_id).copied()
    }

    /// Result rows for a scan, in arrival order
    pub fn results_for(&self, scan_id: &str) -> Vec<ScanResultRecord> {
        self.inner
            .lock()
            .unwrap()
            .results
            .iter()
            .filter(|r| r.scan_id == scan_id)
            .cloned()
            .collect()
    }

    /// Total number of result rows across all scans
    pub fn result_count(&self) -> usize {
        self.inner.lock().unwrap().results.len()
    }
}

#[async_trait]
impl ScanStore for MemoryStore {
    async fn update_scan_status(&self, scan_id: &str, status: ScanStatus) -> StorageResult<()> {
        self.inner
            .lock()
            .unwrap()
            .status_log
            .push((scan_id.to_string(), status));
        Ok(())
    }

    async fn set_scan_score(&self, scan_id: &str, score: u8) -> StorageResult<()> {
        self.inner
            .lock()
            .unwrap()
            .scores
            .insert(scan_id.to_string(), score);
        Ok(())
    }

    async fn create_scan_result(&self, record: ScanResultRecord) -> StorageResult<()> {
        self.inner.lock().unwrap().results.push(record);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn record(scan_id: &str, page_url: &str) -> ScanResultRecord {
        ScanResultRecord {
            scan_id: scan_id.to_string(),
            page_url: page_url.to_string(),
            error_count: 2,
            warnings: 1,
            score: 80,
            violations: serde_json::json!([]),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_status_history_preserves_order() {
        let store = MemoryStore::new();
        store
            .update_scan_status("scan-1", ScanStatus::InProgress)
            .await
            .unwrap();
        store
            .update_scan_status("scan-1", ScanStatus::Running)
            .await
            .unwrap();
        store
            .update_scan_status("scan-1", ScanStatus::Completed)
            .await
            .unwrap();
        store
            .update_scan_status("scan-2", ScanStatus::Failed)
            .await
            .unwrap();

        assert_eq!(
            store.status_history("scan-1"),
            vec![
                ScanStatus::InProgress,
                ScanStatus::Running,
                ScanStatus::Completed
            ]
        );
        assert_eq!(store.latest_status("scan-2"), Some(ScanStatus::Failed));
    }

    #[tokio::test]
    async fn test_score_last_write_wins() {
        let store = MemoryStore::new();
        store.set_scan_score("scan-1", 60).await.unwrap();
        store.set_scan_score("scan-1", 80).await.unwrap();
        assert_eq!(store.score("scan-1"), Some(80));
    }

    #[tokio::test]
    async fn test_results_filtered_by_scan() {
        let store = MemoryStore::new();
        store
            .create_scan_result(record("scan-1", "https://example.com/a"))
            .await
            .unwrap();
        store
            .create_scan_result(record("scan-2", "https://example.com/b"))
            .await
            .unwrap();

        assert_eq!(store.result_count(), 2);
        let rows = store.results_for("scan-1");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].page_url, "https://example.com/a");
    }
}
