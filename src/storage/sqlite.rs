//! SQLite storage implementation
//!
//! SQLite-backed implementation of the ScanStore contract, used by the CLI.
//! The connection lives behind a mutex; every store call is a single short
//! statement, so contention stays negligible next to the network work.

use crate::storage::traits::{ScanResultRecord, ScanStatus, ScanStore, StorageError, StorageResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::Mutex;

/// SQL schema for scans and per-page scan results
const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS scans (
    scan_id TEXT PRIMARY KEY,
    status TEXT NOT NULL,
    score INTEGER,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS scan_results (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    scan_id TEXT NOT NULL,
    page_url TEXT NOT NULL,
    error_count INTEGER NOT NULL,
    warnings INTEGER NOT NULL,
    score INTEGER NOT NULL,
    violations TEXT NOT NULL,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_scan_results_scan ON scan_results(scan_id);
"#;

/// SQLite storage backend
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Opens (or creates) the database at the given path
    pub fn new(path: &Path) -> StorageResult<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
        ",
        )?;

        conn.execute_batch(SCHEMA_SQL)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Creates an in-memory database (for testing)
    pub fn new_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA_SQL)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Reads a scan's current status and score
    pub fn get_scan(&self, scan_id: &str) -> StorageResult<Option<(ScanStatus, Option<u8>)>> {
        let conn = self.conn.lock().unwrap();
        let row = conn
            .query_row(
                "SELECT status, score FROM scans WHERE scan_id = ?1",
                params![scan_id],
                |row| {
                    let status: String = row.get(0)?;
                    let score: Option<u8> = row.get(1)?;
                    Ok((status, score))
                },
            )
            .optional()?;

        match row {
            Some((status, score)) => {
                let status = ScanStatus::from_db_string(&status).ok_or_else(|| {
                    StorageError::Database(format!("unknown scan status: {}", status))
                })?;
                Ok(Some((status, score)))
            }
            None => Ok(None),
        }
    }

    /// Reads all result rows for a scan, oldest first
    pub fn results_for(&self, scan_id: &str) -> StorageResult<Vec<ScanResultRecord>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT scan_id, page_url, error_count, warnings, score, violations, created_at
             FROM scan_results WHERE scan_id = ?1 ORDER BY id",
        )?;

        let rows = stmt.query_map(params![scan_id], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, i64>(2)?,
                row.get::<_, i64>(3)?,
                row.get::<_, u8>(4)?,
                row.get::<_, String>(5)?,
                row.get::<_, String>(6)?,
            ))
        })?;

        let mut records = Vec::new();
        for row in rows {
            let (scan_id, page_url, error_count, warnings, score, violations, created_at) = row?;
            let violations = serde_json::from_str(&violations)
                .map_err(|e| StorageError::Serialization(e.to_string()))?;
            let created_at = DateTime::parse_from_rfc3339(&created_at)
                .map_err(|e| StorageError::Database(format!("bad timestamp: {}", e)))?
                .with_timezone(&Utc);
            records.push(ScanResultRecord {
                scan_id,
                page_url,
                error_count: error_count as usize,
                warnings: warnings as usize,
                score,
                violations,
                created_at,
            });
        }
        Ok(records)
    }
}

#[async_trait]
impl ScanStore for SqliteStore {
    async fn update_scan_status(&self, scan_id: &str, status: ScanStatus) -> StorageResult<()> {
        let now = Utc::now().to_rfc3339();
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO scans (scan_id, status, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(scan_id) DO UPDATE SET status = ?2, updated_at = ?3",
            params![scan_id, status.to_db_string(), now],
        )?;
        Ok(())
    }

    async fn set_scan_score(&self, scan_id: &str, score: u8) -> StorageResult<()> {
        let now = Utc::now().to_rfc3339();
        let conn = self.conn.lock().unwrap();
        let updated = conn.execute(
            "UPDATE scans SET score = ?2, updated_at = ?3 WHERE scan_id = ?1",
            params![scan_id, score, now],
        )?;

        if updated == 0 {
            return Err(StorageError::ScanNotFound(scan_id.to_string()));
        }
        Ok(())
    }

    async fn create_scan_result(&self, record: ScanResultRecord) -> StorageResult<()> {
        let violations = serde_json::to_string(&record.violations)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO scan_results
             (scan_id, page_url, error_count, warnings, score, violations, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                record.scan_id,
                record.page_url,
                record.error_count as i64,
                record.warnings as i64,
                record.score,
                violations,
                record.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(scan_id: &str) -> ScanResultRecord {
        ScanResultRecord {
            scan_id: scan_id.to_string(),
            page_url: "https://example.com/page".to_string(),
            error_count: 5,
            warnings: 1,
            score: 60,
            violations: json!([{"id": "image-alt", "elements": []}]),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_status_upsert() {
        let store = SqliteStore::new_in_memory().unwrap();

        store
            .update_scan_status("scan-1", ScanStatus::InProgress)
            .await
            .unwrap();
        assert_eq!(
            store.get_scan("scan-1").unwrap(),
            Some((ScanStatus::InProgress, None))
        );

        store
            .update_scan_status("scan-1", ScanStatus::Completed)
            .await
            .unwrap();
        assert_eq!(
            store.get_scan("scan-1").unwrap(),
            Some((ScanStatus::Completed, None))
        );
    }

    #[tokio::test]
    async fn test_score_requires_existing_scan() {
        let store = SqliteStore::new_in_memory().unwrap();
        let err = store.set_scan_score("missing", 80).await.unwrap_err();
        assert!(matches!(err, StorageError::ScanNotFound(_)));
    }

    #[tokio::test]
    async fn test_result_row_round_trip() {
        let store = SqliteStore::new_in_memory().unwrap();
        store
            .update_scan_status("scan-1", ScanStatus::Running)
            .await
            .unwrap();
        store.create_scan_result(record("scan-1")).await.unwrap();
        store.set_scan_score("scan-1", 60).await.unwrap();

        let rows = store.results_for("scan-1").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].error_count, 5);
        assert_eq!(rows[0].warnings, 1);
        assert_eq!(rows[0].score, 60);
        assert_eq!(rows[0].violations[0]["id"], "image-alt");

        assert_eq!(
            store.get_scan("scan-1").unwrap(),
            Some((ScanStatus::Running, Some(60)))
        );
    }

    #[tokio::test]
    async fn test_file_backed_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sweep.db");
        let store = SqliteStore::new(&path).unwrap();
        store
            .update_scan_status("scan-1", ScanStatus::Pending)
            .await
            .unwrap();
        drop(store);

        let reopened = SqliteStore::new(&path).unwrap();
        assert_eq!(
            reopened.get_scan("scan-1").unwrap(),
            Some((ScanStatus::Pending, None))
        );
    }
}
