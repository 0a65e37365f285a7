//! Storage collaborator for scan lifecycle state and results
//!
//! The pipeline does not own scan persistence; it only requests status
//! transitions, a final score, and result rows through the narrow
//! [`ScanStore`] contract. Two implementations ship here: an in-memory store
//! used by tests and embedding callers, and a SQLite backend for the CLI.

mod memory;
mod sqlite;
mod traits;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use traits::{ScanResultRecord, ScanStatus, ScanStore, StorageError, StorageResult};
