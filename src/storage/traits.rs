//! Storage traits and error types
//!
//! This module defines the trait interface for storage backends and
//! associated error types.

use crate::item::ItemRecord;
use crate::output::TaskFailure;
use crate::state::TaskOutcome;
use crate::storage::{RunRecord, RunStatus};
use std::collections::HashMap;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Run not found: {0}")]
    RunNotFound(i64),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Corrupt row in {table}: {message}")]
    CorruptRow { table: &'static str, message: String },

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for storage backend implementations
///
/// This trait defines every database operation the sinks and the `--stats`
/// report need.
pub trait Storage {
    // ===== Run Management =====

    /// Creates a new crawl run in the `running` state
    ///
    /// # Arguments
    ///
    /// * `config_hash` - Hash of the configuration file
    ///
    /// # Returns
    ///
    /// The ID of the newly created run
    fn create_run(&mut self, config_hash: &str) -> StorageResult<i64>;

    /// Gets a run by ID
    fn get_run(&self, run_id: i64) -> StorageResult<RunRecord>;

    /// Gets the most recently created run, if any
    fn get_latest_run(&self) -> StorageResult<Option<RunRecord>>;

    /// Stamps the finish time and terminal status of a run
    fn finish_run(&mut self, run_id: i64, status: RunStatus) -> StorageResult<()>;

    // ===== Items =====

    /// Inserts one item record
    ///
    /// # Returns
    ///
    /// The row ID of the inserted item
    fn insert_item(&mut self, run_id: i64, item: &ItemRecord) -> StorageResult<i64>;

    /// Counts the items of a run
    fn count_items(&self, run_id: i64) -> StorageResult<u64>;

    /// Counts the items of a run per top-level category, largest first
    fn count_items_by_category(&self, run_id: i64) -> StorageResult<Vec<(String, u64)>>;

    // ===== Failures =====

    /// Records a page-level failure
    fn insert_failure(&mut self, run_id: i64, failure: &TaskFailure) -> StorageResult<()>;

    /// Loads every failure of a run in insertion order
    fn load_failures(&self, run_id: i64) -> StorageResult<Vec<TaskFailure>>;

    /// Counts the failures of a run per outcome
    fn count_failures_by_outcome(&self, run_id: i64) -> StorageResult<HashMap<TaskOutcome, u64>>;
}
