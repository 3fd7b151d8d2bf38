//! SQLite-based sink implementation
//!
//! This module provides a sink that records items and failures directly to
//! the SQLite storage backend, inside a run row created when the sink opens.

use crate::item::ItemRecord;
use crate::output::traits::{CrawlSummary, ItemSink, OutputResult, TaskFailure};
use crate::storage::{RunStatus, SqliteStorage, Storage, StorageResult};

/// SQLite-based item sink
pub struct SqliteSink {
    storage: SqliteStorage,
    run_id: i64,
}

impl SqliteSink {
    /// Creates a new SQLite sink, starting a run
    ///
    /// # Arguments
    ///
    /// * `storage` - The storage backend to use
    /// * `config_hash` - Hash of the configuration the run uses
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteSink)` - Sink with a `running` run row
    /// * `Err(StorageError)` - Failed to create the run
    pub fn new(mut storage: SqliteStorage, config_hash: &str) -> StorageResult<Self> {
        let run_id = storage.create_run(config_hash)?;
        tracing::info!("Recording to database run {}", run_id);
        Ok(Self { storage, run_id })
    }

    pub fn run_id(&self) -> i64 {
        self.run_id
    }

    pub fn storage(&self) -> &SqliteStorage {
        &self.storage
    }
}

impl ItemSink for SqliteSink {
    fn write_item(&mut self, item: &ItemRecord) -> OutputResult<()> {
        self.storage.insert_item(self.run_id, item)?;
        Ok(())
    }

    fn record_failure(&mut self, failure: &TaskFailure) -> OutputResult<()> {
        self.storage.insert_failure(self.run_id, failure)?;
        Ok(())
    }

    fn finalize(&mut self, summary: &CrawlSummary) -> OutputResult<()> {
        let status = if summary.interrupted {
            RunStatus::Interrupted
        } else {
            RunStatus::Completed
        };
        self.storage.finish_run(self.run_id, status)?;
        Ok(())
    }

    fn abort(&mut self, _summary: &CrawlSummary) -> OutputResult<()> {
        self.storage.finish_run(self.run_id, RunStatus::Failed)?;
        Ok(())
    }
}
