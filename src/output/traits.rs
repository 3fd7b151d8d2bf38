//! Output sink trait and types
//!
//! This module defines the trait interface for item sinks and the data
//! structures describing failed tasks and crawl summaries.

use crate::crawler::{BrowsePath, CrawlTask, TaskKind};
use crate::item::ItemRecord;
use crate::state::TaskOutcome;
use crate::storage::StorageError;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to serialize record: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// A task that ended in a page-level failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskFailure {
    /// The URL that failed
    pub url: String,

    /// Breadcrumb of the failed task
    pub path: BrowsePath,

    /// Handler the page was destined for
    pub kind: TaskKind,

    /// `FetchFailed` or `ParseFailed`
    pub outcome: TaskOutcome,

    /// Error message
    pub message: String,
}

impl TaskFailure {
    /// Describes a failure of `task`
    pub fn for_task(task: &CrawlTask, outcome: TaskOutcome, message: impl Into<String>) -> Self {
        Self {
            url: task.url().to_string(),
            path: task.path().clone(),
            kind: task.kind(),
            outcome,
            message: message.into(),
        }
    }
}

/// Summary statistics for a crawl
#[derive(Debug, Clone)]
pub struct CrawlSummary {
    // Run metadata
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub interrupted: bool,

    /// Tasks handed to a worker, per task kind
    pub dispatched: BTreeMap<TaskKind, u64>,

    /// Tasks whose page was fetched and handled
    pub processed: u64,

    pub items_emitted: u64,

    /// Items written with at least one required field absent
    pub partial_items: u64,

    /// Tasks dropped because their URL was already scheduled
    pub duplicates_dropped: u64,

    /// Tasks never dispatched because the crawl was stopped
    pub cancelled: u64,

    /// Page-level failures per (task kind, outcome)
    pub failures: BTreeMap<(TaskKind, TaskOutcome), u64>,
}

impl Default for CrawlSummary {
    fn default() -> Self {
        Self::new()
    }
}

impl CrawlSummary {
    /// Creates an empty summary stamped with the current time
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            interrupted: false,
            dispatched: BTreeMap::new(),
            processed: 0,
            items_emitted: 0,
            partial_items: 0,
            duplicates_dropped: 0,
            cancelled: 0,
            failures: BTreeMap::new(),
        }
    }

    pub fn record_dispatch(&mut self, kind: TaskKind) {
        *self.dispatched.entry(kind).or_insert(0) += 1;
    }

    pub fn record_failure(&mut self, failure: &TaskFailure) {
        *self
            .failures
            .entry((failure.kind, failure.outcome))
            .or_insert(0) += 1;
    }

    /// Stamps the finish time
    pub fn finish(&mut self, interrupted: bool) {
        self.finished_at = Some(Utc::now());
        self.interrupted = interrupted;
    }

    /// Total tasks dispatched across all kinds
    pub fn total_dispatched(&self) -> u64 {
        self.dispatched.values().sum()
    }

    /// Dispatched count for one task kind
    pub fn dispatched_of(&self, kind: TaskKind) -> u64 {
        self.dispatched.get(&kind).copied().unwrap_or(0)
    }

    /// Total page-level failures
    pub fn total_failures(&self) -> u64 {
        self.failures.values().sum()
    }

    /// Failures with the given outcome, across task kinds
    pub fn failures_with(&self, outcome: TaskOutcome) -> u64 {
        self.failures
            .iter()
            .filter(|((_, o), _)| *o == outcome)
            .map(|(_, count)| count)
            .sum()
    }

    /// Wall-clock duration in seconds, once finished
    pub fn duration_seconds(&self) -> Option<i64> {
        self.finished_at
            .map(|finished| (finished - self.started_at).num_seconds())
    }
}

/// Trait for item sinks
///
/// The coordinator is the only caller and invokes a sink from a single task,
/// one whole record at a time. Implementations may still be moved across
/// threads with the crawl future.
pub trait ItemSink: Send {
    /// Writes one complete item record
    ///
    /// # Arguments
    ///
    /// * `item` - The record to write
    fn write_item(&mut self, item: &ItemRecord) -> OutputResult<()>;

    /// Records a page-level failure
    ///
    /// The default implementation discards it; failures are always logged
    /// by the coordinator.
    fn record_failure(&mut self, failure: &TaskFailure) -> OutputResult<()> {
        let _ = failure;
        Ok(())
    }

    /// Finalizes the output, performing any cleanup or final writes
    ///
    /// # Arguments
    ///
    /// * `summary` - The finished crawl summary
    fn finalize(&mut self, summary: &CrawlSummary) -> OutputResult<()> {
        let _ = summary;
        Ok(())
    }

    /// Closes the output after the crawl stopped on an error
    ///
    /// Called instead of [`finalize`](ItemSink::finalize) when a sink write
    /// failed. Everything written so far must stay readable.
    fn abort(&mut self, summary: &CrawlSummary) -> OutputResult<()> {
        let _ = summary;
        Ok(())
    }
}

impl<S: ItemSink + ?Sized> ItemSink for Box<S> {
    fn write_item(&mut self, item: &ItemRecord) -> OutputResult<()> {
        (**self).write_item(item)
    }

    fn record_failure(&mut self, failure: &TaskFailure) -> OutputResult<()> {
        (**self).record_failure(failure)
    }

    fn finalize(&mut self, summary: &CrawlSummary) -> OutputResult<()> {
        (**self).finalize(summary)
    }

    fn abort(&mut self, summary: &CrawlSummary) -> OutputResult<()> {
        (**self).abort(summary)
    }
}
