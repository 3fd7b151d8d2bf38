//! Output module for item records and crawl summaries
//!
//! This module handles:
//! - Writing item records to one or more sinks (JSON lines, SQLite, memory)
//! - Recording page-level failures
//! - Printing crawl summaries and stored run statistics

mod jsonl;
mod memory;
mod sqlite_output;
pub mod stats;
mod traits;

pub use jsonl::JsonLinesSink;
pub use memory::{FanOutSink, MemorySink};
pub use sqlite_output::SqliteSink;
pub use stats::{load_statistics, print_statistics, print_summary, write_summary, RunStatistics};
pub use traits::{CrawlSummary, ItemSink, OutputError, OutputResult, TaskFailure};

use crate::config::OutputConfig;
use crate::storage::open_storage;
use crate::CatalogError;
use std::path::Path;

/// Builds the sinks named by the output configuration
///
/// A JSON-lines file and a database may both be configured; with neither,
/// records go to stdout as JSON lines.
///
/// # Arguments
///
/// * `config` - The output configuration
/// * `config_hash` - Hash recorded with the database run
///
/// # Returns
///
/// * `Ok(FanOutSink)` - One inner sink per configured destination
/// * `Err(CatalogError)` - A destination could not be opened
pub fn build_sinks(config: &OutputConfig, config_hash: &str) -> Result<FanOutSink, CatalogError> {
    let mut sinks = FanOutSink::new();

    if let Some(path) = &config.jsonl_path {
        tracing::info!("Writing items to {}", path);
        sinks.push(Box::new(JsonLinesSink::create(Path::new(path))?));
    }

    if let Some(path) = &config.database_path {
        let storage = open_storage(Path::new(path))?;
        sinks.push(Box::new(SqliteSink::new(storage, config_hash)?));
    }

    if sinks.is_empty() {
        sinks.push(Box::new(JsonLinesSink::stdout()));
    }

    Ok(sinks)
}
