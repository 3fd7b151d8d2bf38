//! Crawl summaries and stored statistics
//!
//! This module renders the in-process [`CrawlSummary`] at the end of a crawl
//! and extracts per-run statistics from the storage layer for `--stats`.

use crate::output::traits::CrawlSummary;
use crate::state::TaskOutcome;
use crate::storage::{RunRecord, Storage, StorageResult};
use std::collections::HashMap;
use std::io::{self, Write};

/// Statistics of one stored run
#[derive(Debug, Clone)]
pub struct RunStatistics {
    pub run: RunRecord,

    /// Total number of items recorded
    pub total_items: u64,

    /// Items per top-level category, largest first
    pub items_by_category: Vec<(String, u64)>,

    /// Failures per outcome
    pub failures_by_outcome: HashMap<TaskOutcome, u64>,
}

/// Loads statistics of the latest run from storage
///
/// # Arguments
///
/// * `storage` - The storage backend to query
///
/// # Returns
///
/// * `Ok(Some(RunStatistics))` - Statistics of the latest run
/// * `Ok(None)` - The database holds no runs
/// * `Err(StorageError)` - Failed to query statistics
pub fn load_statistics(storage: &dyn Storage) -> StorageResult<Option<RunStatistics>> {
    let run = match storage.get_latest_run()? {
        Some(run) => run,
        None => return Ok(None),
    };

    Ok(Some(RunStatistics {
        total_items: storage.count_items(run.id)?,
        items_by_category: storage.count_items_by_category(run.id)?,
        failures_by_outcome: storage.count_failures_by_outcome(run.id)?,
        run,
    }))
}

/// Prints stored run statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `stats` - The statistics to display
pub fn print_statistics(stats: &RunStatistics) {
    println!("=== Run {} Statistics ===\n", stats.run.id);

    println!("Overview:");
    println!("  Status: {}", stats.run.status.to_db_string());
    println!("  Started: {}", stats.run.started_at);
    if let Some(finished) = &stats.run.finished_at {
        println!("  Finished: {}", finished);
    }
    println!("  Config hash: {}", stats.run.config_hash);
    println!("  Items recorded: {}", stats.total_items);
    println!();

    if !stats.items_by_category.is_empty() {
        println!("Items by Category:");
        for (category, count) in &stats.items_by_category {
            let percentage = if stats.total_items > 0 {
                (*count as f64 / stats.total_items as f64) * 100.0
            } else {
                0.0
            };
            let name = if category.is_empty() { "(root)" } else { category };
            println!("  {}: {} ({:.1}%)", name, count, percentage);
        }
        println!();
    }

    if !stats.failures_by_outcome.is_empty() {
        println!("Failure Summary:");
        let mut failure_counts: Vec<_> = stats.failures_by_outcome.iter().collect();
        failure_counts.sort_by(|a, b| b.1.cmp(a.1).then(a.0.cmp(b.0)));

        for (outcome, count) in failure_counts {
            println!("  {}: {}", outcome, count);
        }
        println!();
    }
}

/// Prints the summary of a finished crawl to stdout
///
/// # Arguments
///
/// * `summary` - The summary returned by the coordinator
pub fn print_summary(summary: &CrawlSummary) {
    // Nothing useful can be done if stdout is gone
    let _ = write_summary(&mut io::stdout().lock(), summary);
}

/// Writes the summary of a finished crawl in the `print_summary` format
pub fn write_summary<W: Write>(out: &mut W, summary: &CrawlSummary) -> io::Result<()> {
    let status = if summary.interrupted {
        "interrupted"
    } else {
        "completed"
    };
    writeln!(out, "=== Crawl Summary ({}) ===\n", status)?;

    writeln!(out, "Run:")?;
    writeln!(out, "  Started: {}", summary.started_at.to_rfc3339())?;
    if let Some(finished) = summary.finished_at {
        writeln!(out, "  Finished: {}", finished.to_rfc3339())?;
    }
    if let Some(seconds) = summary.duration_seconds() {
        writeln!(out, "  Duration: {}s", seconds)?;
    }
    writeln!(out)?;

    writeln!(out, "Tasks Dispatched ({}):", summary.total_dispatched())?;
    for (kind, count) in &summary.dispatched {
        writeln!(out, "  {}: {}", kind, count)?;
    }
    writeln!(out)?;

    writeln!(out, "Items:")?;
    writeln!(out, "  Emitted: {}", summary.items_emitted)?;
    writeln!(out, "  With missing fields: {}", summary.partial_items)?;
    writeln!(out, "  Duplicate URLs dropped: {}", summary.duplicates_dropped)?;
    if summary.cancelled > 0 {
        writeln!(out, "  Tasks cancelled: {}", summary.cancelled)?;
    }
    writeln!(out)?;

    if summary.failures.is_empty() {
        writeln!(out, "No page-level failures.")?;
    } else {
        writeln!(out, "Failures ({}):", summary.total_failures())?;
        for ((kind, outcome), count) in &summary.failures {
            writeln!(out, "  {} / {}: {}", kind, outcome, count)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::{BrowsePath, TaskKind};
    use crate::item::ItemRecord;
    use crate::output::TaskFailure;
    use crate::storage::{RunStatus, SqliteStorage};

    #[test]
    fn test_load_statistics_empty_database() {
        let storage = SqliteStorage::new_in_memory().unwrap();
        assert!(load_statistics(&storage).unwrap().is_none());
    }

    #[test]
    fn test_load_statistics_latest_run() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        let old_run = storage.create_run("old").unwrap();
        storage.finish_run(old_run, RunStatus::Completed).unwrap();
        let run_id = storage.create_run("new").unwrap();

        storage
            .insert_item(
                run_id,
                &ItemRecord {
                    url: "http://example.com/item/1".to_string(),
                    title: Some("Harbor".to_string()),
                    image: None,
                    height: None,
                    width: None,
                    description: None,
                    artist: vec![],
                    path: BrowsePath::root().child("Summertime"),
                },
            )
            .unwrap();
        storage
            .insert_failure(
                run_id,
                &TaskFailure {
                    url: "http://example.com/item/2".to_string(),
                    path: BrowsePath::root().child("Summertime"),
                    kind: TaskKind::Item,
                    outcome: TaskOutcome::ParseFailed,
                    message: "no title".to_string(),
                },
            )
            .unwrap();

        let stats = load_statistics(&storage).unwrap().unwrap();
        assert_eq!(stats.run.id, run_id);
        assert_eq!(stats.run.config_hash, "new");
        assert_eq!(stats.total_items, 1);
        assert_eq!(
            stats.items_by_category,
            vec![("Summertime".to_string(), 1)]
        );
        assert_eq!(
            stats.failures_by_outcome.get(&TaskOutcome::ParseFailed),
            Some(&1)
        );
    }

    #[test]
    fn test_write_summary() {
        let mut summary = CrawlSummary::new();
        summary.record_dispatch(TaskKind::Item);
        summary.items_emitted = 1;
        summary.record_failure(&TaskFailure {
            url: "http://example.com/item/2".to_string(),
            path: BrowsePath::root(),
            kind: TaskKind::Item,
            outcome: TaskOutcome::FetchFailed,
            message: "HTTP status 404".to_string(),
        });
        summary.finish(false);

        let mut out = Vec::new();
        write_summary(&mut out, &summary).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("=== Crawl Summary (completed) ==="));
        assert!(text.contains("  item: 1"));
        assert!(text.contains("  Emitted: 1"));
        assert!(text.contains("  item / fetch_failed: 1"));
    }
}
