//! Scheduler for managing the crawl frontier and concurrency
//!
//! This module handles:
//! - FIFO queue of tasks waiting to be fetched
//! - Dropping tasks whose URL was already scheduled
//! - Global concurrency limiting via a semaphore

use crate::crawler::task::CrawlTask;
use std::collections::{HashSet, VecDeque};
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// A task cleared for dispatch, holding one concurrency permit
///
/// The permit is released when the value (or the worker owning it) drops.
pub struct ScheduledTask {
    /// The task to execute
    pub task: CrawlTask,

    /// The semaphore permit for this fetch
    pub permit: OwnedSemaphorePermit,
}

/// Scheduler manages the frontier queue and the fetch concurrency bound
///
/// The scheduler coordinates:
/// - Global concurrency limits (max fetches in flight)
/// - At-most-once scheduling per URL
/// - First-in first-out task selection from the frontier
pub struct Scheduler {
    /// Global semaphore for limiting concurrent fetches
    semaphore: Arc<Semaphore>,

    /// Concurrency bound the semaphore was created with
    max_concurrent: usize,

    /// Tasks waiting to be dispatched, oldest first
    frontier: VecDeque<CrawlTask>,

    /// URLs ever accepted into the frontier
    scheduled: HashSet<String>,
}

impl Scheduler {
    /// Creates a new scheduler
    ///
    /// # Arguments
    ///
    /// * `max_concurrent` - Maximum number of fetches in flight; clamped to 1
    pub fn new(max_concurrent: usize) -> Self {
        let max_concurrent = max_concurrent.max(1);

        Self {
            semaphore: Arc::new(Semaphore::new(max_concurrent)),
            max_concurrent,
            frontier: VecDeque::new(),
            scheduled: HashSet::new(),
        }
    }

    /// Adds a task to the back of the frontier
    ///
    /// # Returns
    ///
    /// * `true` - The task was queued
    /// * `false` - Its URL was already scheduled; the task was dropped
    pub fn enqueue(&mut self, task: CrawlTask) -> bool {
        if !self.scheduled.insert(task.url().as_str().to_string()) {
            return false;
        }

        self.frontier.push_back(task);
        true
    }

    /// Gets the next task to dispatch
    ///
    /// Never waits: a task is returned only when the frontier is non-empty
    /// and a permit is free right now.
    ///
    /// # Returns
    ///
    /// * `Some(ScheduledTask)` - The oldest queued task with its permit
    /// * `None` - The frontier is empty or every permit is in use
    pub fn next_task(&mut self) -> Option<ScheduledTask> {
        if self.frontier.is_empty() {
            return None;
        }

        let permit = Arc::clone(&self.semaphore).try_acquire_owned().ok()?;
        let task = self.frontier.pop_front()?;

        Some(ScheduledTask { task, permit })
    }

    /// Removes every queued task without dispatching it
    ///
    /// # Returns
    ///
    /// The tasks that were still waiting, oldest first
    pub fn drain(&mut self) -> Vec<CrawlTask> {
        self.frontier.drain(..).collect()
    }

    /// Returns the number of tasks waiting in the frontier
    pub fn frontier_size(&self) -> usize {
        self.frontier.len()
    }

    /// Returns the number of permits currently held by running fetches
    pub fn in_flight(&self) -> usize {
        self.max_concurrent - self.semaphore.available_permits()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::BrowsePath;
    use url::Url;

    fn item(url: &str) -> CrawlTask {
        CrawlTask::item(Url::parse(url).unwrap(), BrowsePath::root().child("A"))
    }

    #[test]
    fn test_scheduler_creation() {
        let scheduler = Scheduler::new(4);
        assert_eq!(scheduler.frontier_size(), 0);
        assert_eq!(scheduler.in_flight(), 0);
        assert_eq!(scheduler.frontier_size(), 0);
    }

    #[test]
    fn test_fifo_order() {
        let mut scheduler = Scheduler::new(10);
        scheduler.enqueue(item("https://example.com/1"));
        scheduler.enqueue(item("https://example.com/2"));
        scheduler.enqueue(item("https://example.com/3"));

        let order: Vec<String> = std::iter::from_fn(|| scheduler.next_task())
            .map(|s| s.task.url().path().to_string())
            .collect();

        assert_eq!(order, vec!["/1", "/2", "/3"]);
    }

    #[test]
    fn test_duplicate_url_dropped() {
        let mut scheduler = Scheduler::new(2);
        assert!(scheduler.enqueue(item("https://example.com/a")));
        assert!(!scheduler.enqueue(item("https://example.com/a")));
        assert_eq!(scheduler.frontier_size(), 1);

        // Still a duplicate after the first copy was dispatched
        let _scheduled = scheduler.next_task().unwrap();
        assert!(!scheduler.enqueue(item("https://example.com/a")));
        assert_eq!(scheduler.frontier_size(), 0);
    }

    #[test]
    fn test_concurrency_bound() {
        let mut scheduler = Scheduler::new(2);
        for i in 0..3 {
            scheduler.enqueue(item(&format!("https://example.com/{}", i)));
        }

        let first = scheduler.next_task().unwrap();
        let _second = scheduler.next_task().unwrap();
        assert_eq!(scheduler.in_flight(), 2);
        assert!(scheduler.next_task().is_none());
        assert_eq!(scheduler.frontier_size(), 1);

        drop(first);
        assert_eq!(scheduler.in_flight(), 1);
        assert!(scheduler.next_task().is_some());
    }

    #[test]
    fn test_zero_concurrency_clamped() {
        let mut scheduler = Scheduler::new(0);
        scheduler.enqueue(item("https://example.com/x"));
        assert!(scheduler.next_task().is_some());
    }

    #[test]
    fn test_drain() {
        let mut scheduler = Scheduler::new(1);
        scheduler.enqueue(item("https://example.com/1"));
        scheduler.enqueue(item("https://example.com/2"));

        let drained = scheduler.drain();
        assert_eq!(drained.len(), 2);
        assert_eq!(scheduler.frontier_size(), 0);
        assert!(scheduler.next_task().is_none());
    }
}
