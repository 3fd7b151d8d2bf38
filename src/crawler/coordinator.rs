//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the main crawl loop that coordinates all aspects of
//! the crawling process, including:
//! - Seeding the frontier with root category tasks
//! - Dispatching tasks to a bounded pool of workers
//! - Routing fetched pages to the category walker, the pagination walker or
//!   the item extractor
//! - Writing records and failures to the sink from a single place
//! - Handling the stop signal

use crate::config::Config;
use crate::crawler::fetcher::{Fetcher, HttpFetcher};
use crate::crawler::retry::{fetch_with_retry, RetryPolicy};
use crate::crawler::scheduler::{ScheduledTask, Scheduler};
use crate::crawler::task::{CrawlTask, TaskKind};
use crate::item::{extract_item, Field, ItemExtraction};
use crate::output::{CrawlSummary, ItemSink, TaskFailure};
use crate::page::HtmlPage;
use crate::state::TaskOutcome;
use crate::walker::{walk_category, walk_listing, WalkContext};
use crate::{CatalogError, ConfigError, FetchError, ParseError};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use url::Url;

/// Completed tasks between progress lines
const PROGRESS_INTERVAL: u64 = 25;

/// What a fetched page contributed
#[derive(Debug, Clone, PartialEq)]
pub enum PageOutput {
    /// Follow-up tasks from a category or listing page
    Tasks(Vec<CrawlTask>),

    /// The record extracted from an item page
    Item(ItemExtraction),
}

/// How a worker finished its task
#[derive(Debug)]
pub enum TaskResult {
    Page(PageOutput),
    Failed(TaskFailure),

    /// The stop signal fired while the fetch was backing off
    Cancelled,
}

/// A worker's report back to the coordinator
#[derive(Debug)]
pub struct TaskReport {
    pub task: CrawlTask,
    pub result: TaskResult,
}

/// Runs the handler for a fetched page
///
/// The parsed document lives only for the duration of this call.
///
/// # Arguments
///
/// * `ctx` - Shared walk context
/// * `task` - The task the page was fetched for
/// * `body` - The page content
///
/// # Returns
///
/// * `Ok(PageOutput)` - Follow-up tasks, or the extracted item
/// * `Err(ParseError)` - The page lacked the structure its handler needs
pub fn process_page(
    ctx: &WalkContext,
    task: &CrawlTask,
    body: &str,
) -> Result<PageOutput, ParseError> {
    let page = HtmlPage::parse(body);

    match task.kind() {
        TaskKind::Category { root } => {
            walk_category(&page, task.path(), root, ctx).map(PageOutput::Tasks)
        }
        TaskKind::Pagination => walk_listing(&page, task.path(), ctx).map(PageOutput::Tasks),
        TaskKind::Item => Ok(PageOutput::Item(extract_item(
            &page,
            task.url(),
            task.path(),
            ctx,
        ))),
    }
}

/// Worker body: fetch with retries, then handle the page
async fn execute_task(
    fetcher: Arc<dyn Fetcher>,
    ctx: Arc<WalkContext>,
    retry: RetryPolicy,
    cancel: CancellationToken,
    task: CrawlTask,
) -> TaskReport {
    let result = match fetch_with_retry(fetcher.as_ref(), task.url(), &retry, &cancel).await {
        Ok(body) => match process_page(&ctx, &task, &body) {
            Ok(output) => TaskResult::Page(output),
            Err(e) => TaskResult::Failed(TaskFailure::for_task(
                &task,
                TaskOutcome::ParseFailed,
                e.to_string(),
            )),
        },
        Err(FetchError::Cancelled) => TaskResult::Cancelled,
        Err(e) => TaskResult::Failed(TaskFailure::for_task(
            &task,
            TaskOutcome::FetchFailed,
            e.to_string(),
        )),
    };

    TaskReport { task, result }
}

/// Main crawler coordinator structure
pub struct Coordinator {
    context: Arc<WalkContext>,
    fetcher: Arc<dyn Fetcher>,
    scheduler: Scheduler,
    retry: RetryPolicy,
    cancel: CancellationToken,
    seeds: Vec<Url>,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// # Arguments
    ///
    /// * `config` - A validated crawler configuration
    /// * `fetcher` - Transport used for every page fetch
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Successfully created coordinator
    /// * `Err(CatalogError)` - Seeds or selectors are unusable
    pub fn new(config: &Config, fetcher: Arc<dyn Fetcher>) -> Result<Self, CatalogError> {
        let context = WalkContext::from_config(config)?;

        let seeds = config
            .catalog
            .seeds
            .iter()
            .map(|seed| {
                Url::parse(seed.trim())
                    .map_err(|e| ConfigError::InvalidUrl(format!("{}: {}", seed, e)))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            context: Arc::new(context),
            fetcher,
            scheduler: Scheduler::new(config.crawler.max_concurrent_fetches as usize),
            retry: RetryPolicy::from_config(&config.crawler),
            cancel: CancellationToken::new(),
            seeds,
        })
    }

    /// Creates a coordinator fetching over HTTP with the configured user agent
    pub fn with_http(config: &Config) -> Result<Self, CatalogError> {
        let fetcher = HttpFetcher::new(
            &config.user_agent,
            Duration::from_secs(config.crawler.fetch_timeout_secs),
        )?;
        Self::new(config, Arc::new(fetcher))
    }

    /// Token that stops the crawl when cancelled
    ///
    /// Cancelling stops dispatch and abandons pending retry back-offs;
    /// fetches already in flight finish and their records are still written.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Runs the main crawl loop
    ///
    /// This is the core crawling logic that:
    /// 1. Seeds the frontier with one root task per seed
    /// 2. Dispatches queued tasks while permits are free
    /// 3. Waits for the next worker to report
    /// 4. Enqueues its follow-up tasks, or writes its record or failure
    /// 5. Stops once nothing is queued or in flight
    ///
    /// If the sink fails, in-flight workers are dropped and the sink is
    /// given the stamped summary through [`ItemSink::abort`] before the
    /// error is returned.
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlSummary)` - The crawl finished or was stopped
    /// * `Err(CatalogError)` - The sink failed; the crawl is aborted
    pub async fn run(&mut self, sink: &mut dyn ItemSink) -> Result<CrawlSummary, CatalogError> {
        let mut summary = CrawlSummary::new();
        let start_time = Instant::now();

        tracing::info!(
            "Starting crawl of {} from {} seed(s)",
            self.context.origin,
            self.seeds.len()
        );

        for seed in self.seeds.clone() {
            self.schedule(CrawlTask::root(seed), &mut summary);
        }

        let (completed, stopped) = match self.drive(sink, &mut summary, start_time).await {
            Ok(finished) => finished,
            Err(e) => {
                tracing::error!("Aborting crawl: {}", e);
                summary.finish(self.cancel.is_cancelled());
                if let Err(abort_err) = sink.abort(&summary) {
                    tracing::error!("Failed to close output after abort: {}", abort_err);
                }
                return Err(e);
            }
        };

        summary.finish(stopped);
        sink.finalize(&summary)?;

        tracing::info!(
            "Crawl {}: {} items from {} tasks in {:?}",
            if stopped { "interrupted" } else { "completed" },
            summary.items_emitted,
            completed,
            start_time.elapsed()
        );

        Ok(summary)
    }

    /// Dispatches and collects workers until nothing is queued or in flight
    ///
    /// Returns the number of tasks completed and whether the stop signal
    /// cut the crawl short.
    async fn drive(
        &mut self,
        sink: &mut dyn ItemSink,
        summary: &mut CrawlSummary,
        start_time: Instant,
    ) -> Result<(u64, bool), CatalogError> {
        let mut workers: JoinSet<TaskReport> = JoinSet::new();
        let mut completed: u64 = 0;
        let mut stopping = false;

        loop {
            if !stopping && self.cancel.is_cancelled() {
                stopping = true;
                let abandoned = self.scheduler.drain().len() as u64;
                summary.cancelled += abandoned;
                tracing::info!(
                    "Stop requested: {} queued tasks abandoned, waiting for {} in flight",
                    abandoned,
                    self.scheduler.in_flight()
                );
            }

            if !stopping {
                self.dispatch(&mut workers, summary);
            }

            let joined = match workers.join_next().await {
                Some(joined) => joined,
                None => break,
            };

            completed += 1;
            match joined {
                Ok(report) => self.handle_report(report, sink, summary)?,
                Err(e) => tracing::error!("Worker task failed: {}", e),
            }

            if completed % PROGRESS_INTERVAL == 0 {
                let elapsed = start_time.elapsed();
                let rate = completed as f64 / elapsed.as_secs_f64().max(f64::EPSILON);
                tracing::info!(
                    "Progress: {} tasks completed, {} in flight, {} in frontier, {} items emitted, {:.2} tasks/sec",
                    completed,
                    self.scheduler.in_flight(),
                    self.scheduler.frontier_size(),
                    summary.items_emitted,
                    rate
                );
            }
        }

        Ok((completed, stopping))
    }

    /// Queues a task, or accounts for why it was not queued
    fn schedule(&mut self, task: CrawlTask, summary: &mut CrawlSummary) {
        if self.cancel.is_cancelled() {
            summary.cancelled += 1;
            return;
        }

        let url = task.url().clone();
        if !self.scheduler.enqueue(task) {
            tracing::debug!(url = %url, "Dropping already scheduled URL");
            summary.duplicates_dropped += 1;
        }
    }

    /// Spawns a worker for every queued task a permit is free for
    fn dispatch(&mut self, workers: &mut JoinSet<TaskReport>, summary: &mut CrawlSummary) {
        while let Some(ScheduledTask { task, permit }) = self.scheduler.next_task() {
            summary.record_dispatch(task.kind());
            tracing::debug!(
                kind = %task.kind(),
                url = %task.url(),
                path = %task.path(),
                "Dispatching task"
            );

            let fetcher = Arc::clone(&self.fetcher);
            let context = Arc::clone(&self.context);
            let retry = self.retry;
            let cancel = self.cancel.clone();

            workers.spawn(async move {
                let _permit = permit;
                execute_task(fetcher, context, retry, cancel, task).await
            });
        }
    }

    /// Applies one worker report
    fn handle_report(
        &mut self,
        report: TaskReport,
        sink: &mut dyn ItemSink,
        summary: &mut CrawlSummary,
    ) -> Result<(), CatalogError> {
        let TaskReport { task, result } = report;

        match result {
            TaskResult::Page(PageOutput::Tasks(tasks)) => {
                summary.processed += 1;
                tracing::debug!(
                    url = %task.url(),
                    path = %task.path(),
                    "{} page yielded {} tasks",
                    task.kind(),
                    tasks.len()
                );
                for follow_up in tasks {
                    self.schedule(follow_up, summary);
                }
            }

            TaskResult::Page(PageOutput::Item(extraction)) => {
                summary.processed += 1;
                if !extraction.is_complete() {
                    let missing: Vec<&str> = extraction.missing.iter().map(Field::name).collect();
                    tracing::warn!(
                        url = %task.url(),
                        path = %task.path(),
                        "Item is missing fields: {}",
                        missing.join(", ")
                    );
                    summary.partial_items += 1;
                }
                sink.write_item(&extraction.record)?;
                summary.items_emitted += 1;
            }

            TaskResult::Failed(failure) => {
                tracing::warn!(
                    url = %failure.url,
                    path = %failure.path,
                    kind = %failure.kind,
                    "{}: {}",
                    failure.outcome,
                    failure.message
                );
                summary.record_failure(&failure);
                sink.record_failure(&failure)?;
            }

            TaskResult::Cancelled => {
                tracing::debug!(url = %task.url(), "Fetch abandoned by stop request");
                summary.cancelled += 1;
            }
        }

        Ok(())
    }
}

/// Runs a complete crawl over HTTP
///
/// This function builds a [`Coordinator`] with an [`HttpFetcher`] and runs
/// it to completion, writing into `sink`.
///
/// # Arguments
///
/// * `config` - The crawler configuration
/// * `sink` - Destination for item records and failures
///
/// # Returns
///
/// * `Ok(CrawlSummary)` - Crawl finished
/// * `Err(CatalogError)` - Crawl could not start, or the sink failed
///
/// # Example
///
/// ```no_run
/// use catalog_walker::config::load_config;
/// use catalog_walker::crawler::run_crawl;
/// use catalog_walker::output::MemorySink;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("catalog.toml"))?;
/// let mut sink = MemorySink::new();
/// let summary = run_crawl(&config, &mut sink).await?;
/// println!("{} items", summary.items_emitted);
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(
    config: &Config,
    sink: &mut dyn ItemSink,
) -> Result<CrawlSummary, CatalogError> {
    let mut coordinator = Coordinator::with_http(config)?;
    coordinator.run(sink).await
}
