//! Crawler module for task scheduling, fetching and coordination
//!
//! This module contains the crawl driver, including:
//! - Crawl tasks and the breadcrumb paths they carry
//! - HTTP fetching behind the [`Fetcher`] seam
//! - Retries with exponential backoff
//! - Frontier scheduling and concurrency limiting
//! - Overall crawl coordination

mod coordinator;
mod fetcher;
mod retry;
mod scheduler;
mod task;

pub use coordinator::{process_page, run_crawl, Coordinator, PageOutput, TaskReport, TaskResult};
pub use fetcher::{build_http_client, user_agent_string, FetchedPage, Fetcher, HttpFetcher};
pub use retry::{fetch_with_retry, RetryPolicy};
pub use scheduler::{ScheduledTask, Scheduler};
pub use task::{BrowsePath, CrawlTask, TaskKind};
