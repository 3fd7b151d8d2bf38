//! State module for tracking crawl progress
//!
//! [`TaskOutcome`] is how a failed task ended; summaries count failures by it
//! and the SQLite sink persists it with each failure.

mod outcome;

pub use outcome::TaskOutcome;
