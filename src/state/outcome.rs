/// Task outcome definitions for failed crawl tasks
///
/// A dispatched task that does not yield tasks or a record ends in one of
/// these states; the failure summary is counted by them.
use std::fmt;

/// How a crawl task failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TaskOutcome {
    /// Fetch failed after all permitted attempts; the subtree is skipped
    FetchFailed,

    /// Page lacked the structure its handler expects; contributes nothing
    ParseFailed,
}

impl TaskOutcome {
    /// Converts the outcome to a database string representation
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::FetchFailed => "fetch_failed",
            Self::ParseFailed => "parse_failed",
        }
    }

    /// Parses an outcome from its database string representation
    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "fetch_failed" => Some(Self::FetchFailed),
            "parse_failed" => Some(Self::ParseFailed),
            _ => None,
        }
    }
}

impl fmt::Display for TaskOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_db_string())
    }
}
