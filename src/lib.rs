//! Catalog-Walker: a category-tree catalog crawler
//!
//! This crate walks a hierarchical catalog site (category → subcategory →
//! paginated item list → item detail page), restricted to an allow-listed set
//! of top-level categories, and emits one normalized record per item together
//! with the breadcrumb of category names it was reached through.

pub mod config;
pub mod crawler;
pub mod item;
pub mod normalize;
pub mod output;
pub mod page;
pub mod state;
pub mod storage;
pub mod walker;

use thiserror::Error;

/// Main error type for Catalog-Walker operations
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid selector '{selector}': {message}")]
    InvalidSelector { selector: String, message: String },
}

/// Errors raised while fetching a page
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("request timed out")]
    Timeout,

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("HTTP status {0}")]
    Status(u16),

    #[error("failed to read response body: {0}")]
    Body(String),

    #[error("request failed: {0}")]
    Request(String),

    #[error("crawl cancelled before the fetch completed")]
    Cancelled,
}

impl FetchError {
    /// Returns true if another attempt at the same URL may succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Timeout | Self::Connect(_) | Self::Body(_) => true,
            Self::Status(code) => *code >= 500 || *code == 408 || *code == 429,
            Self::Request(_) | Self::Cancelled => false,
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else if e.is_connect() {
            Self::Connect(e.to_string())
        } else if e.is_body() || e.is_decode() {
            Self::Body(e.to_string())
        } else if let Some(status) = e.status() {
            Self::Status(status.as_u16())
        } else {
            Self::Request(e.to_string())
        }
    }
}

/// Errors raised when a fetched page lacks the structure a walker expects
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("link {index} matched by '{selector}' has no href")]
    MissingHref { selector: String, index: usize },

    #[error("link {index} matched by '{selector}' has no label")]
    MissingLabel { selector: String, index: usize },

    #[error("cannot resolve link '{href}': {reason}")]
    InvalidLink { href: String, reason: String },
}

/// Result type alias for Catalog-Walker operations
pub type Result<T> = std::result::Result<T, CatalogError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{BrowsePath, Coordinator, CrawlTask, TaskKind};
pub use item::ItemRecord;
pub use normalize::{canonicalize_category, parse_physical_dimension, resolve_origin, Dimension};
pub use output::{CrawlSummary, ItemSink};
pub use state::TaskOutcome;
