use crate::config::Config;
use crate::normalize::{canonicalize_categories, canonicalize_category, resolve_origin};
use crate::page::SelectorSet;
use crate::ConfigError;
use std::collections::HashSet;
use url::Url;

/// Case-folded link texts of the listing navigation links
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationMarkers {
    previous: String,
    next: String,
}

impl PaginationMarkers {
    pub fn new(previous: &str, next: &str) -> Self {
        Self {
            previous: previous.trim().to_lowercase(),
            next: next.trim().to_lowercase(),
        }
    }

    pub fn is_previous(&self, text: &str) -> bool {
        text.trim().to_lowercase() == self.previous
    }

    pub fn is_next(&self, text: &str) -> bool {
        text.trim().to_lowercase() == self.next
    }
}

/// Read-only state shared by every walker and extractor invocation
///
/// Built once at startup and shared behind an `Arc`; nothing in it changes
/// during a crawl.
#[derive(Debug, Clone)]
pub struct WalkContext {
    /// Origin every relative link resolves against
    pub origin: Url,

    /// Canonicalized top-level allow-list
    allowed: HashSet<String>,

    pub markers: PaginationMarkers,

    pub selectors: SelectorSet,
}

impl WalkContext {
    /// Builds the context from a validated configuration
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let seed = config.catalog.seeds.first().ok_or_else(|| {
            ConfigError::Validation("at least one seed URL is required".to_string())
        })?;

        Ok(Self::new(
            resolve_origin(seed)?,
            &config.catalog.allowed_categories,
            PaginationMarkers::new(&config.catalog.previous_marker, &config.catalog.next_marker),
            SelectorSet::compile(&config.selectors)?,
        ))
    }

    pub fn new<S: AsRef<str>>(
        origin: Url,
        allowed_categories: &[S],
        markers: PaginationMarkers,
        selectors: SelectorSet,
    ) -> Self {
        Self {
            origin,
            allowed: canonicalize_categories(allowed_categories).into_iter().collect(),
            markers,
            selectors,
        }
    }

    /// Returns true if a top-level category name is on the allow-list
    pub fn is_allowed(&self, category: &str) -> bool {
        self.allowed.contains(&canonicalize_category(category))
    }
}
