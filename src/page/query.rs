use crate::config::SelectorConfig;
use crate::ConfigError;
use scraper::Selector;
use std::fmt;

/// A compiled CSS selector that remembers its source text
#[derive(Clone)]
pub struct Query {
    source: String,
    selector: Selector,
}

impl Query {
    /// Compiles a CSS selector
    ///
    /// # Returns
    ///
    /// * `Ok(Query)` - The compiled selector
    /// * `Err(ConfigError::InvalidSelector)` - The selector does not parse
    pub fn parse(source: &str) -> Result<Self, ConfigError> {
        let selector = Selector::parse(source).map_err(|e| ConfigError::InvalidSelector {
            selector: source.to_string(),
            message: format!("{:?}", e),
        })?;

        Ok(Self {
            source: source.to_string(),
            selector,
        })
    }

    /// The selector text this query was compiled from
    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub(crate) fn selector(&self) -> &Selector {
        &self.selector
    }
}

impl fmt::Debug for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Query").field(&self.source).finish()
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// Every structural location the walkers and the extractor read from
#[derive(Debug, Clone)]
pub struct SelectorSet {
    pub subcategory_links: Query,
    pub subcategory_name: Query,
    pub listing_links: Query,
    pub artist: Query,
    pub title: Query,
    pub image: Query,
    pub dimensions: Query,
    pub description: Query,
}

impl SelectorSet {
    /// Compiles all configured selectors, failing on the first invalid one
    pub fn compile(config: &SelectorConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            subcategory_links: Query::parse(&config.subcategory_links)?,
            subcategory_name: Query::parse(&config.subcategory_name)?,
            listing_links: Query::parse(&config.listing_links)?,
            artist: Query::parse(&config.artist)?,
            title: Query::parse(&config.title)?,
            image: Query::parse(&config.image)?,
            dimensions: Query::parse(&config.dimensions)?,
            description: Query::parse(&config.description)?,
        })
    }
}
