use serde::Deserialize;

/// Main configuration structure for Catalog-Walker
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub selectors: SelectorConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Maximum number of fetches in flight at once
    #[serde(rename = "max-concurrent-fetches")]
    pub max_concurrent_fetches: u32,

    /// Timeout applied to each fetch (seconds)
    #[serde(rename = "fetch-timeout-secs")]
    pub fetch_timeout_secs: u64,

    /// Retries after the first failed attempt of a retryable fetch
    #[serde(rename = "max-retries", default = "default_max_retries")]
    pub max_retries: u32,

    /// Delay before the first retry; doubles on each further retry (milliseconds)
    #[serde(rename = "retry-base-delay-ms", default = "default_retry_base_delay_ms")]
    pub retry_base_delay_ms: u64,

    /// Upper bound for a single backoff delay (milliseconds)
    #[serde(rename = "retry-max-delay-ms", default = "default_retry_max_delay_ms")]
    pub retry_max_delay_ms: u64,
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

/// What to crawl: seeds, the top-level allow-list and pagination markers
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogConfig {
    /// Root category pages to start from (must share one origin)
    pub seeds: Vec<String>,

    /// Top-level category names to descend into, compared canonicalized
    #[serde(rename = "allowed-categories")]
    pub allowed_categories: Vec<String>,

    /// Link text marking a "previous page" link in item listings
    #[serde(rename = "previous-marker", default = "default_previous_marker")]
    pub previous_marker: String,

    /// Link text marking a "next page" link in item listings
    #[serde(rename = "next-marker", default = "default_next_marker")]
    pub next_marker: String,
}

/// CSS selectors locating links and fields on catalog pages
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    /// Subcategory anchors on a category page
    #[serde(rename = "subcategory-links")]
    pub subcategory_links: String,

    /// Display name element inside a subcategory anchor
    #[serde(rename = "subcategory-name")]
    pub subcategory_name: String,

    /// Item and previous/next anchors on a leaf category page
    #[serde(rename = "listing-links")]
    pub listing_links: String,

    pub artist: String,
    pub title: String,

    /// Image element; its `src` attribute is used
    pub image: String,

    /// Element holding the sheet size text
    pub dimensions: String,

    pub description: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            subcategory_links: "#subcats > div > a".to_string(),
            subcategory_name: "h3".to_string(),
            listing_links: "#body > div:nth-of-type(2) > a".to_string(),
            artist: "#content > h2".to_string(),
            title: "#content > h1".to_string(),
            image: "#body > img".to_string(),
            dimensions: "#content > dl > dd:nth-of-type(3)".to_string(),
            description: "#content > div > p".to_string(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputConfig {
    /// JSON lines file receiving one record per line
    #[serde(rename = "jsonl-path")]
    pub jsonl_path: Option<String>,

    /// SQLite database receiving records, failures and run bookkeeping
    #[serde(rename = "database-path")]
    pub database_path: Option<String>,
}

fn default_max_retries() -> u32 {
    3
}

fn default_retry_base_delay_ms() -> u64 {
    500
}

fn default_retry_max_delay_ms() -> u64 {
    10_000
}

fn default_previous_marker() -> String {
    "Prev".to_string()
}

fn default_next_marker() -> String {
    "Next".to_string()
}
