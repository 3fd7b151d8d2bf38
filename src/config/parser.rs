use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use catalog_walker::config::load_config;
///
/// let config = load_config(Path::new("catalog.toml")).unwrap();
/// println!("Seeds: {:?}", config.catalog.seeds);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parses and validates configuration from TOML text
pub fn parse_config(content: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(content)?;
    validate(&config)?;
    Ok(config)
}

/// Computes a SHA-256 hash of the configuration file content
///
/// The hash is stored with each persisted run so results can be traced back
/// to the configuration that produced them.
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(String)` - Hex-encoded SHA-256 hash of the file content
/// * `Err(ConfigError)` - Failed to read the file
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    Ok(hex::encode(hasher.finalize()))
}

/// Loads a configuration and returns both the config and its hash
pub fn load_config_with_hash(path: &Path) -> Result<(Config, String), ConfigError> {
    let config = load_config(path)?;
    let hash = compute_config_hash(path)?;
    Ok((config, hash))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const VALID_CONFIG: &str = r#"
[crawler]
max-concurrent-fetches = 4
fetch-timeout-secs = 20

[user-agent]
crawler-name = "TestCrawler"
crawler-version = "1.0"
contact-url = "https://example.com/about"
contact-email = "admin@example.com"

[catalog]
seeds = ["http://catalog.example.com/browse/"]
allowed-categories = ["In Sunsh", "Summertime"]

[output]
jsonl-path = "./items.jsonl"
"#;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_valid_config() {
        let file = create_temp_config(VALID_CONFIG);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.crawler.max_concurrent_fetches, 4);
        assert_eq!(config.crawler.fetch_timeout_secs, 20);
        assert_eq!(config.user_agent.crawler_name, "TestCrawler");
        assert_eq!(config.catalog.allowed_categories.len(), 2);
        assert_eq!(config.output.jsonl_path.as_deref(), Some("./items.jsonl"));
        assert_eq!(config.output.database_path, None);
    }

    #[test]
    fn test_defaults_applied() {
        let config = parse_config(VALID_CONFIG).unwrap();

        assert_eq!(config.crawler.max_retries, 3);
        assert_eq!(config.crawler.retry_base_delay_ms, 500);
        assert_eq!(config.catalog.previous_marker, "Prev");
        assert_eq!(config.catalog.next_marker, "Next");
        assert_eq!(config.selectors.subcategory_links, "#subcats > div > a");
        assert_eq!(config.selectors.title, "#content > h1");
    }

    #[test]
    fn test_selector_override_keeps_other_defaults() {
        let content = format!("{}\n[selectors]\ntitle = \"h1.title\"\n", VALID_CONFIG);
        let config = parse_config(&content).unwrap();

        assert_eq!(config.selectors.title, "h1.title");
        assert_eq!(config.selectors.artist, "#content > h2");
    }

    #[test]
    fn test_load_config_with_invalid_path() {
        let result = load_config(Path::new("/nonexistent/catalog.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_load_config_with_invalid_toml() {
        let file = create_temp_config("this is not valid TOML {{{");
        let result = load_config(file.path());
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_config_with_validation_error() {
        let content = VALID_CONFIG.replace(
            r#"allowed-categories = ["In Sunsh", "Summertime"]"#,
            "allowed-categories = []",
        );
        let file = create_temp_config(&content);
        let result = load_config(file.path());
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_compute_config_hash() {
        let file = create_temp_config("test content");

        let hash1 = compute_config_hash(file.path()).unwrap();
        let hash2 = compute_config_hash(file.path()).unwrap();

        assert_eq!(hash1, hash2);
        assert_eq!(hash1.len(), 64);
    }

    #[test]
    fn test_load_config_with_hash() {
        let file = create_temp_config(VALID_CONFIG);
        let (config, hash) = load_config_with_hash(file.path()).unwrap();

        assert_eq!(config.catalog.seeds.len(), 1);
        assert_eq!(hash, compute_config_hash(file.path()).unwrap());
    }
}
