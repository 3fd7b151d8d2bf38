use crate::config::types::{
    CatalogConfig, Config, CrawlerConfig, OutputConfig, SelectorConfig, UserAgentConfig,
};
use crate::normalize::{canonicalize_category, resolve_origin};
use crate::page::SelectorSet;
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_catalog_config(&config.catalog)?;
    validate_selectors(&config.selectors)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.max_concurrent_fetches < 1 || config.max_concurrent_fetches > 100 {
        return Err(ConfigError::Validation(format!(
            "max_concurrent_fetches must be between 1 and 100, got {}",
            config.max_concurrent_fetches
        )));
    }

    if config.fetch_timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "fetch_timeout_secs must be >= 1".to_string(),
        ));
    }

    if config.retry_base_delay_ms > config.retry_max_delay_ms {
        return Err(ConfigError::Validation(format!(
            "retry_base_delay_ms ({}) must not exceed retry_max_delay_ms ({})",
            config.retry_base_delay_ms, config.retry_max_delay_ms
        )));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    Url::parse(&config.contact_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;

    validate_email(&config.contact_email)?;

    Ok(())
}

/// Validates seeds, allow-list and pagination markers
fn validate_catalog_config(config: &CatalogConfig) -> Result<(), ConfigError> {
    let Some(first_seed) = config.seeds.first() else {
        return Err(ConfigError::Validation(
            "at least one seed URL is required".to_string(),
        ));
    };

    let origin = resolve_origin(first_seed)?;
    for seed in &config.seeds[1..] {
        let other = resolve_origin(seed)?;
        if other != origin {
            return Err(ConfigError::Validation(format!(
                "all seeds must share one origin: '{}' is not under {}",
                seed, origin
            )));
        }
    }

    if config.allowed_categories.is_empty() {
        return Err(ConfigError::Validation(
            "allowed_categories cannot be empty".to_string(),
        ));
    }

    for category in &config.allowed_categories {
        if canonicalize_category(category).is_empty() {
            return Err(ConfigError::Validation(format!(
                "allowed category '{}' is blank",
                category
            )));
        }
    }

    let previous = config.previous_marker.trim().to_lowercase();
    let next = config.next_marker.trim().to_lowercase();

    if previous.is_empty() || next.is_empty() {
        return Err(ConfigError::Validation(
            "previous_marker and next_marker cannot be empty".to_string(),
        ));
    }

    if previous == next {
        return Err(ConfigError::Validation(format!(
            "previous_marker and next_marker must differ, both are '{}'",
            next
        )));
    }

    Ok(())
}

/// Validates that every selector compiles
fn validate_selectors(config: &SelectorConfig) -> Result<(), ConfigError> {
    SelectorSet::compile(config).map(|_| ())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.jsonl_path.as_deref().is_some_and(str::is_empty) {
        return Err(ConfigError::Validation(
            "jsonl_path cannot be empty".to_string(),
        ));
    }

    if config.database_path.as_deref().is_some_and(str::is_empty) {
        return Err(ConfigError::Validation(
            "database_path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Basic email validation
fn validate_email(email: &str) -> Result<(), ConfigError> {
    if email.is_empty() {
        return Err(ConfigError::Validation(
            "contact_email cannot be empty".to_string(),
        ));
    }

    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 || parts[0].is_empty() || parts[1].is_empty() {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    }

    if !parts[1].contains('.') {
        return Err(ConfigError::Validation(format!(
            "Invalid email domain: '{}'",
            email
        )));
    }

    Ok(())
}
