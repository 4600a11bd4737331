use crate::config::types::{Config, CrawlConfig, FetchConfig, MatcherConfig};
use crate::{ConfigError, ConfigResult};
use url::Url;

/// Largest accepted capacity for the shared item channel
const MAX_ITEM_BUFFER: usize = 4096;

/// Validates the entire configuration
pub fn validate(config: &Config) -> ConfigResult<()> {
    validate_fetch_config(&config.fetch)?;
    validate_matcher_config(&config.matcher)?;
    validate_crawl_config(&config.crawl)?;
    Ok(())
}

/// Validates fetch configuration
fn validate_fetch_config(config: &FetchConfig) -> ConfigResult<()> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    if config.timeout_secs == Some(0) {
        return Err(ConfigError::Validation(
            "timeout_secs must be >= 1 when set, got 0".to_string(),
        ));
    }

    if config.connect_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "connect_timeout_secs must be >= 1, got {}",
            config.connect_timeout_secs
        )));
    }

    Ok(())
}

/// Validates matcher configuration
fn validate_matcher_config(config: &MatcherConfig) -> ConfigResult<()> {
    for (field, value) in [
        ("container_tag", &config.container_tag),
        ("label_attr", &config.label_attr),
        ("image_tag", &config.image_tag),
        ("source_attr", &config.source_attr),
        ("anchor_tag", &config.anchor_tag),
        ("reference_attr", &config.reference_attr),
    ] {
        validate_marker_name(field, value)?;
    }

    if config.absolute_prefix.is_empty() {
        return Err(ConfigError::Validation(
            "absolute_prefix cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates crawl configuration
fn validate_crawl_config(config: &CrawlConfig) -> ConfigResult<()> {
    if config.item_buffer < 1 || config.item_buffer > MAX_ITEM_BUFFER {
        return Err(ConfigError::Validation(format!(
            "item_buffer must be between 1 and {}, got {}",
            MAX_ITEM_BUFFER, config.item_buffer
        )));
    }

    for seed in &config.seeds {
        validate_seed(seed)?;
    }

    Ok(())
}

/// Validates a seed URL: must parse and use http(s)
fn validate_seed(seed: &str) -> ConfigResult<()> {
    let url = Url::parse(seed)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid seed URL '{}': {}", seed, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "Seed URL '{}' must use http or https scheme",
            seed
        )));
    }

    Ok(())
}

/// Marker names are compared against tokenizer output, which is lower-cased ASCII
fn validate_marker_name(field: &str, value: &str) -> ConfigResult<()> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{} cannot be empty", field)));
    }

    if !value
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_')
    {
        return Err(ConfigError::Validation(format!(
            "{} must be lower-case ASCII, got '{}'",
            field, value
        )));
    }

    Ok(())
}
