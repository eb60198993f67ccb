use crate::config::types::{BrowserConfig, Config, CrawlerConfig, OutputConfig, RankingConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_ranking_config(&config.ranking)?;
    validate_browser_config(&config.browser)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.max_concurrent_domains < 1 || config.max_concurrent_domains > 100 {
        return Err(ConfigError::Validation(format!(
            "max-concurrent-domains must be between 1 and 100, got {}",
            config.max_concurrent_domains
        )));
    }

    if config.navigation_timeout_ms < 1000 {
        return Err(ConfigError::Validation(format!(
            "navigation-timeout-ms must be >= 1000ms, got {}ms",
            config.navigation_timeout_ms
        )));
    }

    if config.link_read_timeout_ms == 0 {
        return Err(ConfigError::Validation(
            "link-read-timeout-ms must be >= 1ms".to_string(),
        ));
    }

    if config.max_visible_links == 0 {
        return Err(ConfigError::Validation(
            "max-visible-links must be >= 1".to_string(),
        ));
    }

    if config.contact_keywords.is_empty() {
        return Err(ConfigError::Validation(
            "contact-keywords cannot be empty".to_string(),
        ));
    }

    if config.contact_keywords.iter().any(|k| k.trim().is_empty()) {
        return Err(ConfigError::Validation(
            "contact-keywords cannot contain blank entries".to_string(),
        ));
    }

    Ok(())
}

/// Validates ranking configuration
fn validate_ranking_config(config: &RankingConfig) -> Result<(), ConfigError> {
    if let Some(blank) = config
        .secondary_suffixes
        .iter()
        .find(|s| s.trim().is_empty())
    {
        return Err(ConfigError::Validation(format!(
            "secondary-suffixes cannot contain blank entries, got '{}'",
            blank
        )));
    }

    Ok(())
}

/// Validates browser configuration
fn validate_browser_config(config: &BrowserConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.webdriver_url).map_err(|e| {
        ConfigError::Validation(format!(
            "Invalid webdriver-url '{}': {}",
            config.webdriver_url, e
        ))
    })?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "webdriver-url must use http or https, got '{}'",
            url.scheme()
        )));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.log_prefix.trim().is_empty() {
        return Err(ConfigError::Validation(
            "log-prefix cannot be empty".to_string(),
        ));
    }

    if config
        .log_prefix
        .chars()
        .any(|c| c == '/' || c == '\\')
    {
        return Err(ConfigError::Validation(format!(
            "log-prefix cannot contain path separators, got '{}'",
            config.log_prefix
        )));
    }

    Ok(())
}
