use crate::config::types::{Config, CrawlerConfig, OutputConfig, ThresholdConfig, UserAgentConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_thresholds(&config.thresholds)?;
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

    if !config.contact_email.contains('@') {
        return Err(ConfigError::Validation(format!(
            "contact_email does not look like an email address: '{}'",
            config.contact_email
        )));
    }

    Ok(())
}

/// Validates that every min/max threshold pair is ordered
fn validate_thresholds(config: &ThresholdConfig) -> Result<(), ConfigError> {
    let pairs = [
        ("title-char", config.title_char_min, config.title_char_max),
        ("title-pixel", config.title_pixel_min, config.title_pixel_max),
        (
            "description-char",
            config.description_char_min,
            config.description_char_max,
        ),
        (
            "description-pixel",
            config.description_pixel_min,
            config.description_pixel_max,
        ),
    ];

    for (name, min, max) in pairs {
        if min >= max {
            return Err(ConfigError::Validation(format!(
                "{}-min ({}) must be below {}-max ({})",
                name, min, name, max
            )));
        }
    }

    if config.url_char_max == 0 {
        return Err(ConfigError::Validation(
            "url-char-max must be positive".to_string(),
        ));
    }

    if config.image_size_max == 0 {
        return Err(ConfigError::Validation(
            "image-size-max must be positive".to_string(),
        ));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.database_path.is_empty() {
        return Err(ConfigError::Validation(
            "database_path cannot be empty".to_string(),
        ));
    }

    if config.summary_path.is_empty() {
        return Err(ConfigError::Validation(
            "summary_path cannot be empty".to_string(),
        ));
    }

    Ok(())
}
