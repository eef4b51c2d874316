use crate::config::types::{Config, CrawlerConfig, OutputConfig, SiteEntry, UserAgentConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_output_config(&config.output)?;
    validate_sites(&config.sites)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.start_url.is_empty() {
        return Err(ConfigError::Validation(
            "start_url must be set in [crawler] or with --start-url".to_string(),
        ));
    }

    let url = Url::parse(&config.start_url).map_err(|e| {
        ConfigError::InvalidUrl(format!("Invalid start_url '{}': {}", config.start_url, e))
    })?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "start_url '{}' must use HTTP or HTTPS",
            config.start_url
        )));
    }

    if url.host_str().is_none() {
        return Err(ConfigError::InvalidUrl(format!(
            "start_url '{}' has no host",
            config.start_url
        )));
    }

    if config.workers < 1 || config.workers > 64 {
        return Err(ConfigError::Validation(format!(
            "workers must be between 1 and 64, got {}",
            config.workers
        )));
    }

    if config.request_interval_ms < 50 {
        return Err(ConfigError::Validation(format!(
            "request_interval_ms must be >= 50ms, got {}ms",
            config.request_interval_ms
        )));
    }

    if config.request_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "request_timeout_secs must be >= 1, got {}",
            config.request_timeout_secs
        )));
    }

    if config.max_attempts < 1 {
        return Err(ConfigError::Validation(format!(
            "max_attempts must be >= 1, got {}",
            config.max_attempts
        )));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    // Validate crawler name: non-empty, alphanumeric + hyphens only
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

    if config.crawler_version.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_version cannot be empty".to_string(),
        ));
    }

    if let Some(contact_url) = &config.contact_url {
        Url::parse(contact_url)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;
    }

    if let Some(email) = &config.contact_email {
        validate_email(email)?;
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.documents_path.is_empty() {
        return Err(ConfigError::Validation(
            "documents_path cannot be empty".to_string(),
        ));
    }

    if config.cache_path.is_empty() {
        return Err(ConfigError::Validation(
            "cache_path cannot be empty".to_string(),
        ));
    }

    if config.documents_path == config.cache_path {
        return Err(ConfigError::Validation(format!(
            "documents_path and cache_path must differ, both are '{}'",
            config.cache_path
        )));
    }

    if matches!(&config.log_path, Some(p) if p.is_empty()) {
        return Err(ConfigError::Validation(
            "log_path cannot be empty when set".to_string(),
        ));
    }

    Ok(())
}

/// Validates `[[site]]` rule entries
fn validate_sites(sites: &[SiteEntry]) -> Result<(), ConfigError> {
    for (i, entry) in sites.iter().enumerate() {
        if entry.host.is_empty() {
            return Err(ConfigError::Validation(format!(
                "site entry #{} has an empty host",
                i + 1
            )));
        }

        if sites[..i]
            .iter()
            .any(|other| other.host.eq_ignore_ascii_case(&entry.host))
        {
            return Err(ConfigError::Validation(format!(
                "site '{}' is configured more than once",
                entry.host
            )));
        }

        for prefix in &entry.drop_prefix {
            validate_path_prefix(&entry.host, prefix)?;
        }

        for rule in &entry.page_types {
            validate_path_prefix(&entry.host, &rule.prefix)?;
            if rule.page_type.is_empty() {
                return Err(ConfigError::Validation(format!(
                    "site '{}': page type for '{}' cannot be empty",
                    entry.host, rule.prefix
                )));
            }
        }
    }

    Ok(())
}

/// Validates a rule path prefix: must be absolute
fn validate_path_prefix(host: &str, prefix: &str) -> Result<(), ConfigError> {
    if !prefix.starts_with('/') {
        return Err(ConfigError::Validation(format!(
            "site '{}': path prefix '{}' must start with '/'",
            host, prefix
        )));
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

    // Basic email format check: must contain @ and have text on both sides
    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    }

    let local = parts[0];
    let domain = parts[1];

    if local.is_empty() || domain.is_empty() {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    }

    if !domain.contains('.') {
        return Err(ConfigError::Validation(format!(
            "Invalid email domain: '{}'",
            email
        )));
    }

    Ok(())
}
