use crate::config::types::{CheckerConfig, CrawlerConfig, RequestConfig};
use crate::ConfigError;
use reqwest::header::{HeaderName, HeaderValue};
use url::Url;

/// Upper bound on concurrent checks per page
pub const MAX_WORKERS: usize = 100;

/// Validates the entire configuration
pub fn validate(config: &CheckerConfig) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_request_config(&config.request)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.workers < 1 || config.workers > MAX_WORKERS {
        return Err(ConfigError::Validation(format!(
            "workers must be between 1 and {}, got {}",
            MAX_WORKERS, config.workers
        )));
    }

    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "timeout-secs must be at least 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates request configuration
fn validate_request_config(config: &RequestConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    HeaderValue::from_str(&config.user_agent)
        .map_err(|_| ConfigError::InvalidHeader(format!("user-agent {:?}", config.user_agent)))?;

    for (name, value) in &config.headers {
        validate_header(name, value)?;
    }

    if let Some(auth) = &config.auth {
        if auth.username.is_empty() {
            return Err(ConfigError::Validation(
                "auth username cannot be empty".to_string(),
            ));
        }
    }

    Ok(())
}

/// Validates that a header name and value are legal HTTP tokens
pub fn validate_header(name: &str, value: &str) -> Result<(), ConfigError> {
    HeaderName::from_bytes(name.as_bytes())
        .map_err(|_| ConfigError::InvalidHeader(format!("invalid header name {:?}", name)))?;
    HeaderValue::from_str(value)
        .map_err(|_| ConfigError::InvalidHeader(format!("invalid value for header {:?}", name)))?;
    Ok(())
}

/// Validates the seed URL a run starts from
///
/// This is the only check that prevents a run from starting: the seed must
/// be a non-empty absolute HTTP(S) URL with a host.
///
/// # Examples
///
/// ```
/// use deadlink_checker::config::validate_seed_url;
///
/// assert!(validate_seed_url("https://example.com").is_ok());
/// assert!(validate_seed_url("").is_err());
/// assert!(validate_seed_url("ftp://example.com").is_err());
/// ```
pub fn validate_seed_url(seed: &str) -> Result<Url, ConfigError> {
    let seed = seed.trim();
    if seed.is_empty() {
        return Err(ConfigError::InvalidUrl("seed URL is empty".to_string()));
    }

    let url = Url::parse(seed)
        .map_err(|e| ConfigError::InvalidUrl(format!("invalid seed URL '{}': {}", seed, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "seed URL '{}' must use http or https",
            seed
        )));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(ConfigError::InvalidUrl(format!(
            "seed URL '{}' has no host",
            seed
        )));
    }

    Ok(url)
}
