use crate::config::types::CheckerConfig;
use crate::config::validation::validate;
use crate::ConfigError;
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(CheckerConfig)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use deadlink_checker::config::load_config;
///
/// let config = load_config(Path::new("deadlinks.toml")).unwrap();
/// println!("Workers: {}", config.crawler.workers);
/// ```
pub fn load_config(path: &Path) -> Result<CheckerConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parses and validates configuration from TOML text
///
/// Every section is optional; missing keys take their defaults.
pub fn parse_config(content: &str) -> Result<CheckerConfig, ConfigError> {
    let config: CheckerConfig = toml::from_str(content)?;
    validate(&config)?;
    Ok(config)
}
