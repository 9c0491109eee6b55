//! Configuration module for the checker
//!
//! This module handles loading, parsing, and validating TOML configuration
//! files. Every key has a default, so an empty file is a valid configuration.
//!
//! # Example
//!
//! ```no_run
//! use deadlink_checker::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("deadlinks.toml")).unwrap();
//! println!("Checker will use max depth: {}", config.crawler.max_depth);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{CheckerConfig, Credentials, CrawlerConfig, RequestConfig, DEFAULT_USER_AGENT};

// Re-export parser and validation functions
pub use parser::{load_config, parse_config};
pub use validation::{validate, validate_header, validate_seed_url, MAX_WORKERS};
