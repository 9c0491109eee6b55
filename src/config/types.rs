use serde::Deserialize;
use std::collections::BTreeMap;

/// User agent sent when none is configured
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Main configuration structure for the checker
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CheckerConfig {
    pub crawler: CrawlerConfig,
    pub request: RequestConfig,
    /// URL patterns to skip (regex, or substring if not a valid regex)
    pub exclude: Vec<String>,
}

/// Crawl behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Number of concurrent asset checks per page
    pub workers: usize,

    /// Per-request timeout in seconds
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,

    /// Crawl depth: 1 checks only the seed page, 2+ follows internal links
    #[serde(rename = "max-depth")]
    pub max_depth: u32,

    /// Whether assets on other hosts are checked at all
    #[serde(rename = "check-external")]
    pub check_external: bool,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            workers: 10,
            timeout_secs: 10,
            max_depth: 1,
            check_external: true,
        }
    }
}

/// Outbound request configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RequestConfig {
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Extra headers sent with every request
    pub headers: BTreeMap<String, String>,

    /// Optional basic-auth credentials
    pub auth: Option<Credentials>,
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            headers: BTreeMap::new(),
            auth: None,
        }
    }
}

/// Basic-auth credential pair
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}
