//! HTTP asset checker
//!
//! This module issues the outbound check for a single asset URL:
//! - Building the shared HTTP client with user agent, extra headers and timeout
//! - HEAD first, falling back to GET when the server rejects HEAD
//! - Timing each check
//! - Converting transport failures into dead outcomes

use crate::config::{CheckerConfig, Credentials};
use crate::crawler::outcome::{round_seconds, AssetKind, CheckOutcome};
use crate::output::status_label;
use crate::{CheckerError, ConfigError};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{redirect::Policy, Client, Method, RequestBuilder};
use std::collections::BTreeMap;
use std::error::Error as _;
use std::time::{Duration, Instant};

/// Statuses after which a HEAD probe is retried as a GET
///
/// Some servers answer HEAD with 403/404 even though GET succeeds, so these
/// are treated the same as 405/501.
pub const HEAD_FALLBACK_STATUSES: &[u16] = &[404, 405, 403, 501];

/// Maximum redirect hops followed per request
const MAX_REDIRECTS: usize = 10;

/// Per-request settings shared by the checker and the page scraper
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub timeout: Duration,
    pub user_agent: String,
    pub headers: BTreeMap<String, String>,
    pub credentials: Option<Credentials>,
}

impl RequestOptions {
    /// Builds request options from a loaded configuration
    pub fn from_config(config: &CheckerConfig) -> Self {
        Self {
            timeout: Duration::from_secs(config.crawler.timeout_secs),
            user_agent: config.request.user_agent.clone(),
            headers: config.request.headers.clone(),
            credentials: config.request.auth.clone(),
        }
    }

    /// Attaches basic-auth credentials to a request, if configured
    pub fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.credentials {
            Some(creds) => request.basic_auth(&creds.username, Some(&creds.password)),
            None => request,
        }
    }
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self::from_config(&CheckerConfig::default())
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `options` - Timeout, user agent and extra headers
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(CheckerError)` - A header was invalid or the client failed to build
pub fn build_http_client(options: &RequestOptions) -> Result<Client, CheckerError> {
    let mut headers = HeaderMap::new();
    for (name, value) in &options.headers {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| ConfigError::InvalidHeader(format!("invalid header name {:?}", name)))?;
        let value = HeaderValue::from_str(value)
            .map_err(|_| ConfigError::InvalidHeader(format!("invalid value for header {}", name)))?;
        headers.insert(name, value);
    }

    let client = Client::builder()
        .user_agent(options.user_agent.as_str())
        .default_headers(headers)
        .timeout(options.timeout)
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .build()?;

    Ok(client)
}

/// Category of a request that failed before a status was received
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportFailure {
    Timeout,
    Connection,
    Tls,
    TooManyRedirects,
    Other,
}

impl TransportFailure {
    /// Classifies a reqwest error
    pub fn classify(error: &reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout
        } else if error.is_redirect() {
            Self::TooManyRedirects
        } else if is_tls_error(error) {
            Self::Tls
        } else if error.is_connect() {
            Self::Connection
        } else {
            Self::Other
        }
    }

    /// Status label recorded on the dead outcome
    pub fn label(&self) -> &'static str {
        match self {
            Self::Timeout => "Error: Timeout",
            Self::Connection => "Error: ConnectionError",
            Self::Tls => "Error: SSLError",
            Self::TooManyRedirects => "Error: TooManyRedirects",
            Self::Other => "Error: RequestException",
        }
    }
}

/// TLS failures surface as connect errors; look through the source chain
fn is_tls_error(error: &reqwest::Error) -> bool {
    let mut source = error.source();
    while let Some(cause) = source {
        let text = cause.to_string().to_lowercase();
        if text.contains("certificate") || text.contains("tls") || text.contains("ssl") {
            return true;
        }
        source = cause.source();
    }
    false
}

/// Checks individual assets over HTTP
///
/// Cloning is cheap; the underlying client is reference counted.
#[derive(Debug, Clone)]
pub struct AssetChecker {
    client: Client,
    options: RequestOptions,
}

impl AssetChecker {
    /// Creates a checker with its own client
    pub fn new(options: RequestOptions) -> Result<Self, CheckerError> {
        let client = build_http_client(&options)?;
        Ok(Self { client, options })
    }

    /// Creates a checker sharing an existing client
    pub fn with_client(client: Client, options: RequestOptions) -> Self {
        Self { client, options }
    }

    /// Checks one asset and returns its outcome
    ///
    /// Never fails: transport errors become dead outcomes with no status code.
    /// `is_external` is left `false` for the caller to stamp.
    pub async fn check(&self, target_url: &str, discovered_on: &str, kind: AssetKind) -> CheckOutcome {
        let started = Instant::now();

        match self.probe(target_url).await {
            Ok(status) => CheckOutcome::from_status(
                target_url,
                discovered_on,
                kind,
                status,
                status_label(status),
                round_seconds(started.elapsed().as_secs_f64()),
            ),
            Err(e) => {
                let failure = TransportFailure::classify(&e);
                tracing::debug!("Check of {} failed ({:?}): {}", target_url, failure, e);
                CheckOutcome::from_failure(
                    target_url,
                    discovered_on,
                    kind,
                    failure.label().to_string(),
                )
            }
        }
    }

    /// Sends HEAD, then GET if the HEAD status is in the fallback set
    async fn probe(&self, target_url: &str) -> Result<u16, reqwest::Error> {
        let head = self.request(Method::HEAD, target_url).send().await?;
        let status = head.status().as_u16();

        if !HEAD_FALLBACK_STATUSES.contains(&status) {
            return Ok(status);
        }

        tracing::trace!("HEAD {} returned {}, retrying with GET", target_url, status);
        let get = self.request(Method::GET, target_url).send().await?;
        Ok(get.status().as_u16())
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        self.options.authorize(self.client.request(method, url))
    }
}
