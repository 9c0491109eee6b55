//! Check outcome definitions
//!
//! A `CheckOutcome` is the atomic result of checking one asset. It is built
//! once by the asset checker; only `is_external` is stamped afterwards by the
//! controller, before the outcome is published anywhere.

use std::fmt;

/// Kind of reference an asset was discovered through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AssetKind {
    /// `<a href>`
    #[default]
    Link,
    /// `<img src>`
    Image,
    /// `<script src>`
    Script,
    /// `<link rel="stylesheet|icon" href>`
    StylesIcon,
    /// `<iframe src>`
    Iframe,
}

impl AssetKind {
    /// Display name used in progress lines and reports
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Link => "Link",
            Self::Image => "Image",
            Self::Script => "Script",
            Self::StylesIcon => "Styles/Icon",
            Self::Iframe => "Iframe",
        }
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Result of checking a single asset
#[derive(Debug, Clone, PartialEq)]
pub struct CheckOutcome {
    /// The absolute URL that was checked
    pub target_url: String,

    /// Final HTTP status; `None` when the request failed before a response
    pub status_code: Option<u16>,

    /// Display label, e.g. "404 Not Found" or "Error: Timeout"
    pub status_label: String,

    /// Wall time of the check in seconds, rounded to 2 decimals
    pub elapsed_seconds: Option<f64>,

    /// The page the asset was referenced from
    pub discovered_on: String,

    /// True if the status is >= 400 or the request failed
    pub is_dead: bool,

    /// True if the asset's host differs from the seed's host
    pub is_external: bool,

    pub asset_kind: AssetKind,
}

impl CheckOutcome {
    /// Builds an outcome for a request that received a status code
    pub fn from_status(
        target_url: &str,
        discovered_on: &str,
        asset_kind: AssetKind,
        status_code: u16,
        status_label: String,
        elapsed_seconds: f64,
    ) -> Self {
        Self {
            target_url: target_url.to_string(),
            status_code: Some(status_code),
            status_label,
            elapsed_seconds: Some(elapsed_seconds),
            discovered_on: discovered_on.to_string(),
            is_dead: status_code >= 400,
            is_external: false,
            asset_kind,
        }
    }

    /// Builds an outcome for a request that failed at the transport level
    pub fn from_failure(
        target_url: &str,
        discovered_on: &str,
        asset_kind: AssetKind,
        status_label: String,
    ) -> Self {
        Self {
            target_url: target_url.to_string(),
            status_code: None,
            status_label,
            elapsed_seconds: None,
            discovered_on: discovered_on.to_string(),
            is_dead: true,
            is_external: false,
            asset_kind,
        }
    }
}

/// Rounds a duration in seconds to two decimal places
pub fn round_seconds(seconds: f64) -> f64 {
    (seconds * 100.0).round() / 100.0
}
