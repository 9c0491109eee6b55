//! URL handling module for the checker
//!
//! This module provides URL normalization, internal/external scope
//! classification, exclusion filtering and the page-likeness test used to
//! decide which checked links are worth crawling further.

mod exclude;
mod normalize;
mod scope;

use url::Url;

// Re-export main functions
pub use exclude::{ExclusionFilter, ExclusionRule};
pub use normalize::normalize_url;
pub use scope::{is_external, scope_key};

/// File extensions that never lead to an HTML page
pub const NON_HTML_EXTENSIONS: &[&str] = &[
    "pdf", "jpg", "jpeg", "png", "gif", "svg", "zip", "tar", "gz", "mp4", "mp3", "doc", "docx",
    "xls", "xlsx", "css", "js",
];

/// Returns true if the URL path ends in a known non-HTML extension
///
/// Only the path is inspected, so `/download?file=a.pdf` is still a page.
///
/// # Examples
///
/// ```
/// use deadlink_checker::url::has_non_html_extension;
///
/// assert!(has_non_html_extension("https://example.com/files/Report.PDF"));
/// assert!(!has_non_html_extension("https://example.com/download?file=a.pdf"));
/// assert!(!has_non_html_extension("https://example.com/about"));
/// ```
pub fn has_non_html_extension(url: &str) -> bool {
    let Ok(parsed) = Url::parse(url) else {
        return false;
    };

    let path = parsed.path().to_lowercase();
    NON_HTML_EXTENSIONS
        .iter()
        .any(|ext| path.ends_with(&format!(".{}", ext)))
}
