use crate::UrlError;
use url::Url;

/// Normalizes a URL into the key used for visited/checked bookkeeping
///
/// # Normalization Steps
///
/// 1. Parse the URL; reject if malformed or not HTTP(S)
/// 2. Lowercase the host (an explicit non-default port is kept)
/// 3. Drop user info and fragment
/// 4. Remove trailing slashes from the path, except for the root `/`
/// 5. Re-append the query string if it is non-empty
///
/// No percent-decoding is performed, so two spellings of the same resource
/// may produce different keys.
///
/// # Arguments
///
/// * `url_str` - The absolute URL string to normalize
///
/// # Returns
///
/// * `Ok(String)` - The normalized key
/// * `Err(UrlError)` - Failed to parse the URL
///
/// # Examples
///
/// ```
/// use deadlink_checker::url::normalize_url;
///
/// let key = normalize_url("https://EXAMPLE.com/path/?q=1#frag").unwrap();
/// assert_eq!(key, "https://example.com/path?q=1");
/// ```
pub fn normalize_url(url_str: &str) -> Result<String, UrlError> {
    let url = Url::parse(url_str.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(url.scheme().to_string()));
    }

    let host = url.host_str().ok_or(UrlError::MissingHost)?.to_lowercase();

    let mut normalized = format!("{}://{}", url.scheme(), host);
    if let Some(port) = url.port() {
        normalized.push_str(&format!(":{}", port));
    }
    normalized.push_str(normalize_path(url.path()));

    if let Some(query) = url.query().filter(|q| !q.is_empty()) {
        normalized.push('?');
        normalized.push_str(query);
    }

    Ok(normalized)
}

/// Strips trailing slashes, keeping a bare `/` for the root
fn normalize_path(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/"
    } else {
        trimmed
    }
}
