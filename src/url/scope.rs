use url::Url;

/// Extracts the comparable authority of a URL for scope checks
///
/// The host is lowercased, a leading `www.` is removed and an explicit
/// non-default port is appended, so `https://WWW.Example.com` and
/// `https://example.com:443` both yield `example.com`.
///
/// # Examples
///
/// ```
/// use deadlink_checker::url::scope_key;
///
/// assert_eq!(scope_key("https://www.Example.com/a"), Some("example.com".to_string()));
/// assert_eq!(scope_key("http://127.0.0.1:8080/"), Some("127.0.0.1:8080".to_string()));
/// assert_eq!(scope_key("not a url"), None);
/// ```
pub fn scope_key(url: &str) -> Option<String> {
    let parsed = Url::parse(url.trim()).ok()?;
    let host = parsed.host_str()?.to_lowercase();
    let host = host.strip_prefix("www.").unwrap_or(&host).to_string();

    Some(match parsed.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host,
    })
}

/// Decides whether `url` lives outside the crawl rooted at `base_url`
///
/// Only an exact match of [`scope_key`] counts as internal; subdomains other
/// than `www.` are external. A URL whose host cannot be determined is treated
/// as external.
///
/// # Examples
///
/// ```
/// use deadlink_checker::url::is_external;
///
/// assert!(is_external("https://google.com", "https://example.com"));
/// assert!(!is_external("https://www.example.com/about", "https://example.com"));
/// ```
pub fn is_external(url: &str, base_url: &str) -> bool {
    match (scope_key(url), scope_key(base_url)) {
        (Some(candidate), Some(base)) => candidate != base,
        _ => true,
    }
}
