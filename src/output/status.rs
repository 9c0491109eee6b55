/// Human-readable labels for the status codes the checker commonly sees
const STATUS_LABELS: &[(u16, &str)] = &[
    (200, "200 OK"),
    (201, "201 Created"),
    (202, "202 Accepted"),
    (204, "204 No Content"),
    (301, "301 Moved Permanently"),
    (302, "302 Found"),
    (307, "307 Temporary Redirect"),
    (308, "308 Permanent Redirect"),
    (400, "400 Bad Request"),
    (401, "401 Unauthorized"),
    (403, "403 Forbidden"),
    (404, "404 Not Found"),
    (405, "405 Method Not Allowed"),
    (408, "408 Request Timeout"),
    (410, "410 Gone"),
    (429, "429 Too Many Requests"),
    (500, "500 Internal Server Error"),
    (502, "502 Bad Gateway"),
    (503, "503 Service Unavailable"),
    (504, "504 Gateway Timeout"),
];

/// Maps an HTTP status code to its display label
///
/// # Examples
///
/// ```
/// use deadlink_checker::output::status_label;
///
/// assert_eq!(status_label(404), "404 Not Found");
/// assert_eq!(status_label(418), "418 Unknown");
/// ```
pub fn status_label(code: u16) -> String {
    STATUS_LABELS
        .iter()
        .find(|(known, _)| *known == code)
        .map(|(_, label)| label.to_string())
        .unwrap_or_else(|| format!("{} Unknown", code))
}
