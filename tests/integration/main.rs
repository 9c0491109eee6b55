//! Integration tests for the dead link checker
//!
//! These tests use wiremock to create mock HTTP servers and drive
//! `check_all` end-to-end.

mod control_tests;
mod crawl_tests;
mod sitemap_tests;

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Mounts an HTML page served on GET
pub async fn mount_page(server: &MockServer, at: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(at))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

/// Mounts a HEAD response for one path
pub async fn mount_head(server: &MockServer, at: &str, status: u16) {
    Mock::given(method("HEAD"))
        .and(path(at))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

/// Builds a minimal HTML document linking to each href
pub fn page_linking(hrefs: &[String]) -> String {
    let links: String = hrefs
        .iter()
        .map(|href| format!(r#"<a href="{}">link</a>"#, href))
        .collect();
    format!("<html><body>{}</body></html>", links)
}
