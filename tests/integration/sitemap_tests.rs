//! Sitemap mode tests

use crate::{mount_head, mount_page, page_linking};
use deadlink_checker::{check_all, CheckRequest, CrawlControl, ProgressEvent, ProgressSink};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_xml(server: &MockServer, at: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(at))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "application/xml"),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_sitemap_index_union_survives_bad_branch() {
    let site = MockServer::start().await;
    let external = MockServer::start().await;
    let base = site.uri();

    mount_xml(
        &site,
        "/sitemap.xml",
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<sitemapindex xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
  <sitemap><loc>{base}/posts.xml</loc></sitemap>
  <sitemap><loc>{base}/pages.xml</loc></sitemap>
  <sitemap><loc>{base}/broken.xml</loc></sitemap>
</sitemapindex>"#
        ),
    )
    .await;
    mount_xml(
        &site,
        "/posts.xml",
        format!("<urlset><url><loc>{base}/post-1</loc></url><url><loc>{base}/about</loc></url></urlset>"),
    )
    .await;
    mount_xml(
        &site,
        "/pages.xml",
        format!("<urlset><url><loc>{base}/about</loc></url></urlset>"),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/broken.xml"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&site)
        .await;

    // Each page is scraped exactly once even though "/about" is listed twice
    Mock::given(method("GET"))
        .and(path("/post-1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(page_linking(&["/img.png".to_string()])),
        )
        .expect(1)
        .mount(&site)
        .await;
    mount_page(
        &site,
        "/about",
        page_linking(&["/post-1".to_string(), format!("{}/x", external.uri())]),
    )
    .await;
    mount_head(&external, "/x", 200).await;

    mount_head(&site, "/post-1", 200).await;
    mount_head(&site, "/about", 200).await;
    mount_head(&site, "/img.png", 404).await;
    Mock::given(method("GET"))
        .and(path("/img.png"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&site)
        .await;

    let (sink, mut events) = ProgressSink::channel();
    let outcomes = check_all(
        CheckRequest::new(format!("{}/sitemap.xml", base)),
        sink,
        CrawlControl::new(),
    )
    .await
    .expect("check should run");

    assert_eq!(outcomes.len(), 4, "Expected four outcomes, got {:?}", outcomes);

    // Externality is measured against the sitemap's host
    let ext = outcomes
        .iter()
        .find(|o| o.target_url == format!("{}/x", external.uri()))
        .expect("external outcome missing");
    assert!(ext.is_external);
    assert!(!ext.is_dead);
    assert_eq!(ext.discovered_on, format!("{}/about", base));

    let mut checked: Vec<_> = outcomes
        .iter()
        .filter(|o| !o.is_external)
        .map(|o| o.target_url.clone())
        .collect();
    checked.sort();
    assert_eq!(
        checked,
        vec![
            format!("{}/about", base),
            format!("{}/img.png", base),
            format!("{}/post-1", base),
        ]
    );

    let dead: Vec<_> = outcomes.iter().filter(|o| o.is_dead).collect();
    assert_eq!(dead.len(), 1);
    assert_eq!(dead[0].discovered_on, format!("{}/post-1", base));

    let errors = std::iter::from_fn(|| events.try_recv().ok())
        .filter(|e| matches!(e, ProgressEvent::Error(_)))
        .count();
    assert_eq!(errors, 1, "only the broken nested sitemap should be reported");
}

#[tokio::test]
async fn test_missing_sitemap_is_empty_not_fatal() {
    let site = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&site)
        .await;

    let outcomes = check_all(
        CheckRequest::new(format!("{}/sitemap.xml", site.uri())),
        ProgressSink::disabled(),
        CrawlControl::new(),
    )
    .await
    .expect("a missing sitemap is reported, not raised");

    assert!(outcomes.is_empty());
}
