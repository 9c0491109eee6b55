//! End-to-end crawl tests against mock servers

use crate::{mount_head, mount_page, page_linking};
use deadlink_checker::crawler::run_check;
use deadlink_checker::{
    check_all, normalize_url, AssetKind, CheckRequest, CrawlControl, CrawlPhase, ProgressEvent,
    ProgressSink,
};
use std::collections::HashSet;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_single_page_internal_and_external() {
    let site = MockServer::start().await;
    let external = MockServer::start().await;
    let base = site.uri();

    mount_page(
        &site,
        "/",
        page_linking(&["/page1".to_string(), format!("{}/", external.uri())]),
    )
    .await;
    mount_head(&site, "/page1", 200).await;

    // The external host is dead on both HEAD and the GET retry
    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&external)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&external)
        .await;

    // With max depth 1 the linked page is checked but never scraped
    Mock::given(method("GET"))
        .and(path("/page1"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&site)
        .await;

    let request = CheckRequest::new(format!("{}/", base));
    let outcomes = check_all(request, ProgressSink::disabled(), CrawlControl::new())
        .await
        .expect("check should run");

    assert_eq!(outcomes.len(), 2, "Expected two outcomes, got {:?}", outcomes);

    let internal = outcomes
        .iter()
        .find(|o| o.target_url == format!("{}/page1", base))
        .expect("internal outcome missing");
    assert!(!internal.is_dead);
    assert!(!internal.is_external);
    assert_eq!(internal.status_code, Some(200));
    assert_eq!(internal.discovered_on, format!("{}/", base));
    assert_eq!(internal.asset_kind, AssetKind::Link);

    let ext = outcomes
        .iter()
        .find(|o| o.target_url.starts_with(&external.uri()))
        .expect("external outcome missing");
    assert!(ext.is_dead);
    assert!(ext.is_external);
    assert_eq!(ext.status_code, Some(404));
    assert_eq!(ext.status_label, "404 Not Found");
}

#[tokio::test]
async fn test_head_rejected_falls_back_to_get() {
    let site = MockServer::start().await;
    let base = site.uri();

    mount_page(&site, "/", page_linking(&["/download".to_string()])).await;
    mount_head(&site, "/download", 405).await;
    Mock::given(method("GET"))
        .and(path("/download"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&site)
        .await;

    let outcomes = check_all(
        CheckRequest::new(format!("{}/", base)),
        ProgressSink::disabled(),
        CrawlControl::new(),
    )
    .await
    .expect("check should run");

    assert_eq!(outcomes.len(), 1);
    assert_eq!(outcomes[0].status_code, Some(200));
    assert!(!outcomes[0].is_dead);
}

#[tokio::test]
async fn test_recursive_crawl_has_no_duplicates() {
    let site = MockServer::start().await;
    let base = site.uri();

    // Every page links to every other page plus a shared stylesheet
    let pages = ["/", "/a", "/b", "/c"];
    for page in pages {
        let mut hrefs: Vec<String> = pages.iter().map(|p| p.to_string()).collect();
        hrefs.push("/a/".to_string());
        hrefs.push("/b#section".to_string());
        let body = format!(
            r#"<html><head><link rel="stylesheet" href="/site.css"></head>{}</html>"#,
            page_linking(&hrefs)
        );
        mount_page(&site, page, body).await;
    }
    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&site)
        .await;

    let mut request = CheckRequest::new(format!("{}/", base));
    request.max_depth = 4;
    request.workers = 3;

    let outcomes = check_all(request, ProgressSink::disabled(), CrawlControl::new())
        .await
        .expect("check should run");

    let mut keys = HashSet::new();
    for outcome in &outcomes {
        let key = normalize_url(&outcome.target_url).expect("checked URLs are valid");
        assert!(keys.insert(key.clone()), "Duplicate outcome for {}", key);
    }
    // "/", "/a", "/b", "/c" and the stylesheet
    assert_eq!(keys.len(), 5);
}

#[tokio::test]
async fn test_depth_ceiling_is_respected() {
    let site = MockServer::start().await;
    let base = site.uri();

    mount_page(&site, "/", page_linking(&["/one".to_string()])).await;
    mount_page(&site, "/one", page_linking(&["/two".to_string()])).await;
    mount_page(&site, "/two", page_linking(&["/three".to_string()])).await;
    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&site)
        .await;

    // Depth 2 scrapes "/", "/one" and "/two" but never "/three"
    Mock::given(method("GET"))
        .and(path("/three"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&site)
        .await;

    let mut request = CheckRequest::new(format!("{}/", base));
    request.max_depth = 2;

    let run = run_check(request, ProgressSink::disabled(), CrawlControl::new())
        .await
        .expect("check should run");

    assert_eq!(run.phase, CrawlPhase::Completed);
    assert_eq!(run.pages_visited, 3);
    assert!(run
        .outcomes
        .iter()
        .any(|o| o.target_url == format!("{}/three", base)));
}

#[tokio::test]
async fn test_unreachable_page_does_not_stop_crawl() {
    let site = MockServer::start().await;
    let base = site.uri();

    mount_page(
        &site,
        "/",
        page_linking(&["/broken".to_string(), "/fine".to_string()]),
    )
    .await;
    mount_page(&site, "/fine", page_linking(&["/deep".to_string()])).await;
    mount_page(&site, "/deep", page_linking(&[])).await;

    // "/broken" answers HEAD but fails when fetched as a page
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&site)
        .await;
    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&site)
        .await;

    let mut request = CheckRequest::new(format!("{}/", base));
    request.max_depth = 2;
    request.workers = 1;

    let (sink, mut events) = ProgressSink::channel();
    let outcomes = check_all(request, sink, CrawlControl::new())
        .await
        .expect("check should run");

    assert!(outcomes
        .iter()
        .any(|o| o.target_url == format!("{}/deep", base)));

    let mut errors = Vec::new();
    while let Ok(event) = events.try_recv() {
        if let ProgressEvent::Error(message) = event {
            errors.push(message);
        }
    }
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("/broken"));
}

#[tokio::test]
async fn test_excluded_urls_are_never_checked() {
    let site = MockServer::start().await;
    let base = site.uri();

    mount_page(
        &site,
        "/",
        page_linking(&[
            "/private/account".to_string(),
            "/PRIVATE/other".to_string(),
            "/public".to_string(),
        ]),
    )
    .await;
    mount_page(&site, "/public", page_linking(&["/private/account".to_string()])).await;
    mount_head(&site, "/public", 200).await;
    Mock::given(method("HEAD"))
        .and(path("/private/account"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&site)
        .await;

    let mut request = CheckRequest::new(format!("{}/", base));
    request.max_depth = 2;
    request.exclude = vec!["/private/".to_string()];

    let (sink, mut events) = ProgressSink::channel();
    let outcomes = check_all(request, sink, CrawlControl::new())
        .await
        .expect("check should run");

    assert_eq!(outcomes.len(), 1);
    assert_eq!(outcomes[0].target_url, format!("{}/public", base));

    // Rediscovery on "/public" does not log the exclusion again
    let mut exclusion_lines = 0;
    while let Ok(event) = events.try_recv() {
        if let ProgressEvent::Line(line) = event {
            if line.contains("Excluding") && line.contains("/private/account") {
                exclusion_lines += 1;
            }
        }
    }
    assert_eq!(exclusion_lines, 1);
}

#[tokio::test]
async fn test_external_assets_skipped_when_disabled() {
    let site = MockServer::start().await;
    let external = MockServer::start().await;
    let base = site.uri();

    mount_page(
        &site,
        "/",
        format!(
            r#"<html><body><img src="/logo.png"><script src="{}/lib.js"></script></body></html>"#,
            external.uri()
        ),
    )
    .await;
    mount_head(&site, "/logo.png", 200).await;
    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&external)
        .await;

    let mut request = CheckRequest::new(format!("{}/", base));
    request.check_external = false;

    let outcomes = check_all(request, ProgressSink::disabled(), CrawlControl::new())
        .await
        .expect("check should run");

    assert_eq!(outcomes.len(), 1);
    assert_eq!(outcomes[0].asset_kind, AssetKind::Image);
}

#[tokio::test]
async fn test_unreachable_seed_yields_no_outcomes() {
    let site = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&site)
        .await;

    let run = run_check(
        CheckRequest::new(format!("{}/", site.uri())),
        ProgressSink::disabled(),
        CrawlControl::new(),
    )
    .await
    .expect("an unreachable seed is not a configuration error");

    assert!(run.outcomes.is_empty());
    assert_eq!(run.phase, CrawlPhase::Completed);
}
