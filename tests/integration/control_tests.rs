//! Pause and stop behaviour of a running check

use crate::{mount_page, page_linking};
use deadlink_checker::crawler::run_check;
use deadlink_checker::{CheckRequest, CrawlControl, CrawlPhase, ProgressEvent, ProgressSink};
use std::time::Duration;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn linked_site() -> MockServer {
    let site = MockServer::start().await;
    mount_page(
        &site,
        "/",
        page_linking(&["/a".to_string(), "/b".to_string(), "/c".to_string()]),
    )
    .await;
    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&site)
        .await;
    site
}

#[tokio::test]
async fn test_paused_run_waits_then_resumes() {
    let site = linked_site().await;
    let control = CrawlControl::new();
    control.pause();

    let (sink, mut events) = ProgressSink::channel();
    let handle = tokio::spawn(run_check(
        CheckRequest::new(format!("{}/", site.uri())),
        sink,
        control.clone(),
    ));

    tokio::time::sleep(Duration::from_millis(300)).await;
    let received = site.received_requests().await.unwrap_or_default();
    assert!(received.is_empty(), "paused run must not issue requests");
    assert!(!handle.is_finished());

    control.resume();
    let run = tokio::time::timeout(Duration::from_secs(10), handle)
        .await
        .expect("run should finish after resume")
        .expect("task should not panic")
        .expect("check should run");

    assert_eq!(run.phase, CrawlPhase::Completed);
    assert_eq!(run.outcomes.len(), 3);

    let phases: Vec<_> = std::iter::from_fn(|| events.try_recv().ok())
        .filter_map(|e| match e {
            ProgressEvent::Phase(phase) => Some(phase),
            _ => None,
        })
        .collect();
    assert_eq!(
        phases,
        vec![
            CrawlPhase::Running,
            CrawlPhase::Paused,
            CrawlPhase::Running,
            CrawlPhase::Completed,
        ]
    );
}

#[tokio::test]
async fn test_stop_while_paused_ends_run() {
    let site = linked_site().await;
    let control = CrawlControl::new();
    control.pause();

    let handle = tokio::spawn(run_check(
        CheckRequest::new(format!("{}/", site.uri())),
        ProgressSink::disabled(),
        control.clone(),
    ));

    tokio::time::sleep(Duration::from_millis(200)).await;
    control.stop();

    let run = tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("stop should unblock a paused run")
        .expect("task should not panic")
        .expect("check should run");

    assert_eq!(run.phase, CrawlPhase::Stopped);
    assert!(run.outcomes.is_empty());
    assert_eq!(run.pages_visited, 0);
}

#[tokio::test]
async fn test_stop_mid_batch_skips_remaining_checks() {
    let site = MockServer::start().await;
    let hrefs: Vec<String> = (0..20).map(|i| format!("/asset-{}", i)).collect();
    mount_page(&site, "/", page_linking(&hrefs)).await;
    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(200)))
        .mount(&site)
        .await;

    let control = CrawlControl::new();
    let mut request = CheckRequest::new(format!("{}/", site.uri()));
    request.workers = 1;

    let handle = tokio::spawn(run_check(request, ProgressSink::disabled(), control.clone()));

    tokio::time::sleep(Duration::from_millis(500)).await;
    control.stop();

    let run = tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("stop should end the batch early")
        .expect("task should not panic")
        .expect("check should run");

    assert_eq!(run.phase, CrawlPhase::Stopped);
    assert!(!run.outcomes.is_empty());
    assert!(run.outcomes.len() < 20);
}

#[tokio::test]
async fn test_pause_mid_batch_publishes_phase() {
    let site = MockServer::start().await;
    let hrefs: Vec<String> = (0..8).map(|i| format!("/asset-{}", i)).collect();
    mount_page(&site, "/", page_linking(&hrefs)).await;
    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(150)))
        .mount(&site)
        .await;

    let control = CrawlControl::new();
    let mut request = CheckRequest::new(format!("{}/", site.uri()));
    request.workers = 1;

    let (sink, mut events) = ProgressSink::channel();
    let handle = tokio::spawn(run_check(request, sink, control.clone()));

    tokio::time::sleep(Duration::from_millis(250)).await;
    control.pause();
    tokio::time::sleep(Duration::from_millis(300)).await;

    let mut phases = Vec::new();
    while let Ok(event) = events.try_recv() {
        if let ProgressEvent::Phase(phase) = event {
            phases.push(phase);
        }
    }
    assert_eq!(phases, vec![CrawlPhase::Running, CrawlPhase::Paused]);
    assert!(!handle.is_finished());

    control.resume();
    let run = tokio::time::timeout(Duration::from_secs(10), handle)
        .await
        .expect("run should finish after resume")
        .expect("task should not panic")
        .expect("check should run");

    assert_eq!(run.phase, CrawlPhase::Completed);
    assert_eq!(run.outcomes.len(), 8);

    let rest: Vec<_> = std::iter::from_fn(|| events.try_recv().ok())
        .filter_map(|e| match e {
            ProgressEvent::Phase(phase) => Some(phase),
            _ => None,
        })
        .collect();
    assert_eq!(rest, vec![CrawlPhase::Running, CrawlPhase::Completed]);
}
