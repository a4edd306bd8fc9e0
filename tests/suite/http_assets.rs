//! HTTP asset retrieval against a mock server

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use preloader_engine::{
    AssetFetcher, DefaultFetcher, FetchError, HttpFetcher, PreloadApp, PreloadEvent, PreloadPhase,
};
use preloader_types::AssetLocator;
use wiremock::MockServer;

use crate::common::{
    CompletionCounter, RUN_TIMEOUT, fast_settings, mount_asset, mount_slow_asset, run_to_close,
};

const WORDS: [&str; 3] = ["HELLO", "HOLA", "WELCOME"];

#[tokio::test]
async fn http_fetcher_counts_body_bytes() {
    let server = MockServer::start().await;
    mount_asset(&server, "/img/hero.png", 200, 1024).await;

    let fetcher = HttpFetcher::new().unwrap();
    let locator = AssetLocator::new(format!("{}/img/hero.png", server.uri()));
    assert_eq!(fetcher.fetch(&locator).await.unwrap(), 1024);
}

#[tokio::test]
async fn http_fetcher_maps_error_status() {
    let server = MockServer::start().await;
    mount_asset(&server, "/img/gone.png", 404, 0).await;

    let fetcher = HttpFetcher::new().unwrap();
    let locator = AssetLocator::new(format!("{}/img/gone.png", server.uri()));
    let err = fetcher.fetch(&locator).await.unwrap_err();
    assert!(matches!(err, FetchError::Status(404)));
}

#[tokio::test]
async fn mixed_statuses_settle_and_complete_once() {
    let server = MockServer::start().await;
    mount_asset(&server, "/img/a.png", 200, 10).await;
    mount_asset(&server, "/img/b.png", 404, 0).await;
    mount_asset(&server, "/img/c.png", 500, 0).await;

    let dir = tempfile::tempdir().unwrap();
    let locators = ["a", "b", "c"].map(|name| format!("{}/img/{name}.png", server.uri()));
    let settings = fast_settings(&WORDS, locators, dir.path());
    let counter = CompletionCounter::default();
    let fetcher = Arc::new(DefaultFetcher::new(dir.path()).unwrap());
    let mut app = PreloadApp::start(&settings, fetcher, counter.callback());

    let report = run_to_close(&mut app).await;

    assert_eq!(counter.count(), 1);
    assert_eq!(app.phase(), PreloadPhase::Closed);
    assert_eq!(report.loaded, vec![0]);
    let failed: Vec<usize> = report.failed.iter().map(|(slot, _)| *slot).collect();
    assert_eq!(failed, vec![1, 2]);
    assert!(report.failed[0].1.contains("404"));
    assert!(report.pending.is_empty());

    let snapshot = app.snapshot();
    assert!(snapshot.ready);
    assert!((snapshot.progress - 100.0).abs() < f32::EPSILON);
    assert_eq!(snapshot.failed, 2);
}

#[tokio::test]
async fn unreachable_and_malformed_urls_still_settle() {
    let dir = tempfile::tempdir().unwrap();
    let settings = fast_settings(
        &WORDS,
        ["http://", "http://127.0.0.1:9/unreachable.png"],
        dir.path(),
    );
    let counter = CompletionCounter::default();
    let fetcher = Arc::new(DefaultFetcher::new(dir.path()).unwrap());
    let mut app = PreloadApp::start(&settings, fetcher, counter.callback());

    let report = run_to_close(&mut app).await;

    assert_eq!(counter.count(), 1);
    assert!(report.loaded.is_empty());
    assert_eq!(report.failed.len(), 2);
}

#[tokio::test]
async fn slow_asset_holds_the_last_word() {
    let server = MockServer::start().await;
    mount_slow_asset(&server, "/img/slow.png", Duration::from_millis(300)).await;

    let dir = tempfile::tempdir().unwrap();
    let settings = fast_settings(
        &WORDS,
        [format!("{}/img/slow.png", server.uri())],
        dir.path(),
    );
    let counter = CompletionCounter::default();
    let fetcher = Arc::new(DefaultFetcher::new(dir.path()).unwrap());
    let mut app = PreloadApp::start(&settings, fetcher, counter.callback());

    let started = Instant::now();
    let marks: Arc<Mutex<Vec<(String, Duration)>>> = Arc::default();
    let sink = Arc::clone(&marks);
    tokio::time::timeout(
        RUN_TIMEOUT,
        app.run_with(move |event, _| {
            let label = match event {
                PreloadEvent::WordAdvanced { index, .. } if *index == WORDS.len() - 1 => "last",
                PreloadEvent::AllSettled => "settled",
                PreloadEvent::Ready => "ready",
                _ => return,
            };
            sink.lock().unwrap().push((label.to_string(), started.elapsed()));
        }),
    )
    .await
    .unwrap();

    let marks = marks.lock().unwrap();
    let at = |label: &str| {
        marks
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, t)| *t)
            .unwrap()
    };
    assert!(at("last") < at("settled"));
    assert!(at("ready") >= Duration::from_millis(250));
    assert!(at("ready") >= at("settled"));
    assert_eq!(counter.count(), 1);
}

#[tokio::test]
async fn teardown_mid_load_never_completes() {
    let server = MockServer::start().await;
    mount_slow_asset(&server, "/img/slow.png", Duration::from_secs(5)).await;

    let dir = tempfile::tempdir().unwrap();
    let settings = fast_settings(
        &WORDS,
        [format!("{}/img/slow.png", server.uri())],
        dir.path(),
    );
    let counter = CompletionCounter::default();
    let fetcher = Arc::new(DefaultFetcher::new(dir.path()).unwrap());
    let mut app = PreloadApp::start(&settings, fetcher, counter.callback());

    let _ = tokio::time::timeout(Duration::from_millis(100), app.run()).await;
    assert_eq!(app.phase(), PreloadPhase::Loading);

    app.teardown();
    app.teardown();
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert_eq!(counter.count(), 0);
    assert_eq!(app.phase(), PreloadPhase::Loading);
    assert_eq!(app.report().pending, vec![0]);
}
