//! Local file assets resolved through the default fetcher

use std::sync::Arc;

use preloader_engine::{AssetFetcher, DefaultFetcher, FileFetcher, PreloadApp, PreloadPhase};
use preloader_types::AssetLocator;

use crate::common::{CompletionCounter, fast_settings, run_to_close};

#[tokio::test]
async fn relative_locators_resolve_against_root() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join("img")).unwrap();
    std::fs::write(dir.path().join("img/fisa.png"), [0u8; 64]).unwrap();

    let fetcher = DefaultFetcher::new(dir.path()).unwrap();
    let bytes = fetcher
        .fetch(&AssetLocator::new("img/fisa.png"))
        .await
        .unwrap();
    assert_eq!(bytes, 64);
}

#[cfg(unix)]
#[tokio::test]
async fn mixed_local_manifest_reports_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let other = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("hero.png"), b"hero").unwrap();
    std::fs::write(other.path().join("abs.png"), b"absolute").unwrap();
    std::fs::write(other.path().join("url.png"), b"url").unwrap();

    let absolute = other.path().join("abs.png").display().to_string();
    let file_url = format!("file://{}", other.path().join("url.png").display());
    let settings = fast_settings(
        &["HELLO", "WELCOME"],
        ["hero.png".to_string(), absolute, file_url, "missing.png".to_string()],
        dir.path(),
    );

    let counter = CompletionCounter::default();
    let fetcher = Arc::new(DefaultFetcher::new(dir.path()).unwrap());
    let mut app = PreloadApp::start(&settings, fetcher, counter.callback());
    let report = run_to_close(&mut app).await;

    assert_eq!(counter.count(), 1);
    assert_eq!(report.loaded, vec![0, 1, 2]);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].0, 3);
    assert!(report.failed[0].1.contains("missing.png"));
}

#[tokio::test]
async fn duplicate_locators_count_per_slot() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("same.png"), b"x").unwrap();
    let settings = fast_settings(&["WELCOME"], ["same.png", "same.png"], dir.path());

    let counter = CompletionCounter::default();
    let fetcher = Arc::new(FileFetcher::new(dir.path()));
    let mut app = PreloadApp::start(&settings, fetcher, counter.callback());
    let report = run_to_close(&mut app).await;

    assert_eq!(report.loaded, vec![0, 1]);
    assert_eq!(app.snapshot().asset_count, 2);
    assert_eq!(counter.count(), 1);
}

#[tokio::test]
async fn empty_manifest_completes_on_words_alone() {
    let dir = tempfile::tempdir().unwrap();
    let words = ["HELLO", "BONJOUR", "WELCOME"];
    let settings = fast_settings(&words, Vec::<String>::new(), dir.path());

    let counter = CompletionCounter::default();
    let fetcher = Arc::new(FileFetcher::new(dir.path()));
    let mut app = PreloadApp::start(&settings, fetcher, counter.callback());
    assert!((app.snapshot().asset_progress - 100.0).abs() < f32::EPSILON);

    run_to_close(&mut app).await;
    assert_eq!(app.phase(), PreloadPhase::Closed);
    assert_eq!(app.snapshot().index, 2);
    assert_eq!(counter.count(), 1);
}
