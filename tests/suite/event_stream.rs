//! Ordering and shape of the observable event stream

use std::sync::Arc;

use preloader_engine::{FileFetcher, PreloadApp, PreloadEvent, PreloadSnapshot};

use crate::common::{CompletionCounter, RUN_TIMEOUT, fast_settings};

const WORDS: [&str; 4] = ["HELLO", "BONJOUR", "你好", "WELCOME"];

async fn record() -> Vec<(PreloadEvent, PreloadSnapshot)> {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("a.png"), b"aa").unwrap();
    std::fs::write(dir.path().join("b.png"), b"bbb").unwrap();
    let settings = fast_settings(&WORDS, ["a.png", "b.png"], dir.path());

    let counter = CompletionCounter::default();
    let fetcher = Arc::new(FileFetcher::new(dir.path()));
    let mut app = PreloadApp::start(&settings, fetcher, counter.callback());

    let snapshot = app.snapshot();
    let mut recorded: Vec<_> = app
        .take_events()
        .into_iter()
        .map(|event| (event, snapshot.clone()))
        .collect();
    tokio::time::timeout(
        RUN_TIMEOUT,
        app.run_with(|event, snapshot| recorded.push((event.clone(), snapshot.clone()))),
    )
    .await
    .unwrap();
    assert_eq!(counter.count(), 1);
    recorded
}

#[tokio::test]
async fn words_advance_in_order_and_ready_fires_once() {
    let recorded = record().await;
    let events: Vec<&PreloadEvent> = recorded.iter().map(|(event, _)| event).collect();

    let advanced: Vec<usize> = events
        .iter()
        .filter_map(|event| match event {
            PreloadEvent::WordAdvanced { index, .. } => Some(*index),
            _ => None,
        })
        .collect();
    assert_eq!(advanced, vec![1, 2, 3]);

    let settled = events
        .iter()
        .filter(|event| matches!(event, PreloadEvent::AssetSettled { .. }))
        .count();
    assert_eq!(settled, 2);

    let count = |wanted: &PreloadEvent| events.iter().filter(|event| **event == wanted).count();
    assert_eq!(count(&PreloadEvent::AllSettled), 1);
    assert_eq!(count(&PreloadEvent::Ready), 1);
    assert_eq!(count(&PreloadEvent::Closed), 1);
    assert_eq!(events.last(), Some(&&PreloadEvent::Closed));
}

#[tokio::test]
async fn progress_is_monotonic_and_capped_until_ready() {
    let recorded = record().await;
    let mut last = 0.0_f32;
    for (event, snapshot) in &recorded {
        assert!(snapshot.progress >= last, "{event:?} went backwards");
        last = snapshot.progress;
        if snapshot.ready {
            assert!((snapshot.progress - 100.0).abs() < f32::EPSILON);
        } else {
            assert!(snapshot.progress <= 99.0);
        }
    }
    assert!((last - 100.0).abs() < f32::EPSILON);
}

#[tokio::test]
async fn events_serialize_as_tagged_json_lines() {
    let recorded = record().await;
    let tags: Vec<String> = recorded
        .iter()
        .map(|(event, _)| {
            let value = serde_json::to_value(event).unwrap();
            value["event"].as_str().unwrap().to_string()
        })
        .collect();
    assert!(tags.contains(&"word_advanced".to_string()));
    assert!(tags.contains(&"asset_settled".to_string()));
    assert_eq!(tags.last().map(String::as_str), Some("closed"));

    let (_, snapshot) = recorded.last().unwrap();
    let value = serde_json::to_value(snapshot).unwrap();
    assert_eq!(value["phase"], "closed");
    assert_eq!(value["word"], "WELCOME");
    assert_eq!(value["word_count"], 4);
}
