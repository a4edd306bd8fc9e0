//! Shared test utilities and fixtures
//!
//! Fast timings so whole runs finish in well under a second of real time.

#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use preloader_engine::{LoadReport, PreloadApp, PreloadSettings};
use preloader_types::ui::UiOptions;
use preloader_types::{AssetManifest, DwellPolicy, ExitTimings, ProgressWeights, WordPlaylist};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const RUN_TIMEOUT: Duration = Duration::from_secs(10);

pub fn fast_settings<I, S>(words: &[&str], locators: I, root: &Path) -> PreloadSettings
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    PreloadSettings {
        playlist: WordPlaylist::new(words.iter().copied()).unwrap(),
        manifest: AssetManifest::new(locators),
        asset_root: root.to_path_buf(),
        dwell: DwellPolicy {
            first: Duration::from_millis(30),
            rest: Duration::from_millis(10),
            leave: Duration::from_millis(5),
        },
        exit: ExitTimings {
            delay: Duration::from_millis(10),
            text_out: Duration::from_millis(20),
            char_stagger: Duration::from_millis(1),
            logo_out: Duration::from_millis(15),
            logo_overlap: Duration::from_millis(5),
            curtain: Duration::from_millis(20),
            curtain_overlap: Duration::from_millis(5),
        },
        weights: ProgressWeights::default(),
        tick: Duration::from_millis(2),
        ui: UiOptions::default(),
    }
}

/// Counts completion callback invocations.
#[derive(Clone, Default)]
pub struct CompletionCounter(Arc<AtomicUsize>);

impl CompletionCounter {
    pub fn callback(&self) -> impl FnOnce() + Send + 'static {
        let count = Arc::clone(&self.0);
        move || {
            count.fetch_add(1, Ordering::SeqCst);
        }
    }

    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

/// Run to completion, failing the test instead of hanging.
pub async fn run_to_close(app: &mut PreloadApp) -> LoadReport {
    tokio::time::timeout(RUN_TIMEOUT, app.run())
        .await
        .expect("preloader did not close in time")
}

pub async fn mount_asset(server: &MockServer, route: &str, status: u16, body_len: usize) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status).set_body_bytes(vec![0u8; body_len]))
        .mount(server)
        .await;
}

pub async fn mount_slow_asset(server: &MockServer, route: &str, delay: Duration) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(vec![0u8; 8])
                .set_delay(delay),
        )
        .mount(server)
        .await;
}
