//! Runtime owner of the preload state machine.
//!
//! # Scheduling
//!
//! All state lives in [`PreloadApp`] and is touched from one task. Three
//! sources feed it, and each mutation re-evaluates the gate immediately:
//!
//! ```text
//! retrieval tasks --mpsc--> apply_settlement() --+
//!                                                +--> Preloader (gate, exit) --> on_complete()
//! sequencer interval -----> tick() --------------+
//!
//! frame driver ----------> view() (read-only)
//! ```

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::time::MissedTickBehavior;

use preloader_config::PreloadSettings;
use preloader_core::{
    LoadReport, PreloadEvent, PreloadPhase, PreloadSnapshot, PreloadView, Preloader,
};
use preloader_types::Settlement;

use crate::fetch::AssetFetcher;
use crate::loader::AssetLoader;

/// Zero-argument completion notification.
pub type CompletionCallback = Box<dyn FnOnce() + Send + 'static>;

/// Current time on the tokio clock, so paused-time tests drive the state machine too.
#[must_use]
pub fn clock_now() -> Instant {
    tokio::time::Instant::now().into_std()
}

enum Step {
    Tick,
    Settled(Option<Settlement>),
}

pub struct PreloadApp {
    preloader: Preloader,
    loader: Option<AssetLoader>,
    on_complete: Option<CompletionCallback>,
    pending_events: Vec<PreloadEvent>,
    tick_interval: Duration,
    torn_down: bool,
}

impl PreloadApp {
    /// Create the state and spawn every retrieval. Must be called inside a tokio runtime.
    pub fn start<F>(
        settings: &PreloadSettings,
        fetcher: Arc<dyn AssetFetcher>,
        on_complete: F,
    ) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        let now = clock_now();
        let preloader = Preloader::new(settings.plan(), now);
        let loader = AssetLoader::start(&settings.manifest, fetcher);
        tracing::info!(
            words = settings.playlist.len(),
            assets = settings.manifest.len(),
            "Preload started"
        );

        let mut app = Self {
            preloader,
            loader: Some(loader),
            on_complete: Some(Box::new(on_complete)),
            pending_events: Vec::new(),
            tick_interval: settings.tick,
            torn_down: false,
        };
        let events = app.preloader.start(now);
        app.handle_events(events);
        app
    }

    /// Sequencer tick.
    pub fn tick(&mut self) {
        if self.torn_down {
            return;
        }
        let events = self.preloader.tick(clock_now());
        self.handle_events(events);
    }

    pub fn apply_settlement(&mut self, settlement: Settlement) {
        if self.torn_down {
            return;
        }
        let events = self.preloader.settle(settlement, clock_now());
        self.handle_events(events);
    }

    /// Apply every settlement already queued. Returns how many were applied.
    pub fn process_settlements(&mut self) -> usize {
        let mut applied = 0;
        while let Some(settlement) = self.loader.as_mut().and_then(AssetLoader::try_recv) {
            self.apply_settlement(settlement);
            applied += 1;
        }
        applied
    }

    /// Wait for the next settlement. Resolves to `None` once nothing more can arrive.
    pub async fn next_settlement(&mut self) -> Option<Settlement> {
        match self.loader.as_mut() {
            Some(loader) => loader.recv().await,
            None => None,
        }
    }

    /// Whether a settlement can still arrive.
    #[must_use]
    pub fn awaiting_assets(&self) -> bool {
        self.loader.is_some() && !self.preloader.all_settled()
    }

    fn handle_events(&mut self, events: Vec<PreloadEvent>) {
        for event in events {
            match &event {
                PreloadEvent::AllSettled => {
                    // Every slot reported; the retrieval tasks have all finished.
                    self.loader = None;
                    let report = self.preloader.report();
                    if report.is_degraded() {
                        tracing::warn!(
                            failed = report.failed.len(),
                            "All assets settled with failures"
                        );
                    } else {
                        tracing::info!("All assets settled");
                    }
                }
                PreloadEvent::Closed => self.finish(),
                _ => {}
            }
            self.pending_events.push(event);
        }
    }

    fn finish(&mut self) {
        self.loader = None;
        if let Some(on_complete) = self.on_complete.take() {
            tracing::info!("Preload complete");
            on_complete();
        }
    }

    /// Release every retrieval and drop the callback without invoking it.
    ///
    /// Idempotent, and a no-op for the callback once the preloader has closed.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;
        if let Some(mut loader) = self.loader.take() {
            loader.abort();
        }
        if self.on_complete.take().is_some() {
            tracing::info!(phase = self.preloader.phase().as_str(), "Preload torn down");
        }
    }

    /// Drain transitions recorded since the last call.
    pub fn take_events(&mut self) -> Vec<PreloadEvent> {
        std::mem::take(&mut self.pending_events)
    }

    #[must_use]
    pub fn phase(&self) -> PreloadPhase {
        self.preloader.phase()
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.preloader.is_closed()
    }

    #[must_use]
    pub fn snapshot(&self) -> PreloadSnapshot {
        self.preloader.snapshot()
    }

    #[must_use]
    pub fn view(&self) -> PreloadView {
        self.preloader.view(clock_now())
    }

    #[must_use]
    pub fn report(&self) -> LoadReport {
        self.preloader.report()
    }

    #[must_use]
    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    /// Drive to completion without a renderer.
    ///
    /// Never returns if an asset never settles; wrap in a timeout or drop the
    /// future to abandon it.
    pub async fn run(&mut self) -> LoadReport {
        self.run_with(|_, _| {}).await
    }

    /// Like [`run`](Self::run), reporting every transition to `observer`.
    pub async fn run_with<F>(&mut self, mut observer: F) -> LoadReport
    where
        F: FnMut(&PreloadEvent, &PreloadSnapshot),
    {
        let mut ticker = tokio::time::interval(self.tick_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        while !self.is_closed() && !self.torn_down {
            let awaiting = self.awaiting_assets();
            let step = tokio::select! {
                settlement = self.next_settlement(), if awaiting => Step::Settled(settlement),
                _ = ticker.tick() => Step::Tick,
            };

            match step {
                Step::Tick => self.tick(),
                Step::Settled(Some(settlement)) => self.apply_settlement(settlement),
                Step::Settled(None) => {
                    tracing::warn!("Asset channel closed before every slot settled");
                    self.loader = None;
                }
            }

            let events = self.take_events();
            if !events.is_empty() {
                let snapshot = self.snapshot();
                for event in &events {
                    observer(event, &snapshot);
                }
            }
        }

        self.report()
    }
}

impl Drop for PreloadApp {
    fn drop(&mut self) {
        self.teardown();
    }
}

impl std::fmt::Debug for PreloadApp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreloadApp")
            .field("preloader", &self.preloader)
            .field("loader", &self.loader)
            .field("pending_events", &self.pending_events.len())
            .field("torn_down", &self.torn_down)
            .finish_non_exhaustive()
    }
}
