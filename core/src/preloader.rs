//! The preload state machine: Loading -> Ready -> Closed.
//!
//! Pure and clock-agnostic: every operation takes `now`, so the engine can
//! drive it from real timers and tests can drive it from a fake clock.

use std::time::{Duration, Instant};

use serde::Serialize;

use preloader_types::ui::ExitTimeline;
use preloader_types::{
    DwellPolicy, ExitTimings, ProgressWeights, Settlement, WordPlaylist, combined_progress,
    graphemes,
};

use crate::gate::CompletionGate;
use crate::sequencer::{PlaybackSequencer, WordStage};
use crate::tracker::{AssetTracker, LoadReport, SettleResult};

/// Everything the state machine needs to start.
#[derive(Debug, Clone)]
pub struct PreloadPlan {
    pub playlist: WordPlaylist,
    pub asset_count: usize,
    pub dwell: DwellPolicy,
    pub exit: ExitTimings,
    pub weights: ProgressWeights,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreloadPhase {
    Loading,
    /// Gate opened; the exit animation is playing.
    Ready { ready_at: Instant },
    /// Exit finished. Terminal.
    Closed,
}

impl PreloadPhase {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Loading => "loading",
            Self::Ready { .. } => "ready",
            Self::Closed => "closed",
        }
    }
}

/// Observable transitions, in the order they happened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum PreloadEvent {
    WordAdvanced {
        index: usize,
        word: String,
    },
    AssetSettled {
        slot: usize,
        settled: usize,
        total: usize,
        failed: bool,
    },
    AllSettled,
    Ready,
    Closed,
}

/// Serializable progress summary for indicators and headless output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreloadSnapshot {
    pub phase: &'static str,
    pub index: usize,
    pub word_count: usize,
    pub word: String,
    pub settled: usize,
    pub asset_count: usize,
    pub failed: usize,
    pub asset_progress: f32,
    pub word_progress: f32,
    pub progress: f32,
    pub ready: bool,
}

/// Render-time view: the snapshot plus the timings animations need.
#[derive(Debug, Clone)]
pub struct PreloadView {
    pub snapshot: PreloadSnapshot,
    pub stage: WordStage,
    /// Time the current word has been on screen.
    pub word_elapsed: Duration,
    /// Time since the preloader started (drives the idle pulse).
    pub since_start: Duration,
    /// Exit timeline and time elapsed in it, once the gate has opened.
    pub exit: Option<(ExitTimeline, Duration)>,
}

#[derive(Debug)]
pub struct Preloader {
    playlist: WordPlaylist,
    weights: ProgressWeights,
    exit_timings: ExitTimings,
    sequencer: PlaybackSequencer,
    tracker: AssetTracker,
    gate: CompletionGate,
    phase: PreloadPhase,
    exit: Option<ExitTimeline>,
    started_at: Instant,
}

impl Preloader {
    #[must_use]
    pub fn new(plan: PreloadPlan, now: Instant) -> Self {
        let sequencer = PlaybackSequencer::new(plan.playlist.len(), plan.dwell, now);
        Self {
            playlist: plan.playlist,
            weights: plan.weights,
            exit_timings: plan.exit,
            sequencer,
            tracker: AssetTracker::new(plan.asset_count),
            gate: CompletionGate::new(),
            phase: PreloadPhase::Loading,
            exit: None,
            started_at: now,
        }
    }

    /// Evaluate the gate before any tick or settlement.
    ///
    /// Only a one-word playlist with an empty manifest opens here.
    pub fn start(&mut self, now: Instant) -> Vec<PreloadEvent> {
        let mut events = Vec::new();
        if self.tracker.is_complete() {
            events.push(PreloadEvent::AllSettled);
        }
        self.evaluate(now, &mut events);
        events
    }

    /// Sequencer tick. Also finishes the exit once its timeline has elapsed.
    pub fn tick(&mut self, now: Instant) -> Vec<PreloadEvent> {
        let mut events = Vec::new();
        if self.phase == PreloadPhase::Closed {
            return events;
        }

        if let Some(index) = self.sequencer.tick(now) {
            let word = self.playlist.word(index).to_string();
            tracing::debug!(index, word = %word, "Word advanced");
            events.push(PreloadEvent::WordAdvanced { index, word });
        }

        self.evaluate(now, &mut events);
        events
    }

    /// Record one asset settling. Success and failure count the same.
    pub fn settle(&mut self, settlement: Settlement, now: Instant) -> Vec<PreloadEvent> {
        let mut events = Vec::new();
        if self.phase == PreloadPhase::Closed {
            return events;
        }

        let Settlement { slot, outcome } = settlement;
        let failed = outcome.is_failure();
        match self.tracker.settle(slot, outcome) {
            SettleResult::Progress { settled, total } => {
                events.push(PreloadEvent::AssetSettled {
                    slot,
                    settled,
                    total,
                    failed,
                });
            }
            SettleResult::AllSettled => {
                let total = self.tracker.total();
                events.push(PreloadEvent::AssetSettled {
                    slot,
                    settled: total,
                    total,
                    failed,
                });
                events.push(PreloadEvent::AllSettled);
            }
            SettleResult::Duplicate => {
                tracing::warn!(slot, "Ignoring duplicate settlement");
                return events;
            }
            SettleResult::UnknownSlot => {
                tracing::warn!(slot, "Ignoring settlement for unknown asset slot");
                return events;
            }
        }

        self.evaluate(now, &mut events);
        events
    }

    /// Runs after every mutation so the rising edge is never missed.
    fn evaluate(&mut self, now: Instant, events: &mut Vec<PreloadEvent>) {
        if self
            .gate
            .evaluate(self.sequencer.is_holding(), self.tracker.is_complete())
        {
            let chars = graphemes(self.playlist.word(self.sequencer.index())).len();
            self.exit = Some(ExitTimeline::new(self.exit_timings, chars));
            self.phase = PreloadPhase::Ready { ready_at: now };
            tracing::info!(
                failed = self.tracker.failed(),
                total = self.tracker.total(),
                "Preload gate opened"
            );
            events.push(PreloadEvent::Ready);
        }

        if let PreloadPhase::Ready { ready_at } = self.phase
            && self
                .exit
                .as_ref()
                .is_some_and(|exit| exit.is_finished(now.saturating_duration_since(ready_at)))
        {
            self.phase = PreloadPhase::Closed;
            tracing::info!("Preload exit finished");
            events.push(PreloadEvent::Closed);
        }
    }

    #[must_use]
    pub fn phase(&self) -> PreloadPhase {
        self.phase
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.gate.is_open()
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.phase == PreloadPhase::Closed
    }

    #[must_use]
    pub fn index(&self) -> usize {
        self.sequencer.index()
    }

    #[must_use]
    pub fn settled(&self) -> usize {
        self.tracker.settled()
    }

    #[must_use]
    pub fn all_settled(&self) -> bool {
        self.tracker.is_complete()
    }

    #[must_use]
    pub fn playlist(&self) -> &WordPlaylist {
        &self.playlist
    }

    #[must_use]
    pub fn report(&self) -> LoadReport {
        self.tracker.report()
    }

    /// Advisory combined progress; 100 only once the gate is open.
    #[must_use]
    pub fn progress(&self) -> f32 {
        combined_progress(
            self.tracker.progress(),
            self.sequencer.progress(),
            self.gate.is_open(),
            self.weights,
        )
    }

    #[must_use]
    pub fn snapshot(&self) -> PreloadSnapshot {
        PreloadSnapshot {
            phase: self.phase.as_str(),
            index: self.sequencer.index(),
            word_count: self.playlist.len(),
            word: self.playlist.word(self.sequencer.index()).to_string(),
            settled: self.tracker.settled(),
            asset_count: self.tracker.total(),
            failed: self.tracker.failed(),
            asset_progress: self.tracker.progress(),
            word_progress: self.sequencer.progress(),
            progress: self.progress(),
            ready: self.gate.is_open(),
        }
    }

    #[must_use]
    pub fn view(&self, now: Instant) -> PreloadView {
        let exit = match (self.phase, &self.exit) {
            (PreloadPhase::Ready { ready_at }, Some(exit)) => {
                Some((exit.clone(), now.saturating_duration_since(ready_at)))
            }
            (PreloadPhase::Closed, Some(exit)) => Some((exit.clone(), exit.total())),
            _ => None,
        };
        PreloadView {
            snapshot: self.snapshot(),
            stage: self.sequencer.stage(now),
            word_elapsed: self.sequencer.elapsed(now),
            since_start: now.saturating_duration_since(self.started_at),
            exit,
        }
    }
}
