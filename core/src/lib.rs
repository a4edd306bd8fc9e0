//! Core domain logic for the preloader.
//!
//! This crate owns the state machine that gates the application reveal:
//! an asset tracker and a word sequencer feed an edge-triggered completion
//! gate, which starts the exit timeline exactly once. No IO, no async.

mod gate;
mod preloader;
mod sequencer;
mod tracker;

pub use gate::CompletionGate;
pub use preloader::{
    PreloadEvent, PreloadPhase, PreloadPlan, PreloadSnapshot, PreloadView, Preloader,
};
pub use sequencer::{PlaybackSequencer, WordStage};
pub use tracker::{AssetTracker, LoadReport, SettleResult};
