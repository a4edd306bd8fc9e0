//! UI state types for the presentation layer.
//!
//! Pure data types with no IO, no async, no ratatui dependency.
//! Used by both the engine (state ownership) and tui (rendering).

mod animation;
pub mod easing;
mod exit;
mod tween;

pub use animation::{AnimPhase, normalized_progress, staggered_progress, staggered_span};
pub use exit::{ExitFrame, ExitTimeline, ExitTrack};
pub use tween::{ProgressTween, pulse_scale};

/// Presentation switches carried from configuration to the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UiOptions {
    pub ascii_only: bool,
    pub high_contrast: bool,
    /// Skip per-character motion; words and curtains swap without easing.
    pub reduced_motion: bool,
}
