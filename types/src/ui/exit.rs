//! The one-time curtain exit played after the gate opens.

use std::time::Duration;

use super::animation::{normalized_progress, staggered_progress, staggered_span};
use crate::ExitTimings;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitTrack {
    /// Characters of the final word fly out, staggered.
    Text,
    /// Logo dot shrinks away.
    Logo,
    /// Top and bottom curtains part to reveal the application.
    Curtains,
}

/// Linear progress of every track at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ExitFrame {
    pub text: f32,
    pub logo: f32,
    pub curtains: f32,
}

/// Timeline for the exit. Pure function of elapsed time since the gate opened.
#[derive(Debug, Clone, PartialEq)]
pub struct ExitTimeline {
    timings: ExitTimings,
    char_count: usize,
}

impl ExitTimeline {
    #[must_use]
    pub fn new(timings: ExitTimings, char_count: usize) -> Self {
        Self {
            timings,
            char_count,
        }
    }

    #[must_use]
    pub fn char_count(&self) -> usize {
        self.char_count
    }

    fn text_span(&self) -> Duration {
        staggered_span(
            self.char_count,
            self.timings.text_out,
            self.timings.char_stagger,
        )
    }

    /// Start offset and duration of a track, measured from the gate opening.
    #[must_use]
    pub fn window(&self, track: ExitTrack) -> (Duration, Duration) {
        let t = &self.timings;
        let text_start = t.delay;
        let text_end = text_start + self.text_span();
        let logo_start = text_end.saturating_sub(t.logo_overlap).max(text_start);
        let logo_end = logo_start + t.logo_out;
        let curtain_start = logo_end.saturating_sub(t.curtain_overlap).max(logo_start);
        match track {
            ExitTrack::Text => (text_start, self.text_span()),
            ExitTrack::Logo => (logo_start, t.logo_out),
            ExitTrack::Curtains => (curtain_start, t.curtain),
        }
    }

    #[must_use]
    pub fn total(&self) -> Duration {
        [ExitTrack::Text, ExitTrack::Logo, ExitTrack::Curtains]
            .into_iter()
            .map(|track| {
                let (start, len) = self.window(track);
                start + len
            })
            .max()
            .unwrap_or(Duration::ZERO)
    }

    #[must_use]
    pub fn is_finished(&self, elapsed: Duration) -> bool {
        elapsed >= self.total()
    }

    #[must_use]
    pub fn track_progress(&self, track: ExitTrack, elapsed: Duration) -> f32 {
        let (start, len) = self.window(track);
        normalized_progress(elapsed.saturating_sub(start), len)
    }

    /// Progress of one character of the outgoing word.
    #[must_use]
    pub fn char_progress(&self, index: usize, elapsed: Duration) -> f32 {
        let (start, _) = self.window(ExitTrack::Text);
        staggered_progress(
            elapsed.saturating_sub(start),
            index,
            self.timings.text_out,
            self.timings.char_stagger,
        )
    }

    #[must_use]
    pub fn sample(&self, elapsed: Duration) -> ExitFrame {
        ExitFrame {
            text: self.track_progress(ExitTrack::Text, elapsed),
            logo: self.track_progress(ExitTrack::Logo, elapsed),
            curtains: self.track_progress(ExitTrack::Curtains, elapsed),
        }
    }
}
