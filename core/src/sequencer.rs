//! Word playback cadence.

use std::time::{Duration, Instant};

use preloader_types::{DwellPolicy, ratio_percent};

/// What the current word is doing, for rendering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WordStage {
    /// Within the dwell window; characters animate in.
    Showing,
    /// Dwell satisfied; characters animate out before the next word.
    Leaving { progress: f32 },
    /// Last word; waits for the gate.
    Holding,
}

/// Advances through the playlist one word per satisfied tick.
#[derive(Debug, Clone)]
pub struct PlaybackSequencer {
    len: usize,
    index: usize,
    shown_at: Instant,
    policy: DwellPolicy,
}

impl PlaybackSequencer {
    /// `len` must be at least 1.
    #[must_use]
    pub fn new(len: usize, policy: DwellPolicy, now: Instant) -> Self {
        debug_assert!(len > 0, "playlist is never empty");
        Self {
            len: len.max(1),
            index: 0,
            shown_at: now,
            policy,
        }
    }

    /// Advance by one word if the current word has had its full slot.
    ///
    /// Returns the new index when it moved. Holds at the last word forever.
    pub fn tick(&mut self, now: Instant) -> Option<usize> {
        if self.is_holding() {
            return None;
        }
        if self.elapsed(now) < self.policy.slot_for(self.index) {
            return None;
        }
        self.index += 1;
        self.shown_at = now;
        Some(self.index)
    }

    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn last_index(&self) -> usize {
        self.len - 1
    }

    #[must_use]
    pub fn is_holding(&self) -> bool {
        self.index == self.last_index()
    }

    /// Time the current word has been on screen.
    #[must_use]
    pub fn elapsed(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.shown_at)
    }

    #[must_use]
    pub fn stage(&self, now: Instant) -> WordStage {
        if self.is_holding() {
            return WordStage::Holding;
        }
        let elapsed = self.elapsed(now);
        let dwell = self.policy.dwell_for(self.index);
        if elapsed < dwell {
            return WordStage::Showing;
        }
        let leave = self.policy.leave;
        let progress = if leave.is_zero() {
            1.0
        } else {
            ((elapsed - dwell).as_secs_f32() / leave.as_secs_f32()).clamp(0.0, 1.0)
        };
        WordStage::Leaving { progress }
    }

    /// Advisory playback progress in `[0, 100]`.
    #[must_use]
    pub fn progress(&self) -> f32 {
        ratio_percent(self.index, self.last_index())
    }
}
