//! Dwell and exit timing policy.

use std::time::Duration;

/// Minimum time each word stays on screen, plus its leave transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DwellPolicy {
    /// Dwell for the first word (cold-start emphasis).
    pub first: Duration,
    /// Dwell for every later word.
    pub rest: Duration,
    /// Leave transition played after the dwell, before the index advances.
    pub leave: Duration,
}

impl DwellPolicy {
    #[must_use]
    pub fn dwell_for(&self, index: usize) -> Duration {
        if index == 0 { self.first } else { self.rest }
    }

    /// Time from a word appearing to the next word replacing it.
    #[must_use]
    pub fn slot_for(&self, index: usize) -> Duration {
        self.dwell_for(index).saturating_add(self.leave)
    }
}

impl Default for DwellPolicy {
    fn default() -> Self {
        Self {
            first: Duration::from_millis(600),
            rest: Duration::from_millis(200),
            leave: Duration::from_millis(200),
        }
    }
}

/// Shape of the one-time exit animation.
///
/// Track offsets are expressed as overlaps with the previous track, matching
/// how the curtain sequence is authored: logo starts before the text is gone,
/// curtains start before the logo is gone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitTimings {
    pub delay: Duration,
    pub text_out: Duration,
    pub char_stagger: Duration,
    pub logo_out: Duration,
    pub logo_overlap: Duration,
    pub curtain: Duration,
    pub curtain_overlap: Duration,
}

impl Default for ExitTimings {
    fn default() -> Self {
        Self {
            delay: Duration::from_millis(600),
            text_out: Duration::from_millis(400),
            char_stagger: Duration::from_millis(20),
            logo_out: Duration::from_millis(300),
            logo_overlap: Duration::from_millis(200),
            curtain: Duration::from_millis(800),
            curtain_overlap: Duration::from_millis(100),
        }
    }
}
