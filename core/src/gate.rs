//! Edge-triggered completion gate.

/// Opens once when both inputs hold, and never closes again.
///
/// The `fired` flag is the edge detector: callers may evaluate as often as
/// they like, in any order, and still see exactly one rising edge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompletionGate {
    fired: bool,
}

impl CompletionGate {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` only on the evaluation that opens the gate.
    pub fn evaluate(&mut self, playback_done: bool, assets_done: bool) -> bool {
        if self.fired || !(playback_done && assets_done) {
            return false;
        }
        self.fired = true;
        true
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.fired
    }
}
