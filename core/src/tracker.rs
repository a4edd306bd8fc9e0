//! Aggregate settlement tracking for the asset manifest.

use preloader_types::{SettleOutcome, ratio_percent};

/// What a single settlement did to the tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettleResult {
    /// Counted; more assets are still pending.
    Progress { settled: usize, total: usize },
    /// Counted, and this was the last pending asset. Returned exactly once.
    AllSettled,
    /// The slot already settled; nothing changed.
    Duplicate,
    /// The slot is outside the manifest; nothing changed.
    UnknownSlot,
}

/// Outcomes gathered so far, for hosts that want to surface failures.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub loaded: Vec<usize>,
    pub failed: Vec<(usize, String)>,
    pub pending: Vec<usize>,
}

impl LoadReport {
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        !self.failed.is_empty()
    }
}

/// Counts settlements against a fixed-size manifest.
///
/// Every slot settles at most once, so the count only grows and the
/// all-settled report cannot repeat.
#[derive(Debug, Clone)]
pub struct AssetTracker {
    outcomes: Vec<Option<SettleOutcome>>,
    settled: usize,
}

impl AssetTracker {
    #[must_use]
    pub fn new(total: usize) -> Self {
        Self {
            outcomes: vec![None; total],
            settled: 0,
        }
    }

    pub fn settle(&mut self, slot: usize, outcome: SettleOutcome) -> SettleResult {
        let Some(entry) = self.outcomes.get_mut(slot) else {
            return SettleResult::UnknownSlot;
        };
        if entry.is_some() {
            return SettleResult::Duplicate;
        }
        *entry = Some(outcome);
        self.settled += 1;

        if self.settled == self.outcomes.len() {
            SettleResult::AllSettled
        } else {
            SettleResult::Progress {
                settled: self.settled,
                total: self.outcomes.len(),
            }
        }
    }

    #[must_use]
    pub fn settled(&self) -> usize {
        self.settled
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    #[must_use]
    pub fn failed(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|outcome| outcome.as_ref().is_some_and(SettleOutcome::is_failure))
            .count()
    }

    /// True once every slot has settled. An empty manifest starts settled.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.settled == self.outcomes.len()
    }

    #[must_use]
    pub fn progress(&self) -> f32 {
        ratio_percent(self.settled, self.outcomes.len())
    }

    #[must_use]
    pub fn report(&self) -> LoadReport {
        let mut report = LoadReport::default();
        for (slot, outcome) in self.outcomes.iter().enumerate() {
            match outcome {
                Some(SettleOutcome::Loaded { .. }) => report.loaded.push(slot),
                Some(SettleOutcome::Failed { reason }) => {
                    report.failed.push((slot, reason.clone()));
                }
                None => report.pending.push(slot),
            }
        }
        report
    }
}
