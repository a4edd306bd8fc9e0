//! Advisory progress arithmetic.
//!
//! Nothing in here drives control flow. The values only feed the progress
//! indicator; the completion gate is decided elsewhere from the raw counters.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A percentage in `[0, 100]`.
pub type Percent = f32;

/// Highest value the combined indicator may show before the gate opens.
const PRE_GATE_CAP: Percent = 99.0;

/// `done / total` as a percentage. An empty total counts as complete.
#[must_use]
pub fn ratio_percent(done: usize, total: usize) -> Percent {
    if total == 0 {
        return 100.0;
    }
    (done.min(total) as f32 / total as f32) * 100.0
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum WeightsError {
    #[error("progress weights must be finite and non-negative (got assets={assets}, words={words})")]
    Invalid { assets: f32, words: f32 },
    #[error("progress weights must sum to 1.0 (got {sum})")]
    Sum { sum: f32 },
}

/// Relative contribution of asset loading and word playback to the indicator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProgressWeights {
    assets: f32,
    words: f32,
}

impl ProgressWeights {
    pub fn new(assets: f32, words: f32) -> Result<Self, WeightsError> {
        if !assets.is_finite() || !words.is_finite() || assets < 0.0 || words < 0.0 {
            return Err(WeightsError::Invalid { assets, words });
        }
        let sum = assets + words;
        if (sum - 1.0).abs() > 1e-3 {
            return Err(WeightsError::Sum { sum });
        }
        Ok(Self { assets, words })
    }

    #[must_use]
    pub fn assets(&self) -> f32 {
        self.assets
    }

    #[must_use]
    pub fn words(&self) -> f32 {
        self.words
    }
}

impl Default for ProgressWeights {
    fn default() -> Self {
        Self {
            assets: 0.4,
            words: 0.6,
        }
    }
}

/// Weighted blend of asset and word progress.
///
/// Capped at 99 while the gate is closed, so 100 is only ever shown once the
/// real completion condition holds.
#[must_use]
pub fn combined_progress(
    asset_pct: Percent,
    word_pct: Percent,
    gate_open: bool,
    weights: ProgressWeights,
) -> Percent {
    // Both inputs are 100 once the gate is open; pin it so float drift cannot show 99.99.
    if gate_open {
        return 100.0;
    }
    let blended = asset_pct.clamp(0.0, 100.0) * weights.assets
        + word_pct.clamp(0.0, 100.0) * weights.words;
    blended.min(PRE_GATE_CAP)
}
