use std::time::Duration;

/// Where a timed effect currently is.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnimPhase {
    Running { progress: f32 },
    Completed,
}

#[must_use]
pub fn normalized_progress(elapsed: Duration, duration: Duration) -> f32 {
    if duration.is_zero() {
        return 1.0;
    }

    let elapsed = elapsed.as_secs_f32();
    let total = duration.as_secs_f32();
    (elapsed / total).clamp(0.0, 1.0)
}

/// Progress of one element in a staggered group.
///
/// Element `index` starts `index * stagger` after `elapsed` zero and then runs
/// for `duration`.
#[must_use]
pub fn staggered_progress(
    elapsed: Duration,
    index: usize,
    duration: Duration,
    stagger: Duration,
) -> f32 {
    let offset = stagger.saturating_mul(u32::try_from(index).unwrap_or(u32::MAX));
    normalized_progress(elapsed.saturating_sub(offset), duration)
}

/// Total span of a staggered group of `count` elements.
#[must_use]
pub fn staggered_span(count: usize, duration: Duration, stagger: Duration) -> Duration {
    let gaps = u32::try_from(count.saturating_sub(1)).unwrap_or(u32::MAX);
    duration.saturating_add(stagger.saturating_mul(gaps))
}

#[derive(Debug, Clone)]
pub(crate) struct EffectTimer {
    elapsed: Duration,
    duration: Duration,
}

impl EffectTimer {
    #[must_use]
    pub(crate) fn new(duration: Duration) -> Self {
        Self {
            elapsed: Duration::ZERO,
            duration,
        }
    }

    pub(crate) fn advance(&mut self, delta: Duration) {
        self.elapsed = self.elapsed.saturating_add(delta);
    }

    #[must_use]
    pub(crate) fn progress(&self) -> f32 {
        normalized_progress(self.elapsed, self.duration)
    }

    #[must_use]
    pub(crate) fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }

    #[must_use]
    pub(crate) fn phase(&self) -> AnimPhase {
        if self.is_finished() {
            AnimPhase::Completed
        } else {
            AnimPhase::Running {
                progress: self.progress(),
            }
        }
    }
}
