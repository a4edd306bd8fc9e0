//! Display-side smoothing for the progress bar and the idle logo pulse.

use std::time::Duration;

use super::animation::{AnimPhase, EffectTimer};
use super::easing::{ease_in_out_quad, ease_out_quad};

/// Eases a displayed value toward the latest target.
///
/// Each retarget starts a fresh tween from whatever is currently shown, so
/// non-decreasing targets produce a non-decreasing display.
#[derive(Debug, Clone)]
pub struct ProgressTween {
    from: f32,
    to: f32,
    duration: Duration,
    timer: EffectTimer,
}

impl ProgressTween {
    #[must_use]
    pub fn new(duration: Duration) -> Self {
        let mut timer = EffectTimer::new(duration);
        timer.advance(duration);
        Self {
            from: 0.0,
            to: 0.0,
            duration,
            timer,
        }
    }

    pub fn retarget(&mut self, target: f32) {
        if (target - self.to).abs() < f32::EPSILON {
            return;
        }
        self.from = self.value();
        self.to = target;
        self.timer = EffectTimer::new(self.duration);
    }

    pub fn advance(&mut self, delta: Duration) {
        self.timer.advance(delta);
    }

    #[must_use]
    pub fn value(&self) -> f32 {
        match self.timer.phase() {
            AnimPhase::Completed => self.to,
            AnimPhase::Running { progress } => {
                self.from + (self.to - self.from) * ease_out_quad(progress)
            }
        }
    }

    #[must_use]
    pub fn target(&self) -> f32 {
        self.to
    }
}

/// Scale of the logo dot: a yoyo between 1.0 and `1.0 + amplitude`.
#[must_use]
pub fn pulse_scale(elapsed: Duration, half_period: Duration, amplitude: f32) -> f32 {
    if half_period.is_zero() {
        return 1.0;
    }
    let half = half_period.as_secs_f32();
    let cycles = elapsed.as_secs_f32() / half;
    let leg = cycles.floor() as u64;
    let t = cycles.fract();
    // Even legs grow, odd legs shrink back.
    let t = if leg % 2 == 0 { t } else { 1.0 - t };
    1.0 + amplitude * ease_in_out_quad(t)
}
