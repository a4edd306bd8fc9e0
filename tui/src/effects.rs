//! Per-grapheme motion and curtain geometry.
//!
//! Terminal cells cannot tilt or scale, so motion is a vertical offset in rows
//! plus a dimmed style while a glyph is half-faded.

use std::time::Duration;

use preloader_types::ui::easing::{ease_in_cubic, ease_in_out_cubic, ease_in_quad, ease_out_back};
use preloader_types::ui::staggered_progress;

const ENTRY_DURATION: Duration = Duration::from_millis(400);
const ENTRY_STAGGER: Duration = Duration::from_millis(20);
const ENTRY_OVERSHOOT: f32 = 1.5;
const ENTRY_RISE: f32 = 2.0;

/// Fraction of the leave window each later glyph waits before moving.
const LEAVE_STAGGER: f32 = 0.05;
const LEAVE_LIFT: f32 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlyphMotion {
    /// Rows relative to the baseline; negative is up.
    pub offset: i16,
    pub visible: bool,
    pub fading: bool,
}

impl GlyphMotion {
    const RESTING: Self = Self {
        offset: 0,
        visible: true,
        fading: false,
    };
    const GONE: Self = Self {
        offset: 0,
        visible: false,
        fading: false,
    };
}

/// A glyph rising into place while the word is shown.
#[must_use]
pub fn entry_motion(elapsed: Duration, index: usize, reduced_motion: bool) -> GlyphMotion {
    if reduced_motion {
        return GlyphMotion::RESTING;
    }
    let t = staggered_progress(elapsed, index, ENTRY_DURATION, ENTRY_STAGGER);
    if t <= 0.0 {
        return GlyphMotion::GONE;
    }
    let eased = ease_out_back(t, ENTRY_OVERSHOOT);
    GlyphMotion {
        offset: rows((1.0 - eased) * ENTRY_RISE),
        visible: true,
        fading: t < 0.5,
    }
}

/// A glyph lifting away during the leave transition.
///
/// `progress` covers the whole leave window; glyphs are staggered inside it so
/// the last one finishes exactly at 1.0.
#[must_use]
pub fn leave_motion(progress: f32, index: usize, count: usize, reduced_motion: bool) -> GlyphMotion {
    let span = 1.0 + LEAVE_STAGGER * count.saturating_sub(1) as f32;
    let local = (progress * span - LEAVE_STAGGER * index as f32).clamp(0.0, 1.0);
    lift(ease_in_quad(local), local, reduced_motion)
}

/// A glyph of the final word flying out during the exit.
#[must_use]
pub fn exit_motion(progress: f32, reduced_motion: bool) -> GlyphMotion {
    let progress = progress.clamp(0.0, 1.0);
    lift(ease_in_cubic(progress), progress, reduced_motion)
}

fn lift(eased: f32, linear: f32, reduced_motion: bool) -> GlyphMotion {
    if linear >= 1.0 {
        return GlyphMotion::GONE;
    }
    if reduced_motion {
        return GlyphMotion::RESTING;
    }
    GlyphMotion {
        offset: -rows(eased * LEAVE_LIFT),
        visible: true,
        fading: linear > 0.5,
    }
}

/// Rows of a curtain half still covering the screen.
///
/// `height` is the half's full height; `progress` is the linear curtain track.
#[must_use]
pub fn curtain_cover(height: u16, progress: f32, reduced_motion: bool) -> u16 {
    let opened = if reduced_motion {
        if progress > 0.0 { 1.0 } else { 0.0 }
    } else {
        ease_in_out_cubic(progress)
    };
    let covered = (f32::from(height) * (1.0 - opened)).round();
    covered.clamp(0.0, f32::from(height)) as u16
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogoState {
    Full { emphasized: bool },
    Shrunk,
    Hidden,
}

/// Logo appearance from the idle pulse scale and the exit track.
#[must_use]
pub fn logo_state(pulse: f32, exit_progress: f32) -> LogoState {
    let shrink = ease_in_quad(exit_progress);
    if exit_progress >= 1.0 {
        LogoState::Hidden
    } else if shrink > 0.5 {
        LogoState::Shrunk
    } else {
        LogoState::Full {
            emphasized: pulse > 1.05,
        }
    }
}

fn rows(value: f32) -> i16 {
    value.round() as i16
}
