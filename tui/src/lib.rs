//! Terminal rendering for the preloader using ratatui.

mod effects;
mod input;
mod landing;
mod theme;

pub use effects::{
    GlyphMotion, LogoState, curtain_cover, entry_motion, exit_motion, leave_motion, logo_state,
};
pub use input::{InputAction, InputPump, handle_events};
pub use landing::{Landing, draw_landing};
pub use theme::{Glyphs, Palette, glyphs, palette, styles};

use std::time::{Duration, Instant};

use ratatui::{
    Frame,
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
};
use unicode_width::UnicodeWidthStr;

use preloader_core::{PreloadView, WordStage};
use preloader_types::graphemes;
use preloader_types::ui::{ExitFrame, ProgressTween, UiOptions, pulse_scale};

const BAR_TWEEN: Duration = Duration::from_millis(300);
const BAR_MAX_WIDTH: u16 = 40;
const PULSE_HALF_PERIOD: Duration = Duration::from_millis(800);
const PULSE_AMPLITUDE: f32 = 0.1;
const EDGE_MARGIN: u16 = 4;

/// Render-side state that outlives a single frame.
#[derive(Debug, Clone)]
pub struct PreloadDisplay {
    bar: ProgressTween,
    last_frame: Option<Instant>,
    options: UiOptions,
}

impl PreloadDisplay {
    #[must_use]
    pub fn new(options: UiOptions) -> Self {
        let duration = if options.reduced_motion {
            Duration::ZERO
        } else {
            BAR_TWEEN
        };
        Self {
            bar: ProgressTween::new(duration),
            last_frame: None,
            options,
        }
    }

    /// Advance the bar tween to `now` and aim it at `progress`.
    pub fn update(&mut self, progress: f32, now: Instant) {
        if let Some(last) = self.last_frame {
            self.bar.advance(now.saturating_duration_since(last));
        }
        self.last_frame = Some(now);
        self.bar.retarget(progress);
    }

    #[must_use]
    pub fn bar_value(&self) -> f32 {
        self.bar.value()
    }

    #[must_use]
    pub fn options(&self) -> UiOptions {
        self.options
    }
}

/// Rows of the screen still hidden behind each curtain half.
#[derive(Debug, Clone, Copy)]
struct Curtains {
    area: Rect,
    top: u16,
    bottom: u16,
}

impl Curtains {
    fn new(area: Rect, progress: f32, reduced_motion: bool) -> Self {
        let top_half = area.height / 2;
        let bottom_half = area.height - top_half;
        Self {
            area,
            top: curtain_cover(top_half, progress, reduced_motion),
            bottom: curtain_cover(bottom_half, progress, reduced_motion),
        }
    }

    fn is_parting(&self) -> bool {
        self.top + self.bottom < self.area.height
    }

    fn covers(&self, y: u16) -> bool {
        let top_end = self.area.y + self.top;
        let bottom_start = self.area.bottom().saturating_sub(self.bottom);
        (y >= self.area.y && y < top_end) || (y >= bottom_start && y < self.area.bottom())
    }

    fn render(&self, buf: &mut Buffer, style: Style) {
        let top = Rect {
            height: self.top,
            ..self.area
        };
        let bottom = Rect {
            y: self.area.bottom().saturating_sub(self.bottom),
            height: self.bottom,
            ..self.area
        };
        buf.set_style(top, style);
        buf.set_style(bottom, style);
        for rect in [top, bottom] {
            for y in rect.top()..rect.bottom() {
                for x in rect.left()..rect.right() {
                    buf[(x, y)].set_symbol(" ");
                }
            }
        }
    }
}

/// Main draw function.
///
/// Once the curtains start parting, the landing screen is drawn underneath.
pub fn draw(frame: &mut Frame, view: &PreloadView, display: &PreloadDisplay, landing: &Landing) {
    let options = display.options();
    let palette = palette(options);
    let glyphs = glyphs(options);
    let area = frame.area();

    let exit = view
        .exit
        .as_ref()
        .map(|(timeline, elapsed)| timeline.sample(*elapsed))
        .unwrap_or_default();
    let curtains = Curtains::new(area, exit.curtains, options.reduced_motion);
    if curtains.is_parting() {
        draw_landing(frame, landing, options);
    }

    let buf = frame.buffer_mut();
    curtains.render(buf, Style::default().bg(palette.curtain));
    draw_logo(buf, view, &exit, &curtains, &palette, &glyphs, options);
    draw_word(buf, view, &curtains, &palette, options);
    draw_progress(buf, view, display.bar_value(), &curtains, &palette, &glyphs);
    draw_counter(buf, view, &curtains, &palette);
}

fn draw_logo(
    buf: &mut Buffer,
    view: &PreloadView,
    exit: &ExitFrame,
    curtains: &Curtains,
    palette: &Palette,
    glyphs: &Glyphs,
    options: UiOptions,
) {
    let area = curtains.area;
    let x = area.x + EDGE_MARGIN;
    let y = area.y + EDGE_MARGIN / 2;
    if x >= area.right() || !curtains.covers(y) {
        return;
    }

    let pulse = if options.reduced_motion {
        1.0
    } else {
        pulse_scale(view.since_start, PULSE_HALF_PERIOD, PULSE_AMPLITUDE)
    };
    let base = Style::default().fg(palette.text_primary).bg(palette.curtain);
    match logo_state(pulse, exit.logo) {
        LogoState::Full { emphasized } => {
            let style = if emphasized {
                base.add_modifier(Modifier::BOLD)
            } else {
                base
            };
            buf.set_string(x, y, glyphs.logo, style);
        }
        LogoState::Shrunk => {
            buf.set_string(x, y, glyphs.logo_shrunk, base);
        }
        LogoState::Hidden => {}
    }
}

fn draw_word(
    buf: &mut Buffer,
    view: &PreloadView,
    curtains: &Curtains,
    palette: &Palette,
    options: UiOptions,
) {
    let area = curtains.area;
    let parts = graphemes(&view.snapshot.word);
    let widths: Vec<u16> = parts.iter().map(|g| g.width() as u16).collect();
    let total: u16 = widths.iter().sum();
    let baseline = area.y + area.height / 2;
    let mut x = area.x + area.width.saturating_sub(total) / 2;

    for (index, (part, width)) in parts.iter().zip(&widths).enumerate() {
        if x.saturating_add(*width) > area.right() {
            break;
        }
        let motion = match (&view.exit, view.stage) {
            (Some((timeline, elapsed)), _) => {
                exit_motion(timeline.char_progress(index, *elapsed), options.reduced_motion)
            }
            (None, WordStage::Leaving { progress }) => {
                leave_motion(progress, index, parts.len(), options.reduced_motion)
            }
            (None, _) => entry_motion(view.word_elapsed, index, options.reduced_motion),
        };

        let y = i32::from(baseline) + i32::from(motion.offset);
        if motion.visible
            && *width > 0
            && let Ok(y) = u16::try_from(y)
            && curtains.covers(y)
        {
            let style = if motion.fading {
                styles::word_fading(palette)
            } else {
                styles::word(palette)
            };
            buf.set_string(x, y, part, style);
        }
        x += width;
    }
}

fn draw_progress(
    buf: &mut Buffer,
    view: &PreloadView,
    bar_value: f32,
    curtains: &Curtains,
    palette: &Palette,
    glyphs: &Glyphs,
) {
    let area = curtains.area;
    let width = BAR_MAX_WIDTH.min(area.width.saturating_sub(EDGE_MARGIN * 2));
    if width == 0 || area.height < 8 {
        return;
    }
    let x = area.x + (area.width - width) / 2;
    let bar_y = area.bottom() - 4;
    let status_y = bar_y + 1;

    if curtains.covers(bar_y) {
        let filled = ((bar_value.clamp(0.0, 100.0) / 100.0) * f32::from(width)).round() as u16;
        for offset in 0..width {
            let (symbol, style) = if offset < filled {
                (glyphs.bar_fill, styles::bar_fill(palette))
            } else {
                (glyphs.bar_track, styles::bar_track(palette))
            };
            buf.set_string(x + offset, bar_y, symbol, style);
        }
    }

    if curtains.covers(status_y) {
        let label = if view.snapshot.ready {
            format!("{} READY", glyphs.status_ready)
        } else {
            format!("{} LOADING", glyphs.status_loading)
        };
        let percent = format!("{}%", view.snapshot.progress.round() as u32);
        let style = styles::caption(palette);
        buf.set_string(x, status_y, &label, style);
        let percent_x = (x + width).saturating_sub(percent.width() as u16);
        buf.set_string(percent_x, status_y, &percent, style);
    }
}

fn draw_counter(buf: &mut Buffer, view: &PreloadView, curtains: &Curtains, palette: &Palette) {
    let area = curtains.area;
    if area.height < 3 {
        return;
    }
    let y = area.bottom() - 2;
    if !curtains.covers(y) {
        return;
    }
    let text = format!(
        "{:02} / {:02}",
        view.snapshot.index + 1,
        view.snapshot.word_count
    );
    let width = text.width() as u16;
    let x = area.right().saturating_sub(EDGE_MARGIN + width).max(area.x);
    buf.set_string(x, y, &text, styles::counter(palette));
}
