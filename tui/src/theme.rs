//! Colors and glyphs for the preloader.
//!
//! A near-black ink palette by default, with a high-contrast override.

use ratatui::style::{Color, Modifier, Style};

use preloader_types::ui::UiOptions;

mod colors {
    use super::Color;

    pub const INK: Color = Color::Rgb(10, 10, 10); // curtains
    pub const INK_RAISED: Color = Color::Rgb(26, 26, 26); // landing
    pub const TRACK: Color = Color::Rgb(48, 48, 48);

    pub const TEXT_PRIMARY: Color = Color::Rgb(255, 255, 255);
    pub const TEXT_SECONDARY: Color = Color::Rgb(160, 160, 160);
    pub const TEXT_MUTED: Color = Color::Rgb(112, 112, 112);
    pub const TEXT_FAINT: Color = Color::Rgb(80, 80, 80);

    pub const WARNING: Color = Color::Rgb(230, 195, 132);
}

/// Resolved theme palette used by the UI.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub curtain: Color,
    pub landing: Color,
    pub track: Color,
    pub text_primary: Color,
    pub text_secondary: Color,
    pub text_muted: Color,
    pub text_faint: Color,
    pub warning: Color,
}

impl Palette {
    #[must_use]
    pub fn standard() -> Self {
        Self {
            curtain: colors::INK,
            landing: colors::INK_RAISED,
            track: colors::TRACK,
            text_primary: colors::TEXT_PRIMARY,
            text_secondary: colors::TEXT_SECONDARY,
            text_muted: colors::TEXT_MUTED,
            text_faint: colors::TEXT_FAINT,
            warning: colors::WARNING,
        }
    }

    #[must_use]
    pub fn high_contrast() -> Self {
        Self {
            curtain: Color::Black,
            landing: Color::Black,
            track: Color::DarkGray,
            text_primary: Color::White,
            text_secondary: Color::White,
            text_muted: Color::Gray,
            text_faint: Color::Gray,
            warning: Color::Yellow,
        }
    }
}

#[must_use]
pub fn palette(options: UiOptions) -> Palette {
    if options.high_contrast {
        Palette::high_contrast()
    } else {
        Palette::standard()
    }
}

/// ASCII/Unicode glyphs for the status line, bar and logo.
#[derive(Debug, Clone, Copy)]
pub struct Glyphs {
    pub status_ready: &'static str,
    pub status_loading: &'static str,
    pub logo: &'static str,
    pub logo_shrunk: &'static str,
    pub bar_fill: &'static str,
    pub bar_track: &'static str,
}

#[must_use]
pub fn glyphs(options: UiOptions) -> Glyphs {
    if options.ascii_only {
        Glyphs {
            status_ready: "*",
            status_loading: "o",
            logo: "O",
            logo_shrunk: ".",
            bar_fill: "#",
            bar_track: "-",
        }
    } else {
        Glyphs {
            status_ready: "●",
            status_loading: "○",
            logo: "●",
            logo_shrunk: "·",
            bar_fill: "█",
            bar_track: "─",
        }
    }
}

/// Pre-defined styles for common UI elements.
pub mod styles {
    use super::{Modifier, Palette, Style};

    #[must_use]
    pub fn word(palette: &Palette) -> Style {
        Style::default()
            .fg(palette.text_primary)
            .bg(palette.curtain)
            .add_modifier(Modifier::BOLD)
    }

    /// Characters partway through an entry or exit.
    #[must_use]
    pub fn word_fading(palette: &Palette) -> Style {
        Style::default().fg(palette.text_muted).bg(palette.curtain)
    }

    #[must_use]
    pub fn caption(palette: &Palette) -> Style {
        Style::default().fg(palette.text_muted).bg(palette.curtain)
    }

    #[must_use]
    pub fn counter(palette: &Palette) -> Style {
        Style::default().fg(palette.text_faint).bg(palette.curtain)
    }

    #[must_use]
    pub fn bar_fill(palette: &Palette) -> Style {
        Style::default().fg(palette.text_primary).bg(palette.curtain)
    }

    #[must_use]
    pub fn bar_track(palette: &Palette) -> Style {
        Style::default().fg(palette.track).bg(palette.curtain)
    }
}
