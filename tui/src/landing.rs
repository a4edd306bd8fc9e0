//! The screen revealed behind the curtains once loading completes.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph},
};

use preloader_core::LoadReport;
use preloader_types::ui::UiOptions;

use crate::theme::palette;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Landing {
    title: String,
    detail: String,
    degraded: bool,
}

impl Landing {
    #[must_use]
    pub fn new(title: impl Into<String>, report: &LoadReport) -> Self {
        let loaded = report.loaded.len();
        let failed = report.failed.len();
        let total = loaded + failed + report.pending.len();
        let detail = if total == 0 {
            "no assets to load".to_string()
        } else if failed == 0 {
            format!("{loaded} of {total} assets loaded")
        } else {
            format!("{loaded} of {total} assets loaded, {failed} failed")
        };
        Self {
            title: title.into(),
            detail,
            degraded: failed > 0,
        }
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn detail(&self) -> &str {
        &self.detail
    }
}

pub fn draw_landing(frame: &mut Frame, landing: &Landing, options: UiOptions) {
    let palette = palette(options);
    let area = frame.area();
    frame.render_widget(
        Block::default().style(Style::default().bg(palette.landing)),
        area,
    );

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(1), // Title
            Constraint::Length(1),
            Constraint::Length(1), // Detail
            Constraint::Fill(1),
            Constraint::Length(1), // Hint
        ])
        .split(area);

    let title = Paragraph::new(Line::from(Span::styled(
        landing.title.as_str(),
        Style::default()
            .fg(palette.text_primary)
            .add_modifier(Modifier::BOLD),
    )))
    .alignment(Alignment::Center);
    frame.render_widget(title, chunks[1]);

    let detail_color = if landing.degraded {
        palette.warning
    } else {
        palette.text_secondary
    };
    let detail = Paragraph::new(Line::from(Span::styled(
        landing.detail.as_str(),
        Style::default().fg(detail_color),
    )))
    .alignment(Alignment::Center);
    frame.render_widget(detail, chunks[3]);

    let hint = Paragraph::new(Line::from(Span::styled(
        "q to quit",
        Style::default().fg(palette.text_faint),
    )))
    .alignment(Alignment::Center);
    frame.render_widget(hint, chunks[5]);
}
