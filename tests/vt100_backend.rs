//! Virtual terminal backend for render tests.
//!
//! Frames are encoded as ANSI and fed through `vt100::Parser`, so assertions
//! see what a real terminal would show, wide glyphs included.

use std::io;

use ratatui::backend::{Backend, ClearType, WindowSize};
use ratatui::buffer::Cell;
use ratatui::layout::{Position, Size};
use ratatui::style::{Color, Modifier, Style};

pub struct VT100Backend {
    parser: vt100::Parser,
    width: u16,
    height: u16,
}

impl VT100Backend {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            parser: vt100::Parser::new(height, width, 0),
            width,
            height,
        }
    }

    pub fn contents(&self) -> String {
        self.parser.screen().contents()
    }

    /// Text of one screen row, trailing blanks trimmed.
    pub fn row(&self, y: u16) -> String {
        self.parser
            .screen()
            .rows(0, self.width)
            .nth(usize::from(y))
            .unwrap_or_default()
            .trim_end()
            .to_string()
    }

    /// Row index of the first line containing `needle`.
    pub fn find_row(&self, needle: &str) -> Option<u16> {
        (0..self.height).find(|y| self.row(*y).contains(needle))
    }

    pub fn is_bold(&self, x: u16, y: u16) -> bool {
        self.parser
            .screen()
            .cell(y, x)
            .is_some_and(vt100::Cell::bold)
    }

    fn feed(&mut self, ansi: &str) {
        self.parser.process(ansi.as_bytes());
    }
}

impl Backend for VT100Backend {
    type Error = io::Error;

    fn draw<'a, I>(&mut self, content: I) -> io::Result<()>
    where
        I: Iterator<Item = (u16, u16, &'a Cell)>,
    {
        use crossterm::{Command, cursor, style};
        use std::fmt::Write as _;

        let mut ansi = String::new();
        let mut cursor_at: Option<(u16, u16)> = None;
        let mut current: Option<Style> = None;

        for (x, y, cell) in content {
            if cursor_at != Some((x, y)) {
                let _ = cursor::MoveTo(x, y).write_ansi(&mut ansi);
            }

            let cell_style = cell.style();
            if current != Some(cell_style) {
                let _ = style::SetAttribute(style::Attribute::Reset).write_ansi(&mut ansi);
                if cell_style.add_modifier.contains(Modifier::BOLD) {
                    let _ = style::SetAttribute(style::Attribute::Bold).write_ansi(&mut ansi);
                }
                if let Some(fg) = crossterm_color(cell_style.fg) {
                    let _ = style::SetForegroundColor(fg).write_ansi(&mut ansi);
                }
                if let Some(bg) = crossterm_color(cell_style.bg) {
                    let _ = style::SetBackgroundColor(bg).write_ansi(&mut ansi);
                }
                current = Some(cell_style);
            }

            let _ = write!(ansi, "{}", cell.symbol());
            cursor_at = Some((x + 1, y));
        }

        self.feed(&ansi);
        Ok(())
    }

    fn hide_cursor(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn show_cursor(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn get_cursor_position(&mut self) -> io::Result<Position> {
        let (row, col) = self.parser.screen().cursor_position();
        Ok(Position::new(col, row))
    }

    fn set_cursor_position<P: Into<Position>>(&mut self, position: P) -> io::Result<()> {
        use crossterm::{Command, cursor};
        let position = position.into();
        let mut ansi = String::new();
        let _ = cursor::MoveTo(position.x, position.y).write_ansi(&mut ansi);
        self.feed(&ansi);
        Ok(())
    }

    fn clear(&mut self) -> io::Result<()> {
        use crossterm::{Command, terminal};
        let mut ansi = String::new();
        let _ = terminal::Clear(terminal::ClearType::All).write_ansi(&mut ansi);
        self.feed(&ansi);
        Ok(())
    }

    fn clear_region(&mut self, _clear_type: ClearType) -> io::Result<()> {
        self.clear()
    }

    fn size(&self) -> io::Result<Size> {
        Ok(Size::new(self.width, self.height))
    }

    fn window_size(&mut self) -> io::Result<WindowSize> {
        Ok(WindowSize {
            columns_rows: Size::new(self.width, self.height),
            pixels: Size::new(self.width * 8, self.height * 16),
        })
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn crossterm_color(color: Option<Color>) -> Option<crossterm::style::Color> {
    use crossterm::style::Color as Term;

    match color? {
        Color::Reset => None,
        Color::Black => Some(Term::Black),
        Color::Red => Some(Term::DarkRed),
        Color::Green => Some(Term::DarkGreen),
        Color::Yellow => Some(Term::DarkYellow),
        Color::Blue => Some(Term::DarkBlue),
        Color::Magenta => Some(Term::DarkMagenta),
        Color::Cyan => Some(Term::DarkCyan),
        Color::Gray => Some(Term::Grey),
        Color::DarkGray => Some(Term::DarkGrey),
        Color::LightRed => Some(Term::Red),
        Color::LightGreen => Some(Term::Green),
        Color::LightYellow => Some(Term::Yellow),
        Color::LightBlue => Some(Term::Blue),
        Color::LightMagenta => Some(Term::Magenta),
        Color::LightCyan => Some(Term::Cyan),
        Color::White => Some(Term::White),
        Color::Rgb(r, g, b) => Some(Term::Rgb { r, g, b }),
        Color::Indexed(i) => Some(Term::AnsiValue(i)),
    }
}
