//! One-line status bar with key hints

use crate::theme::Theme;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};
use unicode_width::UnicodeWidthStr;

/// Status text on the left, key hints on the right when they fit
pub struct StatusLine<'a> {
    text: &'a str,
    hints: &'a [(&'a str, &'a str)],
    theme: &'a Theme,
}

impl<'a> StatusLine<'a> {
    pub fn new(text: &'a str, theme: &'a Theme) -> Self {
        Self {
            text,
            hints: &[],
            theme,
        }
    }

    /// Key/description pairs, e.g. `("Ctrl+L", "clear")`
    pub fn hints(mut self, hints: &'a [(&'a str, &'a str)]) -> Self {
        self.hints = hints;
        self
    }

    fn hint_text(&self) -> String {
        self.hints
            .iter()
            .map(|(key, what)| format!("{}: {}", key, what))
            .collect::<Vec<_>>()
            .join(" │ ")
    }
}

impl Widget for StatusLine<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let right = self.hint_text();
        let left_width = self.text.width();
        let right_width = right.width();
        let available = area.width as usize;

        let line = if !right.is_empty() && left_width + right_width + 2 <= available {
            let spacing = available - left_width - right_width;
            Line::from(vec![
                Span::styled(self.text, self.theme.dim_style()),
                Span::raw(" ".repeat(spacing)),
                Span::styled(right, self.theme.border_style()),
            ])
        } else {
            Line::from(Span::styled(self.text, self.theme.dim_style()))
        };
        Paragraph::new(line).render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(buf: &Buffer) -> String {
        (0..buf.area.width).map(|x| buf[(x, 0)].symbol()).collect()
    }

    #[test]
    fn test_hints_on_the_right() {
        let theme = Theme::dark();
        let area = Rect::new(0, 0, 70, 1);
        let mut buf = Buffer::empty(area);
        StatusLine::new("Connected to: http://localhost:8000", &theme)
            .hints(&[("Ctrl+L", "clear"), ("Ctrl+C", "quit")])
            .render(area, &mut buf);

        let row = row(&buf);
        assert!(row.starts_with("Connected to: http://localhost:8000"));
        assert!(row.ends_with("Ctrl+L: clear │ Ctrl+C: quit"));
    }

    #[test]
    fn test_hints_dropped_when_too_narrow() {
        let theme = Theme::dark();
        let area = Rect::new(0, 0, 30, 1);
        let mut buf = Buffer::empty(area);
        StatusLine::new("No endpoint configured", &theme)
            .hints(&[("Ctrl+C", "quit")])
            .render(area, &mut buf);
        assert_eq!(row(&buf).trim_end(), "No endpoint configured");
    }
}
