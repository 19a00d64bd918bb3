//! Dismissible error banner

use crate::theme::Theme;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};
use unicode_width::UnicodeWidthStr;

const DISMISS_HINT: &str = "Esc ×";

/// One-line banner reading `Error: <message>` with a dismiss hint on the right
pub struct ErrorBanner<'a> {
    message: &'a str,
    theme: &'a Theme,
}

impl<'a> ErrorBanner<'a> {
    pub fn new(message: &'a str, theme: &'a Theme) -> Self {
        Self { message, theme }
    }

    pub fn text(&self) -> String {
        format!("Error: {}", self.message)
    }
}

impl Widget for ErrorBanner<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let style = self.theme.error_style().add_modifier(Modifier::BOLD);
        let text = self.text();
        let available = area.width as usize;
        let hint_width = DISMISS_HINT.width();

        let line = if text.width() + hint_width + 2 <= available {
            let spacing = available - text.width() - hint_width;
            Line::from(vec![
                Span::styled(text, style),
                Span::raw(" ".repeat(spacing)),
                Span::styled(DISMISS_HINT, self.theme.dim_style()),
            ])
        } else {
            Line::from(Span::styled(text, style))
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
    fn test_banner_text_and_hint() {
        let theme = Theme::dark();
        let area = Rect::new(0, 0, 50, 1);
        let mut buf = Buffer::empty(area);
        ErrorBanner::new("HTTP 500: Internal Server Error", &theme).render(area, &mut buf);

        let row = row(&buf);
        assert!(row.starts_with("Error: HTTP 500: Internal Server Error"));
        assert!(row.trim_end().ends_with("Esc ×"));
    }

    #[test]
    fn test_narrow_banner_drops_hint() {
        let theme = Theme::dark();
        let area = Rect::new(0, 0, 12, 1);
        let mut buf = Buffer::empty(area);
        ErrorBanner::new("timeout", &theme).render(area, &mut buf);
        assert_eq!(row(&buf), "Error: timeo");
    }
}
