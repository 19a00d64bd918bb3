//! Transcript view with an optional trailing status row

use crate::theme::Theme;
use crate::widgets::typing_indicator::TypingIndicator;
use agchat_client::{Message, Role};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};
use std::time::Instant;

/// What to show below the last message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusRow<'a> {
    /// Assistant text arriving right now
    Partial(&'a str),
    /// Inline error text, already formatted
    Error(&'a str),
    /// Static loading label
    Loading(&'a str),
    /// Animated typing indicator with a label
    Thinking { label: &'a str, since: Instant },
}

/// Widget drawing chat messages oldest first.
///
/// Empty messages are skipped. Without a scroll offset the view sticks to
/// the bottom of the conversation.
pub struct MessageList<'a> {
    messages: &'a [&'a Message],
    theme: &'a Theme,
    placeholder: Option<&'a str>,
    status: Option<StatusRow<'a>>,
    scroll: Option<usize>,
}

impl<'a> MessageList<'a> {
    pub fn new(messages: &'a [&'a Message], theme: &'a Theme) -> Self {
        Self {
            messages,
            theme,
            placeholder: None,
            status: None,
            scroll: None,
        }
    }

    /// Text shown when there is no message to draw
    pub fn placeholder(mut self, placeholder: Option<&'a str>) -> Self {
        self.placeholder = placeholder;
        self
    }

    pub fn status(mut self, status: Option<StatusRow<'a>>) -> Self {
        self.status = status;
        self
    }

    /// Lines scrolled off the top; `None` follows the newest message
    pub fn scroll(mut self, scroll: Option<usize>) -> Self {
        self.scroll = scroll;
        self
    }

    fn header(&self, role: Role) -> Line<'static> {
        match role {
            Role::User => Line::from(Span::styled("▶ You", self.theme.user_header())),
            Role::Assistant => {
                Line::from(Span::styled("◀ Assistant", self.theme.assistant_header()))
            }
        }
    }

    fn wrapped(&self, text: &str, width: usize, style: Style, lines: &mut Vec<Line<'static>>) {
        for line in textwrap::wrap(text, width.saturating_sub(2).max(1)) {
            lines.push(Line::from(Span::styled(format!("  {}", line), style)));
        }
    }

    /// Every line the list would draw at `width`
    pub fn lines(&self, width: usize) -> Vec<Line<'static>> {
        let mut lines = Vec::new();

        for message in self.messages.iter().filter(|m| !m.is_empty()) {
            lines.push(self.header(message.role));
            self.wrapped(&message.content, width, self.theme.base_style(), &mut lines);
            lines.push(Line::from(""));
        }

        match &self.status {
            None => {}
            Some(StatusRow::Partial(text)) => {
                lines.push(Line::from(Span::styled(
                    "◀ Assistant ▌",
                    self.theme.assistant_header(),
                )));
                self.wrapped(text, width, self.theme.base_style(), &mut lines);
            }
            Some(StatusRow::Error(text)) => {
                self.wrapped(text, width, self.theme.error_style(), &mut lines);
            }
            Some(StatusRow::Loading(label)) => {
                lines.push(Line::from(Span::styled(
                    format!("  {}", label),
                    self.theme.dim_style(),
                )));
            }
            Some(StatusRow::Thinking { label, since }) => {
                let mut spans = vec![Span::raw("  ")];
                spans.extend(
                    TypingIndicator::new(self.theme)
                        .with_start_time(*since)
                        .spans(),
                );
                spans.push(Span::styled(format!(" {}", label), self.theme.dim_style()));
                lines.push(Line::from(spans));
            }
        }

        lines
    }

    /// Number of lines needed at `width`
    pub fn content_height(&self, width: usize) -> usize {
        self.lines(width).len()
    }
}

impl Widget for MessageList<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let lines = self.lines(area.width as usize);
        if lines.is_empty() {
            if let Some(placeholder) = self.placeholder {
                let y = area.y + area.height / 2;
                Paragraph::new(Line::from(Span::styled(placeholder, self.theme.dim_style())))
                    .alignment(Alignment::Center)
                    .render(Rect::new(area.x, y, area.width, 1), buf);
            }
            return;
        }

        let height = area.height as usize;
        let bottom = lines.len().saturating_sub(height);
        let offset = self.scroll.map_or(bottom, |s| s.min(bottom));

        let visible: Vec<Line> = lines.into_iter().skip(offset).take(height).collect();
        Paragraph::new(visible).render(area, buf);
    }
}
