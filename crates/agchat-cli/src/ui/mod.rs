//! TUI implementation for agchat

mod simple;
mod streaming;

use agchat_tui::{App, Theme, widgets::StatusLine};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    text::Line,
    widgets::{Block, Borders},
};

use crate::{Settings, config::Mode};

/// Lines moved by PageUp/PageDown
const PAGE: usize = 10;

/// Run the TUI for the configured widget until the user quits
pub async fn run_tui(settings: &Settings) -> anyhow::Result<()> {
    let mut app = App::new()?.with_theme(settings.theme.clone());
    let result = match settings.mode {
        Mode::Streaming => streaming::run(&mut app, settings).await,
        Mode::Simple => simple::run(&mut app, settings).await,
    };
    drop(app);
    result
}

/// Screen regions shared by both panels
struct Areas {
    banner: Option<Rect>,
    messages: Rect,
    status: Rect,
    input: Rect,
}

impl Areas {
    fn split(area: Rect, with_banner: bool) -> Self {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(u16::from(with_banner)), // Error banner
                Constraint::Min(1),                          // Messages
                Constraint::Length(1),                       // Status
                Constraint::Length(3),                       // Input
            ])
            .split(area);

        Self {
            banner: with_banner.then_some(chunks[0]),
            messages: chunks[1],
            status: chunks[2],
            input: chunks[3],
        }
    }
}

/// Draw the bordered message frame and return the area inside it
fn message_frame(frame: &mut Frame, area: Rect, title: &str, right: &str, theme: &Theme) -> Rect {
    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border_style())
        .title(Line::styled(format!(" {} ", title), theme.accent_style()));
    if !right.is_empty() {
        block = block.title(Line::styled(format!(" {} ", right), theme.dim_style()).right_aligned());
    }
    let inner = block.inner(area);
    frame.render_widget(block, area);
    inner
}

fn render_status(frame: &mut Frame, area: Rect, text: &str, hints: &[(&str, &str)], theme: &Theme) {
    frame.render_widget(StatusLine::new(text, theme).hints(hints), area);
}

/// Scroll position of the message list; `None` offset follows new output
#[derive(Debug, Default)]
struct Scroll {
    offset: Option<usize>,
    bottom: usize,
}

impl Scroll {
    /// Record how far the list can scroll at the current size
    fn update(&mut self, content_height: usize, viewport: usize) {
        self.bottom = content_height.saturating_sub(viewport);
        if let Some(offset) = self.offset {
            if offset >= self.bottom {
                self.offset = None;
            }
        }
    }

    fn page_up(&mut self) {
        let current = self.offset.unwrap_or(self.bottom);
        self.offset = Some(current.saturating_sub(PAGE));
    }

    fn page_down(&mut self) {
        if let Some(current) = self.offset {
            let next = current + PAGE;
            self.offset = (next < self.bottom).then_some(next);
        }
    }

    fn follow(&mut self) {
        self.offset = None;
    }
}
