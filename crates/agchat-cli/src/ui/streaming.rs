//! Panel for the streaming widget

use std::time::Instant;

use agchat_tui::{
    App, Theme,
    input::{Action, event_to_action},
    widgets::{InputBox, MessageList, StatusRow},
};
use agchat_widget::{Inbound, SendOutcome, StreamStatus, StreamingChat, StreamingConfig};
use crossterm::event::EventStream;
use futures::StreamExt;
use ratatui::Frame;

use super::{Areas, Scroll, message_frame, render_status};
use crate::Settings;

const THINKING: &str = "AI is thinking...";
const HINTS: &[(&str, &str)] = &[("Enter", "send"), ("PgUp/PgDn", "scroll"), ("Esc", "quit")];

struct StreamingPanel {
    chat: StreamingChat,
    input: InputBox,
    scroll: Scroll,
    status_text: String,
    /// Start of the current typing indicator animation
    thinking_since: Option<Instant>,
}

impl StreamingPanel {
    fn new(settings: &Settings) -> anyhow::Result<Self> {
        let mut chat = StreamingChat::with_http();
        chat.configure(StreamingConfig::new(
            settings.endpoint.clone(),
            settings.api_key.clone(),
        ))?;

        let mut input = InputBox::new().with_placeholder("Ask your copilot...");
        input.set_focused(true);

        Ok(Self {
            chat,
            input,
            scroll: Scroll::default(),
            status_text: settings.connection_label(),
            thinking_since: None,
        })
    }

    /// Keep the indicator animation continuous across redraws
    fn sync_indicator(&mut self) {
        if self.chat.thinking_visible() {
            self.thinking_since.get_or_insert_with(Instant::now);
        } else {
            self.thinking_since = None;
        }
    }

    fn render(&mut self, frame: &mut Frame, theme: &Theme) {
        let areas = Areas::split(frame.area(), false);
        let inner = message_frame(frame, areas.messages, "agchat │ streaming", "", theme);

        let status = match (self.chat.status(), self.thinking_since) {
            (StreamStatus::Awaiting, Some(since)) => Some(StatusRow::Thinking {
                label: THINKING,
                since,
            }),
            (StreamStatus::Streaming(text), _) => Some(StatusRow::Partial(text)),
            (StreamStatus::Error(text), _) => Some(StatusRow::Error(text)),
            _ => None,
        };

        let messages = self.chat.visible_messages();
        let list = MessageList::new(&messages, theme)
            .placeholder(self.chat.placeholder())
            .status(status)
            .scroll(self.scroll.offset);
        self.scroll
            .update(list.content_height(inner.width as usize), inner.height as usize);
        frame.render_widget(list, inner);

        render_status(frame, areas.status, &self.status_text, HINTS, theme);
        self.input.render(areas.input, frame.buffer_mut(), theme);
    }

    /// Returns false when the user asked to quit
    fn handle_action(&mut self, action: Action, width: u16) -> bool {
        match action {
            Action::Interrupt | Action::Escape => return false,
            Action::Eof if self.input.content().is_empty() => return false,
            Action::Submit => {
                if self.chat.send(self.input.content()) == SendOutcome::Sent {
                    self.input.clear();
                    self.scroll.follow();
                    self.sync_indicator();
                }
            }
            Action::PageUp => self.scroll.page_up(),
            Action::PageDown => self.scroll.page_down(),
            action => {
                self.input.handle_action(&action, width.saturating_sub(2));
            }
        }
        true
    }
}

pub async fn run(app: &mut App, settings: &Settings) -> anyhow::Result<()> {
    let mut panel = StreamingPanel::new(settings)?;
    let mut events = EventStream::new();
    let mut tick = tokio::time::interval(app.tick_rate());

    loop {
        app.draw(|frame, theme| panel.render(frame, theme))?;
        let width = app.width()?;

        tokio::select! {
            inbound = panel.chat.next_inbound() => {
                if matches!(inbound, Inbound::Agent(_)) {
                    panel.scroll.follow();
                }
                panel.sync_indicator();
            }
            event = events.next() => match event {
                Some(Ok(event)) => {
                    if let Some(action) = event_to_action(event) {
                        if !panel.handle_action(action, width) {
                            break;
                        }
                    }
                }
                Some(Err(e)) => return Err(e.into()),
                None => break,
            },
            _ = tick.tick(), if panel.thinking_since.is_some() => {}
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use agchat_client::AgentEvent;
    use ratatui::{Terminal, backend::TestBackend};

    fn panel() -> StreamingPanel {
        StreamingPanel::new(&Settings {
            endpoint: String::new(),
            api_key: None,
            mode: crate::config::Mode::Streaming,
            theme: Theme::dark(),
        })
        .unwrap()
    }

    fn screen(panel: &mut StreamingPanel) -> String {
        let theme = Theme::dark();
        let mut terminal = Terminal::new(TestBackend::new(60, 14)).unwrap();
        terminal.draw(|frame| panel.render(frame, &theme)).unwrap();
        let buf = terminal.backend().buffer();
        (0..buf.area.height)
            .map(|y| {
                (0..buf.area.width)
                    .map(|x| buf[(x, y)].symbol())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[tokio::test]
    async fn test_empty_panel_shows_placeholder_and_status() {
        let mut panel = panel();
        let screen = screen(&mut panel);
        assert!(screen.contains("Start a conversation with your AI assistant"));
        assert!(screen.contains("No endpoint configured"));
        assert!(screen.contains("Ask your copilot..."));
    }

    #[tokio::test]
    async fn test_partial_and_error_rows_are_drawn() {
        let mut panel = panel();
        panel.chat.apply(AgentEvent::MessageContentDelta {
            buffer: "Hello wor".into(),
        });
        assert!(screen(&mut panel).contains("Hello wor"));

        panel.chat.apply(AgentEvent::RunError {
            message: "boom".into(),
        });
        assert!(screen(&mut panel).contains("Error: boom"));
    }

    #[tokio::test]
    async fn test_unsent_input_is_kept() {
        let mut panel = panel();
        for c in "hi".chars() {
            panel.handle_action(Action::Char(c), 60);
        }
        // no endpoint, so the message is ignored and stays in the box
        assert!(panel.handle_action(Action::Submit, 60));
        assert_eq!(panel.input.content(), "hi");
        assert!(!panel.handle_action(Action::Escape, 60));
    }
}
