//! Panel for the simple request/response widget

use agchat_tui::{
    App, Theme,
    input::{Action, event_to_action},
    widgets::{ErrorBanner, InputBox, MessageList, StatusRow},
};
use agchat_widget::{Error, PendingRequest, SimpleChat, SimpleConfig};
use crossterm::event::EventStream;
use futures::StreamExt;
use ratatui::Frame;
use tokio::sync::mpsc;

use super::{Areas, Scroll, message_frame, render_status};
use crate::Settings;

const HINTS: &[(&str, &str)] = &[("Enter", "send"), ("Esc", "dismiss/quit"), ("Ctrl+C", "quit")];

type Reply = agchat_widget::Result<String>;

struct SimplePanel {
    chat: SimpleChat,
    input: InputBox,
    scroll: Scroll,
}

impl SimplePanel {
    fn new(settings: &Settings) -> anyhow::Result<Self> {
        let chat = SimpleChat::new(SimpleConfig::new(
            settings.endpoint.clone(),
            settings.api_key.clone(),
        ))?;
        let mut input = InputBox::new()
            .with_placeholder("Ask your AI assistant...")
            .with_disabled_label("Sending...");
        input.set_focused(true);

        Ok(Self {
            chat,
            input,
            scroll: Scroll::default(),
        })
    }

    fn render(&mut self, frame: &mut Frame, theme: &Theme) {
        let error = self.chat.last_error();
        let areas = Areas::split(frame.area(), error.is_some());

        if let (Some(area), Some(message)) = (areas.banner, error) {
            frame.render_widget(ErrorBanner::new(message, theme), area);
        }

        let inner = message_frame(
            frame,
            areas.messages,
            "AI Assistant",
            "Ctrl+L: Clear Chat",
            theme,
        );
        let status = self
            .chat
            .is_loading()
            .then_some(StatusRow::Loading("AI is thinking..."));

        let messages = self.chat.visible_messages();
        let list = MessageList::new(&messages, theme)
            .placeholder(self.chat.placeholder())
            .status(status)
            .scroll(self.scroll.offset);
        self.scroll
            .update(list.content_height(inner.width as usize), inner.height as usize);
        frame.render_widget(list, inner);

        render_status(frame, areas.status, &self.chat.status_line(), HINTS, theme);
        self.input.render(areas.input, frame.buffer_mut(), theme);
    }

    /// Start a request; the reply comes back through `done`
    fn submit(&mut self, done: &mpsc::UnboundedSender<Reply>) {
        let Some(request) = self.chat.begin_send(self.input.content()) else {
            return;
        };
        self.input.clear();
        self.input.set_disabled(true);
        self.scroll.follow();
        spawn_request(request, done.clone());
    }

    fn finish(&mut self, reply: Reply) {
        self.chat.finish(reply);
        self.input.set_disabled(false);
        self.scroll.follow();
    }

    /// Returns false when the user asked to quit
    fn handle_action(&mut self, action: Action, width: u16, done: &mpsc::UnboundedSender<Reply>) -> bool {
        match action {
            Action::Interrupt => return false,
            Action::Escape => {
                if self.chat.last_error().is_none() {
                    return false;
                }
                self.chat.clear_error();
            }
            Action::Eof if self.input.content().is_empty() => return false,
            Action::Submit => self.submit(done),
            Action::Clear => {
                self.chat.clear_chat();
                self.scroll.follow();
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

/// Run the request on its own task; a panic still produces a reply
fn spawn_request(request: PendingRequest, done: mpsc::UnboundedSender<Reply>) {
    tokio::spawn(async move {
        let reply = match tokio::spawn(request.execute()).await {
            Ok(reply) => reply,
            Err(e) => Err(Error::Other(format!("request task failed: {}", e))),
        };
        // Receiver gone means the UI already quit
        let _ = done.send(reply);
    });
}

pub async fn run(app: &mut App, settings: &Settings) -> anyhow::Result<()> {
    let mut panel = SimplePanel::new(settings)?;
    let (done_tx, mut done_rx) = mpsc::unbounded_channel::<Reply>();
    let mut events = EventStream::new();

    loop {
        app.draw(|frame, theme| panel.render(frame, theme))?;
        let width = app.width()?;

        tokio::select! {
            Some(reply) = done_rx.recv() => panel.finish(reply),
            event = events.next() => match event {
                Some(Ok(event)) => {
                    if let Some(action) = event_to_action(event) {
                        if !panel.handle_action(action, width, &done_tx) {
                            break;
                        }
                    }
                }
                Some(Err(e)) => return Err(e.into()),
                None => break,
            },
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{Terminal, backend::TestBackend};
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn panel(endpoint: String) -> SimplePanel {
        SimplePanel::new(&Settings {
            endpoint,
            api_key: None,
            mode: crate::config::Mode::Simple,
            theme: Theme::dark(),
        })
        .unwrap()
    }

    fn screen(panel: &mut SimplePanel) -> Vec<String> {
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
            .collect()
    }

    fn type_text(panel: &mut SimplePanel, text: &str, done: &mpsc::UnboundedSender<Reply>) {
        for c in text.chars() {
            panel.handle_action(Action::Char(c), 60, done);
        }
    }

    #[tokio::test]
    async fn test_turn_disables_input_until_reply() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"response": "hey there"})))
            .mount(&server)
            .await;

        let mut panel = panel(server.uri());
        let (tx, mut rx) = mpsc::unbounded_channel();
        type_text(&mut panel, "hello", &tx);
        panel.handle_action(Action::Submit, 60, &tx);

        assert!(panel.input.is_disabled());
        let rows = screen(&mut panel);
        assert!(rows.iter().any(|r| r.contains("AI is thinking...")));
        assert!(rows.iter().any(|r| r.contains("Sending...")));

        let reply = rx.recv().await.unwrap();
        panel.finish(reply);
        assert!(!panel.input.is_disabled());
        assert!(screen(&mut panel).iter().any(|r| r.contains("hey there")));
    }

    #[tokio::test]
    async fn test_error_banner_dismissed_by_escape() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let mut panel = panel(server.uri());
        let (tx, mut rx) = mpsc::unbounded_channel();
        type_text(&mut panel, "hello", &tx);
        panel.handle_action(Action::Submit, 60, &tx);
        panel.finish(rx.recv().await.unwrap());

        let rows = screen(&mut panel);
        assert!(rows[0].starts_with("Error: HTTP 500"));

        // first Escape dismisses, the second quits
        assert!(panel.handle_action(Action::Escape, 60, &tx));
        assert!(!screen(&mut panel)[0].starts_with("Error:"));
        assert!(!panel.handle_action(Action::Escape, 60, &tx));
    }

    #[tokio::test]
    async fn test_clear_chat_restores_placeholder() {
        let mut panel = panel("http://unused.test".into());
        let (tx, _rx) = mpsc::unbounded_channel();
        panel.finish(Ok("stale reply".into()));
        assert!(screen(&mut panel).iter().any(|r| r.contains("stale reply")));

        panel.handle_action(Action::Clear, 60, &tx);
        let rows = screen(&mut panel);
        assert!(rows.iter().any(|r| r.contains("Start a conversation")));
        assert!(rows.iter().any(|r| r.contains("Connected to: http://unused.test")));
    }
}
