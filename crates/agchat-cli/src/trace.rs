//! Wire event tracing for one-shot runs

use std::io::Write;

use agchat_client::{AgentEvent, AgentSubscriber, AguiEvent, EXPECTED_RUN_EVENTS};
use parking_lot::Mutex;

/// Prints every raw AG-UI event and remembers what it saw
pub struct TraceSubscriber {
    seen: Mutex<Vec<&'static str>>,
    content: Mutex<String>,
    out: Mutex<Box<dyn Write + Send>>,
}

impl TraceSubscriber {
    /// Trace to stdout
    pub fn stdout() -> Self {
        Self::to_writer(Box::new(std::io::stdout()))
    }

    pub fn to_writer(out: Box<dyn Write + Send>) -> Self {
        Self {
            seen: Mutex::new(Vec::new()),
            content: Mutex::new(String::new()),
            out: Mutex::new(out),
        }
    }

    /// Event types seen so far, in order
    pub fn seen(&self) -> Vec<&'static str> {
        self.seen.lock().clone()
    }

    /// Expected event types that never arrived
    pub fn missing(&self) -> Vec<&'static str> {
        let seen = self.seen.lock();
        EXPECTED_RUN_EVENTS
            .iter()
            .copied()
            .filter(|name| !seen.contains(name))
            .collect()
    }

    /// Concatenation of every content delta
    pub fn content(&self) -> String {
        self.content.lock().clone()
    }

    /// Human-readable check of the run against the expected event set
    pub fn report(&self) -> Vec<String> {
        let seen = self.seen();
        let mut lines = Vec::new();
        for expected in EXPECTED_RUN_EVENTS {
            let mark = if seen.contains(expected) { "ok" } else { "MISSING" };
            lines.push(format!("  {:<8} {}", mark, expected));
        }

        let content = self.content();
        if content.trim().is_empty() {
            lines.push("  no content received".to_string());
        } else {
            lines.push(format!("  content: {:?}", content.trim()));
        }
        lines.push(format!("  events received: {}", seen.len()));
        lines
    }
}

impl AgentSubscriber for TraceSubscriber {
    fn on_event(&self, _event: &AgentEvent) {}

    fn on_raw_event(&self, event: &AguiEvent) {
        self.seen.lock().push(event.name());
        if let AguiEvent::TextMessageContent { delta, .. } = event {
            self.content.lock().push_str(delta);
        }

        let body = serde_json::to_string(event).unwrap_or_default();
        let mut out = self.out.lock();
        let _ = writeln!(out, "[{}] {}", event.name(), body);
    }
}
