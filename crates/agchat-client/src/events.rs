//! AG-UI wire events and the subscriber-facing events derived from them

use crate::types::{Message, WireMessage};
use serde::{Deserialize, Serialize};

/// Events decoded from an AG-UI server-sent event stream
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AguiEvent {
    /// Run accepted by the agent
    #[serde(rename_all = "camelCase")]
    RunStarted {
        thread_id: Option<String>,
        run_id: Option<String>,
    },
    /// Assistant message started
    #[serde(rename_all = "camelCase")]
    TextMessageStart {
        message_id: Option<String>,
        role: Option<String>,
    },
    /// Incremental assistant text
    #[serde(rename_all = "camelCase")]
    TextMessageContent {
        message_id: Option<String>,
        delta: String,
    },
    /// Assistant message completed
    #[serde(rename_all = "camelCase")]
    TextMessageEnd { message_id: Option<String> },
    /// Authoritative message history
    MessagesSnapshot { messages: Vec<WireMessage> },
    /// Run completed successfully
    #[serde(rename_all = "camelCase")]
    RunFinished {
        thread_id: Option<String>,
        run_id: Option<String>,
    },
    /// Run failed
    RunError {
        message: Option<String>,
        error: Option<ErrorDetail>,
    },
    /// Any event type this client does not handle
    #[serde(other)]
    Unknown,
}

/// Nested error payload some servers send with `RUN_ERROR`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub message: Option<String>,
}

impl AguiEvent {
    /// Wire name of the event type
    pub fn name(&self) -> &'static str {
        match self {
            AguiEvent::RunStarted { .. } => "RUN_STARTED",
            AguiEvent::TextMessageStart { .. } => "TEXT_MESSAGE_START",
            AguiEvent::TextMessageContent { .. } => "TEXT_MESSAGE_CONTENT",
            AguiEvent::TextMessageEnd { .. } => "TEXT_MESSAGE_END",
            AguiEvent::MessagesSnapshot { .. } => "MESSAGES_SNAPSHOT",
            AguiEvent::RunFinished { .. } => "RUN_FINISHED",
            AguiEvent::RunError { .. } => "RUN_ERROR",
            AguiEvent::Unknown => "UNKNOWN",
        }
    }

    /// Check if this event ends the run
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            AguiEvent::RunFinished { .. } | AguiEvent::RunError { .. }
        )
    }

    /// Build a `RUN_ERROR` event carrying a top-level message
    pub fn run_error(message: impl Into<String>) -> Self {
        AguiEvent::RunError {
            message: Some(message.into()),
            error: None,
        }
    }

    /// Error text of a `RUN_ERROR`, `None` for every other event
    pub fn error_message(&self) -> Option<String> {
        match self {
            AguiEvent::RunError { message, error } => Some(
                message
                    .clone()
                    .or_else(|| error.as_ref().and_then(|e| e.message.clone()))
                    .unwrap_or_else(|| "Unknown error".to_string()),
            ),
            _ => None,
        }
    }
}

/// Event types a complete, successful run is expected to emit.
pub const EXPECTED_RUN_EVENTS: &[&str] = &[
    "RUN_STARTED",
    "TEXT_MESSAGE_START",
    "TEXT_MESSAGE_CONTENT",
    "TEXT_MESSAGE_END",
    "MESSAGES_SNAPSHOT",
    "RUN_FINISHED",
];

/// Events delivered to agent subscribers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgentEvent {
    /// A run started
    RunStarted,
    /// An assistant message started streaming
    TextMessageStart,
    /// Assistant text so far (cumulative, not incremental)
    MessageContentDelta { buffer: String },
    /// The streaming assistant message completed
    MessageEnd,
    /// The authoritative message list changed
    MessagesChanged { messages: Vec<Message> },
    /// The run completed
    RunFinished,
    /// The run failed
    RunError { message: String },
}

impl AgentEvent {
    /// Check if this is a terminal event
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            AgentEvent::RunFinished | AgentEvent::RunError { .. }
        )
    }
}
