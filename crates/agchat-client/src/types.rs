//! Core types for chat transcripts and AG-UI requests

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicI64, Ordering};

/// Who authored a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    /// Wire name of the role
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }

    /// Parse a wire role, `None` for roles the widgets do not display
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "user" => Some(Role::User),
            "assistant" => Some(Role::Assistant),
            _ => None,
        }
    }
}

/// A single chat message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
    pub id: String,
}

impl Message {
    /// Create a user message with a fresh id
    pub fn user(content: impl Into<String>) -> Self {
        Self::with_id(next_message_id(), Role::User, content)
    }

    /// Create an assistant message with a fresh id
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::with_id(next_message_id(), Role::Assistant, content)
    }

    /// Create a message with an explicit id
    pub fn with_id(id: impl Into<String>, role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            id: id.into(),
        }
    }

    /// Whether there is nothing to display
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

static LAST_MESSAGE_ID: AtomicI64 = AtomicI64::new(0);

/// Generate a message id: the current Unix time in milliseconds.
///
/// Ids handed out within the same millisecond are bumped so they never repeat.
pub fn next_message_id() -> String {
    let now = chrono::Utc::now().timestamp_millis();
    let previous = LAST_MESSAGE_ID
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
            Some(now.max(last + 1))
        })
        .unwrap_or_else(|last| last);
    now.max(previous + 1).to_string()
}

/// Message as it appears in an AG-UI `MESSAGES_SNAPSHOT`.
///
/// Snapshots may carry roles (system, tool, developer) and null content that
/// the chat widgets never show, so decoding is lenient and conversion filters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireMessage {
    #[serde(default)]
    pub id: Option<String>,
    pub role: String,
    #[serde(default)]
    pub content: Option<String>,
}

impl WireMessage {
    /// Convert to a displayable message, `None` for unsupported roles
    pub fn into_message(self) -> Option<Message> {
        let role = Role::parse(&self.role)?;
        Some(Message {
            role,
            content: self.content.unwrap_or_default(),
            id: self.id.unwrap_or_else(next_message_id),
        })
    }
}

impl From<Message> for WireMessage {
    fn from(message: Message) -> Self {
        Self {
            id: Some(message.id),
            role: message.role.as_str().to_string(),
            content: Some(message.content),
        }
    }
}

/// Request body of an AG-UI agent run
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunAgentInput {
    pub thread_id: String,
    pub run_id: String,
    pub messages: Vec<Message>,
    pub state: serde_json::Value,
    pub tools: Vec<serde_json::Value>,
    pub context: Vec<serde_json::Value>,
    pub forwarded_props: serde_json::Value,
}

impl RunAgentInput {
    /// Build a run request for a thread with a fresh run id
    pub fn new(thread_id: impl Into<String>, messages: Vec<Message>) -> Self {
        Self {
            thread_id: thread_id.into(),
            run_id: uuid::Uuid::new_v4().to_string(),
            messages,
            state: serde_json::json!({}),
            tools: vec![],
            context: vec![],
            forwarded_props: serde_json::json!({}),
        }
    }
}
