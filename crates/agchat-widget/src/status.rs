//! Widget status values

/// Progress of the current streaming turn.
///
/// A single variant replaces separate "typing text" and "awaiting" flags, so a
/// partial reply and the thinking indicator can never both be active.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum StreamStatus {
    /// Nothing in progress
    #[default]
    Idle,
    /// Sent, no output yet: the thinking indicator is shown
    Awaiting,
    /// Assistant output so far
    Streaming(String),
    /// Formatted error text (`Error: <msg>`)
    Error(String),
}

impl StreamStatus {
    /// Build an error status from a raw message
    pub fn error(message: impl AsRef<str>) -> Self {
        StreamStatus::Error(format!("Error: {}", message.as_ref()))
    }

    /// Text shown in the trailing status row, empty when there is none
    pub fn partial_text(&self) -> &str {
        match self {
            StreamStatus::Streaming(text) | StreamStatus::Error(text) => text,
            StreamStatus::Idle | StreamStatus::Awaiting => "",
        }
    }

    pub fn is_awaiting(&self) -> bool {
        matches!(self, StreamStatus::Awaiting)
    }

    /// A turn is running: awaiting output or streaming it
    pub fn is_in_progress(&self) -> bool {
        matches!(self, StreamStatus::Awaiting | StreamStatus::Streaming(_))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, StreamStatus::Error(_))
    }
}

/// Request state of the simple widget
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadingState {
    pub is_loading: bool,
    pub last_error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_text_per_variant() {
        assert_eq!(StreamStatus::Idle.partial_text(), "");
        assert_eq!(StreamStatus::Awaiting.partial_text(), "");
        assert_eq!(StreamStatus::Streaming("Hel".into()).partial_text(), "Hel");
        assert_eq!(StreamStatus::error("boom").partial_text(), "Error: boom");
    }

    #[test]
    fn test_only_awaiting_is_awaiting() {
        assert!(StreamStatus::Awaiting.is_awaiting());
        assert!(!StreamStatus::Streaming(String::new()).is_awaiting());
        assert!(StreamStatus::Streaming(String::new()).is_in_progress());
        assert!(!StreamStatus::error("x").is_in_progress());
    }
}
