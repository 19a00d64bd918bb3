//! Immutable chat transcript

use std::sync::Arc;

use agchat_client::Message;

/// Shown when there is nothing to display yet
pub const PLACEHOLDER: &str = "Start a conversation with your AI assistant";

/// Ordered list of messages owned by one widget.
///
/// Updates never mutate in place: each change builds a new transcript and the
/// widget swaps it in, so a clone handed to a renderer stays consistent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transcript(Arc<[Message]>);

impl Default for Transcript {
    fn default() -> Self {
        Self(Arc::from(Vec::new()))
    }
}

impl Transcript {
    /// Create an empty transcript
    pub fn new() -> Self {
        Self::default()
    }

    /// A new transcript with `message` appended
    pub fn appended(&self, message: Message) -> Self {
        let mut messages = self.0.to_vec();
        messages.push(message);
        Self::from(messages)
    }

    /// All messages, including empty ones
    pub fn messages(&self) -> &[Message] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Messages worth drawing: empty content is skipped
    pub fn visible(&self) -> Vec<&Message> {
        self.0.iter().filter(|m| !m.is_empty()).collect()
    }

    /// Last message, if any
    pub fn last(&self) -> Option<&Message> {
        self.0.last()
    }
}

impl From<Vec<Message>> for Transcript {
    fn from(messages: Vec<Message>) -> Self {
        Self(Arc::from(messages))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agchat_client::Role;

    #[test]
    fn test_appended_leaves_original_untouched() {
        let empty = Transcript::new();
        let one = empty.appended(Message::user("hi"));
        assert!(empty.is_empty());
        assert_eq!(one.len(), 1);
        assert_eq!(one.last().map(|m| m.role), Some(Role::User));
    }

    #[test]
    fn test_visible_skips_empty_content() {
        let transcript = Transcript::from(vec![
            Message::with_id("1", Role::User, "hi"),
            Message::with_id("2", Role::Assistant, ""),
            Message::with_id("3", Role::Assistant, "hello"),
        ]);
        let ids: Vec<&str> = transcript.visible().iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "3"]);
        assert_eq!(transcript.len(), 3);
    }
}
