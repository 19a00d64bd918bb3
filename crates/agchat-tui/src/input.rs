//! Input handling

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Processed input action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Regular character input
    Char(char),
    /// Enter: send the message
    Submit,
    Backspace,
    Delete,
    Left,
    Right,
    Home,
    End,
    /// Scroll the transcript up
    PageUp,
    /// Scroll the transcript down
    PageDown,
    /// Escape: dismiss the error banner, or quit
    Escape,
    /// Ctrl+C
    Interrupt,
    /// Ctrl+D on an empty line
    Eof,
    /// Ctrl+L: clear the chat
    Clear,
    /// Ctrl+U: clear the input line
    ClearLine,
    /// Ctrl+W: delete the word before the cursor
    DeleteWord,
    /// Bracketed paste
    Paste(String),
    /// Unknown/unhandled
    Unknown,
}

/// Convert a crossterm key event to an action
pub fn key_to_action(event: KeyEvent) -> Action {
    let KeyEvent {
        code, modifiers, ..
    } = event;

    if modifiers.contains(KeyModifiers::CONTROL) {
        return match code {
            KeyCode::Char('c') => Action::Interrupt,
            KeyCode::Char('d') => Action::Eof,
            KeyCode::Char('l') => Action::Clear,
            KeyCode::Char('u') => Action::ClearLine,
            KeyCode::Char('w') => Action::DeleteWord,
            KeyCode::Char('a') => Action::Home,
            KeyCode::Char('e') => Action::End,
            _ => Action::Unknown,
        };
    }

    if modifiers.contains(KeyModifiers::ALT) {
        return Action::Unknown;
    }

    match code {
        KeyCode::Char(c) => Action::Char(c),
        KeyCode::Enter => Action::Submit,
        KeyCode::Backspace => Action::Backspace,
        KeyCode::Delete => Action::Delete,
        KeyCode::Left => Action::Left,
        KeyCode::Right => Action::Right,
        KeyCode::Home => Action::Home,
        KeyCode::End => Action::End,
        KeyCode::PageUp => Action::PageUp,
        KeyCode::PageDown => Action::PageDown,
        KeyCode::Esc => Action::Escape,
        _ => Action::Unknown,
    }
}

/// Convert a crossterm event to an action.
///
/// Key releases are dropped so terminals that report them do not double-type.
pub fn event_to_action(event: Event) -> Option<Action> {
    match event {
        Event::Key(key) if key.kind != KeyEventKind::Release => Some(key_to_action(key)),
        Event::Paste(text) => Some(Action::Paste(text)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn test_chat_bindings() {
        assert_eq!(
            key_to_action(key(KeyCode::Enter, KeyModifiers::NONE)),
            Action::Submit
        );
        assert_eq!(
            key_to_action(key(KeyCode::Char('l'), KeyModifiers::CONTROL)),
            Action::Clear
        );
        assert_eq!(
            key_to_action(key(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Action::Interrupt
        );
        assert_eq!(
            key_to_action(key(KeyCode::Esc, KeyModifiers::NONE)),
            Action::Escape
        );
    }

    #[test]
    fn test_plain_and_shifted_chars() {
        assert_eq!(
            key_to_action(key(KeyCode::Char('a'), KeyModifiers::NONE)),
            Action::Char('a')
        );
        assert_eq!(
            key_to_action(key(KeyCode::Char('A'), KeyModifiers::SHIFT)),
            Action::Char('A')
        );
        assert_eq!(
            key_to_action(key(KeyCode::Char('x'), KeyModifiers::ALT)),
            Action::Unknown
        );
    }

    #[test]
    fn test_paste_and_release_events() {
        assert_eq!(
            event_to_action(Event::Paste("hi".into())),
            Some(Action::Paste("hi".into()))
        );

        let mut release = key(KeyCode::Char('a'), KeyModifiers::NONE);
        release.kind = KeyEventKind::Release;
        assert_eq!(event_to_action(Event::Key(release)), None);
        assert_eq!(event_to_action(Event::FocusGained), None);
    }
}
