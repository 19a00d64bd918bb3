//! Single-line message input

use crate::input::Action;
use crate::theme::Theme;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    widgets::{Block, Borders, Paragraph, Widget},
};
use unicode_width::UnicodeWidthChar;

/// Editable input line with an optional disabled state.
///
/// While disabled (a request is in flight) edits are refused and the
/// disabled label replaces the placeholder.
#[derive(Debug, Default)]
pub struct InputBox {
    content: String,
    /// Cursor position in chars, not bytes
    cursor: usize,
    /// Horizontal scroll offset in display columns
    scroll: usize,
    placeholder: String,
    disabled_label: String,
    focused: bool,
    disabled: bool,
}

impl InputBox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    /// Text shown while disabled and empty
    pub fn with_disabled_label(mut self, label: impl Into<String>) -> Self {
        self.disabled_label = label.into();
        self
    }

    pub fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn clear(&mut self) {
        self.content.clear();
        self.cursor = 0;
        self.scroll = 0;
    }

    fn byte_offset(&self, char_index: usize) -> usize {
        self.content
            .char_indices()
            .nth(char_index)
            .map(|(i, _)| i)
            .unwrap_or(self.content.len())
    }

    fn cursor_column(&self) -> usize {
        self.content
            .chars()
            .take(self.cursor)
            .map(|c| c.width().unwrap_or(0))
            .sum()
    }

    /// Remove the chars in `start..end` (char indices)
    fn remove_chars(&mut self, start: usize, end: usize) {
        let range = self.byte_offset(start)..self.byte_offset(end);
        self.content.drain(range);
    }

    fn insert_char(&mut self, c: char) {
        let at = self.byte_offset(self.cursor);
        self.content.insert(at, c);
        self.cursor += 1;
    }

    /// Apply an editing action; returns true if it was consumed
    pub fn handle_action(&mut self, action: &Action, width: u16) -> bool {
        if self.disabled {
            return false;
        }
        let len = self.content.chars().count();

        let consumed = match action {
            Action::Char(c) => {
                self.insert_char(*c);
                true
            }
            Action::Backspace if self.cursor > 0 => {
                self.remove_chars(self.cursor - 1, self.cursor);
                self.cursor -= 1;
                true
            }
            Action::Delete if self.cursor < len => {
                self.remove_chars(self.cursor, self.cursor + 1);
                true
            }
            Action::Left if self.cursor > 0 => {
                self.cursor -= 1;
                true
            }
            Action::Right if self.cursor < len => {
                self.cursor += 1;
                true
            }
            Action::Home => {
                self.cursor = 0;
                true
            }
            Action::End => {
                self.cursor = len;
                true
            }
            Action::ClearLine => {
                self.clear();
                true
            }
            Action::DeleteWord => {
                let chars: Vec<char> = self.content.chars().collect();
                let mut start = self.cursor;
                while start > 0 && chars[start - 1] == ' ' {
                    start -= 1;
                }
                while start > 0 && chars[start - 1] != ' ' {
                    start -= 1;
                }
                self.remove_chars(start, self.cursor);
                self.cursor = start;
                true
            }
            Action::Paste(text) => {
                // single line: fold line breaks into one space
                for c in text.chars() {
                    if c == '\n' || c == '\r' {
                        if self.cursor > 0 && !self.content.ends_with(' ') {
                            self.insert_char(' ');
                        }
                    } else {
                        self.insert_char(c);
                    }
                }
                true
            }
            _ => false,
        };

        if consumed {
            self.update_scroll(width as usize);
        }
        consumed
    }

    fn update_scroll(&mut self, width: usize) {
        // borders plus one column for the cursor
        let visible = width.saturating_sub(3).max(1);
        let column = self.cursor_column();
        if column < self.scroll {
            self.scroll = column;
        } else if column >= self.scroll + visible {
            self.scroll = column + 1 - visible;
        }
    }

    fn visible_text(&self, width: usize) -> String {
        let mut skipped = 0;
        let mut used = 0;
        let mut visible = String::new();
        for c in self.content.chars() {
            let w = c.width().unwrap_or(0);
            if skipped < self.scroll {
                skipped += w;
                continue;
            }
            if used + w > width {
                break;
            }
            visible.push(c);
            used += w;
        }
        visible
    }

    pub fn render(&self, area: Rect, buf: &mut Buffer, theme: &Theme) {
        let border = if self.focused && !self.disabled {
            theme.accent_style()
        } else {
            theme.border_style()
        };
        let block = Block::default().borders(Borders::ALL).border_style(border);
        let inner = block.inner(area);
        block.render(area, buf);

        let (text, style) = if !self.content.is_empty() {
            let style = if self.disabled {
                theme.dim_style()
            } else {
                theme.base_style()
            };
            (self.visible_text(inner.width as usize), style)
        } else if self.disabled && !self.disabled_label.is_empty() {
            (
                self.disabled_label.clone(),
                theme.dim_style().add_modifier(Modifier::ITALIC),
            )
        } else {
            (self.placeholder.clone(), theme.dim_style())
        };
        Paragraph::new(text).style(style).render(inner, buf);

        if self.focused && !self.disabled && inner.width > 0 {
            let x = self.cursor_column().saturating_sub(self.scroll);
            if x < inner.width as usize {
                if let Some(cell) = buf.cell_mut((inner.x + x as u16, inner.y)) {
                    cell.set_style(Style::default().bg(theme.accent));
                }
            }
        }
    }
}
