//! Terminal setup and teardown

use crate::theme::Theme;
use crossterm::{
    event::{DisableBracketedPaste, EnableBracketedPaste},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Frame, Terminal, backend::CrosstermBackend};
use std::io::{self, Stdout};
use std::time::Duration;

/// Owns the terminal for the lifetime of the UI.
///
/// Creating it switches to raw mode on the alternate screen; dropping it
/// restores the terminal, also when the UI loop exits early with an error.
pub struct App {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    theme: Theme,
    tick_rate: Duration,
}

impl App {
    pub fn new() -> io::Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        if let Err(e) = execute!(stdout, EnterAlternateScreen, EnableBracketedPaste) {
            let _ = disable_raw_mode();
            return Err(e);
        }
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;

        Ok(Self {
            terminal,
            theme: Theme::default(),
            tick_rate: Duration::from_millis(80),
        })
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    /// Redraw interval while something animates
    pub fn with_tick_rate(mut self, rate: Duration) -> Self {
        self.tick_rate = rate;
        self
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn tick_rate(&self) -> Duration {
        self.tick_rate
    }

    /// Current terminal width in columns
    pub fn width(&self) -> io::Result<u16> {
        Ok(self.terminal.size()?.width)
    }

    /// Draw one frame
    pub fn draw<F>(&mut self, render: F) -> io::Result<()>
    where
        F: FnOnce(&mut Frame, &Theme),
    {
        let theme = &self.theme;
        self.terminal.draw(|frame| render(frame, theme))?;
        Ok(())
    }
}

impl Drop for App {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(
            self.terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableBracketedPaste
        );
        let _ = self.terminal.show_cursor();
    }
}
