//! Color theme support

use ratatui::style::{Color, Modifier, Style};

/// Color theme for the UI
#[derive(Debug, Clone)]
pub struct Theme {
    /// Background color
    pub bg: Color,
    /// Primary text color
    pub fg: Color,
    /// Dimmed/secondary text
    pub dim: Color,
    /// Accent color (prompts, focused borders)
    pub accent: Color,
    /// User message header
    pub user: Color,
    /// Assistant message header
    pub assistant: Color,
    /// Error banner and inline errors
    pub error: Color,
    /// Typing indicator dots
    pub indicator: Color,
    /// Border color
    pub border: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    /// Dark theme (default)
    pub fn dark() -> Self {
        Self {
            bg: Color::Reset,
            fg: Color::White,
            dim: Color::DarkGray,
            accent: Color::Cyan,
            user: Color::Rgb(118, 75, 162),
            assistant: Color::Green,
            error: Color::Red,
            indicator: Color::Gray,
            border: Color::DarkGray,
        }
    }

    /// Light theme
    pub fn light() -> Self {
        Self {
            bg: Color::White,
            fg: Color::Black,
            dim: Color::Gray,
            accent: Color::Blue,
            user: Color::Rgb(102, 126, 234),
            assistant: Color::Rgb(0, 120, 60),
            error: Color::Rgb(198, 40, 40),
            indicator: Color::DarkGray,
            border: Color::Gray,
        }
    }

    /// Look up a theme by name
    pub fn by_name(name: &str) -> Option<Self> {
        match name {
            "dark" => Some(Self::dark()),
            "light" => Some(Self::light()),
            _ => None,
        }
    }

    pub fn base_style(&self) -> Style {
        Style::default().fg(self.fg).bg(self.bg)
    }

    pub fn dim_style(&self) -> Style {
        Style::default().fg(self.dim)
    }

    pub fn accent_style(&self) -> Style {
        Style::default().fg(self.accent)
    }

    pub fn user_header(&self) -> Style {
        Style::default().fg(self.user).add_modifier(Modifier::BOLD)
    }

    pub fn assistant_header(&self) -> Style {
        Style::default()
            .fg(self.assistant)
            .add_modifier(Modifier::BOLD)
    }

    pub fn error_style(&self) -> Style {
        Style::default().fg(self.error)
    }

    pub fn indicator_style(&self) -> Style {
        Style::default().fg(self.indicator)
    }

    pub fn border_style(&self) -> Style {
        Style::default().fg(self.border)
    }
}
