//! agchat-tui: terminal rendering for the chat widgets
//!
//! ratatui widgets that draw a transcript, the typing indicator, the error
//! banner and the input line, plus key mapping and a terminal guard.

pub mod app;
pub mod input;
pub mod theme;
pub mod widgets;

pub use app::App;
pub use theme::Theme;
