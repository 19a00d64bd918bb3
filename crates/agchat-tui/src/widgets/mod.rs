//! Custom widgets for the TUI

pub mod error_banner;
pub mod input_box;
pub mod message_list;
pub mod status_line;
pub mod typing_indicator;

pub use error_banner::ErrorBanner;
pub use input_box::InputBox;
pub use message_list::{MessageList, StatusRow};
pub use status_line::StatusLine;
pub use typing_indicator::TypingIndicator;
