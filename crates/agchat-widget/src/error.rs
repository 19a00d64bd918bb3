//! Error types for agchat-widget

use thiserror::Error;

/// Result type alias using agchat-widget Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the chat widgets
#[derive(Error, Debug)]
pub enum Error {
    /// An error from the remote client layer
    #[error(transparent)]
    Client(#[from] agchat_client::Error),

    /// A failure outside the client, e.g. a request task that panicked
    #[error("{0}")]
    Other(String),
}
