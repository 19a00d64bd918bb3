//! Error types for agchat-client

use thiserror::Error;

/// Result type alias using agchat-client Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when talking to a remote agent or chat endpoint
#[derive(Error, Debug)]
pub enum Error {
    /// HTTP request failed before a response arrived
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Server answered with a non-success status
    #[error("HTTP {status}{}", reason_suffix(.status_text))]
    Status { status: u16, status_text: String },

    /// Server-sent events error
    #[error("SSE error: {0}")]
    Sse(String),

    /// The agent reported a failed run
    #[error("{0}")]
    Run(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Codes without a reason phrase render as plain `HTTP 599`
fn reason_suffix(status_text: &str) -> String {
    if status_text.is_empty() {
        String::new()
    } else {
        format!(": {}", status_text)
    }
}

impl Error {
    /// Create a status error from an HTTP status code
    pub fn status(status: reqwest::StatusCode) -> Self {
        Self::Status {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
        }
    }

    /// Whether the remote agent already reported this failure to its subscribers
    pub fn is_reported_by_agent(&self) -> bool {
        matches!(self, Error::Run(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_display_matches_wire_contract() {
        let e = Error::status(reqwest::StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(e.to_string(), "HTTP 500: Internal Server Error");
    }

    #[test]
    fn test_status_display_not_found() {
        let e = Error::status(reqwest::StatusCode::NOT_FOUND);
        assert_eq!(e.to_string(), "HTTP 404: Not Found");
    }

    #[test]
    fn test_status_without_reason_phrase() {
        let e = Error::status(reqwest::StatusCode::from_u16(599).unwrap());
        assert_eq!(e.to_string(), "HTTP 599");
    }

    #[test]
    fn test_run_error_is_reported() {
        assert!(Error::Run("boom".into()).is_reported_by_agent());
        assert!(!Error::Sse("reset".into()).is_reported_by_agent());
        assert!(
            !Error::Status {
                status: 502,
                status_text: "Bad Gateway".into()
            }
            .is_reported_by_agent()
        );
    }

    #[test]
    fn test_run_error_display_is_bare_message() {
        assert_eq!(Error::Run("boom".into()).to_string(), "boom");
    }
}
