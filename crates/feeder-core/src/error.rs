//! Error types for feeder-core.
//!
//! This module defines every failure a panel operation can surface. None of
//! them are retried automatically: the user re-triggers the action.
//!
//! | Error | Origin | Effect on the panel |
//! |-------|--------|---------------------|
//! | [`Error::Network`] | Transport failure | Notify; keep view state |
//! | [`Error::Server`] | Non-2xx response | Notify with status text; keep view state |
//! | [`Error::Validation`] | Bad user input | Notify inline; no request sent |
//! | [`Error::MalformedResponse`] | Unexpected JSON shape | Mark widget stale |
//! | [`Error::SensorUnavailable`] | Device has no distance sensor | Mark gauge unavailable |
//! | [`Error::InvalidUrl`] | Client construction | Fix configuration |
//! | [`Error::Pane`] | Unknown pane or switch during a transition | Logged and ignored |

use thiserror::Error;

use feeder_types::ParseError;

use crate::pane::PaneError;

/// Errors that can occur when talking to the feeder or driving the panel.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new error variants
/// in future versions without breaking downstream code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum Error {
    /// The request never got a response (connection refused, timeout, DNS).
    #[error("Feeder not reachable at {url}: {message}")]
    Network { url: String, message: String },

    /// The server answered with a non-success status.
    #[error("{}", server_message(.status, .status_text, .detail))]
    Server {
        status: u16,
        status_text: String,
        detail: Option<String>,
    },

    /// User input failed validation before any request was made.
    #[error("Invalid input: {0}")]
    Validation(String),

    /// The server answered with a body we could not interpret.
    #[error("Malformed response from {endpoint}: {reason}")]
    MalformedResponse { endpoint: String, reason: String },

    /// The device reported that its distance sensor is not available.
    #[error("Sensor unavailable: {0}")]
    SensorUnavailable(String),

    /// The configured base URL is not usable.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// A pane operation was rejected.
    #[error(transparent)]
    Pane(#[from] PaneError),
}

fn server_message(status: &u16, status_text: &str, detail: &Option<String>) -> String {
    let mut message = format!("Server error {}", status);
    if !status_text.is_empty() {
        message.push(' ');
        message.push_str(status_text);
    }
    if let Some(detail) = detail.as_deref().filter(|d| !d.is_empty()) {
        message.push_str(": ");
        message.push_str(detail);
    }
    message
}

impl Error {
    /// Create a server rejection error.
    pub fn server(status: u16, status_text: impl Into<String>) -> Self {
        Self::Server {
            status,
            status_text: status_text.into(),
            detail: None,
        }
    }

    /// Create a malformed-response error for an endpoint.
    pub fn malformed(endpoint: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedResponse {
            endpoint: endpoint.into(),
            reason: reason.into(),
        }
    }

    /// Whether the error happened before any request was sent.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl From<ParseError> for Error {
    fn from(err: ParseError) -> Self {
        Self::Validation(err.to_string())
    }
}

/// Result type alias using feeder-core's Error type.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_error_includes_status_text() {
        let err = Error::server(500, "Internal Server Error");
        assert_eq!(err.to_string(), "Server error 500 Internal Server Error");
    }

    #[test]
    fn test_server_error_includes_detail() {
        let err = Error::Server {
            status: 500,
            status_text: "Internal Server Error".to_string(),
            detail: Some("Motor not configured or not found".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "Server error 500 Internal Server Error: Motor not configured or not found"
        );
    }

    #[test]
    fn test_server_error_without_text() {
        let err = Error::server(599, "");
        assert_eq!(err.to_string(), "Server error 599");
    }

    #[test]
    fn test_parse_error_becomes_validation() {
        let err: Error = "9".parse::<feeder_types::FeedSize>().unwrap_err().into();
        assert!(err.is_validation());
        assert!(err.to_string().starts_with("Invalid input:"));
    }

    #[test]
    fn test_network_error_display() {
        let err = Error::Network {
            url: "http://feeder.local/api/getDistance".to_string(),
            message: "connection refused".to_string(),
        };
        assert!(err.to_string().contains("feeder.local"));
        assert!(err.to_string().contains("connection refused"));
    }
}
