//! Backend error types

use thiserror::Error;

/// Backend error with classification
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct BackendError {
    pub kind: BackendErrorKind,
    pub message: String,
}

impl BackendError {
    pub fn new(kind: BackendErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(BackendErrorKind::Network, message)
    }

    /// Non-success HTTP status. Counts as a network failure.
    pub fn status(status: u16, body: &str) -> Self {
        let body = body.trim();
        if body.is_empty() {
            Self::network(format!("HTTP {status}"))
        } else {
            Self::network(format!("HTTP {status}: {body}"))
        }
    }

    /// Body could not be decoded as the expected JSON shape
    pub fn decode(message: impl Into<String>) -> Self {
        Self::network(format!("Failed to parse response: {}", message.into()))
    }

    pub fn application(message: impl Into<String>) -> Self {
        Self::new(BackendErrorKind::Application, message)
    }
}

/// Error classification
///
/// Both kinds are handled the same way by the widget. The split exists for
/// logging only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendErrorKind {
    /// Request rejected, non-success status, or undecodable body
    Network,
    /// Success status but the payload reports an error
    Application,
}

impl BackendErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Network => "network",
            Self::Application => "application",
        }
    }
}
