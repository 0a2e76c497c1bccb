//! Client error types

use inkpost_core::ValidationError;
use serde::Deserialize;
use thiserror::Error;

/// Client error types
#[derive(Debug, Error)]
pub enum ClientError {
    /// Network or request error
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Server returned an error status
    #[error("Server error {status}: {message}")]
    ServerError { status: u16, message: String },

    /// The session credential is missing or no longer valid
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Resource not found
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Bad request
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Forbidden
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Input rejected before it was sent
    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationError),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Configuration(String),
}

/// Coarse error classification that retry and session logic dispatch on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Rejected client-side, never dispatched
    Validation,
    /// Credential expired; recoverable with one refresh
    AuthExpired,
    /// The API refused the request (bad credentials, bad token, bad code ...)
    Rejected,
    /// Transport, timeout or decoding failure
    Network,
    /// The API failed on its side
    Server,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

impl ClientError {
    /// Create error from HTTP status code
    pub fn from_status(status: reqwest::StatusCode, message: String) -> Self {
        match status.as_u16() {
            400 => Self::BadRequest(message),
            401 => Self::AuthenticationFailed(message),
            403 => Self::Forbidden(message),
            404 => Self::NotFound(message),
            _ => Self::ServerError {
                status: status.as_u16(),
                message,
            },
        }
    }

    /// Create error from a failed response body
    ///
    /// The API reports failures as `{"message": ...}`; anything else is used
    /// verbatim, and an empty body falls back to the status reason.
    pub fn from_body(status: reqwest::StatusCode, body: &str) -> Self {
        let message = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.message)
            .or_else(|| {
                let trimmed = body.trim();
                (!trimmed.is_empty() && !trimmed.starts_with('{')).then(|| trimmed.to_string())
            })
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("Request failed")
                    .to_string()
            });
        Self::from_status(status, message)
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::AuthenticationFailed(_) => ErrorKind::AuthExpired,
            Self::BadRequest(_) | Self::Forbidden(_) | Self::NotFound(_) => ErrorKind::Rejected,
            Self::ServerError { status, .. } if *status < 500 => ErrorKind::Rejected,
            Self::ServerError { .. } => ErrorKind::Server,
            Self::Request(_) | Self::Serialization(_) | Self::Configuration(_) => {
                ErrorKind::Network
            }
        }
    }

    /// Whether the session credential has expired (HTTP 401)
    pub fn is_auth_expired(&self) -> bool {
        self.kind() == ErrorKind::AuthExpired
    }

    /// The message the API attached to its rejection, if any
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::AuthenticationFailed(message)
            | Self::NotFound(message)
            | Self::BadRequest(message)
            | Self::Forbidden(message)
            | Self::ServerError { message, .. } => Some(message),
            Self::Validation(err) => Some(&err.message),
            _ => None,
        }
    }

    /// Status code of the failed response, if the request got that far
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::AuthenticationFailed(_) => Some(401),
            Self::BadRequest(_) => Some(400),
            Self::Forbidden(_) => Some(403),
            Self::NotFound(_) => Some(404),
            Self::ServerError { status, .. } => Some(*status),
            Self::Request(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
