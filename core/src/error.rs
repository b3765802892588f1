//! Error types for the todo API client.

use std::fmt;

/// Errors returned by `TodoClient` build and parse methods.
#[derive(Debug)]
pub enum ApiError {
    /// The server returned 404: the requested todo does not exist.
    NotFound,

    /// The server returned an unexpected status other than 404. The service
    /// answers errors with an empty body, so `body` is usually empty.
    HttpError { status: u16, body: String },

    /// The response body could not be deserialized into the expected type.
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    SerializationError(String),
}

impl ApiError {
    /// True when the server reported its store as unreachable (503).
    pub fn is_unavailable(&self) -> bool {
        matches!(self, ApiError::HttpError { status: 503, .. })
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::NotFound => write!(f, "todo not found"),
            ApiError::HttpError { status, body } if body.is_empty() => write!(f, "HTTP {status}"),
            ApiError::HttpError { status, body } => write!(f, "HTTP {status}: {body}"),
            ApiError::DeserializationError(msg) => write!(f, "deserialization failed: {msg}"),
            ApiError::SerializationError(msg) => write!(f, "serialization failed: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}
