//! Handler error type and its mapping to HTTP status codes.
//!
//! # Design
//! Every failure is answered with a bare status and an empty body. The error
//! is logged once, at the point it turns into a response.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::ids::IdError;
use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum TodoError {
    /// A body that is not valid JSON for the route.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// No todo under this path segment.
    #[error("todo {0} not found")]
    NotFound(String),

    /// Supplied id out of range, or no ids left to assign.
    #[error(transparent)]
    Id(#[from] IdError),

    #[error(transparent)]
    Store(#[from] StoreError),

    /// A stored value could not be decoded as a todo.
    #[error("corrupt record: {0}")]
    CorruptRecord(#[source] serde_json::Error),

    #[error("failed to encode todo: {0}")]
    Encode(#[source] serde_json::Error),
}

impl TodoError {
    pub fn status(&self) -> StatusCode {
        match self {
            TodoError::BadRequest(_) => StatusCode::BAD_REQUEST,
            TodoError::NotFound(_) => StatusCode::NOT_FOUND,
            TodoError::Id(IdError::OutOfRange(_)) => StatusCode::BAD_REQUEST,
            TodoError::Id(IdError::Exhausted) => StatusCode::SERVICE_UNAVAILABLE,
            TodoError::Store(_) => StatusCode::SERVICE_UNAVAILABLE,
            TodoError::CorruptRecord(_) | TodoError::Encode(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for TodoError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, status = status.as_u16(), "request failed");
        } else {
            tracing::warn!(error = %self, status = status.as_u16(), "request rejected");
        }
        status.into_response()
    }
}
