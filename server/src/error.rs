//! HTTP-facing error type for the todo routes.
//!
//! Every failure a handler can produce maps to one status and one stable
//! `code`. The body is always `{"error": <message>, "code": <code>}`.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error};

use crate::store::StoreError;
use crate::todo::TodoId;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// No todo has this id.
    #[error("todo with id {0} not found")]
    NotFound(TodoId),

    /// The body parsed but its content is unacceptable.
    #[error("{0}")]
    Validation(String),

    /// The body could not be read as JSON of the expected shape.
    #[error("{message}")]
    MalformedBody { status: StatusCode, message: String },

    /// The document store cannot be reached.
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),

    /// Anything else, such as a stored document with the wrong shape.
    #[error("{0}")]
    Internal(String),
}

/// JSON body of every error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub code: String,
}

impl ServiceError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::MalformedBody { status, .. } => *status,
            Self::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::MalformedBody { .. } => "BAD_REQUEST",
            Self::StoreUnavailable(_) => "STORE_UNAVAILABLE",
            Self::Internal(_) => "INTERNAL_SERVER_ERROR",
        }
    }
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Unavailable { .. } => Self::StoreUnavailable(err.to_string()),
            StoreError::Encoding(_) | StoreError::Malformed { .. } => {
                Self::Internal(err.to_string())
            }
        }
    }
}

impl From<JsonRejection> for ServiceError {
    fn from(rejection: JsonRejection) -> Self {
        Self::MalformedBody {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(%status, error = %self, "request failed");
        } else {
            debug!(%status, error = %self, "request rejected");
        }
        let body = ErrorBody {
            error: self.to_string(),
            code: self.code().to_owned(),
        };
        (status, Json(body)).into_response()
    }
}
