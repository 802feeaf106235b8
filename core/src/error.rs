//! Error types for the todo API client.
//!
//! # Design
//! `NotFound` and `Validation` get dedicated variants because callers act on
//! them: the first means the todo is gone, the second that the input was
//! refused. All other non-2xx responses land in `HttpError` with the raw
//! status code and body. Nothing here is retried.

use thiserror::Error;

/// Errors returned by `TodoClient` parse methods, transports, and `TodoApp`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server returned 404 for an operation where absence is an error.
    #[error("resource not found")]
    NotFound,

    /// The server refused the request body (422).
    #[error("rejected by server: {0}")]
    Validation(String),

    /// The server returned a non-2xx status not covered above.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The request never produced a response.
    #[error("transport failed: {0}")]
    Transport(String),

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(String),
}
