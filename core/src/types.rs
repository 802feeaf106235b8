//! Domain DTOs for the todo API.
//!
//! # Design
//! These types mirror the server's wire schema but are defined independently
//! so the client never links the server's axum stack. The integration test
//! and the shared test vectors catch any schema drift between the two crates.

use serde::{Deserialize, Serialize};

/// A single todo item returned by the API. `id` is opaque and store-assigned.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Todo {
    pub id: String,
    pub text: String,
    pub completed: bool,
}

/// Request payload for creating a new todo. The server always starts new
/// todos incomplete, so there is no `completed` field to send.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTodo {
    pub text: String,
}

/// Request payload replacing a todo's completion flag.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct UpdateCompletion {
    pub completed: bool,
}

/// Response body of a delete.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeleteConfirmation {
    pub message: String,
}

/// Error body the server attaches to 4xx/5xx responses.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ErrorBody {
    pub error: String,
}
