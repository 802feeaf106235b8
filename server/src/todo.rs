//! Wire and domain types for the single `Todo` entity.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ServiceError;

/// Message returned by every delete, whether or not a record was removed.
pub const DELETED_MESSAGE: &str = "Todo deleted";

/// Opaque, store-assigned identifier. Never parsed or validated: an id that
/// the store did not issue is simply absent.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(String);

impl TodoId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for TodoId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for TodoId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A todo item as stored and as sent over the wire.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: TodoId,
    pub text: String,
    pub completed: bool,
}

/// Request body for `POST /todos`. Any `completed` value in the JSON is
/// ignored; new todos always start incomplete.
#[derive(Debug, Deserialize)]
pub struct CreateTodo {
    pub text: Option<String>,
}

impl CreateTodo {
    /// The text to store. Missing or blank text is rejected; accepted text is
    /// kept exactly as sent.
    pub fn into_text(self) -> Result<String, ServiceError> {
        match self.text {
            Some(text) if !text.trim().is_empty() => Ok(text),
            Some(_) => Err(ServiceError::Validation("`text` must not be blank".into())),
            None => Err(ServiceError::Validation("`text` is required".into())),
        }
    }
}

/// Request body for `PUT /todos/{id}`: the new completion state, computed by
/// the client. Only `completed` is ever written.
#[derive(Debug, Deserialize)]
pub struct UpdateCompletion {
    pub completed: Option<bool>,
}

impl UpdateCompletion {
    pub fn into_completed(self) -> Result<bool, ServiceError> {
        self.completed
            .ok_or_else(|| ServiceError::Validation("`completed` is required".into()))
    }
}

/// Response body for `DELETE /todos/{id}`.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeleteConfirmation {
    pub message: String,
}

impl DeleteConfirmation {
    pub fn deleted() -> Self {
        Self {
            message: DELETED_MESSAGE.to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn todo_serializes_to_json() {
        let todo = Todo {
            id: TodoId::from("abc"),
            text: "Test".to_string(),
            completed: false,
        };
        let json = serde_json::to_value(&todo).unwrap();
        assert_eq!(json["id"], "abc");
        assert_eq!(json["text"], "Test");
        assert_eq!(json["completed"], false);
    }

    #[test]
    fn create_todo_ignores_completed() {
        let input: CreateTodo =
            serde_json::from_str(r#"{"text":"Done","completed":true}"#).unwrap();
        assert_eq!(input.into_text().unwrap(), "Done");
    }

    #[test]
    fn create_todo_keeps_surrounding_whitespace() {
        let input: CreateTodo = serde_json::from_str(r#"{"text":"  padded "}"#).unwrap();
        assert_eq!(input.into_text().unwrap(), "  padded ");
    }

    #[test]
    fn create_todo_rejects_missing_text() {
        let input: CreateTodo = serde_json::from_str(r#"{"completed":true}"#).unwrap();
        assert!(matches!(input.into_text(), Err(ServiceError::Validation(_))));
    }

    #[test]
    fn create_todo_rejects_blank_text() {
        let input: CreateTodo = serde_json::from_str(r#"{"text":"   "}"#).unwrap();
        assert!(matches!(input.into_text(), Err(ServiceError::Validation(_))));
    }

    #[test]
    fn update_completion_requires_completed() {
        let input: UpdateCompletion = serde_json::from_str(r#"{"text":"sneaky"}"#).unwrap();
        assert!(matches!(input.into_completed(), Err(ServiceError::Validation(_))));
    }

    #[test]
    fn delete_confirmation_message() {
        let json = serde_json::to_value(DeleteConfirmation::deleted()).unwrap();
        assert_eq!(json, serde_json::json!({"message": "Todo deleted"}));
    }
}
