//! Stateless HTTP request builder and response parser for the todo API.
//!
//! # Design
//! `TodoClient` holds only a `base_url` and carries no mutable state between
//! calls. Each operation is split into a `build_*` method that produces an
//! `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`.
//! The caller executes the actual HTTP round-trip, keeping this module
//! deterministic and free of I/O.

use serde::de::DeserializeOwned;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{CreateTodo, DeleteConfirmation, ErrorBody, Todo, UpdateCompletion};

/// Synchronous, stateless client for the todo API.
#[derive(Debug, Clone)]
pub struct TodoClient {
    base_url: String,
}

impl TodoClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn build_list_todos(&self) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: format!("{}/todos", self.base_url),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn build_create_todo(&self, input: &CreateTodo) -> Result<HttpRequest, ApiError> {
        Ok(HttpRequest {
            method: HttpMethod::Post,
            path: format!("{}/todos", self.base_url),
            headers: json_headers(),
            body: Some(to_json(input)?),
        })
    }

    /// Replace the completion flag of `id` with `completed`. The value is sent
    /// as-is; flipping it is the caller's job.
    pub fn build_update_completion(
        &self,
        id: &str,
        completed: bool,
    ) -> Result<HttpRequest, ApiError> {
        Ok(HttpRequest {
            method: HttpMethod::Put,
            path: self.todo_path(id),
            headers: json_headers(),
            body: Some(to_json(&UpdateCompletion { completed })?),
        })
    }

    pub fn build_delete_todo(&self, id: &str) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Delete,
            path: self.todo_path(id),
            headers: Vec::new(),
            body: None,
        }
    }

    /// `id` is opaque, so it is percent-encoded as a single path segment.
    fn todo_path(&self, id: &str) -> String {
        format!("{}/todos/{}", self.base_url, urlencoding::encode(id))
    }

    pub fn parse_list_todos(&self, response: HttpResponse) -> Result<Vec<Todo>, ApiError> {
        check_status(&response, &[200])?;
        from_json(&response.body)
    }

    /// Accepts 201 and a plain 200, which older servers answer with.
    pub fn parse_create_todo(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        check_status(&response, &[201, 200])?;
        from_json(&response.body)
    }

    /// `Ok(None)` when the todo does not exist, whether the server signals
    /// that with a 404 or with an empty (`null`) body.
    pub fn parse_update_completion(
        &self,
        response: HttpResponse,
    ) -> Result<Option<Todo>, ApiError> {
        match check_status(&response, &[200]) {
            Ok(()) => from_json(&response.body),
            Err(ApiError::NotFound) => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub fn parse_delete_todo(&self, response: HttpResponse) -> Result<DeleteConfirmation, ApiError> {
        check_status(&response, &[200])?;
        from_json(&response.body)
    }
}

fn json_headers() -> Vec<(String, String)> {
    vec![("content-type".to_string(), "application/json".to_string())]
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, ApiError> {
    serde_json::to_string(value).map_err(|e| ApiError::SerializationError(e.to_string()))
}

fn from_json<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::DeserializationError(e.to_string()))
}

/// Map non-success status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse, expected: &[u16]) -> Result<(), ApiError> {
    match response.status {
        s if expected.contains(&s) => Ok(()),
        404 => Err(ApiError::NotFound),
        422 => {
            let message = serde_json::from_str::<ErrorBody>(&response.body)
                .map(|b| b.error)
                .unwrap_or_else(|_| response.body.clone());
            Err(ApiError::Validation(message))
        }
        status => Err(ApiError::HttpError {
            status,
            body: response.body.clone(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ID: &str = "0123456789abcdef0123456789abcdef";

    fn client() -> TodoClient {
        TodoClient::new("http://localhost:5000")
    }

    fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            headers: Vec::new(),
            body: body.to_string(),
        }
    }

    #[test]
    fn build_list_todos_produces_correct_request() {
        let req = client().build_list_todos();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.path, "http://localhost:5000/todos");
        assert!(req.body.is_none());
        assert!(req.headers.is_empty());
    }

    #[test]
    fn build_create_todo_sends_only_text() {
        let input = CreateTodo {
            text: "Buy milk".to_string(),
        };
        let req = client().build_create_todo(&input).unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.path, "http://localhost:5000/todos");
        assert_eq!(req.headers, json_headers());
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body, serde_json::json!({"text": "Buy milk"}));
    }

    #[test]
    fn build_update_completion_sends_value_verbatim() {
        let req = client().build_update_completion(ID, false).unwrap();
        assert_eq!(req.method, HttpMethod::Put);
        assert_eq!(req.path, format!("http://localhost:5000/todos/{ID}"));
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body, serde_json::json!({"completed": false}));
    }

    #[test]
    fn build_delete_todo_produces_correct_request() {
        let req = client().build_delete_todo(ID);
        assert_eq!(req.method, HttpMethod::Delete);
        assert_eq!(req.path, format!("http://localhost:5000/todos/{ID}"));
        assert!(req.body.is_none());
    }

    #[test]
    fn parse_list_todos_success() {
        let body = format!(r#"[{{"id":"{ID}","text":"Test","completed":false}}]"#);
        let todos = client().parse_list_todos(response(200, &body)).unwrap();
        assert_eq!(todos.len(), 1);
        assert_eq!(todos[0].text, "Test");
    }

    #[test]
    fn parse_list_todos_bad_json() {
        let err = client().parse_list_todos(response(200, "not json")).unwrap_err();
        assert!(matches!(err, ApiError::DeserializationError(_)));
    }

    #[test]
    fn parse_create_todo_success() {
        let body = format!(r#"{{"id":"{ID}","text":"New","completed":false}}"#);
        let todo = client().parse_create_todo(response(201, &body)).unwrap();
        assert_eq!(todo.id, ID);
        assert_eq!(todo.text, "New");
    }

    #[test]
    fn parse_create_todo_accepts_plain_200() {
        let body = format!(r#"{{"id":"{ID}","text":"New","completed":false}}"#);
        let todo = client().parse_create_todo(response(200, &body)).unwrap();
        assert_eq!(todo.id, ID);
    }

    #[test]
    fn id_is_encoded_as_one_path_segment() {
        let c = client();
        let put = c.build_update_completion("a/b c", true).unwrap();
        assert_eq!(put.path, "http://localhost:5000/todos/a%2Fb%20c");
        let delete = c.build_delete_todo("a/b c");
        assert_eq!(delete.path, "http://localhost:5000/todos/a%2Fb%20c");
    }

    #[test]
    fn parse_create_todo_validation_uses_server_message() {
        let body = r#"{"error":"`text` is required","code":"VALIDATION_ERROR"}"#;
        let err = client().parse_create_todo(response(422, body)).unwrap_err();
        match err {
            ApiError::Validation(message) => assert_eq!(message, "`text` is required"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn parse_create_todo_wrong_status() {
        let err = client()
            .parse_create_todo(response(503, "store down"))
            .unwrap_err();
        assert!(matches!(err, ApiError::HttpError { status: 503, .. }));
    }

    #[test]
    fn parse_update_completion_success() {
        let body = format!(r#"{{"id":"{ID}","text":"Walk","completed":true}}"#);
        let todo = client()
            .parse_update_completion(response(200, &body))
            .unwrap()
            .unwrap();
        assert!(todo.completed);
        assert_eq!(todo.text, "Walk");
    }

    #[test]
    fn parse_update_completion_404_is_empty() {
        let body = r#"{"error":"todo with id x not found","code":"NOT_FOUND"}"#;
        let result = client().parse_update_completion(response(404, body)).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn parse_update_completion_null_body_is_empty() {
        let result = client().parse_update_completion(response(200, "null")).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn parse_delete_todo_success() {
        let confirmation = client()
            .parse_delete_todo(response(200, r#"{"message":"Todo deleted"}"#))
            .unwrap();
        assert_eq!(confirmation.message, "Todo deleted");
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let client = TodoClient::new("http://localhost:5000/");
        let req = client.build_list_todos();
        assert_eq!(req.path, "http://localhost:5000/todos");
    }
}
