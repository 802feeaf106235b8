//! The four `/todos` endpoints.
//!
//! Each handler makes exactly one repository call and returns its result as
//! JSON. There is no business logic beyond body validation: the client
//! computes the new `completed` value, the store assigns ids.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, instrument};

use crate::error::ServiceError;
use crate::repository::TodoRepository;
use crate::todo::{CreateTodo, DeleteConfirmation, Todo, TodoId, UpdateCompletion};

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub todos: TodoRepository,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/todos", get(list_todos).post(create_todo))
        .route("/todos/{id}", put(update_todo).delete(delete_todo))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

#[instrument(skip(state))]
async fn list_todos(State(state): State<AppState>) -> Result<Json<Vec<Todo>>, ServiceError> {
    Ok(Json(state.todos.list().await?))
}

#[instrument(skip(state, body))]
async fn create_todo(
    State(state): State<AppState>,
    body: Result<Json<CreateTodo>, JsonRejection>,
) -> Result<(StatusCode, Json<Todo>), ServiceError> {
    let Json(input) = body?;
    let todo = state.todos.create(input.into_text()?).await?;
    info!(id = %todo.id, "todo created");
    Ok((StatusCode::CREATED, Json(todo)))
}

#[instrument(skip(state, body))]
async fn update_todo(
    State(state): State<AppState>,
    Path(id): Path<TodoId>,
    body: Result<Json<UpdateCompletion>, JsonRejection>,
) -> Result<Json<Todo>, ServiceError> {
    let Json(input) = body?;
    let completed = input.into_completed()?;
    match state.todos.set_completed(&id, completed).await? {
        Some(todo) => {
            info!(id = %todo.id, completed, "todo completion set");
            Ok(Json(todo))
        }
        None => Err(ServiceError::NotFound(id)),
    }
}

/// Always confirms; a missing id is not an error.
#[instrument(skip(state))]
async fn delete_todo(
    State(state): State<AppState>,
    Path(id): Path<TodoId>,
) -> Result<Json<DeleteConfirmation>, ServiceError> {
    let removed = state.todos.delete(&id).await?;
    info!(%id, removed, "todo delete handled");
    Ok(Json(DeleteConfirmation::deleted()))
}
