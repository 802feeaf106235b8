//! JSON API over a single list of todos.
//!
//! # Overview
//! Four endpoints (list, create, set completion, delete) over one `todos`
//! collection in a schema-less document store. Each request performs exactly
//! one store call; there is no locking beyond the store's own, so concurrent
//! updates to the same todo are last-write-wins.
//!
//! # Layout
//! - `store`: untyped documents, store-assigned ids, optional snapshot file.
//! - `repository`: the typed `Todo` view of the `todos` collection.
//! - `routes`: axum handlers and the router.
//! - `error`: status and body for every failure.

pub mod config;
pub mod error;
pub mod repository;
pub mod routes;
pub mod store;
pub mod todo;

use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;

pub use config::ServerConfig;
pub use error::{ErrorBody, ServiceError};
pub use repository::TodoRepository;
pub use routes::AppState;
pub use store::{DocumentStore, MemoryStore, StoreError};
pub use todo::{DeleteConfirmation, Todo, TodoId};

/// Router over a fresh in-memory store.
pub fn app() -> Router {
    app_with_store(Arc::new(MemoryStore::new()))
}

pub fn app_with_store(store: Arc<dyn DocumentStore>) -> Router {
    routes::router(AppState {
        todos: TodoRepository::new(store),
    })
}

/// Serve the in-memory app on `listener` until the process ends.
pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    serve(listener, app()).await
}

pub async fn serve(listener: TcpListener, app: Router) -> Result<(), std::io::Error> {
    axum::serve(listener, app).await
}
