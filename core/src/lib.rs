//! Client core for the todo service.
//!
//! # Overview
//! - `TodoClient` builds `HttpRequest` values and parses `HttpResponse`
//!   values without touching the network (host-does-IO pattern).
//! - `Transport` executes a request; `UreqTransport` does it over blocking
//!   HTTP.
//! - `TodoApp` is the state container a frontend drives: it holds the last
//!   fetched list and the pending input, and resynchronizes with a full
//!   refresh after every mutation.
//!
//! # Design
//! DTOs are defined independently from the server crate; the integration
//! test and `test-vectors/` catch schema drift.

pub mod app;
pub mod client;
pub mod error;
pub mod http;
pub mod transport;
pub mod types;

pub use app::{Action, Applied, TodoApp};
pub use client::TodoClient;
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use transport::{Transport, UreqTransport};
pub use types::{CreateTodo, DeleteConfirmation, Todo, UpdateCompletion};
