//! Client-side state for a single todo list.
//!
//! # Design
//! `TodoApp` owns the list last fetched from the server and the pending input
//! text. Nothing else mutates them. The only consistency mechanism is the
//! full refresh: after a mutation the app never patches its own list, it
//! replaces it with a fresh `GET /todos`.
//!
//! Mutations and refreshes are separate steps. `apply` sends exactly one
//! mutating request and leaves the list alone; `dispatch` is `apply`
//! followed by `refresh`. A failed request aborts the action before the
//! refresh, and nothing is retried.

use tracing::{debug, info};

use crate::client::TodoClient;
use crate::error::ApiError;
use crate::transport::Transport;
use crate::types::{CreateTodo, Todo};

/// A user-initiated mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Create a todo from the pending input, then clear the input.
    Add,
    /// Flip a todo's completion. `completed` is the state the caller last saw;
    /// the server is sent its negation.
    Toggle { id: String, completed: bool },
    Delete { id: String },
}

/// Whether `apply` put a request on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Sent,
    /// `Add` with empty input: nothing was sent.
    Skipped,
}

pub struct TodoApp<T> {
    client: TodoClient,
    transport: T,
    todos: Vec<Todo>,
    input: String,
}

impl<T: Transport> TodoApp<T> {
    pub fn new(client: TodoClient, transport: T) -> Self {
        Self {
            client,
            transport,
            todos: Vec::new(),
            input: String::new(),
        }
    }

    /// The list as of the last successful refresh, in server order.
    pub fn todos(&self) -> &[Todo] {
        &self.todos
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Replace the local list with the server's. On failure the previous list
    /// is kept.
    pub fn refresh(&mut self) -> Result<(), ApiError> {
        let response = self.transport.execute(self.client.build_list_todos())?;
        self.todos = self.client.parse_list_todos(response)?;
        debug!(count = self.todos.len(), "list refreshed");
        Ok(())
    }

    /// Perform the mutation behind `action` without refreshing.
    pub fn apply(&mut self, action: &Action) -> Result<Applied, ApiError> {
        match action {
            Action::Add => {
                if self.input.is_empty() {
                    return Ok(Applied::Skipped);
                }
                let input = CreateTodo {
                    text: self.input.clone(),
                };
                let response = self.transport.execute(self.client.build_create_todo(&input)?)?;
                let created = self.client.parse_create_todo(response)?;
                info!(id = %created.id, "todo added");
                self.input.clear();
            }
            Action::Toggle { id, completed } => {
                let request = self.client.build_update_completion(id, !completed)?;
                let response = self.transport.execute(request)?;
                match self.client.parse_update_completion(response)? {
                    Some(todo) => info!(id = %todo.id, completed = todo.completed, "todo toggled"),
                    None => debug!(%id, "toggle target no longer exists"),
                }
            }
            Action::Delete { id } => {
                let response = self.transport.execute(self.client.build_delete_todo(id))?;
                let confirmation = self.client.parse_delete_todo(response)?;
                info!(%id, message = %confirmation.message, "todo delete sent");
            }
        }
        Ok(Applied::Sent)
    }

    /// `apply` the action, then refresh if a request was sent.
    pub fn dispatch(&mut self, action: Action) -> Result<Applied, ApiError> {
        let applied = self.apply(&action)?;
        if applied == Applied::Sent {
            self.refresh()?;
        }
        Ok(applied)
    }

    pub fn add(&mut self) -> Result<Applied, ApiError> {
        self.dispatch(Action::Add)
    }

    pub fn toggle(&mut self, id: &str, completed: bool) -> Result<Applied, ApiError> {
        self.dispatch(Action::Toggle {
            id: id.to_owned(),
            completed,
        })
    }

    pub fn delete(&mut self, id: &str) -> Result<Applied, ApiError> {
        self.dispatch(Action::Delete { id: id.to_owned() })
    }
}
