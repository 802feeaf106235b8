//! Plain-text rendering of the todo list.

use std::fmt::Write;

use todo_core::Todo;

/// One numbered line per todo, `[x]` marking completed ones.
pub fn render(todos: &[Todo]) -> String {
    if todos.is_empty() {
        return "(no todos)\n".to_string();
    }
    let mut out = String::new();
    for (n, todo) in todos.iter().enumerate() {
        let mark = if todo.completed { 'x' } else { ' ' };
        let _ = writeln!(out, "{:>2}. [{mark}] {}", n + 1, todo.text);
    }
    out
}
