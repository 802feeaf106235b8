//! Typed access to the `todos` collection.
//!
//! # Design
//! The document store is schema-less; this module is the only place that
//! knows the shape of a todo document. New documents are written with
//! exactly `text` and `completed: false`, updates patch only `completed`,
//! and every document read back is decoded strictly into a `Todo`.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, instrument};

use crate::store::{Document, DocumentStore, StoreError, ID_FIELD};
use crate::todo::{Todo, TodoId};

/// Collection holding todo documents.
pub const COLLECTION: &str = "todos";

const TEXT_FIELD: &str = "text";
const COMPLETED_FIELD: &str = "completed";

/// Data-access shim over a shared `DocumentStore`.
#[derive(Clone)]
pub struct TodoRepository {
    store: Arc<dyn DocumentStore>,
}

impl TodoRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Todo>, StoreError> {
        let docs = self.store.find_all(COLLECTION).await?;
        debug!(count = docs.len(), "listed todos");
        docs.into_iter().map(decode).collect()
    }

    #[instrument(skip(self, text))]
    pub async fn create(&self, text: String) -> Result<Todo, StoreError> {
        let mut fields = Document::new();
        fields.insert(TEXT_FIELD.to_owned(), Value::String(text));
        fields.insert(COMPLETED_FIELD.to_owned(), Value::Bool(false));
        let todo = decode(self.store.insert(COLLECTION, fields).await?)?;
        debug!(id = %todo.id, "created todo");
        Ok(todo)
    }

    /// Replace the completion flag of `id`. `None` means no such todo.
    #[instrument(skip(self, id), fields(id = %id))]
    pub async fn set_completed(
        &self,
        id: &TodoId,
        completed: bool,
    ) -> Result<Option<Todo>, StoreError> {
        let mut patch = Document::new();
        patch.insert(COMPLETED_FIELD.to_owned(), Value::Bool(completed));
        self.store
            .find_by_id_and_update(COLLECTION, id.as_str(), patch)
            .await?
            .map(decode)
            .transpose()
    }

    /// Remove `id`, reporting whether a todo was actually deleted.
    #[instrument(skip(self, id), fields(id = %id))]
    pub async fn delete(&self, id: &TodoId) -> Result<bool, StoreError> {
        let removed = self
            .store
            .find_by_id_and_delete(COLLECTION, id.as_str())
            .await?;
        Ok(removed.is_some())
    }
}

fn decode(doc: Document) -> Result<Todo, StoreError> {
    let id = match doc.get(ID_FIELD) {
        Some(Value::String(id)) => id.clone(),
        _ => return Err(malformed("<unknown>", ID_FIELD, "string")),
    };
    let text = match doc.get(TEXT_FIELD) {
        Some(Value::String(text)) => text.clone(),
        _ => return Err(malformed(&id, TEXT_FIELD, "string")),
    };
    let completed = match doc.get(COMPLETED_FIELD) {
        Some(Value::Bool(completed)) => *completed,
        _ => return Err(malformed(&id, COMPLETED_FIELD, "boolean")),
    };
    Ok(Todo {
        id: TodoId::from(id),
        text,
        completed,
    })
}

fn malformed(id: &str, field: &str, expected: &str) -> StoreError {
    StoreError::Malformed {
        id: id.to_owned(),
        reason: format!("`{field}` is not a {expected}"),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::store::MemoryStore;

    fn repo() -> (TodoRepository, MemoryStore) {
        let store = MemoryStore::new();
        (TodoRepository::new(Arc::new(store.clone())), store)
    }

    #[tokio::test]
    async fn create_starts_incomplete_with_fresh_id() {
        let (repo, _) = repo();
        let a = repo.create("buy milk".into()).await.unwrap();
        let b = repo.create("buy milk".into()).await.unwrap();
        assert!(!a.completed);
        assert_eq!(a.text, "buy milk");
        assert!(!a.id.as_str().is_empty());
        assert_ne!(a.id, b.id);
    }

    #[tokio::test]
    async fn created_document_has_exactly_three_fields() {
        let (repo, store) = repo();
        repo.create("shape".into()).await.unwrap();
        let docs = store.find_all(COLLECTION).await.unwrap();
        let mut keys: Vec<&str> = docs[0].keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(keys, vec!["_id", "completed", "text"]);
    }

    #[tokio::test]
    async fn set_completed_keeps_text() {
        let (repo, _) = repo();
        let created = repo.create("walk dog".into()).await.unwrap();

        let updated = repo.set_completed(&created.id, true).await.unwrap().unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.text, "walk dog");
        assert!(updated.completed);

        let reverted = repo.set_completed(&created.id, false).await.unwrap().unwrap();
        assert!(!reverted.completed);
    }

    #[tokio::test]
    async fn set_completed_on_unknown_id_is_none() {
        let (repo, _) = repo();
        let missing = repo
            .set_completed(&TodoId::from("not-an-id"), true)
            .await
            .unwrap();
        assert!(missing.is_none());
        assert!(repo.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn delete_reports_whether_removed() {
        let (repo, _) = repo();
        let created = repo.create("once".into()).await.unwrap();
        assert!(repo.delete(&created.id).await.unwrap());
        assert!(!repo.delete(&created.id).await.unwrap());
        assert!(repo.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn list_counts_created_minus_deleted() {
        let (repo, _) = repo();
        let mut ids = Vec::new();
        for n in 0..5 {
            ids.push(repo.create(format!("todo {n}")).await.unwrap().id);
        }
        repo.delete(&ids[1]).await.unwrap();
        repo.delete(&ids[3]).await.unwrap();
        repo.delete(&ids[3]).await.unwrap();

        let listed = repo.list().await.unwrap();
        assert_eq!(listed.len(), 3);
        assert!(listed.iter().all(|t| t.id != ids[1] && t.id != ids[3]));
    }

    #[tokio::test]
    async fn list_rejects_malformed_documents() {
        let (repo, store) = repo();
        let fields = match json!({"text": 42, "completed": false}) {
            Value::Object(map) => map,
            _ => unreachable!(),
        };
        store.insert(COLLECTION, fields).await.unwrap();
        let err = repo.list().await.unwrap_err();
        assert!(matches!(err, StoreError::Malformed { .. }));
    }
}
