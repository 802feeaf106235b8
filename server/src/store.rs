//! Schema-less document storage.
//!
//! # Design
//! Documents are JSON objects grouped into named collections. The store owns
//! identifier assignment: every inserted document receives a fresh `_id`, and
//! no later write can change it. Field types are not checked here; the typed
//! view of a collection lives in `repository`.
//!
//! `MemoryStore` can be backed by a snapshot file. Each write is staged on a
//! copy of the collections, flushed to disk, and only then published, so the
//! in-memory state never runs ahead of the file. A write that changes nothing
//! (an update or delete of a missing id) never touches the file.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

/// Field holding the store-assigned identifier of every document.
pub const ID_FIELD: &str = "_id";

/// A stored document: an untyped JSON object.
pub type Document = Map<String, Value>;

type Collection = HashMap<String, Document>;
type Collections = HashMap<String, Collection>;

/// Failures raised by a `DocumentStore`.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing file could not be read or written.
    #[error("store unavailable at {}: {source}", .path.display())]
    Unavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The snapshot could not be encoded or decoded as JSON.
    #[error("snapshot encoding failed: {0}")]
    Encoding(#[from] serde_json::Error),

    /// A document does not have the shape its reader requires.
    #[error("document {id} is malformed: {reason}")]
    Malformed { id: String, reason: String },
}

/// Collection-oriented document persistence.
///
/// Every method is a single store call. No operation spans more than one
/// document, and concurrent writers to the same document race with
/// last-write-wins semantics.
#[async_trait]
pub trait DocumentStore: Send + Sync + 'static {
    /// All documents of `collection` in store-native (unspecified) order.
    async fn find_all(&self, collection: &str) -> Result<Vec<Document>, StoreError>;

    /// Store `fields` as a new document and return it with its assigned `_id`.
    /// A caller-supplied `_id` is discarded.
    async fn insert(&self, collection: &str, fields: Document) -> Result<Document, StoreError>;

    /// Shallow-merge `patch` into the document `id`, returning the updated
    /// document, or `None` if there is no such document. `_id` in a patch is
    /// ignored.
    async fn find_by_id_and_update(
        &self,
        collection: &str,
        id: &str,
        patch: Document,
    ) -> Result<Option<Document>, StoreError>;

    /// Remove the document `id`, returning it if it existed.
    async fn find_by_id_and_delete(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<Option<Document>, StoreError>;
}

/// In-process document store with an optional JSON snapshot file.
#[derive(Clone, Default)]
pub struct MemoryStore {
    collections: Arc<RwLock<Collections>>,
    snapshot: Option<PathBuf>,
}

impl MemoryStore {
    /// An empty store that lives only as long as the process.
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a store persisted at `path`. A missing file yields an empty store;
    /// the file is created on the first write.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let collections = match tokio::fs::read(&path).await {
            Ok(bytes) => decode_snapshot(&bytes)?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => Collections::new(),
            Err(source) => return Err(StoreError::Unavailable { path, source }),
        };
        let documents: usize = collections.values().map(HashMap::len).sum();
        info!(path = %path.display(), documents, "opened document snapshot");
        Ok(Self {
            collections: Arc::new(RwLock::new(collections)),
            snapshot: Some(path),
        })
    }

    /// Run `mutate` under the write lock and publish its effect. `mutate`
    /// reports whether it changed anything; unchanged writes skip the snapshot.
    async fn write<F, R>(&self, mutate: F) -> Result<R, StoreError>
    where
        F: FnOnce(&mut Collections) -> (R, bool) + Send,
        R: Send,
    {
        let mut guard = self.collections.write().await;
        let Some(path) = &self.snapshot else {
            return Ok(mutate(&mut *guard).0);
        };
        let mut staged = guard.clone();
        let (out, changed) = mutate(&mut staged);
        if changed {
            write_snapshot(path, &staged).await?;
            *guard = staged;
        }
        Ok(out)
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn find_all(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .map(|docs| docs.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn insert(&self, collection: &str, mut fields: Document) -> Result<Document, StoreError> {
        let id = Uuid::new_v4().simple().to_string();
        fields.insert(ID_FIELD.to_owned(), Value::String(id.clone()));
        let collection = collection.to_owned();
        self.write(move |collections| {
            collections
                .entry(collection)
                .or_default()
                .insert(id, fields.clone());
            (fields, true)
        })
        .await
    }

    async fn find_by_id_and_update(
        &self,
        collection: &str,
        id: &str,
        mut patch: Document,
    ) -> Result<Option<Document>, StoreError> {
        patch.remove(ID_FIELD);
        self.write(move |collections| {
            let updated = collections
                .get_mut(collection)
                .and_then(|docs| docs.get_mut(id))
                .map(|doc| {
                    doc.extend(patch);
                    doc.clone()
                });
            let changed = updated.is_some();
            (updated, changed)
        })
        .await
    }

    async fn find_by_id_and_delete(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<Option<Document>, StoreError> {
        self.write(move |collections| {
            let removed = collections
                .get_mut(collection)
                .and_then(|docs| docs.remove(id));
            let changed = removed.is_some();
            (removed, changed)
        })
        .await
    }
}

/// On-disk form: collection name to an array of documents.
fn decode_snapshot(bytes: &[u8]) -> Result<Collections, StoreError> {
    let raw: HashMap<String, Vec<Document>> = serde_json::from_slice(bytes)?;
    let mut collections = Collections::with_capacity(raw.len());
    for (name, docs) in raw {
        let mut collection = Collection::with_capacity(docs.len());
        for doc in docs {
            let id = match doc.get(ID_FIELD) {
                Some(Value::String(id)) => id.clone(),
                _ => {
                    return Err(StoreError::Malformed {
                        id: format!("<{name}>"),
                        reason: format!("missing string `{ID_FIELD}`"),
                    })
                }
            };
            collection.insert(id, doc);
        }
        collections.insert(name, collection);
    }
    Ok(collections)
}

/// Replace the snapshot through a sibling temp file and a rename. The temp
/// file is synced before the rename; the parent directory is synced after it
/// on a best-effort basis.
async fn write_snapshot(path: &Path, collections: &Collections) -> Result<(), StoreError> {
    let raw: HashMap<&str, Vec<&Document>> = collections
        .iter()
        .map(|(name, docs)| (name.as_str(), docs.values().collect()))
        .collect();
    let bytes = serde_json::to_vec_pretty(&raw)?;
    let tmp = temp_path(path);
    let unavailable = |source| StoreError::Unavailable {
        path: path.to_path_buf(),
        source,
    };

    if let Err(e) = write_synced(&tmp, &bytes).await {
        let _ = tokio::fs::remove_file(&tmp).await;
        return Err(unavailable(e));
    }
    if let Err(e) = tokio::fs::rename(&tmp, path).await {
        let _ = tokio::fs::remove_file(&tmp).await;
        return Err(unavailable(e));
    }
    sync_parent_directory(path).await;
    debug!(path = %path.display(), bytes = bytes.len(), "snapshot written");
    Ok(())
}

async fn write_synced(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut file = tokio::fs::File::create(path).await?;
    file.write_all(bytes).await?;
    file.sync_all().await
}

async fn sync_parent_directory(path: &Path) {
    let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) else {
        return;
    };
    // Not every platform can open a directory for syncing.
    if let Ok(dir) = tokio::fs::File::open(parent).await {
        if let Err(e) = dir.sync_all().await {
            debug!(path = %parent.display(), error = %e, "directory sync skipped");
        }
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
