/// In-memory document store
///
/// Keeps every collection in process memory. Only one transaction is open at a
/// time: [`MemoryStore::begin`] waits on an async mutex and holds it until the
/// transaction is committed or dropped, which makes transactions serializable.
/// A collection is copied into the transaction on its first write, and the
/// copies replace their committed counterparts on commit, so an abandoned
/// transaction leaves no trace.
///
/// Data is lost when the process exits.
///
/// # Example
///
/// ```no_run
/// use kanban_shared::store::{Collection, MemoryStore, Store};
/// use serde_json::json;
///
/// # async fn example() -> Result<(), kanban_shared::store::StoreError> {
/// let store = MemoryStore::new();
///
/// let tx = store.begin().await?;
/// let fields = kanban_shared::store::to_fields(&json!({"name": "Roadmap"}))?;
/// tx.insert(Collection::Boards, fields).await?;
/// tx.commit().await?;
///
/// assert_eq!(store.count(Collection::Boards).await, 1);
/// # Ok(())
/// # }
/// ```

use super::{Collection, Document, Fields, Id, Index, Store, StoreError, StoreResult, Transaction};
use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use tracing::trace;

/// Documents per collection, in insertion order
#[derive(Debug, Default)]
struct Tables {
    collections: HashMap<Collection, Vec<Document>>,
}

impl Tables {
    fn documents(&self, collection: Collection) -> &[Document] {
        self.collections
            .get(&collection)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

/// In-memory store for development and tests
#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<AsyncMutex<Tables>>,
}

impl MemoryStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of committed documents in a collection
    pub async fn count(&self, collection: Collection) -> usize {
        self.state.lock().await.documents(collection).len()
    }

    async fn transaction(&self) -> MemoryTransaction {
        MemoryTransaction {
            committed: self.state.clone().lock_owned().await,
            written: Mutex::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl Store for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn begin(&self) -> StoreResult<Box<dyn Transaction>> {
        Ok(Box::new(self.transaction().await))
    }

    async fn health_check(&self) -> StoreResult<()> {
        Ok(())
    }
}

/// Transaction over a [`MemoryStore`]
pub struct MemoryTransaction {
    /// Committed state; holding the guard excludes other transactions
    committed: OwnedMutexGuard<Tables>,

    /// Collections written by this transaction, copied on first write
    written: Mutex<HashMap<Collection, Vec<Document>>>,
}

impl MemoryTransaction {
    fn written(&self) -> MutexGuard<'_, HashMap<Collection, Vec<Document>>> {
        self.written.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Runs `f` over a collection as this transaction sees it
    fn read<R>(&self, collection: Collection, f: impl FnOnce(&[Document]) -> R) -> R {
        let written = self.written();
        match written.get(&collection) {
            Some(documents) => f(documents),
            None => f(self.committed.documents(collection)),
        }
    }

    /// Runs `f` over this transaction's copy of a collection
    fn write<R>(&self, collection: Collection, f: impl FnOnce(&mut Vec<Document>) -> R) -> R {
        let mut written = self.written();
        let documents = written
            .entry(collection)
            .or_insert_with(|| self.committed.documents(collection).to_vec());
        f(documents)
    }
}

#[async_trait]
impl Transaction for MemoryTransaction {
    async fn query_by_index(&self, index: Index, value: &str) -> StoreResult<Vec<Document>> {
        let documents: Vec<Document> = self.read(index.collection(), |documents| {
            documents
                .iter()
                .filter(|doc| doc.field_str(index.field()) == Some(value))
                .cloned()
                .collect()
        });

        trace!(
            collection = %index.collection(),
            index = index.name(),
            value,
            matched = documents.len(),
            "Index query"
        );
        Ok(documents)
    }

    async fn get(&self, collection: Collection, id: &Id) -> StoreResult<Option<Document>> {
        Ok(self.read(collection, |documents| {
            documents.iter().find(|doc| &doc.id == id).cloned()
        }))
    }

    async fn insert(&self, collection: Collection, fields: Fields) -> StoreResult<Id> {
        let id = Id::generate();
        self.write(collection, |documents| {
            documents.push(Document {
                id: id.clone(),
                creation_time: Utc::now(),
                fields,
            })
        });

        trace!(collection = %collection, id = %id, "Inserted document");
        Ok(id)
    }

    async fn patch(&self, collection: Collection, id: &Id, fields: Fields) -> StoreResult<()> {
        if self.get(collection, id).await?.is_none() {
            return Err(StoreError::NotFound {
                collection,
                id: id.clone(),
            });
        }

        self.write(collection, |documents| {
            if let Some(doc) = documents.iter_mut().find(|doc| &doc.id == id) {
                for (key, value) in fields {
                    if value == JsonValue::Null {
                        doc.fields.remove(&key);
                    } else {
                        doc.fields.insert(key, value);
                    }
                }
            }
        });
        Ok(())
    }

    async fn delete(&self, collection: Collection, id: &Id) -> StoreResult<()> {
        let position = self
            .read(collection, |documents| {
                documents.iter().position(|doc| &doc.id == id)
            })
            .ok_or_else(|| StoreError::NotFound {
                collection,
                id: id.clone(),
            })?;

        self.write(collection, |documents| documents.remove(position));
        Ok(())
    }

    async fn commit(self: Box<Self>) -> StoreResult<()> {
        let MemoryTransaction {
            mut committed,
            written,
        } = *self;
        let written = written.into_inner().unwrap_or_else(PoisonError::into_inner);

        trace!(collections = written.len(), "Committing written collections");
        committed.collections.extend(written);
        Ok(())
    }
}
