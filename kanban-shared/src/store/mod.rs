/// Document store abstraction
///
/// Every board, column, task and subtask lives as a document in one of four
/// collections. Handlers never talk to a database directly: they open a
/// [`Transaction`] through a [`Store`], issue indexed queries, point lookups,
/// inserts, patches and deletes against it, and commit once at the end.
///
/// # Backends
///
/// - [`MemoryStore`]: in-process, serializable by construction. Used for
///   development and tests.
/// - [`PgStore`]: PostgreSQL via sqlx, one JSONB `documents` table.
///
/// # Transactions
///
/// All reads and writes issued through one transaction observe a consistent
/// snapshot and become visible together on [`Transaction::commit`]. Dropping a
/// transaction without committing discards its writes.
///
/// Transaction methods take `&self`, so independent calls may be issued
/// concurrently (fan-out) and joined:
///
/// ```no_run
/// use futures::future::try_join_all;
/// use kanban_shared::store::{Index, MemoryStore, Store};
///
/// # async fn example() -> Result<(), kanban_shared::store::StoreError> {
/// let store = MemoryStore::new();
/// let tx = store.begin().await?;
/// let per_board = try_join_all(
///     ["board-a", "board-b"]
///         .iter()
///         .map(|board| tx.query_by_index(Index::ColumnsByBoard, board)),
/// )
/// .await?;
/// tx.commit().await?;
/// # Ok(())
/// # }
/// ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use std::fmt;
use uuid::Uuid;

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// User fields of a document (everything except `_id` and `_creationTime`)
pub type Fields = Map<String, JsonValue>;

/// Store result type alias
pub type StoreResult<T> = Result<T, StoreError>;

/// Store error types
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Patch or delete targeted a document that does not exist
    #[error("Document not found in {collection}: {id}")]
    NotFound { collection: Collection, id: Id },

    /// Document could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Underlying database failure
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serialization(err.to_string())
    }
}

/// Opaque document identifier assigned by the store at insert time
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Id(String);

impl Id {
    /// Wraps an identifier received from a caller
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Generates a fresh identifier for a new document
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for Id {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for Id {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Document collections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Collection {
    Boards,
    Columns,
    Tasks,
    Subtasks,
}

impl Collection {
    /// Collection name as persisted
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Boards => "boards",
            Collection::Columns => "columns",
            Collection::Tasks => "tasks",
            Collection::Subtasks => "subtasks",
        }
    }

    /// Singular entity name used in error messages
    pub fn entity(&self) -> &'static str {
        match self {
            Collection::Boards => "Board",
            Collection::Columns => "Column",
            Collection::Tasks => "Task",
            Collection::Subtasks => "Subtask",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Store-maintained secondary indexes
///
/// Each index matches documents of one collection on one string field.
/// Results come back in creation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Index {
    /// `boards.by_user`
    BoardsByUser,
    /// `columns.by_board`
    ColumnsByBoard,
    /// `tasks.by_column`
    TasksByColumn,
    /// `tasks.by_board`
    TasksByBoard,
    /// `subtasks.by_task`
    SubtasksByTask,
}

impl Index {
    pub fn collection(&self) -> Collection {
        match self {
            Index::BoardsByUser => Collection::Boards,
            Index::ColumnsByBoard => Collection::Columns,
            Index::TasksByColumn | Index::TasksByBoard => Collection::Tasks,
            Index::SubtasksByTask => Collection::Subtasks,
        }
    }

    /// Document field matched by this index
    pub fn field(&self) -> &'static str {
        match self {
            Index::BoardsByUser => "user",
            Index::ColumnsByBoard | Index::TasksByBoard => "boardId",
            Index::TasksByColumn => "columnId",
            Index::SubtasksByTask => "taskId",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Index::BoardsByUser => "by_user",
            Index::ColumnsByBoard | Index::TasksByBoard => "by_board",
            Index::TasksByColumn => "by_column",
            Index::SubtasksByTask => "by_task",
        }
    }
}

/// A stored document
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// System identifier (`_id`)
    pub id: Id,

    /// System creation timestamp (`_creationTime`)
    pub creation_time: DateTime<Utc>,

    /// User fields
    pub fields: Fields,
}

impl Document {
    /// Returns a string field, if present
    pub fn field_str(&self, field: &str) -> Option<&str> {
        self.fields.get(field).and_then(JsonValue::as_str)
    }

    /// Decodes the document into a typed record
    ///
    /// The system fields are exposed to the record as `_id` and `_creationTime`.
    pub fn decode<T: DeserializeOwned>(self) -> StoreResult<T> {
        let mut object = self.fields;
        object.insert("_id".to_string(), JsonValue::String(self.id.0));
        object.insert(
            "_creationTime".to_string(),
            serde_json::to_value(self.creation_time)?,
        );
        Ok(serde_json::from_value(JsonValue::Object(object))?)
    }
}

/// Encodes a serializable value into document fields
///
/// `None` options should be skipped by the value's `Serialize` impl; the store
/// does not interpret nulls.
pub fn to_fields<T: Serialize>(value: &T) -> StoreResult<Fields> {
    match serde_json::to_value(value)? {
        JsonValue::Object(fields) => Ok(fields),
        other => Err(StoreError::Serialization(format!(
            "expected an object, got {}",
            other
        ))),
    }
}

/// One unit of atomic work against the store
#[async_trait]
pub trait Transaction: Send + Sync {
    /// Returns every document of the index's collection whose indexed field equals `value`
    async fn query_by_index(&self, index: Index, value: &str) -> StoreResult<Vec<Document>>;

    /// Point lookup; `None` if no such document exists
    async fn get(&self, collection: Collection, id: &Id) -> StoreResult<Option<Document>>;

    /// Inserts a new document and returns its identifier
    async fn insert(&self, collection: Collection, fields: Fields) -> StoreResult<Id>;

    /// Merges `fields` into an existing document
    ///
    /// # Errors
    ///
    /// [`StoreError::NotFound`] if the document does not exist.
    async fn patch(&self, collection: Collection, id: &Id, fields: Fields) -> StoreResult<()>;

    /// Removes a document
    ///
    /// # Errors
    ///
    /// [`StoreError::NotFound`] if the document does not exist.
    async fn delete(&self, collection: Collection, id: &Id) -> StoreResult<()>;

    /// Makes every write of this transaction visible atomically
    async fn commit(self: Box<Self>) -> StoreResult<()>;
}

/// Transactional document store
#[async_trait]
pub trait Store: Send + Sync + 'static {
    /// Backend name reported by health checks
    fn backend(&self) -> &'static str;

    /// Opens a new transaction
    async fn begin(&self) -> StoreResult<Box<dyn Transaction>>;

    /// Verifies the backend is reachable
    async fn health_check(&self) -> StoreResult<()>;
}
