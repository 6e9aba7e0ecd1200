/// Kanban request handlers
///
/// Each handler is a free function over a `&dyn Transaction`, grouped by
/// resource:
///
/// - `boards`: list/create/update (column reconciliation)/delete boards
/// - `columns`: columns of a board with their tasks
/// - `tasks`: task queries and mutations
/// - `subtasks`: subtask status toggling
///
/// [`KanbanService`] wraps every handler in its own store transaction: begin,
/// run, commit on success. On error the transaction is dropped, which discards
/// any writes already issued.
///
/// # Example
///
/// ```no_run
/// use kanban_shared::models::{CreateBoard, NewColumn};
/// use kanban_shared::service::KanbanService;
/// use kanban_shared::store::MemoryStore;
/// use std::sync::Arc;
///
/// # async fn example() -> Result<(), kanban_shared::service::KanbanError> {
/// let service = KanbanService::new(Arc::new(MemoryStore::new()));
///
/// service
///     .create_board(CreateBoard {
///         name: "Platform Launch".to_string(),
///         user: "user_1".to_string(),
///         columns: vec![NewColumn { name: "Todo".to_string() }],
///     })
///     .await?;
///
/// let boards = service.list_boards("user_1").await?;
/// assert_eq!(boards[0].columns.len(), 1);
/// # Ok(())
/// # }
/// ```

pub mod boards;
pub mod columns;
pub mod subtasks;
pub mod tasks;

pub use boards::{plan_columns, BoardWithColumns, ColumnPlan, ColumnRename};
pub use columns::ColumnWithTasks;
pub use tasks::{TaskDetail, TaskWithSubtasks};

use crate::models::{CreateBoard, CreateTask, UpdateBoard};
use crate::store::{Id, Store, StoreError};
use std::sync::Arc;

/// Handler result type alias
pub type KanbanResult<T> = Result<T, KanbanError>;

/// Handler error types
#[derive(Debug, thiserror::Error)]
pub enum KanbanError {
    /// A referenced board, column, task or subtask does not exist
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: Id },

    /// Request is well-formed but violates a cross-record invariant
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Store failure, propagated unchanged
    #[error(transparent)]
    Store(StoreError),
}

impl KanbanError {
    pub fn not_found(entity: &'static str, id: &Id) -> Self {
        KanbanError::NotFound {
            entity,
            id: id.clone(),
        }
    }
}

impl From<StoreError> for KanbanError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { collection, id } => KanbanError::NotFound {
                entity: collection.entity(),
                id,
            },
            other => KanbanError::Store(other),
        }
    }
}

/// Transactional entry point for every kanban operation
#[derive(Clone)]
pub struct KanbanService {
    store: Arc<dyn Store>,
}

impl KanbanService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Underlying store
    pub fn store(&self) -> &Arc<dyn Store> {
        &self.store
    }

    /// Boards owned by `user`, each with its columns
    pub async fn list_boards(&self, user: &str) -> KanbanResult<Vec<BoardWithColumns>> {
        let tx = self.store.begin().await?;
        let boards = boards::list_boards(tx.as_ref(), user).await?;
        tx.commit().await?;
        Ok(boards)
    }

    /// Creates a board with its initial columns; returns the board ID
    pub async fn create_board(&self, input: CreateBoard) -> KanbanResult<Id> {
        let tx = self.store.begin().await?;
        let board_id = boards::create_board(tx.as_ref(), input).await?;
        tx.commit().await?;
        Ok(board_id)
    }

    /// Updates a board and reconciles its columns
    pub async fn update_board(&self, board_id: &Id, input: UpdateBoard) -> KanbanResult<()> {
        let tx = self.store.begin().await?;
        boards::update_board(tx.as_ref(), board_id, input).await?;
        tx.commit().await?;
        Ok(())
    }

    /// Deletes a board and everything under it
    pub async fn delete_board(&self, board_id: &Id) -> KanbanResult<()> {
        let tx = self.store.begin().await?;
        boards::delete_board(tx.as_ref(), board_id).await?;
        tx.commit().await?;
        Ok(())
    }

    /// Columns of a board, each with its tasks
    pub async fn list_columns(&self, board_id: &Id) -> KanbanResult<Vec<ColumnWithTasks>> {
        let tx = self.store.begin().await?;
        let columns = columns::list_columns(tx.as_ref(), board_id).await?;
        tx.commit().await?;
        Ok(columns)
    }

    /// Tasks of a column, each with its subtasks and the column name
    pub async fn list_tasks(&self, column_id: &Id) -> KanbanResult<Vec<TaskWithSubtasks>> {
        let tx = self.store.begin().await?;
        let tasks = tasks::list_tasks(tx.as_ref(), column_id).await?;
        tx.commit().await?;
        Ok(tasks)
    }

    /// One task with its subtasks and parent column
    pub async fn get_task(&self, task_id: &Id) -> KanbanResult<TaskDetail> {
        let tx = self.store.begin().await?;
        let task = tasks::get_task(tx.as_ref(), task_id).await?;
        tx.commit().await?;
        Ok(task)
    }

    /// Creates a task with its initial subtasks; returns the task ID
    pub async fn create_task(&self, input: CreateTask) -> KanbanResult<Id> {
        let tx = self.store.begin().await?;
        let task_id = tasks::create_task(tx.as_ref(), input).await?;
        tx.commit().await?;
        Ok(task_id)
    }

    /// Moves a task to another column of its board
    pub async fn update_task_column(&self, task_id: &Id, column_id: &Id) -> KanbanResult<()> {
        let tx = self.store.begin().await?;
        tasks::update_task_column(tx.as_ref(), task_id, column_id).await?;
        tx.commit().await?;
        Ok(())
    }

    /// Deletes a task and its subtasks
    pub async fn delete_task(&self, task_id: &Id) -> KanbanResult<()> {
        let tx = self.store.begin().await?;
        tasks::delete_task(tx.as_ref(), task_id).await?;
        tx.commit().await?;
        Ok(())
    }

    /// Sets a subtask's completion flag
    pub async fn update_subtask_status(
        &self,
        subtask_id: &Id,
        is_completed: bool,
    ) -> KanbanResult<()> {
        let tx = self.store.begin().await?;
        subtasks::update_subtask_status(tx.as_ref(), subtask_id, is_completed).await?;
        tx.commit().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Collection;

    #[test]
    fn test_store_not_found_maps_to_entity() {
        let err = KanbanError::from(StoreError::NotFound {
            collection: Collection::Subtasks,
            id: Id::new("s9"),
        });
        assert!(matches!(err, KanbanError::NotFound { entity: "Subtask", .. }));
        assert_eq!(err.to_string(), "Subtask not found: s9");
    }

    #[test]
    fn test_other_store_errors_pass_through() {
        let err = KanbanError::from(StoreError::Serialization("bad".to_string()));
        assert!(matches!(err, KanbanError::Store(StoreError::Serialization(_))));
        assert_eq!(err.to_string(), "Serialization error: bad");
    }
}
