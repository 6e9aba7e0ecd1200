/// Typed records for the four kanban collections
///
/// Each model wraps the raw [`crate::store::Document`] of its collection and
/// offers the store operations the handlers need.
///
/// # Models
///
/// - `board`: top-level container owned by a user
/// - `column`: named lane within a board, plus the column-update input types
/// - `task`: unit of work within a column
/// - `subtask`: checklist item within a task
///
/// # Example
///
/// ```no_run
/// use kanban_shared::models::{board::Board, column::Column};
/// use kanban_shared::store::{MemoryStore, Store};
///
/// # async fn example() -> Result<(), kanban_shared::store::StoreError> {
/// let store = MemoryStore::new();
/// let tx = store.begin().await?;
///
/// let board_id = Board::create(tx.as_ref(), "Roadmap", Some("user_1")).await?;
/// Column::create(tx.as_ref(), &board_id, "Todo").await?;
///
/// tx.commit().await?;
/// # Ok(())
/// # }
/// ```

pub mod board;
pub mod column;
pub mod subtask;
pub mod task;

pub use board::{Board, CreateBoard, UpdateBoard};
pub use column::{Column, ColumnDescriptor, ColumnInput, NewColumn, NEW_COLUMN_ID};
pub use subtask::{NewSubtask, Subtask, UpdateSubtaskStatus};
pub use task::{CreateTask, Task, UpdateTaskColumn};
