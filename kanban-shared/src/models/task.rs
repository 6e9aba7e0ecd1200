/// Task model and store operations
///
/// A task is a unit of work sitting in one column of a board. `boardId` is
/// denormalized from the column so a whole board's tasks can be read with a
/// single indexed query. A task moves between columns of the same board by
/// patching `columnId`; `boardId` never changes.
///
/// # Indexes
///
/// - `tasks.by_column` on `columnId`
/// - `tasks.by_board` on `boardId`

use crate::models::subtask::NewSubtask;
use crate::store::{to_fields, Collection, Id, Index, StoreResult, Transaction};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Task record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique task ID
    #[serde(rename = "_id")]
    pub id: Id,

    /// When the task was created
    #[serde(rename = "_creationTime")]
    pub creation_time: DateTime<Utc>,

    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Board the task belongs to
    pub board_id: Id,

    /// Column the task currently sits in
    pub column_id: Id,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TaskFields<'a> {
    title: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
    board_id: &'a Id,
    column_id: &'a Id,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TaskColumn<'a> {
    column_id: &'a Id,
}

/// Input for creating a task together with its initial subtasks
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTask {
    #[validate(length(min = 1, max = 255))]
    pub title: String,

    #[serde(default)]
    #[validate(length(max = 2000))]
    pub description: Option<String>,

    pub board_id: Id,

    pub column_id: Id,

    /// Initial checklist, inserted in order
    #[serde(default)]
    #[validate(nested)]
    pub subtasks: Vec<NewSubtask>,
}

/// Input for moving a task to another column
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskColumn {
    #[serde(alias = "newColumnId")]
    pub column_id: Id,
}

impl Task {
    /// Inserts a task (without subtasks) and returns its ID
    pub async fn create(
        tx: &dyn Transaction,
        title: &str,
        description: Option<&str>,
        board_id: &Id,
        column_id: &Id,
    ) -> StoreResult<Id> {
        let fields = to_fields(&TaskFields {
            title,
            description,
            board_id,
            column_id,
        })?;
        tx.insert(Collection::Tasks, fields).await
    }

    /// Finds a task by ID
    pub async fn find_by_id(tx: &dyn Transaction, id: &Id) -> StoreResult<Option<Self>> {
        match tx.get(Collection::Tasks, id).await? {
            Some(doc) => Ok(Some(doc.decode()?)),
            None => Ok(None),
        }
    }

    /// Lists the tasks in a column, in creation order
    pub async fn list_by_column(tx: &dyn Transaction, column_id: &Id) -> StoreResult<Vec<Self>> {
        tx.query_by_index(Index::TasksByColumn, column_id.as_str())
            .await?
            .into_iter()
            .map(|doc| doc.decode())
            .collect()
    }

    /// Lists every task of a board, in creation order
    pub async fn list_by_board(tx: &dyn Transaction, board_id: &Id) -> StoreResult<Vec<Self>> {
        tx.query_by_index(Index::TasksByBoard, board_id.as_str())
            .await?
            .into_iter()
            .map(|doc| doc.decode())
            .collect()
    }

    /// Patches `columnId` only
    pub async fn set_column(tx: &dyn Transaction, id: &Id, column_id: &Id) -> StoreResult<()> {
        tx.patch(Collection::Tasks, id, to_fields(&TaskColumn { column_id })?)
            .await
    }

    /// Deletes the task document; subtasks are left to the caller
    pub async fn delete(tx: &dyn Transaction, id: &Id) -> StoreResult<()> {
        tx.delete(Collection::Tasks, id).await
    }
}
