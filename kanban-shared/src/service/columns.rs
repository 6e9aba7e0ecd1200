/// Column handlers

use crate::models::{Column, Task};
use crate::service::KanbanResult;
use crate::store::{Id, Transaction};
use futures::future::try_join;
use serde::Serialize;
use std::collections::HashMap;
use tracing::debug;

/// Column with its tasks attached
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnWithTasks {
    #[serde(flatten)]
    pub column: Column,

    /// Tasks of this column in creation order
    pub tasks: Vec<Task>,
}

/// Lists a board's columns, each with its tasks
///
/// Reads the board's tasks with one `tasks.by_board` query and partitions them
/// by `columnId`, instead of querying once per column. Tasks whose column is
/// not among the board's columns are not returned.
pub async fn list_columns(tx: &dyn Transaction, board_id: &Id) -> KanbanResult<Vec<ColumnWithTasks>> {
    let (columns, tasks) = try_join(
        Column::list_by_board(tx, board_id),
        Task::list_by_board(tx, board_id),
    )
    .await?;

    debug!(
        board_id = %board_id,
        columns = columns.len(),
        tasks = tasks.len(),
        "Listed columns"
    );

    let mut by_column: HashMap<Id, Vec<Task>> = HashMap::new();
    for task in tasks {
        by_column.entry(task.column_id.clone()).or_default().push(task);
    }

    Ok(columns
        .into_iter()
        .map(|column| {
            let tasks = by_column.remove(&column.id).unwrap_or_default();
            ColumnWithTasks { column, tasks }
        })
        .collect())
}
