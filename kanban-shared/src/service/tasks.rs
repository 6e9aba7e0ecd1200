/// Task handlers
///
/// - [`list_tasks`]: a column's tasks with their subtasks and the column name
/// - [`get_task`]: one task with its subtasks and parent column
/// - [`create_task`]: task plus initial subtasks
/// - [`update_task_column`]: move a task within its board
/// - [`delete_task`]: remove a task and its subtasks

use crate::models::{Column, CreateTask, Subtask, Task};
use crate::service::{KanbanError, KanbanResult};
use crate::store::{Id, StoreResult, Transaction};
use futures::future::{try_join, try_join_all, BoxFuture, FutureExt};
use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, info};

/// Task with its subtasks and the name of its column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskWithSubtasks {
    #[serde(flatten)]
    pub task: Task,

    /// Name of the column the task sits in
    pub column: String,

    pub subtasks: Vec<Subtask>,
}

/// Task with its subtasks and parent column record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskDetail {
    #[serde(flatten)]
    pub task: Task,

    pub subtasks: Vec<Subtask>,

    /// Parent column; `None` if it no longer exists
    pub column: Option<Column>,
}

/// Lists a column's tasks with their subtasks
///
/// Subtask lookups (one per task) are issued concurrently.
///
/// # Errors
///
/// [`KanbanError::NotFound`] if the column does not exist.
pub async fn list_tasks(tx: &dyn Transaction, column_id: &Id) -> KanbanResult<Vec<TaskWithSubtasks>> {
    let tasks = Task::list_by_column(tx, column_id).await?;
    let column = Column::find_by_id(tx, column_id)
        .await?
        .ok_or_else(|| KanbanError::not_found("Column", column_id))?;

    let subtasks = try_join_all(tasks.iter().map(|task| Subtask::list_by_task(tx, &task.id)))
        .await?
        .into_iter()
        .flatten();

    let mut by_task: HashMap<Id, Vec<Subtask>> = HashMap::new();
    for subtask in subtasks {
        by_task.entry(subtask.task_id.clone()).or_default().push(subtask);
    }

    debug!(column_id = %column_id, tasks = tasks.len(), "Listed tasks");

    Ok(tasks
        .into_iter()
        .map(|task| TaskWithSubtasks {
            subtasks: by_task.remove(&task.id).unwrap_or_default(),
            column: column.name.clone(),
            task,
        })
        .collect())
}

/// Fetches one task with its subtasks and parent column
///
/// # Errors
///
/// [`KanbanError::NotFound`] if the task does not exist.
pub async fn get_task(tx: &dyn Transaction, task_id: &Id) -> KanbanResult<TaskDetail> {
    let task = Task::find_by_id(tx, task_id)
        .await?
        .ok_or_else(|| KanbanError::not_found("Task", task_id))?;

    let (column, subtasks) = try_join(
        Column::find_by_id(tx, &task.column_id),
        Subtask::list_by_task(tx, task_id),
    )
    .await?;

    Ok(TaskDetail {
        task,
        subtasks,
        column,
    })
}

/// Creates a task and its initial subtasks
///
/// Subtasks are inserted one after another, in input order.
///
/// # Errors
///
/// - [`KanbanError::NotFound`] if the column does not exist
/// - [`KanbanError::InvalidInput`] if the column belongs to another board
pub async fn create_task(tx: &dyn Transaction, input: CreateTask) -> KanbanResult<Id> {
    let column = Column::find_by_id(tx, &input.column_id)
        .await?
        .ok_or_else(|| KanbanError::not_found("Column", &input.column_id))?;
    if column.board_id != input.board_id {
        return Err(KanbanError::InvalidInput(format!(
            "column {} does not belong to board {}",
            column.id, input.board_id
        )));
    }

    let task_id = Task::create(
        tx,
        &input.title,
        input.description.as_deref(),
        &input.board_id,
        &input.column_id,
    )
    .await?;

    for subtask in &input.subtasks {
        Subtask::create(tx, &task_id, &subtask.title, subtask.is_completed).await?;
    }

    info!(
        task_id = %task_id,
        board_id = %input.board_id,
        column_id = %input.column_id,
        subtasks = input.subtasks.len(),
        "Task created"
    );
    Ok(task_id)
}

/// Moves a task to another column of the same board
///
/// Only `columnId` is written.
///
/// # Errors
///
/// - [`KanbanError::NotFound`] if the task or the target column does not exist
/// - [`KanbanError::InvalidInput`] if the target column belongs to another board
pub async fn update_task_column(
    tx: &dyn Transaction,
    task_id: &Id,
    column_id: &Id,
) -> KanbanResult<()> {
    let (task, column) = try_join(
        Task::find_by_id(tx, task_id),
        Column::find_by_id(tx, column_id),
    )
    .await?;
    let task = task.ok_or_else(|| KanbanError::not_found("Task", task_id))?;
    let column = column.ok_or_else(|| KanbanError::not_found("Column", column_id))?;

    if column.board_id != task.board_id {
        return Err(KanbanError::InvalidInput(format!(
            "column {} is not on the task's board {}",
            column_id, task.board_id
        )));
    }

    Task::set_column(tx, task_id, column_id).await?;

    info!(
        task_id = %task_id,
        from = %task.column_id,
        to = %column_id,
        "Task moved"
    );
    Ok(())
}

/// Deletes a task and its subtasks
///
/// # Errors
///
/// [`KanbanError::NotFound`] if the task does not exist.
pub async fn delete_task(tx: &dyn Transaction, task_id: &Id) -> KanbanResult<()> {
    if Task::find_by_id(tx, task_id).await?.is_none() {
        return Err(KanbanError::not_found("Task", task_id));
    }

    let subtasks = Subtask::list_by_task(tx, task_id).await?;
    let mut deletes: Vec<BoxFuture<'_, StoreResult<()>>> = subtasks
        .iter()
        .map(|subtask| Subtask::delete(tx, &subtask.id).boxed())
        .collect();
    deletes.push(Task::delete(tx, task_id).boxed());
    try_join_all(deletes).await?;

    info!(task_id = %task_id, subtasks = subtasks.len(), "Task deleted");
    Ok(())
}
