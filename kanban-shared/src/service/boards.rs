/// Board handlers
///
/// - [`list_boards`]: a user's boards, each with its columns attached
/// - [`create_board`]: board plus initial columns in one transaction
/// - [`update_board`]: rename/re-own a board and reconcile its columns
/// - [`delete_board`]: remove a board and everything under it
///
/// # Column reconciliation
///
/// `update_board` converges the persisted columns of a board to a desired list
/// in one pass:
///
/// ```text
/// desired entry                      action
/// ─────────────────────────────────  ─────────────────────────
/// New { name }                       insert column
/// Existing { id } and id is current  rename column
/// Existing { id } and id is unknown  ignore (stale client state)
/// current column not in desired ids  delete column
/// ```
///
/// Updates, deletes and inserts have no ordering dependency on each other and
/// are issued concurrently. The surrounding transaction makes the whole update
/// all-or-nothing.

use crate::models::{Board, Column, ColumnInput, CreateBoard, Subtask, Task, UpdateBoard};
use crate::service::{KanbanError, KanbanResult};
use crate::store::{Id, StoreResult, Transaction};
use futures::future::{try_join, try_join_all, BoxFuture, FutureExt, TryFutureExt};
use serde::Serialize;
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// Board with its columns attached
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoardWithColumns {
    #[serde(flatten)]
    pub board: Board,

    /// Columns in creation order
    pub columns: Vec<Column>,
}

/// Rename of an existing column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnRename {
    pub id: Id,
    pub name: String,
}

/// Writes needed to converge a board's columns to a desired list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnPlan {
    /// Existing columns to rename
    pub updates: Vec<ColumnRename>,

    /// Existing columns absent from the desired list
    pub deletes: Vec<Id>,

    /// Names of columns to create
    pub inserts: Vec<String>,

    /// Desired IDs that match no current column; ignored
    pub dropped: Vec<Id>,
}

impl ColumnPlan {
    pub fn is_empty(&self) -> bool {
        self.updates.is_empty() && self.deletes.is_empty() && self.inserts.is_empty()
    }
}

/// Computes the column writes for a board update
///
/// Every current column whose ID does not appear among the desired existing
/// IDs is deleted. Desired entries keep their relative order within each bucket.
pub fn plan_columns(current: &[Column], desired: Vec<ColumnInput>) -> ColumnPlan {
    let current_ids: HashSet<&Id> = current.iter().map(|column| &column.id).collect();
    let mut retained: HashSet<Id> = HashSet::new();
    let mut plan = ColumnPlan::default();

    for input in desired {
        match input {
            ColumnInput::New { name } => plan.inserts.push(name),
            ColumnInput::Existing { id, name } => {
                retained.insert(id.clone());
                if current_ids.contains(&id) {
                    plan.updates.push(ColumnRename { id, name });
                } else {
                    plan.dropped.push(id);
                }
            }
        }
    }

    plan.deletes = current
        .iter()
        .filter(|column| !retained.contains(&column.id))
        .map(|column| column.id.clone())
        .collect();

    plan
}

/// Lists a user's boards with their columns
///
/// Column lookups for all boards are issued concurrently. Boards come back in
/// index (creation) order.
pub async fn list_boards(tx: &dyn Transaction, user: &str) -> KanbanResult<Vec<BoardWithColumns>> {
    let boards = Board::list_by_user(tx, user).await?;
    let columns = try_join_all(
        boards
            .iter()
            .map(|board| Column::list_by_board(tx, &board.id)),
    )
    .await?;

    debug!(user, boards = boards.len(), "Listed boards");

    Ok(boards
        .into_iter()
        .zip(columns)
        .map(|(board, columns)| BoardWithColumns { board, columns })
        .collect())
}

/// Creates a board and its initial columns
///
/// Column inserts depend only on the new board ID and run concurrently.
pub async fn create_board(tx: &dyn Transaction, input: CreateBoard) -> KanbanResult<Id> {
    let board_id = Board::create(tx, &input.name, Some(input.user.as_str())).await?;

    try_join_all(
        input
            .columns
            .iter()
            .map(|column| Column::create(tx, &board_id, &column.name)),
    )
    .await?;

    info!(
        board_id = %board_id,
        user = %input.user,
        columns = input.columns.len(),
        "Board created"
    );
    Ok(board_id)
}

/// Updates a board and reconciles its columns against `input.columns`
///
/// Name and owner are always written, even when unchanged.
///
/// # Errors
///
/// [`KanbanError::NotFound`] if the board does not exist.
pub async fn update_board(
    tx: &dyn Transaction,
    board_id: &Id,
    input: UpdateBoard,
) -> KanbanResult<()> {
    Board::update(tx, board_id, &input.name, Some(input.user.as_str())).await?;

    let current = Column::list_by_board(tx, board_id).await?;
    let desired: Vec<ColumnInput> = input.columns.into_iter().map(ColumnInput::from).collect();
    let plan = plan_columns(&current, desired);

    for stale in &plan.dropped {
        warn!(
            board_id = %board_id,
            column_id = %stale,
            "Ignoring column with unknown id"
        );
    }

    if plan.is_empty() {
        debug!(board_id = %board_id, "No column writes");
    } else {
        let mut writes: Vec<BoxFuture<'_, StoreResult<()>>> =
            Vec::with_capacity(plan.updates.len() + plan.deletes.len() + plan.inserts.len());
        for rename in &plan.updates {
            writes.push(Column::rename(tx, &rename.id, &rename.name).boxed());
        }
        for id in &plan.deletes {
            writes.push(Column::delete(tx, id).boxed());
        }
        for name in &plan.inserts {
            writes.push(Column::create(tx, board_id, name).map_ok(|_| ()).boxed());
        }
        try_join_all(writes).await?;
    }

    info!(
        board_id = %board_id,
        updated = plan.updates.len(),
        deleted = plan.deletes.len(),
        inserted = plan.inserts.len(),
        dropped = plan.dropped.len(),
        "Board updated"
    );
    Ok(())
}

/// Deletes a board with its columns, tasks and subtasks
///
/// # Errors
///
/// [`KanbanError::NotFound`] if the board does not exist.
pub async fn delete_board(tx: &dyn Transaction, board_id: &Id) -> KanbanResult<()> {
    if Board::find_by_id(tx, board_id).await?.is_none() {
        return Err(KanbanError::not_found("Board", board_id));
    }

    let (columns, tasks) = try_join(
        Column::list_by_board(tx, board_id),
        Task::list_by_board(tx, board_id),
    )
    .await?;
    let subtasks: Vec<Subtask> =
        try_join_all(tasks.iter().map(|task| Subtask::list_by_task(tx, &task.id)))
            .await?
            .into_iter()
            .flatten()
            .collect();

    let mut deletes: Vec<BoxFuture<'_, StoreResult<()>>> = Vec::new();
    deletes.extend(subtasks.iter().map(|s| Subtask::delete(tx, &s.id).boxed()));
    deletes.extend(tasks.iter().map(|t| Task::delete(tx, &t.id).boxed()));
    deletes.extend(columns.iter().map(|c| Column::delete(tx, &c.id).boxed()));
    deletes.push(Board::delete(tx, board_id).boxed());
    try_join_all(deletes).await?;

    info!(
        board_id = %board_id,
        columns = columns.len(),
        tasks = tasks.len(),
        subtasks = subtasks.len(),
        "Board deleted"
    );
    Ok(())
}
