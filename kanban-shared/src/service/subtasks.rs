/// Subtask handlers

use crate::models::Subtask;
use crate::service::KanbanResult;
use crate::store::{Id, Transaction};
use tracing::info;

/// Sets `isCompleted` on a subtask; no other field changes
///
/// # Errors
///
/// [`crate::service::KanbanError::NotFound`] if the subtask does not exist.
pub async fn update_subtask_status(
    tx: &dyn Transaction,
    subtask_id: &Id,
    is_completed: bool,
) -> KanbanResult<()> {
    Subtask::set_completed(tx, subtask_id, is_completed).await?;

    info!(subtask_id = %subtask_id, is_completed, "Subtask status updated");
    Ok(())
}
