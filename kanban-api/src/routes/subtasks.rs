/// Subtask endpoints
///
/// # Endpoint
///
/// `PATCH /v1/subtasks/:subtask_id` with body `{ "isCompleted": true }`

use crate::app::AppState;
use crate::error::ApiResult;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use kanban_shared::models::UpdateSubtaskStatus;
use kanban_shared::store::Id;

/// Update subtask status endpoint handler
///
/// # Errors
///
/// - 404 Not Found: subtask does not exist
pub async fn update_subtask_status(
    State(state): State<AppState>,
    Path(subtask_id): Path<Id>,
    Json(req): Json<UpdateSubtaskStatus>,
) -> ApiResult<StatusCode> {
    state
        .service
        .update_subtask_status(&subtask_id, req.is_completed)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
