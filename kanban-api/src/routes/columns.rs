/// Column endpoints
///
/// # Endpoint
///
/// `GET /v1/boards/:board_id/columns`
///
/// # Response
///
/// ```json
/// [
///   {
///     "_id": "1f7c…",
///     "_creationTime": "2025-01-04T12:00:00Z",
///     "name": "Todo",
///     "boardId": "0b9c…",
///     "tasks": [ { "_id": "…", "title": "Write copy", "columnId": "1f7c…", … } ]
///   }
/// ]
/// ```
///
/// An unknown board yields an empty list.

use crate::app::AppState;
use crate::error::ApiResult;
use axum::{
    extract::{Path, State},
    Json,
};
use kanban_shared::service::ColumnWithTasks;
use kanban_shared::store::Id;

/// List columns endpoint handler
pub async fn list_columns(
    State(state): State<AppState>,
    Path(board_id): Path<Id>,
) -> ApiResult<Json<Vec<ColumnWithTasks>>> {
    tracing::debug!(board_id = %board_id, "Listing columns");

    let columns = state.service.list_columns(&board_id).await?;
    Ok(Json(columns))
}
