/// Board endpoints
///
/// # Endpoints
///
/// - `GET /v1/users/:user/boards`: boards owned by a user, with columns
/// - `POST /v1/boards`: create a board and its initial columns
/// - `PUT /v1/boards/:board_id`: rename/reassign a board and reconcile its columns
/// - `DELETE /v1/boards/:board_id`: delete a board and everything under it
///
/// # Update Request
///
/// ```json
/// {
///   "name": "Platform Launch",
///   "user": "user_2abc",
///   "columns": [
///     { "_id": "1f7c…", "name": "Todo" },
///     { "_id": "new", "name": "Review" }
///   ]
/// }
/// ```
///
/// Columns of the board missing from `columns` are deleted; entries whose
/// `_id` is unknown are ignored.

use crate::app::AppState;
use crate::error::ApiResult;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use kanban_shared::models::{CreateBoard, UpdateBoard};
use kanban_shared::service::BoardWithColumns;
use kanban_shared::store::Id;
use validator::Validate;

/// List boards endpoint handler
pub async fn list_boards(
    State(state): State<AppState>,
    Path(user): Path<String>,
) -> ApiResult<Json<Vec<BoardWithColumns>>> {
    tracing::debug!(user = %user, "Listing boards");

    let boards = state.service.list_boards(&user).await?;
    Ok(Json(boards))
}

/// Create board endpoint handler
///
/// # Errors
///
/// - 422 Unprocessable Entity: empty or overlong name, user or column name
pub async fn create_board(
    State(state): State<AppState>,
    Json(req): Json<CreateBoard>,
) -> ApiResult<StatusCode> {
    req.validate()?;

    let board_id = state.service.create_board(req).await?;
    tracing::debug!(board_id = %board_id, "Board created via API");

    Ok(StatusCode::NO_CONTENT)
}

/// Update board endpoint handler
///
/// # Errors
///
/// - 404 Not Found: board does not exist
/// - 422 Unprocessable Entity: invalid name, user or column name
pub async fn update_board(
    State(state): State<AppState>,
    Path(board_id): Path<Id>,
    Json(req): Json<UpdateBoard>,
) -> ApiResult<StatusCode> {
    req.validate()?;

    state.service.update_board(&board_id, req).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Delete board endpoint handler
///
/// # Errors
///
/// - 404 Not Found: board does not exist
pub async fn delete_board(
    State(state): State<AppState>,
    Path(board_id): Path<Id>,
) -> ApiResult<StatusCode> {
    state.service.delete_board(&board_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
