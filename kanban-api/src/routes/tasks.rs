/// Task endpoints
///
/// # Endpoints
///
/// - `GET /v1/columns/:column_id/tasks`: a column's tasks with subtasks and column name
/// - `POST /v1/tasks`: create a task and its initial subtasks
/// - `GET /v1/tasks/:task_id`: one task with subtasks and parent column
/// - `PATCH /v1/tasks/:task_id/column`: move a task to another column
/// - `DELETE /v1/tasks/:task_id`: delete a task and its subtasks
///
/// # Create Request
///
/// ```json
/// {
///   "title": "Build UI for onboarding flow",
///   "description": "",
///   "boardId": "0b9c…",
///   "columnId": "1f7c…",
///   "subtasks": [
///     { "title": "Sign up page", "isCompleted": true },
///     { "title": "Sign in page" }
///   ]
/// }
/// ```

use crate::app::AppState;
use crate::error::ApiResult;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use kanban_shared::models::{CreateTask, UpdateTaskColumn};
use kanban_shared::service::{TaskDetail, TaskWithSubtasks};
use kanban_shared::store::Id;
use validator::Validate;

/// List tasks endpoint handler
///
/// # Errors
///
/// - 404 Not Found: column does not exist
pub async fn list_tasks(
    State(state): State<AppState>,
    Path(column_id): Path<Id>,
) -> ApiResult<Json<Vec<TaskWithSubtasks>>> {
    tracing::debug!(column_id = %column_id, "Listing tasks");

    let tasks = state.service.list_tasks(&column_id).await?;
    Ok(Json(tasks))
}

/// Get task endpoint handler
///
/// `column` is `null` when the parent column no longer exists.
///
/// # Errors
///
/// - 404 Not Found: task does not exist
pub async fn get_task(
    State(state): State<AppState>,
    Path(task_id): Path<Id>,
) -> ApiResult<Json<TaskDetail>> {
    let task = state.service.get_task(&task_id).await?;
    Ok(Json(task))
}

/// Create task endpoint handler
///
/// # Errors
///
/// - 400 Bad Request: column belongs to another board
/// - 404 Not Found: column does not exist
/// - 422 Unprocessable Entity: invalid title, description or subtask title
pub async fn create_task(
    State(state): State<AppState>,
    Json(req): Json<CreateTask>,
) -> ApiResult<StatusCode> {
    req.validate()?;

    let task_id = state.service.create_task(req).await?;
    tracing::debug!(task_id = %task_id, "Task created via API");

    Ok(StatusCode::NO_CONTENT)
}

/// Update task column endpoint handler
///
/// Body: `{ "columnId": "…" }` (`newColumnId` is accepted as well).
///
/// # Errors
///
/// - 400 Bad Request: column belongs to another board
/// - 404 Not Found: task or column does not exist
pub async fn update_task_column(
    State(state): State<AppState>,
    Path(task_id): Path<Id>,
    Json(req): Json<UpdateTaskColumn>,
) -> ApiResult<StatusCode> {
    state
        .service
        .update_task_column(&task_id, &req.column_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Delete task endpoint handler
///
/// # Errors
///
/// - 404 Not Found: task does not exist
pub async fn delete_task(
    State(state): State<AppState>,
    Path(task_id): Path<Id>,
) -> ApiResult<StatusCode> {
    state.service.delete_task(&task_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
