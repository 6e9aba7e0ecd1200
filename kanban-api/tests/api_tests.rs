/// Integration tests for the kanban HTTP API
///
/// These tests drive the full router in-process against the in-memory store:
/// - Board listing, creation, reconciliation and deletion
/// - Column and task aggregation endpoints
/// - Task moves and subtask toggles
/// - Error status codes and validation responses

mod common;

use axum::http::StatusCode;
use common::TestContext;
use kanban_shared::store::Collection;
use serde_json::{json, Value};

/// Creates a task through the API and returns its ID
async fn create_task(
    ctx: &TestContext,
    board_id: &str,
    column_id: &str,
    title: &str,
    subtasks: Value,
) -> String {
    let (status, _) = ctx
        .send(
            "POST",
            "/v1/tasks",
            Some(json!({
                "title": title,
                "description": "",
                "boardId": board_id,
                "columnId": column_id,
                "subtasks": subtasks,
            })),
        )
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, tasks) = ctx
        .send("GET", &format!("/v1/columns/{}/tasks", column_id), None)
        .await;
    tasks
        .as_array()
        .unwrap()
        .iter()
        .find(|task| task["title"] == title)
        .map(|task| task["_id"].as_str().unwrap().to_string())
        .unwrap()
}

#[tokio::test]
async fn test_health() {
    let ctx = TestContext::new();

    let (status, body) = ctx.send("GET", "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["store"], "memory");
}

#[tokio::test]
async fn test_board_lifecycle() {
    let ctx = TestContext::new();

    let board = ctx.create_board("user_1", "Platform Launch", &["Todo", "Doing", "Done"]).await;
    assert!(board["_id"].is_string());
    assert!(board["_creationTime"].is_string());
    assert_eq!(board["user"], "user_1");
    assert_eq!(board["columns"].as_array().unwrap().len(), 3);

    let board_id = board["_id"].as_str().unwrap();
    for column in board["columns"].as_array().unwrap() {
        assert_eq!(column["boardId"], board_id);
    }

    let (status, _) = ctx.send("DELETE", &format!("/v1/boards/{}", board_id), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, boards) = ctx.send("GET", "/v1/users/user_1/boards", None).await;
    assert_eq!(boards, json!([]));
    assert_eq!(ctx.store.count(Collection::Columns).await, 0);
}

#[tokio::test]
async fn test_update_board_reconciles_columns() {
    let ctx = TestContext::new();
    let board = ctx.create_board("user_1", "Launch", &["A", "B", "C"]).await;
    let board_id = board["_id"].as_str().unwrap();
    let ids = ctx.column_ids(board_id).await;

    let update = json!({
        "name": "Launch",
        "user": "user_1",
        "columns": [
            { "_id": ids[0], "name": "A2" },
            { "_id": "new", "name": "D" },
            { "_id": "stale-column", "name": "Ghost" },
        ],
    });

    // Sent twice; the stale id is ignored both times
    for _ in 0..2 {
        let (status, _) = ctx
            .send("PUT", &format!("/v1/boards/{}", board_id), Some(update.clone()))
            .await;
        assert_eq!(status, StatusCode::NO_CONTENT);
    }

    let (_, columns) = ctx
        .send("GET", &format!("/v1/boards/{}/columns", board_id), None)
        .await;
    let columns = columns.as_array().unwrap();
    let mut names: Vec<_> = columns.iter().map(|c| c["name"].as_str().unwrap()).collect();
    names.sort();

    // The second call drops the first "D" (not listed by id) and inserts a fresh one
    assert_eq!(names, vec!["A2", "D"]);
    assert!(columns.iter().any(|c| c["_id"] == ids[0].as_str() && c["name"] == "A2"));
}

#[tokio::test]
async fn test_update_missing_board_is_404() {
    let ctx = TestContext::new();

    let (status, body) = ctx
        .send(
            "PUT",
            "/v1/boards/missing",
            Some(json!({ "name": "x", "user": "user_1", "columns": [] })),
        )
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn test_create_board_validation() {
    let ctx = TestContext::new();

    let (status, body) = ctx
        .send(
            "POST",
            "/v1/boards",
            Some(json!({ "name": "", "user": "user_1", "columns": [{ "name": "" }] })),
        )
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "validation_error");
    let fields: Vec<_> = body["details"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["columns[0].name", "name"]);
    assert_eq!(ctx.store.count(Collection::Boards).await, 0);
}

#[tokio::test]
async fn test_task_create_get_and_toggle() {
    let ctx = TestContext::new();
    let board = ctx.create_board("user_1", "Launch", &["Todo", "Done"]).await;
    let board_id = board["_id"].as_str().unwrap();
    let ids = ctx.column_ids(board_id).await;

    let task_id = create_task(
        &ctx,
        board_id,
        &ids[0],
        "Onboarding",
        json!([
            { "title": "Copy", "isCompleted": true },
            { "title": "Design" },
        ]),
    )
    .await;

    let (status, task) = ctx.send("GET", &format!("/v1/tasks/{}", task_id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(task["title"], "Onboarding");
    assert_eq!(task["column"]["name"], "Todo");
    let subtasks = task["subtasks"].as_array().unwrap();
    assert_eq!(subtasks.len(), 2);
    assert_eq!(subtasks[0]["isCompleted"], true);
    assert_eq!(subtasks[1]["isCompleted"], false);

    let subtask_id = subtasks[1]["_id"].as_str().unwrap();
    let (status, _) = ctx
        .send(
            "PATCH",
            &format!("/v1/subtasks/{}", subtask_id),
            Some(json!({ "isCompleted": true })),
        )
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, after) = ctx.send("GET", &format!("/v1/tasks/{}", task_id), None).await;
    assert_eq!(after["subtasks"][1]["isCompleted"], true);
    assert_eq!(after["subtasks"][1]["title"], "Design");
    assert_eq!(after["subtasks"][1]["_creationTime"], subtasks[1]["_creationTime"]);
}

#[tokio::test]
async fn test_list_tasks_includes_column_name() {
    let ctx = TestContext::new();
    let board = ctx.create_board("user_1", "Launch", &["Doing"]).await;
    let board_id = board["_id"].as_str().unwrap();
    let ids = ctx.column_ids(board_id).await;
    create_task(&ctx, board_id, &ids[0], "Ship", json!([{ "title": "Tag release" }])).await;

    let (status, tasks) = ctx
        .send("GET", &format!("/v1/columns/{}/tasks", ids[0]), None)
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(tasks[0]["column"], "Doing");
    assert_eq!(tasks[0]["columnId"], ids[0].as_str());
    assert_eq!(tasks[0]["subtasks"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_move_task() {
    let ctx = TestContext::new();
    let board = ctx.create_board("user_1", "Launch", &["Todo", "Done"]).await;
    let board_id = board["_id"].as_str().unwrap();
    let ids = ctx.column_ids(board_id).await;
    let task_id = create_task(&ctx, board_id, &ids[0], "Ship", json!([])).await;

    let (status, _) = ctx
        .send(
            "PATCH",
            &format!("/v1/tasks/{}/column", task_id),
            Some(json!({ "columnId": ids[1] })),
        )
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, old) = ctx.send("GET", &format!("/v1/columns/{}/tasks", ids[0]), None).await;
    let (_, new) = ctx.send("GET", &format!("/v1/columns/{}/tasks", ids[1]), None).await;
    assert_eq!(old, json!([]));
    assert_eq!(new[0]["_id"], task_id.as_str());
    assert_eq!(new[0]["boardId"], board_id);
}

#[tokio::test]
async fn test_task_errors() {
    let ctx = TestContext::new();
    let board = ctx.create_board("user_1", "Launch", &["Todo"]).await;
    let other = ctx.create_board("user_1", "Other", &["Elsewhere"]).await;
    let board_id = board["_id"].as_str().unwrap();
    let ids = ctx.column_ids(board_id).await;

    let (status, _) = ctx.send("GET", "/v1/tasks/missing", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = ctx.send("GET", "/v1/columns/missing/tasks", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = ctx
        .send("PATCH", "/v1/subtasks/missing", Some(json!({ "isCompleted": true })))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Column from another board
    let (status, body) = ctx
        .send(
            "POST",
            "/v1/tasks",
            Some(json!({
                "title": "Crossed",
                "boardId": other["_id"],
                "columnId": ids[0],
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "bad_request");

    let (status, _) = ctx
        .send(
            "POST",
            "/v1/tasks",
            Some(json!({
                "title": "x".repeat(256),
                "boardId": board_id,
                "columnId": ids[0],
            })),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(ctx.store.count(Collection::Tasks).await, 0);
}

#[tokio::test]
async fn test_delete_task() {
    let ctx = TestContext::new();
    let board = ctx.create_board("user_1", "Launch", &["Todo"]).await;
    let board_id = board["_id"].as_str().unwrap();
    let ids = ctx.column_ids(board_id).await;
    let task_id = create_task(&ctx, board_id, &ids[0], "Temp", json!([{ "title": "a" }])).await;

    let (status, _) = ctx.send("DELETE", &format!("/v1/tasks/{}", task_id), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(ctx.store.count(Collection::Subtasks).await, 0);

    let (status, _) = ctx.send("DELETE", &format!("/v1/tasks/{}", task_id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
