/// Common test utilities for integration tests
///
/// This module provides shared infrastructure for integration tests:
/// - An app router over a fresh in-memory store
/// - JSON request helpers
/// - Board/task setup helpers

use axum::body::Body;
use axum::http::{Request, StatusCode};
use kanban_api::app::{build_router, AppState};
use kanban_api::config::{ApiConfig, Config, LogFormat, StoreBackend, StoreConfig};
use kanban_shared::store::MemoryStore;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::Service as _;

/// Test context containing all necessary resources
pub struct TestContext {
    pub store: MemoryStore,
    pub app: axum::Router,
}

impl TestContext {
    /// Creates a new test context with an empty store
    pub fn new() -> Self {
        let config = Config {
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                cors_origins: vec!["*".to_string()],
            },
            store: StoreConfig {
                backend: StoreBackend::Memory,
                database_url: None,
                max_connections: 1,
                run_migrations: false,
            },
            log_format: LogFormat::Pretty,
        };

        let store = MemoryStore::new();
        let app = build_router(AppState::new(Arc::new(store.clone()), config));

        TestContext { store, app }
    }

    /// Sends a request and returns the status and parsed JSON body
    ///
    /// Empty bodies (204) parse as `Value::Null`.
    pub async fn send(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(value) => {
                builder = builder.header("content-type", "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .app
            .clone()
            .call(builder.body(body).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };

        (status, value)
    }

    /// Creates a board for `user` and returns its JSON (with columns)
    pub async fn create_board(&self, user: &str, name: &str, columns: &[&str]) -> Value {
        let columns: Vec<Value> = columns.iter().map(|name| json!({ "name": name })).collect();
        let (status, _) = self
            .send(
                "POST",
                "/v1/boards",
                Some(json!({ "name": name, "user": user, "columns": columns })),
            )
            .await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (_, boards) = self.send("GET", &format!("/v1/users/{}/boards", user), None).await;
        boards
            .as_array()
            .unwrap()
            .iter()
            .find(|board| board["name"] == name)
            .cloned()
            .unwrap()
    }

    /// Column IDs of a board, in listing order
    pub async fn column_ids(&self, board_id: &str) -> Vec<String> {
        let (_, columns) = self
            .send("GET", &format!("/v1/boards/{}/columns", board_id), None)
            .await;
        columns
            .as_array()
            .unwrap()
            .iter()
            .map(|column| column["_id"].as_str().unwrap().to_string())
            .collect()
    }
}
