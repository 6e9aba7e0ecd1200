/// Board model and store operations
///
/// A board is the top-level kanban container. It is owned by a user and holds
/// an ordered set of columns.
///
/// # Document shape
///
/// ```json
/// {
///   "_id": "0b9c4f1e-…",
///   "_creationTime": "2025-01-04T12:00:00Z",
///   "name": "Platform Launch",
///   "user": "user_2abc"
/// }
/// ```
///
/// # Index
///
/// `boards.by_user` on `user`.

use crate::models::column::{ColumnDescriptor, NewColumn};
use crate::store::{to_fields, Collection, Id, Index, StoreResult, Transaction};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Board record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Board {
    /// Unique board ID
    #[serde(rename = "_id")]
    pub id: Id,

    /// When the board was created
    #[serde(rename = "_creationTime")]
    pub creation_time: DateTime<Utc>,

    /// Display name
    pub name: String,

    /// Owner identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
}

/// Persisted fields of a board
#[derive(Debug, Serialize)]
struct BoardFields<'a> {
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    user: Option<&'a str>,
}

/// Input for creating a board together with its initial columns
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateBoard {
    /// Board name
    #[validate(length(min = 1, max = 255))]
    pub name: String,

    /// Owner identifier
    #[validate(length(min = 1, max = 255))]
    pub user: String,

    /// Initial columns, in display order
    #[serde(default)]
    #[validate(nested)]
    pub columns: Vec<NewColumn>,
}

/// Input for updating a board and reconciling its columns
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateBoard {
    /// New board name (always written)
    #[validate(length(min = 1, max = 255))]
    pub name: String,

    /// New owner identifier (always written)
    #[validate(length(min = 1, max = 255))]
    pub user: String,

    /// Desired full column list
    #[serde(default)]
    #[validate(nested)]
    pub columns: Vec<ColumnDescriptor>,
}

impl Board {
    /// Inserts a board and returns its ID
    pub async fn create(
        tx: &dyn Transaction,
        name: &str,
        user: Option<&str>,
    ) -> StoreResult<Id> {
        tx.insert(Collection::Boards, to_fields(&BoardFields { name, user })?)
            .await
    }

    /// Finds a board by ID
    pub async fn find_by_id(tx: &dyn Transaction, id: &Id) -> StoreResult<Option<Self>> {
        match tx.get(Collection::Boards, id).await? {
            Some(doc) => Ok(Some(doc.decode()?)),
            None => Ok(None),
        }
    }

    /// Lists the boards owned by `user`, in creation order
    pub async fn list_by_user(tx: &dyn Transaction, user: &str) -> StoreResult<Vec<Self>> {
        tx.query_by_index(Index::BoardsByUser, user)
            .await?
            .into_iter()
            .map(|doc| doc.decode())
            .collect()
    }

    /// Overwrites name and owner
    pub async fn update(
        tx: &dyn Transaction,
        id: &Id,
        name: &str,
        user: Option<&str>,
    ) -> StoreResult<()> {
        tx.patch(Collection::Boards, id, to_fields(&BoardFields { name, user })?)
            .await
    }

    /// Deletes the board document only; children are left to the caller
    pub async fn delete(tx: &dyn Transaction, id: &Id) -> StoreResult<()> {
        tx.delete(Collection::Boards, id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_board_serializes_system_fields() {
        let board = Board {
            id: Id::new("b1"),
            creation_time: Utc::now(),
            name: "Roadmap".to_string(),
            user: None,
        };

        let value = serde_json::to_value(&board).unwrap();
        assert_eq!(value["_id"], "b1");
        assert!(value.get("_creationTime").is_some());
        assert!(value.get("user").is_none());
    }

    #[test]
    fn test_create_board_validation() {
        let valid: CreateBoard = serde_json::from_value(json!({
            "name": "Roadmap",
            "user": "u1",
            "columns": [{"name": "Todo"}, {"name": "Done"}]
        }))
        .unwrap();
        assert!(valid.validate().is_ok());

        let empty_name = CreateBoard {
            name: String::new(),
            ..valid.clone()
        };
        assert!(empty_name.validate().is_err());

        let mut empty_column = valid.clone();
        empty_column.columns.push(NewColumn {
            name: String::new(),
        });
        assert!(empty_column.validate().is_err());
    }

    #[test]
    fn test_update_board_columns_default_to_empty() {
        let update: UpdateBoard =
            serde_json::from_value(json!({"name": "Roadmap", "user": "u1"})).unwrap();
        assert!(update.columns.is_empty());
        assert!(update.validate().is_ok());
    }
}
