/// Column model and store operations
///
/// A column is a named lane within a board. Columns are created with their
/// board and later reconciled against a desired list (see
/// [`crate::service::boards::update_board`]).
///
/// # Index
///
/// `columns.by_board` on `boardId`.

use crate::store::{to_fields, Collection, Id, Index, StoreResult, Transaction};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Identifier value clients send for a column that does not exist yet
pub const NEW_COLUMN_ID: &str = "new";

/// Column record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    /// Unique column ID
    #[serde(rename = "_id")]
    pub id: Id,

    /// When the column was created
    #[serde(rename = "_creationTime")]
    pub creation_time: DateTime<Utc>,

    /// Display name
    pub name: String,

    /// Owning board
    pub board_id: Id,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ColumnFields<'a> {
    name: &'a str,
    board_id: &'a Id,
}

#[derive(Debug, Serialize)]
struct ColumnName<'a> {
    name: &'a str,
}

/// Initial column supplied when creating a board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct NewColumn {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
}

/// Column entry of a board update, as sent over the wire
///
/// `_id` is either the ID of an existing column, the literal `"new"`, or absent.
/// Convert into [`ColumnInput`] before acting on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct ColumnDescriptor {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[validate(length(min = 1, max = 255))]
    pub name: String,
}

/// Desired column in a board update
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnInput {
    /// Column to be created
    New { name: String },

    /// Column expected to exist already
    Existing { id: Id, name: String },
}

impl From<ColumnDescriptor> for ColumnInput {
    fn from(descriptor: ColumnDescriptor) -> Self {
        match descriptor.id {
            Some(id) if !id.is_empty() && id != NEW_COLUMN_ID => ColumnInput::Existing {
                id: Id::new(id),
                name: descriptor.name,
            },
            _ => ColumnInput::New {
                name: descriptor.name,
            },
        }
    }
}

impl Column {
    /// Inserts a column into `board_id` and returns its ID
    pub async fn create(tx: &dyn Transaction, board_id: &Id, name: &str) -> StoreResult<Id> {
        tx.insert(Collection::Columns, to_fields(&ColumnFields { name, board_id })?)
            .await
    }

    /// Finds a column by ID
    pub async fn find_by_id(tx: &dyn Transaction, id: &Id) -> StoreResult<Option<Self>> {
        match tx.get(Collection::Columns, id).await? {
            Some(doc) => Ok(Some(doc.decode()?)),
            None => Ok(None),
        }
    }

    /// Lists a board's columns in creation order
    pub async fn list_by_board(tx: &dyn Transaction, board_id: &Id) -> StoreResult<Vec<Self>> {
        tx.query_by_index(Index::ColumnsByBoard, board_id.as_str())
            .await?
            .into_iter()
            .map(|doc| doc.decode())
            .collect()
    }

    pub async fn rename(tx: &dyn Transaction, id: &Id, name: &str) -> StoreResult<()> {
        tx.patch(Collection::Columns, id, to_fields(&ColumnName { name })?)
            .await
    }

    /// Deletes the column document; its tasks are not touched
    pub async fn delete(tx: &dyn Transaction, id: &Id) -> StoreResult<()> {
        tx.delete(Collection::Columns, id).await
    }
}
