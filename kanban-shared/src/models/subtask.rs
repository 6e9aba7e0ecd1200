/// Subtask model and store operations
///
/// Subtasks are checklist items of a task. After creation the only mutation
/// is toggling `isCompleted`.
///
/// # Index
///
/// `subtasks.by_task` on `taskId`.

use crate::store::{to_fields, Collection, Id, Index, StoreResult, Transaction};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Subtask record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subtask {
    #[serde(rename = "_id")]
    pub id: Id,

    #[serde(rename = "_creationTime")]
    pub creation_time: DateTime<Utc>,

    pub title: String,

    pub is_completed: bool,

    /// Owning task
    pub task_id: Id,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SubtaskFields<'a> {
    title: &'a str,
    is_completed: bool,
    task_id: &'a Id,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SubtaskStatus {
    is_completed: bool,
}

/// Initial subtask supplied when creating a task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewSubtask {
    #[validate(length(min = 1, max = 255))]
    pub title: String,

    #[serde(default)]
    pub is_completed: bool,
}

/// Input for toggling a subtask
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSubtaskStatus {
    pub is_completed: bool,
}

impl Subtask {
    pub async fn create(
        tx: &dyn Transaction,
        task_id: &Id,
        title: &str,
        is_completed: bool,
    ) -> StoreResult<Id> {
        let fields = to_fields(&SubtaskFields {
            title,
            is_completed,
            task_id,
        })?;
        tx.insert(Collection::Subtasks, fields).await
    }

    /// Lists a task's subtasks in creation order
    pub async fn list_by_task(tx: &dyn Transaction, task_id: &Id) -> StoreResult<Vec<Self>> {
        tx.query_by_index(Index::SubtasksByTask, task_id.as_str())
            .await?
            .into_iter()
            .map(|doc| doc.decode())
            .collect()
    }

    /// Patches `isCompleted` only
    pub async fn set_completed(
        tx: &dyn Transaction,
        id: &Id,
        is_completed: bool,
    ) -> StoreResult<()> {
        tx.patch(Collection::Subtasks, id, to_fields(&SubtaskStatus { is_completed })?)
            .await
    }

    pub async fn delete(tx: &dyn Transaction, id: &Id) -> StoreResult<()> {
        tx.delete(Collection::Subtasks, id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_subtask_defaults_to_incomplete() {
        let subtask: NewSubtask = serde_json::from_value(json!({"title": "Draft"})).unwrap();
        assert!(!subtask.is_completed);
        assert!(subtask.validate().is_ok());
    }

    #[test]
    fn test_empty_title_is_rejected() {
        let subtask = NewSubtask {
            title: String::new(),
            is_completed: true,
        };
        assert!(subtask.validate().is_err());
    }

    #[test]
    fn test_subtask_wire_shape() {
        let subtask = Subtask {
            id: Id::new("s1"),
            creation_time: Utc::now(),
            title: "Draft".to_string(),
            is_completed: true,
            task_id: Id::new("t1"),
        };

        let value = serde_json::to_value(&subtask).unwrap();
        assert_eq!(value["isCompleted"], true);
        assert_eq!(value["taskId"], "t1");
    }
}
