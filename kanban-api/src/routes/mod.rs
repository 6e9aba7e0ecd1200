/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `boards`: Board listing, creation, update (column reconciliation), deletion
/// - `columns`: Columns of a board with their tasks
/// - `tasks`: Task queries, creation, moves and deletion
/// - `subtasks`: Subtask status toggling
///
/// Handlers validate their request body, call the matching
/// [`kanban_shared::service::KanbanService`] operation and map errors through
/// [`crate::error::ApiError`]. Mutations answer `204 No Content`.

pub mod boards;
pub mod columns;
pub mod health;
pub mod subtasks;
pub mod tasks;
