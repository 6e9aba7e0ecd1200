//! # Kanban Shared Library
//!
//! Core of the kanban board backend: the document store abstraction, typed
//! entity models and the request handlers used by the API server.
//!
//! ## Module Organization
//!
//! - `store`: transactional document store trait with memory and PostgreSQL backends
//! - `db`: PostgreSQL pool and migrations for the PostgreSQL backend
//! - `models`: boards, columns, tasks and subtasks
//! - `service`: handlers (column reconciliation, nested fetches, mutations)

pub mod db;
pub mod models;
pub mod service;
pub mod store;

/// Current version of the kanban shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
