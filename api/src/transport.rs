//! Transport traits consumed by the state layer
//!
//! Environments hold `Arc<dyn TodolistTransport>` / `Arc<dyn TaskTransport>`,
//! so both traits are object-safe and `async_trait`-boxed. Production injects
//! [`crate::TodoApiClient`]; tests inject an in-memory fake.

use crate::error::ApiError;
use crate::types::{Task, TaskId, Todolist, TodolistId, UpdateTaskModel};
use async_trait::async_trait;

/// Remote operations on the todolist collection
#[async_trait]
pub trait TodolistTransport: Send + Sync {
    /// Reads all todolists, in server order
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure or server rejection.
    async fn get_todolists(&self) -> Result<Vec<Todolist>, ApiError>;

    /// Creates a todolist and returns the server-confirmed record
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure or server rejection.
    async fn create_todolist(&self, title: &str) -> Result<Todolist, ApiError>;

    /// Deletes a todolist
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure or server rejection.
    async fn delete_todolist(&self, id: &TodolistId) -> Result<(), ApiError>;

    /// Renames a todolist
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure or server rejection.
    async fn rename_todolist(&self, id: &TodolistId, title: &str) -> Result<(), ApiError>;
}

/// Remote operations on a todolist's tasks
#[async_trait]
pub trait TaskTransport: Send + Sync {
    /// Reads the tasks of one todolist, in server order
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure or server rejection.
    async fn get_tasks(&self, todolist_id: &TodolistId) -> Result<Vec<Task>, ApiError>;

    /// Creates a task and returns the server-confirmed record
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure or server rejection.
    async fn create_task(&self, todolist_id: &TodolistId, title: &str) -> Result<Task, ApiError>;

    /// Deletes a task
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure or server rejection.
    async fn delete_task(&self, todolist_id: &TodolistId, task_id: &TaskId)
    -> Result<(), ApiError>;

    /// Updates a task with the complete field set and returns the
    /// server-confirmed record
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure or server rejection.
    async fn update_task(
        &self,
        todolist_id: &TodolistId,
        task_id: &TaskId,
        model: &UpdateTaskModel,
    ) -> Result<Task, ApiError>;
}
