//! # Boardsync API
//!
//! REST transport layer for the todo service: wire DTOs, response envelopes,
//! transport traits, and a `reqwest`-based client implementing them.
//!
//! The state layer consumes the transports exclusively through the
//! [`TodolistTransport`] and [`TaskTransport`] traits, so tests can swap in
//! an in-memory fake while production injects [`TodoApiClient`].
//!
//! ## Example
//!
//! ```no_run
//! use boardsync_api::{ApiConfig, TodoApiClient, TodolistTransport};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Reads BOARDSYNC_API_URL and BOARDSYNC_API_KEY
//!     let client = TodoApiClient::from_env()?;
//!
//!     let todolists = client.get_todolists().await?;
//!     println!("{} todolists", todolists.len());
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod transport;
pub mod types;

// Re-export main types for convenience
pub use client::TodoApiClient;
pub use config::ApiConfig;
pub use error::ApiError;
pub use transport::{TaskTransport, TodolistTransport};
pub use types::{
    ApiResponse, ItemPayload, Task, TaskId, TaskPriority, TaskStatus, TasksPage, Todolist,
    TodolistId, UpdateTaskModel,
};
