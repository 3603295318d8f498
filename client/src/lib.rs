//! # Boardsync Client
//!
//! The client-side state layer for the todo service: a todolists store and a
//! tasks store kept in sync with the REST backend through effect-returning
//! reducers.
//!
//! ## Shape
//!
//! - [`todolists`]: ordered todolist cache with client-only filter and
//!   entity-status annotations
//! - [`tasks`]: per-todolist task buckets, key-consistent with the
//!   todolists store, with a per-key fetch generation guarding against
//!   stale responses
//! - [`app`]: the composed reducer — global status derivation, slice
//!   delegation, and explicit bucket maintenance on todolist lifecycle
//!   confirmations
//! - [`selectors`]: the read path for UI collaborators
//!
//! ## Example
//!
//! ```no_run
//! use boardsync_api::TodoApiClient;
//! use boardsync_client::app::{AppAction, AppEnvironment, create_store};
//! use boardsync_client::selectors;
//! use boardsync_client::todolists::TodolistsAction;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let api = Arc::new(TodoApiClient::from_env()?);
//!     let store = create_store(AppEnvironment::new(api.clone(), api));
//!
//!     let mut handle = store.send(AppAction::Todolists(TodolistsAction::Fetch)).await?;
//!     handle.wait().await;
//!
//!     let titles = store
//!         .state(|s| {
//!             selectors::select_todolists(s)
//!                 .iter()
//!                 .map(|t| t.title.clone())
//!                 .collect::<Vec<_>>()
//!         })
//!         .await;
//!     println!("{titles:?}");
//!     Ok(())
//! }
//! ```

pub mod app;
pub mod selectors;
pub mod status;
pub mod tasks;
pub mod todolists;

pub use app::{AppAction, AppEnvironment, AppReducer, AppState, AppStore, create_store};
pub use status::RequestStatus;
pub use tasks::{TaskChanges, TasksAction, TasksEnvironment, TasksReducer, TasksState};
pub use todolists::{
    DomainTodolist, FilterValue, TodolistsAction, TodolistsEnvironment, TodolistsReducer,
    TodolistsState,
};
