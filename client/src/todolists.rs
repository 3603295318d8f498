//! Todolists store: authoritative local cache of the user's todo-lists
//!
//! Every asynchronous operation applies server-confirmed results only —
//! server-assigned fields (ids, timestamps, order) are never synthesized
//! locally. The one optimistic touch is the per-record entity status, a UI
//! flag flipped to `Loading` while a delete is in flight.

use crate::status::RequestStatus;
use boardsync_api::{Todolist, TodolistId, TodolistTransport};
use boardsync_core::{SmallVec, async_effect, effect::Effect, reducer::Reducer, smallvec};
use boardsync_macros::Action;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Visibility filter applied to a todolist's tasks, client-only
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterValue {
    /// Show every task
    #[default]
    All,
    /// Show tasks that are not completed
    Active,
    /// Show completed tasks
    Completed,
}

/// A todolist as held by the store: the server record plus client-only
/// annotations
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainTodolist {
    /// Server-assigned identifier
    pub id: TodolistId,
    /// Display title
    pub title: String,
    /// Server-side creation timestamp
    pub added_date: DateTime<Utc>,
    /// Server-side sort order
    pub order: i32,
    /// Client-only task filter
    pub filter: FilterValue,
    /// Client-only in-flight/failed annotation
    pub entity_status: RequestStatus,
}

impl DomainTodolist {
    /// Wraps a server-confirmed record with default annotations
    #[must_use]
    pub fn from_remote(todolist: Todolist) -> Self {
        Self {
            id: todolist.id,
            title: todolist.title,
            added_date: todolist.added_date,
            order: todolist.order,
            filter: FilterValue::All,
            entity_status: RequestStatus::Idle,
        }
    }
}

/// State of the todolists store
///
/// Insertion order is display order: fetched and created records are always
/// appended, never inserted by sort order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodolistsState {
    /// All todolists, in display order
    pub todolists: Vec<DomainTodolist>,
}

impl TodolistsState {
    /// Creates an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of todolists
    #[must_use]
    pub fn count(&self) -> usize {
        self.todolists.len()
    }

    /// Looks up a todolist by id
    #[must_use]
    pub fn get(&self, id: &TodolistId) -> Option<&DomainTodolist> {
        self.todolists.iter().find(|t| &t.id == id)
    }

    /// Checks whether a todolist exists
    #[must_use]
    pub fn exists(&self, id: &TodolistId) -> bool {
        self.get(id).is_some()
    }

    fn get_mut(&mut self, id: &TodolistId) -> Option<&mut DomainTodolist> {
        self.todolists.iter_mut().find(|t| &t.id == id)
    }
}

/// Dependencies of the todolists reducer
#[derive(Clone)]
pub struct TodolistsEnvironment {
    /// Remote todolist operations
    pub api: Arc<dyn TodolistTransport>,
}

impl TodolistsEnvironment {
    /// Creates a new environment around a transport
    #[must_use]
    pub fn new(api: Arc<dyn TodolistTransport>) -> Self {
        Self { api }
    }
}

/// Actions of the todolists store
///
/// Requests describe remote operations; their effects resolve to the
/// matching confirmed or rejected action. Unmarked variants are synchronous,
/// local-only mutations.
#[derive(Action, Clone, Debug)]
pub enum TodolistsAction {
    /// Request: load every todolist from the server
    ///
    /// Results are appended, never merged — invoke once per store lifetime
    /// unless duplicates are acceptable.
    #[request]
    Fetch,

    /// Request: create a todolist with the given title
    #[request]
    Create {
        /// Title of the new todolist
        title: String,
    },

    /// Request: delete a todolist
    ///
    /// Marks the record `Loading` before the remote call resolves.
    #[request]
    Delete {
        /// Todolist to delete
        id: TodolistId,
    },

    /// Request: rename a todolist
    #[request]
    Rename {
        /// Todolist to rename
        id: TodolistId,
        /// New title
        title: String,
    },

    /// Local-only: change a todolist's task filter; no-op if unknown
    ChangeFilter {
        /// Target todolist
        id: TodolistId,
        /// New filter
        filter: FilterValue,
    },

    /// Local-only: set a todolist's entity status; no-op if unknown
    MarkEntity {
        /// Target todolist
        id: TodolistId,
        /// New entity status
        status: RequestStatus,
    },

    /// Confirmed: the server returned the full todolist collection
    #[confirmed]
    FetchConfirmed {
        /// Todolists in server order
        todolists: Vec<Todolist>,
    },

    /// Confirmed: the server created a todolist
    #[confirmed]
    CreateConfirmed {
        /// The server-confirmed record
        todolist: Todolist,
    },

    /// Confirmed: the server deleted a todolist
    #[confirmed]
    DeleteConfirmed {
        /// Deleted todolist
        id: TodolistId,
    },

    /// Confirmed: the server renamed a todolist
    #[confirmed]
    RenameConfirmed {
        /// Renamed todolist
        id: TodolistId,
        /// Confirmed title
        title: String,
    },

    /// Rejected: the fetch failed; state is left unchanged
    #[failure]
    FetchRejected,

    /// Rejected: the create failed
    #[failure]
    CreateRejected,

    /// Rejected: the delete failed; the record's entity status turns
    /// `Failed` so the UI can re-enable it
    #[failure]
    DeleteRejected {
        /// Todolist whose delete failed
        id: TodolistId,
    },

    /// Rejected: the rename failed
    #[failure]
    RenameRejected,
}

/// Reducer for the todolists store
#[derive(Clone, Debug, Default)]
pub struct TodolistsReducer;

impl TodolistsReducer {
    /// Creates a new reducer
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Reducer for TodolistsReducer {
    type State = TodolistsState;
    type Action = TodolistsAction;
    type Environment = TodolistsEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            // ========== Requests ==========
            TodolistsAction::Fetch => {
                let api = Arc::clone(&env.api);
                smallvec![async_effect! {
                    match api.get_todolists().await {
                        Ok(todolists) => Some(TodolistsAction::FetchConfirmed { todolists }),
                        Err(error) => {
                            tracing::warn!(%error, "todolist fetch failed");
                            Some(TodolistsAction::FetchRejected)
                        },
                    }
                }]
            },

            TodolistsAction::Create { title } => {
                let api = Arc::clone(&env.api);
                smallvec![async_effect! {
                    match api.create_todolist(&title).await {
                        Ok(todolist) => Some(TodolistsAction::CreateConfirmed { todolist }),
                        Err(error) => {
                            tracing::warn!(%error, "todolist create failed");
                            Some(TodolistsAction::CreateRejected)
                        },
                    }
                }]
            },

            TodolistsAction::Delete { id } => {
                // optimistic UI flag only; the record itself is untouched
                // until the server confirms
                if let Some(todolist) = state.get_mut(&id) {
                    todolist.entity_status = RequestStatus::Loading;
                }

                let api = Arc::clone(&env.api);
                smallvec![async_effect! {
                    match api.delete_todolist(&id).await {
                        Ok(()) => Some(TodolistsAction::DeleteConfirmed { id }),
                        Err(error) => {
                            tracing::warn!(%error, todolist_id = %id, "todolist delete failed");
                            Some(TodolistsAction::DeleteRejected { id })
                        },
                    }
                }]
            },

            TodolistsAction::Rename { id, title } => {
                let api = Arc::clone(&env.api);
                smallvec![async_effect! {
                    match api.rename_todolist(&id, &title).await {
                        Ok(()) => Some(TodolistsAction::RenameConfirmed { id, title }),
                        Err(error) => {
                            tracing::warn!(%error, todolist_id = %id, "todolist rename failed");
                            Some(TodolistsAction::RenameRejected)
                        },
                    }
                }]
            },

            // ========== Local-only ==========
            TodolistsAction::ChangeFilter { id, filter } => {
                if let Some(todolist) = state.get_mut(&id) {
                    todolist.filter = filter;
                }
                SmallVec::new()
            },

            TodolistsAction::MarkEntity { id, status } => {
                if let Some(todolist) = state.get_mut(&id) {
                    todolist.entity_status = status;
                }
                SmallVec::new()
            },

            // ========== Confirmations ==========
            TodolistsAction::FetchConfirmed { todolists } => {
                state
                    .todolists
                    .extend(todolists.into_iter().map(DomainTodolist::from_remote));
                SmallVec::new()
            },

            TodolistsAction::CreateConfirmed { todolist } => {
                state.todolists.push(DomainTodolist::from_remote(todolist));
                SmallVec::new()
            },

            TodolistsAction::DeleteConfirmed { id } => {
                state.todolists.retain(|t| t.id != id);
                SmallVec::new()
            },

            TodolistsAction::RenameConfirmed { id, title } => {
                if let Some(todolist) = state.get_mut(&id) {
                    todolist.title = title;
                }
                SmallVec::new()
            },

            // ========== Rejections ==========
            TodolistsAction::DeleteRejected { id } => {
                if let Some(todolist) = state.get_mut(&id) {
                    todolist.entity_status = RequestStatus::Failed;
                }
                SmallVec::new()
            },

            TodolistsAction::FetchRejected
            | TodolistsAction::CreateRejected
            | TodolistsAction::RenameRejected => SmallVec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use boardsync_testing::{InMemoryTodoService, ReducerTest, assertions};

    fn test_env() -> TodolistsEnvironment {
        TodolistsEnvironment::new(Arc::new(InMemoryTodoService::new()))
    }

    fn remote(id: &str, title: &str) -> Todolist {
        Todolist {
            id: TodolistId::from(id),
            title: title.to_string(),
            added_date: Utc::now(),
            order: 0,
        }
    }

    fn start_state() -> TodolistsState {
        TodolistsState {
            todolists: vec![
                DomainTodolist::from_remote(remote("lst-1", "What to learn")),
                DomainTodolist::from_remote(remote("lst-2", "What to buy")),
            ],
        }
    }

    #[test]
    fn correct_todolist_is_deleted() {
        ReducerTest::new(TodolistsReducer::new())
            .with_env(test_env())
            .given_state(start_state())
            .when_action(TodolistsAction::DeleteConfirmed {
                id: TodolistId::from("lst-1"),
            })
            .then_state(|state| {
                assert_eq!(state.count(), 1);
                assert_eq!(state.todolists[0].id, TodolistId::from("lst-2"));
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn delete_of_unknown_id_is_a_no_op() {
        ReducerTest::new(TodolistsReducer::new())
            .with_env(test_env())
            .given_state(start_state())
            .when_action(TodolistsAction::DeleteConfirmed {
                id: TodolistId::from("lst-404"),
            })
            .then_state(|state| assert_eq!(state.count(), 2))
            .run();
    }

    #[test]
    fn created_todolist_is_appended_with_defaults() {
        ReducerTest::new(TodolistsReducer::new())
            .with_env(test_env())
            .given_state(start_state())
            .when_action(TodolistsAction::CreateConfirmed {
                todolist: remote("lst-3", "New todolist"),
            })
            .then_state(|state| {
                assert_eq!(state.count(), 3);
                let created = &state.todolists[2];
                assert_eq!(created.id, TodolistId::from("lst-3"));
                assert_eq!(created.title, "New todolist");
                assert_eq!(created.filter, FilterValue::All);
                assert_eq!(created.entity_status, RequestStatus::Idle);
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn fetch_appends_rather_than_replaces() {
        ReducerTest::new(TodolistsReducer::new())
            .with_env(test_env())
            .given_state(TodolistsState {
                todolists: vec![DomainTodolist::from_remote(remote("lst-0", "Existing"))],
            })
            .when_action(TodolistsAction::FetchConfirmed {
                todolists: vec![remote("lst-1", "What to learn"), remote("lst-2", "What to buy")],
            })
            .then_state(|state| {
                assert_eq!(state.count(), 3);
                assert_eq!(state.todolists[0].id, TodolistId::from("lst-0"));
                assert_eq!(state.todolists[2].filter, FilterValue::All);
            })
            .run();
    }

    #[test]
    fn correct_todolist_changes_its_title() {
        ReducerTest::new(TodolistsReducer::new())
            .with_env(test_env())
            .given_state(start_state())
            .when_action(TodolistsAction::RenameConfirmed {
                id: TodolistId::from("lst-2"),
                title: "New title".to_string(),
            })
            .then_state(|state| {
                assert_eq!(state.todolists[0].title, "What to learn");
                assert_eq!(state.todolists[1].title, "New title");
            })
            .run();
    }

    #[test]
    fn correct_todolist_changes_its_filter() {
        ReducerTest::new(TodolistsReducer::new())
            .with_env(test_env())
            .given_state(start_state())
            .when_action(TodolistsAction::ChangeFilter {
                id: TodolistId::from("lst-2"),
                filter: FilterValue::Completed,
            })
            .then_state(|state| {
                assert_eq!(state.todolists[0].filter, FilterValue::All);
                assert_eq!(state.todolists[1].filter, FilterValue::Completed);
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn filter_change_for_unknown_id_is_a_no_op() {
        ReducerTest::new(TodolistsReducer::new())
            .with_env(test_env())
            .given_state(start_state())
            .when_action(TodolistsAction::ChangeFilter {
                id: TodolistId::from("lst-404"),
                filter: FilterValue::Completed,
            })
            .then_state(|state| {
                assert!(state.todolists.iter().all(|t| t.filter == FilterValue::All));
            })
            .run();
    }

    #[test]
    fn delete_request_marks_the_record_loading() {
        ReducerTest::new(TodolistsReducer::new())
            .with_env(test_env())
            .given_state(start_state())
            .when_action(TodolistsAction::Delete {
                id: TodolistId::from("lst-1"),
            })
            .then_state(|state| {
                let target = state.get(&TodolistId::from("lst-1")).unwrap();
                assert_eq!(target.entity_status, RequestStatus::Loading);
                // data untouched until confirmation
                assert_eq!(state.count(), 2);
            })
            .then_effects(assertions::assert_request_effect)
            .run();
    }

    #[test]
    fn rejected_delete_marks_the_record_failed() {
        ReducerTest::new(TodolistsReducer::new())
            .with_env(test_env())
            .given_state(start_state())
            .when_actions([
                TodolistsAction::Delete {
                    id: TodolistId::from("lst-1"),
                },
                TodolistsAction::DeleteRejected {
                    id: TodolistId::from("lst-1"),
                },
            ])
            .then_state(|state| {
                let target = state.get(&TodolistId::from("lst-1")).unwrap();
                assert_eq!(target.entity_status, RequestStatus::Failed);
                assert_eq!(state.count(), 2);
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn fetch_request_produces_a_remote_effect() {
        ReducerTest::new(TodolistsReducer::new())
            .with_env(test_env())
            .given_state(TodolistsState::new())
            .when_action(TodolistsAction::Fetch)
            .then_state(|state| assert_eq!(state.count(), 0))
            .then_effects(assertions::assert_request_effect)
            .run();
    }
}
