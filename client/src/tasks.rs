//! Tasks store: per-todolist ordered cache of tasks
//!
//! Buckets are keyed by todolist id and kept key-consistent with the
//! todolists store through the maintenance actions the app layer dispatches
//! on todolist lifecycle confirmations. Updates are read-modify-write over
//! the complete value object: the backend rejects partial patches, so the
//! reducer reconstructs the full payload from the current record before the
//! call goes out.

use boardsync_api::{
    Task, TaskId, TaskPriority, TaskStatus, TaskTransport, TodolistId, UpdateTaskModel,
};
use boardsync_core::{SmallVec, async_effect, effect::Effect, reducer::Reducer, smallvec};
use boardsync_macros::Action;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// Partial field set for the generic update operation
///
/// `None` means "keep the current value"; the reducer merges the changes
/// over the current record to build the complete update payload.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskChanges {
    /// New title
    pub title: Option<String>,
    /// New description
    pub description: Option<String>,
    /// New progress state
    pub status: Option<TaskStatus>,
    /// New priority
    pub priority: Option<TaskPriority>,
    /// New scheduled start
    pub start_date: Option<DateTime<Utc>>,
    /// New due date
    pub deadline: Option<DateTime<Utc>>,
}

impl TaskChanges {
    /// Builds the complete update payload: these changes merged over the
    /// current record
    #[must_use]
    pub fn merged_over(&self, task: &Task) -> UpdateTaskModel {
        UpdateTaskModel {
            title: self.title.clone().unwrap_or_else(|| task.title.clone()),
            description: self.description.clone().or_else(|| task.description.clone()),
            status: self.status.unwrap_or(task.status),
            priority: self.priority.unwrap_or(task.priority),
            start_date: self.start_date.or(task.start_date),
            deadline: self.deadline.or(task.deadline),
        }
    }
}

/// State of the tasks store
///
/// The key set of `buckets` always equals the todolist ids known to the
/// todolists store; `generations` carries one monotonic fetch counter per
/// key so a superseded fetch that resolves late cannot overwrite newer data.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TasksState {
    /// Tasks per todolist, most recent first
    pub buckets: HashMap<TodolistId, Vec<Task>>,
    /// Monotonic fetch generation per todolist
    pub generations: HashMap<TodolistId, u64>,
}

impl TasksState {
    /// Creates an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Tasks of one todolist, empty for unknown ids
    #[must_use]
    pub fn tasks_for(&self, todolist_id: &TodolistId) -> &[Task] {
        self.buckets.get(todolist_id).map_or(&[], Vec::as_slice)
    }

    /// Looks up one task
    #[must_use]
    pub fn task(&self, todolist_id: &TodolistId, task_id: &TaskId) -> Option<&Task> {
        self.buckets
            .get(todolist_id)
            .and_then(|bucket| bucket.iter().find(|t| &t.id == task_id))
    }

    /// Checks whether a bucket exists for the todolist
    #[must_use]
    pub fn has_bucket(&self, todolist_id: &TodolistId) -> bool {
        self.buckets.contains_key(todolist_id)
    }

    fn task_mut(&mut self, todolist_id: &TodolistId, task_id: &TaskId) -> Option<&mut Task> {
        self.buckets
            .get_mut(todolist_id)
            .and_then(|bucket| bucket.iter_mut().find(|t| &t.id == task_id))
    }
}

/// Dependencies of the tasks reducer
#[derive(Clone)]
pub struct TasksEnvironment {
    /// Remote task operations
    pub api: Arc<dyn TaskTransport>,
}

impl TasksEnvironment {
    /// Creates a new environment around a transport
    #[must_use]
    pub fn new(api: Arc<dyn TaskTransport>) -> Self {
        Self { api }
    }
}

/// Actions of the tasks store
///
/// `SeedBucket`/`DropBucket` are maintenance actions dispatched by the app
/// composition layer when a todolist lifecycle mutation is confirmed; they
/// are not directly callable operations.
#[derive(Action, Clone, Debug)]
pub enum TasksAction {
    /// Request: load one todolist's tasks, bumping that key's generation
    #[request]
    Fetch {
        /// Owning todolist
        todolist_id: TodolistId,
    },

    /// Request: create a task with the given title
    #[request]
    Create {
        /// Owning todolist
        todolist_id: TodolistId,
        /// Title of the new task
        title: String,
    },

    /// Request: delete a task
    #[request]
    Delete {
        /// Owning todolist
        todolist_id: TodolistId,
        /// Task to delete
        task_id: TaskId,
    },

    /// Request: change only a task's status (legacy op, superseded by
    /// `Update`)
    ///
    /// Still builds the complete update payload from the current record; if
    /// the task is unknown, the operation rejects before any network call.
    #[request]
    ChangeStatus {
        /// Owning todolist
        todolist_id: TodolistId,
        /// Task to change
        task_id: TaskId,
        /// New status
        status: TaskStatus,
    },

    /// Request: apply a partial change to a task
    #[request]
    Update {
        /// Owning todolist
        todolist_id: TodolistId,
        /// Task to update
        task_id: TaskId,
        /// Fields to change
        changes: TaskChanges,
    },

    /// Local-only: change a task's title in place; no-op if unknown
    ChangeTitle {
        /// Owning todolist
        todolist_id: TodolistId,
        /// Task to retitle
        task_id: TaskId,
        /// New title
        title: String,
    },

    /// Maintenance: ensure an (empty) bucket exists for the todolist
    SeedBucket {
        /// Todolist to seed
        todolist_id: TodolistId,
    },

    /// Maintenance: remove the todolist's bucket and its tasks
    DropBucket {
        /// Todolist to drop
        todolist_id: TodolistId,
    },

    /// Confirmed: the server returned one todolist's tasks
    ///
    /// Applied only when the carried generation still matches the key's
    /// current generation and the bucket still exists.
    #[confirmed]
    FetchConfirmed {
        /// Owning todolist
        todolist_id: TodolistId,
        /// Generation captured when the fetch was dispatched
        generation: u64,
        /// Tasks in server order
        tasks: Vec<Task>,
    },

    /// Confirmed: the server created a task
    #[confirmed]
    CreateConfirmed {
        /// The server-confirmed record
        task: Task,
    },

    /// Confirmed: the server deleted a task
    #[confirmed]
    DeleteConfirmed {
        /// Owning todolist
        todolist_id: TodolistId,
        /// Deleted task
        task_id: TaskId,
    },

    /// Confirmed: the server applied a status change; only the status field
    /// is overwritten in memory
    #[confirmed]
    StatusConfirmed {
        /// The server-confirmed record
        task: Task,
    },

    /// Confirmed: the server applied a generic update; the whole in-memory
    /// record is replaced to pick up server-side normalization
    #[confirmed]
    UpdateConfirmed {
        /// The server-confirmed record
        task: Task,
    },

    /// Rejected: a task operation failed; no state mutation
    #[failure]
    RequestRejected,
}

/// Reducer for the tasks store
#[derive(Clone, Debug, Default)]
pub struct TasksReducer;

impl TasksReducer {
    /// Creates a new reducer
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Reducer for TasksReducer {
    type State = TasksState;
    type Action = TasksAction;
    type Environment = TasksEnvironment;

    #[allow(clippy::too_many_lines)] // one arm per operation
    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            // ========== Requests ==========
            TasksAction::Fetch { todolist_id } => {
                let entry = state
                    .generations
                    .entry(todolist_id.clone())
                    .and_modify(|g| *g += 1)
                    .or_insert(1);
                let generation = *entry;

                let api = Arc::clone(&env.api);
                smallvec![async_effect! {
                    match api.get_tasks(&todolist_id).await {
                        Ok(tasks) => Some(TasksAction::FetchConfirmed {
                            todolist_id,
                            generation,
                            tasks,
                        }),
                        Err(error) => {
                            tracing::warn!(%error, %todolist_id, "task fetch failed");
                            Some(TasksAction::RequestRejected)
                        },
                    }
                }]
            },

            TasksAction::Create { todolist_id, title } => {
                let api = Arc::clone(&env.api);
                smallvec![async_effect! {
                    match api.create_task(&todolist_id, &title).await {
                        Ok(task) => Some(TasksAction::CreateConfirmed { task }),
                        Err(error) => {
                            tracing::warn!(%error, %todolist_id, "task create failed");
                            Some(TasksAction::RequestRejected)
                        },
                    }
                }]
            },

            TasksAction::Delete {
                todolist_id,
                task_id,
            } => {
                let api = Arc::clone(&env.api);
                smallvec![async_effect! {
                    match api.delete_task(&todolist_id, &task_id).await {
                        Ok(()) => Some(TasksAction::DeleteConfirmed {
                            todolist_id,
                            task_id,
                        }),
                        Err(error) => {
                            tracing::warn!(%error, %todolist_id, %task_id, "task delete failed");
                            Some(TasksAction::RequestRejected)
                        },
                    }
                }]
            },

            TasksAction::ChangeStatus {
                todolist_id,
                task_id,
                status,
            } => {
                let Some(task) = state.task(&todolist_id, &task_id) else {
                    // precondition failure: reject before any network call
                    tracing::warn!(%todolist_id, %task_id, "status change for unknown task");
                    return smallvec![async_effect! { Some(TasksAction::RequestRejected) }];
                };

                let mut model = UpdateTaskModel::from_task(task);
                model.status = status;

                let api = Arc::clone(&env.api);
                smallvec![async_effect! {
                    match api.update_task(&todolist_id, &task_id, &model).await {
                        Ok(task) => Some(TasksAction::StatusConfirmed { task }),
                        Err(error) => {
                            tracing::warn!(%error, %todolist_id, %task_id, "status change failed");
                            Some(TasksAction::RequestRejected)
                        },
                    }
                }]
            },

            TasksAction::Update {
                todolist_id,
                task_id,
                changes,
            } => {
                let Some(task) = state.task(&todolist_id, &task_id) else {
                    tracing::warn!(%todolist_id, %task_id, "update for unknown task");
                    return smallvec![async_effect! { Some(TasksAction::RequestRejected) }];
                };

                let model = changes.merged_over(task);

                let api = Arc::clone(&env.api);
                smallvec![async_effect! {
                    match api.update_task(&todolist_id, &task_id, &model).await {
                        Ok(task) => Some(TasksAction::UpdateConfirmed { task }),
                        Err(error) => {
                            tracing::warn!(%error, %todolist_id, %task_id, "task update failed");
                            Some(TasksAction::RequestRejected)
                        },
                    }
                }]
            },

            // ========== Local-only ==========
            TasksAction::ChangeTitle {
                todolist_id,
                task_id,
                title,
            } => {
                if let Some(task) = state.task_mut(&todolist_id, &task_id) {
                    task.title = title;
                }
                SmallVec::new()
            },

            // ========== Maintenance ==========
            TasksAction::SeedBucket { todolist_id } => {
                state.buckets.entry(todolist_id).or_default();
                SmallVec::new()
            },

            TasksAction::DropBucket { todolist_id } => {
                state.buckets.remove(&todolist_id);
                state.generations.remove(&todolist_id);
                SmallVec::new()
            },

            // ========== Confirmations ==========
            TasksAction::FetchConfirmed {
                todolist_id,
                generation,
                tasks,
            } => {
                if state.generations.get(&todolist_id) != Some(&generation) {
                    tracing::debug!(%todolist_id, generation, "discarding superseded task fetch");
                } else if let Some(bucket) = state.buckets.get_mut(&todolist_id) {
                    // wholesale replace, not a merge
                    *bucket = tasks;
                } else {
                    tracing::debug!(%todolist_id, "discarding fetch for removed todolist");
                }
                SmallVec::new()
            },

            TasksAction::CreateConfirmed { task } => {
                if let Some(bucket) = state.buckets.get_mut(&task.todo_list_id) {
                    // most-recent-first is the product contract
                    bucket.insert(0, task);
                } else {
                    tracing::debug!(todolist_id = %task.todo_list_id,
                        "discarding created task for removed todolist");
                }
                SmallVec::new()
            },

            TasksAction::DeleteConfirmed {
                todolist_id,
                task_id,
            } => {
                if let Some(bucket) = state.buckets.get_mut(&todolist_id) {
                    bucket.retain(|t| t.id != task_id);
                }
                SmallVec::new()
            },

            TasksAction::StatusConfirmed { task } => {
                if let Some(bucket) = state.buckets.get_mut(&task.todo_list_id) {
                    if let Some(slot) = bucket.iter_mut().find(|t| t.id == task.id) {
                        slot.status = task.status;
                    }
                }
                SmallVec::new()
            },

            TasksAction::UpdateConfirmed { task } => {
                if let Some(bucket) = state.buckets.get_mut(&task.todo_list_id) {
                    if let Some(slot) = bucket.iter_mut().find(|t| t.id == task.id) {
                        *slot = task;
                    }
                }
                SmallVec::new()
            },

            // ========== Rejections ==========
            TasksAction::RequestRejected => SmallVec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use boardsync_testing::{InMemoryTodoService, ReducerTest, assertions};

    fn test_env() -> TasksEnvironment {
        TasksEnvironment::new(Arc::new(InMemoryTodoService::new()))
    }

    fn task(id: &str, list: &str, title: &str, status: TaskStatus) -> Task {
        Task {
            id: TaskId::from(id),
            todo_list_id: TodolistId::from(list),
            title: title.to_string(),
            description: None,
            status,
            priority: TaskPriority::Low,
            start_date: None,
            deadline: None,
            added_date: Utc::now(),
            order: 0,
        }
    }

    fn start_state() -> TasksState {
        let mut state = TasksState::new();
        state.buckets.insert(
            TodolistId::from("lst-1"),
            vec![
                task("tsk-1", "lst-1", "CSS", TaskStatus::New),
                task("tsk-2", "lst-1", "JS", TaskStatus::Completed),
                task("tsk-3", "lst-1", "React", TaskStatus::New),
            ],
        );
        state.buckets.insert(
            TodolistId::from("lst-2"),
            vec![
                task("tsk-1", "lst-2", "bread", TaskStatus::New),
                task("tsk-2", "lst-2", "milk", TaskStatus::Completed),
                task("tsk-3", "lst-2", "tea", TaskStatus::New),
            ],
        );
        state
    }

    #[test]
    fn correct_task_is_deleted() {
        ReducerTest::new(TasksReducer::new())
            .with_env(test_env())
            .given_state(start_state())
            .when_action(TasksAction::DeleteConfirmed {
                todolist_id: TodolistId::from("lst-2"),
                task_id: TaskId::from("tsk-2"),
            })
            .then_state(|state| {
                let remaining = state.tasks_for(&TodolistId::from("lst-2"));
                assert_eq!(remaining.len(), 2);
                assert!(remaining.iter().all(|t| t.id != TaskId::from("tsk-2")));
                // the sibling bucket is untouched
                assert_eq!(state.tasks_for(&TodolistId::from("lst-1")).len(), 3);
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn created_task_lands_at_the_front_of_its_bucket() {
        ReducerTest::new(TasksReducer::new())
            .with_env(test_env())
            .given_state(start_state())
            .when_action(TasksAction::CreateConfirmed {
                task: task("tsk-4", "lst-2", "juice", TaskStatus::New),
            })
            .then_state(|state| {
                let bucket = state.tasks_for(&TodolistId::from("lst-2"));
                assert_eq!(bucket.len(), 4);
                assert_eq!(bucket[0].id, TaskId::from("tsk-4"));
                assert_eq!(bucket[0].title, "juice");
                assert_eq!(state.tasks_for(&TodolistId::from("lst-1")).len(), 3);
            })
            .run();
    }

    #[test]
    fn created_task_for_a_removed_todolist_is_discarded() {
        ReducerTest::new(TasksReducer::new())
            .with_env(test_env())
            .given_state(start_state())
            .when_action(TasksAction::CreateConfirmed {
                task: task("tsk-9", "lst-404", "ghost", TaskStatus::New),
            })
            .then_state(|state| {
                assert!(!state.has_bucket(&TodolistId::from("lst-404")));
                assert_eq!(state.buckets.len(), 2);
            })
            .run();
    }

    #[test]
    fn status_confirmation_changes_only_the_status_field() {
        let mut confirmed = task("tsk-2", "lst-2", "milk", TaskStatus::New);
        confirmed.title = "normalized title from server".to_string();

        ReducerTest::new(TasksReducer::new())
            .with_env(test_env())
            .given_state(start_state())
            .when_action(TasksAction::StatusConfirmed { task: confirmed })
            .then_state(|state| {
                let changed = state
                    .task(&TodolistId::from("lst-2"), &TaskId::from("tsk-2"))
                    .unwrap();
                assert_eq!(changed.status, TaskStatus::New);
                // only the status field is overwritten by this legacy op
                assert_eq!(changed.title, "milk");
                // cross-contamination check: same task id in the other list
                let sibling = state
                    .task(&TodolistId::from("lst-1"), &TaskId::from("tsk-2"))
                    .unwrap();
                assert_eq!(sibling.status, TaskStatus::Completed);
            })
            .run();
    }

    #[test]
    fn update_confirmation_replaces_the_whole_record() {
        let mut confirmed = task("tsk-2", "lst-2", "coffee", TaskStatus::Completed);
        confirmed.priority = TaskPriority::Urgent;

        ReducerTest::new(TasksReducer::new())
            .with_env(test_env())
            .given_state(start_state())
            .when_action(TasksAction::UpdateConfirmed { task: confirmed })
            .then_state(|state| {
                let changed = state
                    .task(&TodolistId::from("lst-2"), &TaskId::from("tsk-2"))
                    .unwrap();
                assert_eq!(changed.title, "coffee");
                assert_eq!(changed.priority, TaskPriority::Urgent);
                let sibling = state
                    .task(&TodolistId::from("lst-1"), &TaskId::from("tsk-2"))
                    .unwrap();
                assert_eq!(sibling.title, "JS");
            })
            .run();
    }

    #[test]
    fn local_title_change_is_synchronous() {
        ReducerTest::new(TasksReducer::new())
            .with_env(test_env())
            .given_state(start_state())
            .when_action(TasksAction::ChangeTitle {
                todolist_id: TodolistId::from("lst-1"),
                task_id: TaskId::from("tsk-3"),
                title: "Vue".to_string(),
            })
            .then_state(|state| {
                let changed = state
                    .task(&TodolistId::from("lst-1"), &TaskId::from("tsk-3"))
                    .unwrap();
                assert_eq!(changed.title, "Vue");
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn seeding_creates_an_empty_bucket_and_keeps_existing_ones() {
        ReducerTest::new(TasksReducer::new())
            .with_env(test_env())
            .given_state(start_state())
            .when_actions([
                TasksAction::SeedBucket {
                    todolist_id: TodolistId::from("lst-3"),
                },
                TasksAction::SeedBucket {
                    todolist_id: TodolistId::from("lst-1"),
                },
            ])
            .then_state(|state| {
                assert!(state.has_bucket(&TodolistId::from("lst-3")));
                assert!(state.tasks_for(&TodolistId::from("lst-3")).is_empty());
                // re-seeding must not wipe an existing bucket
                assert_eq!(state.tasks_for(&TodolistId::from("lst-1")).len(), 3);
            })
            .run();
    }

    #[test]
    fn dropping_a_bucket_removes_key_and_generation() {
        let mut state = start_state();
        state.generations.insert(TodolistId::from("lst-2"), 3);

        ReducerTest::new(TasksReducer::new())
            .with_env(test_env())
            .given_state(state)
            .when_action(TasksAction::DropBucket {
                todolist_id: TodolistId::from("lst-2"),
            })
            .then_state(|state| {
                assert!(!state.has_bucket(&TodolistId::from("lst-2")));
                assert!(!state.generations.contains_key(&TodolistId::from("lst-2")));
                assert_eq!(state.buckets.len(), 1);
            })
            .run();
    }

    #[test]
    fn fetch_bumps_the_generation_and_replaces_wholesale() {
        ReducerTest::new(TasksReducer::new())
            .with_env(test_env())
            .given_state(start_state())
            .when_action(TasksAction::Fetch {
                todolist_id: TodolistId::from("lst-1"),
            })
            .then_state(|state| {
                assert_eq!(state.generations.get(&TodolistId::from("lst-1")), Some(&1));
            })
            .then_effects(assertions::assert_request_effect)
            .run();

        ReducerTest::new(TasksReducer::new())
            .with_env(test_env())
            .given_state({
                let mut state = start_state();
                state.generations.insert(TodolistId::from("lst-1"), 1);
                state
            })
            .when_action(TasksAction::FetchConfirmed {
                todolist_id: TodolistId::from("lst-1"),
                generation: 1,
                tasks: vec![task("tsk-9", "lst-1", "fresh", TaskStatus::New)],
            })
            .then_state(|state| {
                let bucket = state.tasks_for(&TodolistId::from("lst-1"));
                assert_eq!(bucket.len(), 1);
                assert_eq!(bucket[0].id, TaskId::from("tsk-9"));
            })
            .run();
    }

    #[test]
    fn superseded_fetch_result_is_discarded() {
        // two overlapping fetches: the key's generation is already 2 when
        // the first (generation 1) response arrives late
        let mut state = start_state();
        state.generations.insert(TodolistId::from("lst-1"), 2);

        ReducerTest::new(TasksReducer::new())
            .with_env(test_env())
            .given_state(state)
            .when_action(TasksAction::FetchConfirmed {
                todolist_id: TodolistId::from("lst-1"),
                generation: 1,
                tasks: vec![task("tsk-9", "lst-1", "stale", TaskStatus::New)],
            })
            .then_state(|state| {
                // the stale payload never lands
                assert_eq!(state.tasks_for(&TodolistId::from("lst-1")).len(), 3);
            })
            .run();
    }

    #[test]
    fn fetch_result_for_a_dropped_bucket_is_discarded() {
        let mut state = start_state();
        state.generations.insert(TodolistId::from("lst-9"), 1);

        ReducerTest::new(TasksReducer::new())
            .with_env(test_env())
            .given_state(state)
            .when_action(TasksAction::FetchConfirmed {
                todolist_id: TodolistId::from("lst-9"),
                generation: 1,
                tasks: vec![task("tsk-9", "lst-9", "orphan", TaskStatus::New)],
            })
            .then_state(|state| {
                assert!(!state.has_bucket(&TodolistId::from("lst-9")));
            })
            .run();
    }

    #[test]
    fn status_change_for_unknown_task_rejects_without_mutation() {
        ReducerTest::new(TasksReducer::new())
            .with_env(test_env())
            .given_state(start_state())
            .when_action(TasksAction::ChangeStatus {
                todolist_id: TodolistId::from("lst-1"),
                task_id: TaskId::from("tsk-404"),
                status: TaskStatus::Completed,
            })
            .then_state(|state| {
                assert_eq!(state.tasks_for(&TodolistId::from("lst-1")).len(), 3);
            })
            // the rejection still travels as an effect so the app layer
            // sees the operation fail
            .then_effects(assertions::assert_request_effect)
            .run();
    }

    #[test]
    fn merged_changes_keep_unset_fields() {
        let current = task("tsk-1", "lst-1", "CSS", TaskStatus::New);
        let changes = TaskChanges {
            status: Some(TaskStatus::Completed),
            ..TaskChanges::default()
        };

        let model = changes.merged_over(&current);

        assert_eq!(model.status, TaskStatus::Completed);
        assert_eq!(model.title, "CSS");
        assert_eq!(model.priority, TaskPriority::Low);
        assert_eq!(model.description, None);
    }
}
