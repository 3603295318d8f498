//! Read-only projections over the app state
//!
//! The only read path exposed to UI collaborators. Selectors borrow from the
//! state snapshot they are given; pair them with `Store::state` to read
//! under the lock.

use crate::app::AppState;
use crate::status::RequestStatus;
use crate::todolists::{DomainTodolist, FilterValue};
use boardsync_api::{Task, TaskStatus, TodolistId};
use std::collections::HashMap;

/// All todolists, in display order
#[must_use]
pub fn select_todolists(state: &AppState) -> &[DomainTodolist] {
    &state.todolists.todolists
}

/// The global request status
#[must_use]
pub const fn select_status(state: &AppState) -> RequestStatus {
    state.status
}

/// The whole tasks mapping
#[must_use]
pub const fn select_tasks(state: &AppState) -> &HashMap<TodolistId, Vec<Task>> {
    &state.tasks.buckets
}

/// One todolist's tasks, empty for unknown ids
#[must_use]
pub fn select_tasks_for<'a>(state: &'a AppState, todolist_id: &TodolistId) -> &'a [Task] {
    state.tasks.tasks_for(todolist_id)
}

/// One todolist's tasks with its client-side filter applied
///
/// Unknown ids yield an empty list; a missing todolist record falls back to
/// the `All` filter.
#[must_use]
pub fn select_filtered_tasks<'a>(state: &'a AppState, todolist_id: &TodolistId) -> Vec<&'a Task> {
    let filter = state
        .todolists
        .get(todolist_id)
        .map_or(FilterValue::All, |todolist| todolist.filter);

    state
        .tasks
        .tasks_for(todolist_id)
        .iter()
        .filter(|task| match filter {
            FilterValue::All => true,
            FilterValue::Active => task.status != TaskStatus::Completed,
            FilterValue::Completed => task.status == TaskStatus::Completed,
        })
        .collect()
}
