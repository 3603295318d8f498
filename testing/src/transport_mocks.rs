//! In-memory implementations of the transport traits
//!
//! [`InMemoryTodoService`] behaves like a tiny todo backend: it assigns ids,
//! keeps server-side buckets in sync with its todolists, and answers the
//! same shapes the HTTP client would. Failure injection flips every call
//! into a transport error, and the recorded call log lets tests assert what
//! was actually sent (e.g. that updates carry the complete model).

#![allow(clippy::unwrap_used)] // Test infrastructure uses unwrap for simplicity
#![allow(clippy::missing_panics_doc)] // Lock poisoning is unrecoverable in tests

use async_trait::async_trait;
use boardsync_api::{
    ApiError, Task, TaskId, TaskPriority, TaskStatus, TaskTransport, Todolist, TodolistId,
    TodolistTransport, UpdateTaskModel,
};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};
use uuid::Uuid;

/// One transport call, as observed by the fake
#[derive(Clone, Debug)]
#[allow(missing_docs)]
pub enum RecordedCall {
    GetTodolists,
    CreateTodolist { title: String },
    DeleteTodolist { id: TodolistId },
    RenameTodolist { id: TodolistId, title: String },
    GetTasks { todolist_id: TodolistId },
    CreateTask { todolist_id: TodolistId, title: String },
    DeleteTask { todolist_id: TodolistId, task_id: TaskId },
    UpdateTask { todolist_id: TodolistId, task_id: TaskId, model: UpdateTaskModel },
}

#[derive(Default)]
struct ServiceState {
    todolists: Vec<Todolist>,
    tasks: HashMap<TodolistId, Vec<Task>>,
    next_order: i32,
}

/// Stateful in-memory todo backend implementing both transport traits
///
/// Cheap to clone; clones share the same state, so one value can back both
/// environments and still be inspected from the test body.
#[derive(Clone, Default)]
pub struct InMemoryTodoService {
    state: Arc<RwLock<ServiceState>>,
    failing: Arc<AtomicBool>,
    calls: Arc<RwLock<Vec<RecordedCall>>>,
}

impl InMemoryTodoService {
    /// Create an empty service
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a todolist directly (test setup; not recorded as a call)
    pub fn seed_todolist(&self, id: impl Into<String>, title: impl Into<String>) -> Todolist {
        let mut state = self.state.write().unwrap();
        let order = state.next_order;
        state.next_order += 1;

        let todolist = Todolist {
            id: TodolistId::new(id),
            title: title.into(),
            added_date: Utc::now(),
            order,
        };

        state.tasks.insert(todolist.id.clone(), Vec::new());
        state.todolists.push(todolist.clone());
        todolist
    }

    /// Seed a task directly (test setup; not recorded as a call)
    ///
    /// The owning todolist must have been seeded first.
    pub fn seed_task(
        &self,
        todolist_id: &TodolistId,
        id: impl Into<String>,
        title: impl Into<String>,
    ) -> Task {
        let mut state = self.state.write().unwrap();
        let task = Task {
            id: TaskId::new(id),
            todo_list_id: todolist_id.clone(),
            title: title.into(),
            description: None,
            status: TaskStatus::New,
            priority: TaskPriority::Low,
            start_date: None,
            deadline: None,
            added_date: Utc::now(),
            order: 0,
        };

        state
            .tasks
            .get_mut(todolist_id)
            .unwrap()
            .push(task.clone());
        task
    }

    /// Make every subsequent call fail with a transport error
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Snapshot of the recorded call log
    #[must_use]
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.read().unwrap().clone()
    }

    /// Number of todolists currently stored server-side
    #[must_use]
    pub fn todolist_count(&self) -> usize {
        self.state.read().unwrap().todolists.len()
    }

    fn record(&self, call: RecordedCall) {
        self.calls.write().unwrap().push(call);
    }

    fn check_available(&self) -> Result<(), ApiError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(ApiError::RequestFailed(
                "simulated network failure".to_string(),
            ));
        }
        Ok(())
    }

    fn rejected(message: &str) -> ApiError {
        ApiError::Rejected {
            messages: vec![message.to_string()],
        }
    }
}

#[async_trait]
impl TodolistTransport for InMemoryTodoService {
    async fn get_todolists(&self) -> Result<Vec<Todolist>, ApiError> {
        self.record(RecordedCall::GetTodolists);
        self.check_available()?;

        Ok(self.state.read().unwrap().todolists.clone())
    }

    async fn create_todolist(&self, title: &str) -> Result<Todolist, ApiError> {
        self.record(RecordedCall::CreateTodolist {
            title: title.to_string(),
        });
        self.check_available()?;

        let mut state = self.state.write().unwrap();
        let order = state.next_order;
        state.next_order += 1;

        let todolist = Todolist {
            id: TodolistId::new(Uuid::new_v4().to_string()),
            title: title.to_string(),
            added_date: Utc::now(),
            order,
        };

        state.tasks.insert(todolist.id.clone(), Vec::new());
        state.todolists.push(todolist.clone());
        Ok(todolist)
    }

    async fn delete_todolist(&self, id: &TodolistId) -> Result<(), ApiError> {
        self.record(RecordedCall::DeleteTodolist { id: id.clone() });
        self.check_available()?;

        let mut state = self.state.write().unwrap();
        let before = state.todolists.len();
        state.todolists.retain(|t| &t.id != id);
        if state.todolists.len() == before {
            return Err(Self::rejected("todolist not found"));
        }

        state.tasks.remove(id);
        Ok(())
    }

    async fn rename_todolist(&self, id: &TodolistId, title: &str) -> Result<(), ApiError> {
        self.record(RecordedCall::RenameTodolist {
            id: id.clone(),
            title: title.to_string(),
        });
        self.check_available()?;

        let mut state = self.state.write().unwrap();
        let Some(todolist) = state.todolists.iter_mut().find(|t| &t.id == id) else {
            return Err(Self::rejected("todolist not found"));
        };

        todolist.title = title.to_string();
        Ok(())
    }
}

#[async_trait]
impl TaskTransport for InMemoryTodoService {
    async fn get_tasks(&self, todolist_id: &TodolistId) -> Result<Vec<Task>, ApiError> {
        self.record(RecordedCall::GetTasks {
            todolist_id: todolist_id.clone(),
        });
        self.check_available()?;

        let state = self.state.read().unwrap();
        state
            .tasks
            .get(todolist_id)
            .cloned()
            .ok_or_else(|| Self::rejected("todolist not found"))
    }

    async fn create_task(&self, todolist_id: &TodolistId, title: &str) -> Result<Task, ApiError> {
        self.record(RecordedCall::CreateTask {
            todolist_id: todolist_id.clone(),
            title: title.to_string(),
        });
        self.check_available()?;

        let mut state = self.state.write().unwrap();
        let Some(bucket) = state.tasks.get_mut(todolist_id) else {
            return Err(Self::rejected("todolist not found"));
        };

        let task = Task {
            id: TaskId::new(Uuid::new_v4().to_string()),
            todo_list_id: todolist_id.clone(),
            title: title.to_string(),
            description: None,
            status: TaskStatus::New,
            priority: TaskPriority::Low,
            start_date: None,
            deadline: None,
            added_date: Utc::now(),
            order: 0,
        };

        // the service lists newest tasks first
        bucket.insert(0, task.clone());
        Ok(task)
    }

    async fn delete_task(
        &self,
        todolist_id: &TodolistId,
        task_id: &TaskId,
    ) -> Result<(), ApiError> {
        self.record(RecordedCall::DeleteTask {
            todolist_id: todolist_id.clone(),
            task_id: task_id.clone(),
        });
        self.check_available()?;

        let mut state = self.state.write().unwrap();
        let Some(bucket) = state.tasks.get_mut(todolist_id) else {
            return Err(Self::rejected("todolist not found"));
        };

        let before = bucket.len();
        bucket.retain(|t| &t.id != task_id);
        if bucket.len() == before {
            return Err(Self::rejected("task not found"));
        }
        Ok(())
    }

    async fn update_task(
        &self,
        todolist_id: &TodolistId,
        task_id: &TaskId,
        model: &UpdateTaskModel,
    ) -> Result<Task, ApiError> {
        self.record(RecordedCall::UpdateTask {
            todolist_id: todolist_id.clone(),
            task_id: task_id.clone(),
            model: model.clone(),
        });
        self.check_available()?;

        let mut state = self.state.write().unwrap();
        let Some(task) = state
            .tasks
            .get_mut(todolist_id)
            .and_then(|bucket| bucket.iter_mut().find(|t| &t.id == task_id))
        else {
            return Err(Self::rejected("task not found"));
        };

        task.title = model.title.clone();
        task.description = model.description.clone();
        task.status = model.status;
        task.priority = model.priority;
        task.start_date = model.start_date;
        task.deadline = model.deadline;
        Ok(task.clone())
    }
}
