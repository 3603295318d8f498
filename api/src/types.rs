//! Wire DTOs for the todo service
//!
//! Field names are camelCase on the wire; status and priority travel as bare
//! ordinals. Identifiers are server-assigned strings wrapped in newtypes so a
//! todolist id can never be passed where a task id belongs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Unique identifier of a todolist, assigned by the server
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodolistId(String);

impl TodolistId {
    /// Wraps a server-assigned identifier
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TodolistId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for TodolistId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Identifier of a task, unique within its owning todolist
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    /// Wraps a server-assigned identifier
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for TaskId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Task progress state, ordinal-encoded on the wire
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum TaskStatus {
    /// Not started
    New,
    /// Being worked on
    InProgress,
    /// Done
    Completed,
    /// Parked outside the ordinary flow
    Draft,
}

impl From<TaskStatus> for u8 {
    fn from(status: TaskStatus) -> Self {
        match status {
            TaskStatus::New => 0,
            TaskStatus::InProgress => 1,
            TaskStatus::Completed => 2,
            TaskStatus::Draft => 3,
        }
    }
}

impl TryFrom<u8> for TaskStatus {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::New),
            1 => Ok(Self::InProgress),
            2 => Ok(Self::Completed),
            3 => Ok(Self::Draft),
            other => Err(format!("unknown task status ordinal {other}")),
        }
    }
}

/// Task priority, ordinal-encoded on the wire
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
#[allow(missing_docs)]
pub enum TaskPriority {
    Low,
    Middle,
    High,
    Urgent,
    Later,
}

impl From<TaskPriority> for u8 {
    fn from(priority: TaskPriority) -> Self {
        match priority {
            TaskPriority::Low => 0,
            TaskPriority::Middle => 1,
            TaskPriority::High => 2,
            TaskPriority::Urgent => 3,
            TaskPriority::Later => 4,
        }
    }
}

impl TryFrom<u8> for TaskPriority {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Low),
            1 => Ok(Self::Middle),
            2 => Ok(Self::High),
            3 => Ok(Self::Urgent),
            4 => Ok(Self::Later),
            other => Err(format!("unknown task priority ordinal {other}")),
        }
    }
}

/// A todolist as returned by the server
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todolist {
    /// Server-assigned identifier, unique across all todolists
    pub id: TodolistId,
    /// Display title
    pub title: String,
    /// Server-side creation timestamp
    pub added_date: DateTime<Utc>,
    /// Server-side sort order
    pub order: i32,
}

/// A task as returned by the server
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Server-assigned identifier, unique within the owning todolist
    pub id: TaskId,
    /// Owning todolist (foreign key)
    pub todo_list_id: TodolistId,
    /// Display title
    pub title: String,
    /// Free-form description
    #[serde(default)]
    pub description: Option<String>,
    /// Progress state
    pub status: TaskStatus,
    /// Priority
    pub priority: TaskPriority,
    /// Scheduled start
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,
    /// Due date
    #[serde(default)]
    pub deadline: Option<DateTime<Utc>>,
    /// Server-side creation timestamp
    pub added_date: DateTime<Utc>,
    /// Server-side sort order
    pub order: i32,
}

/// The complete task update payload
///
/// The backend rejects partial patches: every update carries the full field
/// set, reconstructed from the current in-memory record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskModel {
    /// Display title
    pub title: String,
    /// Free-form description
    pub description: Option<String>,
    /// Progress state
    pub status: TaskStatus,
    /// Priority
    pub priority: TaskPriority,
    /// Scheduled start
    pub start_date: Option<DateTime<Utc>>,
    /// Due date
    pub deadline: Option<DateTime<Utc>>,
}

impl UpdateTaskModel {
    /// Builds the complete payload from a current task record
    #[must_use]
    pub fn from_task(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            description: task.description.clone(),
            status: task.status,
            priority: task.priority,
            start_date: task.start_date,
            deadline: task.deadline,
        }
    }
}

/// Envelope wrapping every mutating response
///
/// `result_code == 0` means the server accepted the operation; anything else
/// is a server-side rejection with human-readable `messages`.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    /// 0 on success, non-zero on server-side rejection
    pub result_code: i32,
    /// Rejection messages, empty on success
    #[serde(default)]
    pub messages: Vec<String>,
    /// Operation payload
    pub data: T,
}

/// Payload carrying a single created or updated entity
#[derive(Clone, Debug, Deserialize)]
pub struct ItemPayload<T> {
    /// The entity
    pub item: T,
}

/// Response shape of a task read
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TasksPage {
    /// Tasks in server order
    pub items: Vec<Task>,
    /// Total count across pages
    #[serde(default)]
    pub total_count: i32,
    /// Server-side read error, if any
    #[serde(default)]
    pub error: Option<String>,
}
