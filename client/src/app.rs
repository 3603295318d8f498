//! App composition: both stores, the global status, and the cross-store
//! referential-integrity orchestration
//!
//! The app reducer owns three concerns the slices deliberately do not:
//!
//! 1. **Global status** — derived from the macro-generated action
//!    classification instead of an ambient mutable flag: requests turn it
//!    `Loading`, confirmations `Succeeded`, rejections `Failed`; local-only
//!    actions leave it alone.
//! 2. **Delegation** — slice actions are routed to their reducer and the
//!    returned effects are lifted back into [`AppAction`].
//! 3. **Bucket maintenance** — after a confirmed todolist lifecycle
//!    mutation the matching tasks-store maintenance action is dispatched
//!    explicitly (seed on fetch/create, drop on delete). The tasks reducer
//!    never observes todolist actions itself.

use crate::status::RequestStatus;
use crate::tasks::{TasksAction, TasksEnvironment, TasksReducer, TasksState};
use crate::todolists::{TodolistsAction, TodolistsEnvironment, TodolistsReducer, TodolistsState};
use boardsync_api::{TaskTransport, TodolistTransport};
use boardsync_core::{SmallVec, effect::Effect, reducer::Reducer};
use boardsync_runtime::Store;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Root state: the two store slices plus the global request status
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppState {
    /// Todolists slice
    pub todolists: TodolistsState,
    /// Tasks slice
    pub tasks: TasksState,
    /// Phase of the most recent asynchronous operation
    pub status: RequestStatus,
}

impl AppState {
    /// Creates an empty app state
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

/// Root action: a slice action wrapped with its destination
#[derive(Clone, Debug)]
pub enum AppAction {
    /// An action for the todolists slice
    Todolists(TodolistsAction),
    /// An action for the tasks slice
    Tasks(TasksAction),
}

impl AppAction {
    /// Returns true if this action starts a remote operation
    #[must_use]
    pub const fn is_request(&self) -> bool {
        match self {
            Self::Todolists(action) => action.is_request(),
            Self::Tasks(action) => action.is_request(),
        }
    }

    /// Returns true if this action carries a server-confirmed result
    #[must_use]
    pub const fn is_confirmed(&self) -> bool {
        match self {
            Self::Todolists(action) => action.is_confirmed(),
            Self::Tasks(action) => action.is_confirmed(),
        }
    }

    /// Returns true if this action records a rejected operation
    #[must_use]
    pub const fn is_failure(&self) -> bool {
        match self {
            Self::Todolists(action) => action.is_failure(),
            Self::Tasks(action) => action.is_failure(),
        }
    }

    /// Returns the wrapped variant name, for log and metric labels
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Todolists(action) => action.name(),
            Self::Tasks(action) => action.name(),
        }
    }
}

impl From<TodolistsAction> for AppAction {
    fn from(action: TodolistsAction) -> Self {
        Self::Todolists(action)
    }
}

impl From<TasksAction> for AppAction {
    fn from(action: TasksAction) -> Self {
        Self::Tasks(action)
    }
}

/// Dependencies of the app reducer: one environment per slice
#[derive(Clone)]
pub struct AppEnvironment {
    /// Todolists slice dependencies
    pub todolists: TodolistsEnvironment,
    /// Tasks slice dependencies
    pub tasks: TasksEnvironment,
}

impl AppEnvironment {
    /// Creates an environment from the two transports
    ///
    /// Production passes the same `TodoApiClient` twice; tests usually pass
    /// one shared in-memory fake.
    #[must_use]
    pub fn new(todolist_api: Arc<dyn TodolistTransport>, task_api: Arc<dyn TaskTransport>) -> Self {
        Self {
            todolists: TodolistsEnvironment::new(todolist_api),
            tasks: TasksEnvironment::new(task_api),
        }
    }
}

/// Reducer composing the two slices
#[derive(Clone, Debug, Default)]
pub struct AppReducer {
    todolists: TodolistsReducer,
    tasks: TasksReducer,
}

impl AppReducer {
    /// Creates a new app reducer
    #[must_use]
    pub const fn new() -> Self {
        Self {
            todolists: TodolistsReducer::new(),
            tasks: TasksReducer::new(),
        }
    }

    /// Tasks-store maintenance required by a confirmed todolist mutation
    fn maintenance_for(action: &TodolistsAction) -> Vec<TasksAction> {
        match action {
            TodolistsAction::FetchConfirmed { todolists } => todolists
                .iter()
                .map(|todolist| TasksAction::SeedBucket {
                    todolist_id: todolist.id.clone(),
                })
                .collect(),
            TodolistsAction::CreateConfirmed { todolist } => vec![TasksAction::SeedBucket {
                todolist_id: todolist.id.clone(),
            }],
            TodolistsAction::DeleteConfirmed { id } => vec![TasksAction::DropBucket {
                todolist_id: id.clone(),
            }],
            _ => Vec::new(),
        }
    }
}

impl Reducer for AppReducer {
    type State = AppState;
    type Action = AppAction;
    type Environment = AppEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        if action.is_request() {
            state.status = RequestStatus::Loading;
        } else if action.is_confirmed() {
            state.status = RequestStatus::Succeeded;
        } else if action.is_failure() {
            state.status = RequestStatus::Failed;
        }

        match action {
            AppAction::Todolists(action) => {
                let maintenance = Self::maintenance_for(&action);

                let effects = self
                    .todolists
                    .reduce(&mut state.todolists, action, &env.todolists);

                // the confirmed lifecycle mutation is applied first, then
                // the tasks store is brought back in step
                for followup in maintenance {
                    let _ = self.tasks.reduce(&mut state.tasks, followup, &env.tasks);
                }

                effects
                    .into_iter()
                    .map(|effect| effect.map(AppAction::Todolists))
                    .collect()
            },
            AppAction::Tasks(action) => self
                .tasks
                .reduce(&mut state.tasks, action, &env.tasks)
                .into_iter()
                .map(|effect| effect.map(AppAction::Tasks))
                .collect(),
        }
    }
}

/// The app store: both slices behind one dispatch queue
pub type AppStore = Store<AppState, AppAction, AppEnvironment, AppReducer>;

/// Creates a store over an empty state
#[must_use]
pub fn create_store(environment: AppEnvironment) -> AppStore {
    Store::new(AppState::new(), AppReducer::new(), environment)
}
