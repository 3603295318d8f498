//! # Boardsync Testing
//!
//! Testing utilities and helpers for boardsync stores:
//!
//! - [`ReducerTest`]: fluent Given/When/Then harness for reducers
//! - [`reducer_test::assertions`]: effect assertion helpers
//! - [`InMemoryTodoService`]: stateful in-memory implementation of both
//!   transport traits, with failure injection and a recorded call log
//!
//! ## Example
//!
//! ```ignore
//! use boardsync_testing::{ReducerTest, assertions};
//!
//! ReducerTest::new(TodolistsReducer)
//!     .with_env(test_env())
//!     .given_state(TodolistsState::default())
//!     .when_action(TodolistsAction::ChangeFilter {
//!         id: TodolistId::from("lst-1"),
//!         filter: FilterValue::Completed,
//!     })
//!     .then_state(|state| assert_eq!(state.todolists.len(), 0))
//!     .then_effects(assertions::assert_no_effects)
//!     .run();
//! ```

pub mod transport_mocks;

pub use reducer_test::{ReducerTest, assertions};
pub use transport_mocks::{InMemoryTodoService, RecordedCall};
