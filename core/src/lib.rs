//! # Boardsync Core
//!
//! Core traits and types for the boardsync state-synchronization
//! architecture.
//!
//! This crate provides the fundamental abstractions for a client-side store
//! that mirrors server state through dispatched actions:
//!
//! - **State**: an in-memory slice of domain state
//! - **Action**: all possible inputs to a reducer (local mutations, request
//!   intents, server-confirmed results, rejections)
//! - **Reducer**: `(State, Action, Environment) → (State, Effects)`
//! - **Effect**: side-effect descriptions (not execution) — most commonly an
//!   async remote call that resolves to a follow-up action
//! - **Environment**: injected dependencies (transports) via traits
//!
//! ## Architecture Principles
//!
//! - Unidirectional data flow: every mutation enters through an action
//! - Server-confirmed state: reducers apply results, they never synthesize
//!   server-assigned fields
//! - Explicit effects: no hidden I/O inside reducers
//! - Dependency injection via Environment
//!
//! ## Example
//!
//! ```ignore
//! use boardsync_core::{effect::Effect, reducer::Reducer, SmallVec};
//!
//! impl Reducer for TodolistsReducer {
//!     type State = TodolistsState;
//!     type Action = TodolistsAction;
//!     type Environment = TodolistsEnvironment;
//!
//!     fn reduce(
//!         &self,
//!         state: &mut TodolistsState,
//!         action: TodolistsAction,
//!         env: &TodolistsEnvironment,
//!     ) -> SmallVec<[Effect<TodolistsAction>; 4]> {
//!         // apply local mutations, describe remote calls
//!         SmallVec::new()
//!     }
//! }
//! ```

// Re-export commonly used types
pub use chrono::{DateTime, Utc};
pub use serde::{Deserialize, Serialize};
pub use smallvec::{SmallVec, smallvec};

pub use effect::Effect;
pub use reducer::Reducer;

/// Reducer module - the core trait for store logic
///
/// Reducers are pure functions over `(State, Action, Environment)`. They
/// mutate state in place for synchronous actions and return effect
/// descriptions for asynchronous ones; the runtime executes the effects and
/// feeds resulting actions back through the same reducer.
pub mod reducer {
    use super::effect::Effect;
    use smallvec::SmallVec;

    /// The Reducer trait - core abstraction for store logic
    ///
    /// # Type Parameters
    ///
    /// - `State`: the state slice this reducer operates on
    /// - `Action`: the action type this reducer processes
    /// - `Environment`: the injected dependencies this reducer needs
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// Reduce an action into state changes and effects
        ///
        /// This is a pure function that:
        /// 1. Applies the action to the state in place
        /// 2. Returns effect descriptions to be executed by the runtime
        ///
        /// Reducers must not perform I/O directly; remote calls are described
        /// as [`Effect::Future`] values whose resolution re-enters the store
        /// as a follow-up action.
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]>;
    }
}

/// Effect module - side effect descriptions
///
/// Effects describe side effects to be performed by the runtime. They are
/// values (not execution) and are composable: parallel groups, sequential
/// chains, and arbitrary async computations that feed an action back into
/// the store.
pub mod effect {
    use std::future::Future;
    use std::pin::Pin;

    /// Effect type - describes a side effect to be executed
    ///
    /// Effects are NOT executed immediately. They are descriptions of what
    /// should happen, returned from reducers and executed by the Store
    /// runtime.
    ///
    /// # Type Parameters
    ///
    /// - `Action`: the action type that effects can produce (feedback loop)
    #[allow(missing_docs)]
    pub enum Effect<Action> {
        /// No-op effect
        None,

        /// Run effects in parallel
        Parallel(Vec<Effect<Action>>),

        /// Run effects sequentially
        Sequential(Vec<Effect<Action>>),

        /// Arbitrary async computation
        ///
        /// Returns `Option<Action>` - if Some, the action is fed back into
        /// the reducer. A remote call that resolves to a confirmed or
        /// rejected follow-up action is the canonical use.
        Future(Pin<Box<dyn Future<Output = Option<Action>> + Send>>),
    }

    // Manual Debug implementation since Future doesn't implement Debug
    impl<Action> std::fmt::Debug for Effect<Action>
    where
        Action: std::fmt::Debug,
    {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                Effect::None => write!(f, "Effect::None"),
                Effect::Parallel(effects) => {
                    f.debug_tuple("Effect::Parallel").field(effects).finish()
                },
                Effect::Sequential(effects) => {
                    f.debug_tuple("Effect::Sequential").field(effects).finish()
                },
                Effect::Future(_) => write!(f, "Effect::Future(<future>)"),
            }
        }
    }

    impl<Action> Effect<Action> {
        /// Combine effects to run in parallel
        #[must_use]
        pub const fn merge(effects: Vec<Effect<Action>>) -> Effect<Action> {
            Effect::Parallel(effects)
        }

        /// Chain effects to run sequentially
        #[must_use]
        pub const fn chain(effects: Vec<Effect<Action>>) -> Effect<Action> {
            Effect::Sequential(effects)
        }

        /// Lift this effect into a parent action type
        ///
        /// Used by composition layers that wrap slice actions in an
        /// app-level enum: the slice reducer returns `Effect<SliceAction>`,
        /// the composed reducer re-emits it as `Effect<AppAction>`.
        #[must_use]
        pub fn map<B, F>(self, f: F) -> Effect<B>
        where
            Action: Send + 'static,
            B: Send + 'static,
            F: Fn(Action) -> B + Send + Sync + Clone + 'static,
        {
            match self {
                Effect::None => Effect::None,
                Effect::Parallel(effects) => Effect::Parallel(
                    effects.into_iter().map(|e| e.map(f.clone())).collect(),
                ),
                Effect::Sequential(effects) => Effect::Sequential(
                    effects.into_iter().map(|e| e.map(f.clone())).collect(),
                ),
                Effect::Future(future) => {
                    Effect::Future(Box::pin(async move { future.await.map(f) }))
                },
            }
        }
    }
}

/// Create an [`Effect::Future`] from an async block
///
/// # Example
///
/// ```rust,ignore
/// use boardsync_core::async_effect;
///
/// async_effect! {
///     match api.get_todolists().await {
///         Ok(todolists) => Some(TodolistsAction::FetchConfirmed { todolists }),
///         Err(_) => Some(TodolistsAction::FetchRejected),
///     }
/// }
/// ```
#[macro_export]
macro_rules! async_effect {
    ($($body:tt)*) => {
        $crate::effect::Effect::Future(
            ::std::boxed::Box::pin(async move { $($body)* })
        )
    };
}

#[cfg(test)]
mod tests {
    use super::effect::Effect;

    #[derive(Clone, Debug, PartialEq, Eq)]
    enum SliceAction {
        Confirmed { value: i32 },
    }

    #[derive(Clone, Debug, PartialEq, Eq)]
    enum AppAction {
        Slice(SliceAction),
    }

    #[test]
    fn async_effect_macro_builds_future() {
        let effect = async_effect! {
            Some(SliceAction::Confirmed { value: 42 })
        };

        assert!(matches!(effect, Effect::Future(_)));
    }

    #[test]
    fn map_lifts_future_actions() {
        let effect = async_effect! {
            Some(SliceAction::Confirmed { value: 7 })
        };

        let lifted = effect.map(AppAction::Slice);
        let Effect::Future(future) = lifted else {
            unreachable!("map must preserve the Future variant");
        };

        let action = futures::executor::block_on(future);
        assert_eq!(
            action,
            Some(AppAction::Slice(SliceAction::Confirmed { value: 7 }))
        );
    }

    #[test]
    fn map_preserves_grouping() {
        let effect: Effect<SliceAction> = Effect::Parallel(vec![
            Effect::None,
            Effect::Sequential(vec![Effect::None]),
        ]);

        match effect.map(AppAction::Slice) {
            Effect::Parallel(children) => {
                assert_eq!(children.len(), 2);
                assert!(matches!(children[0], Effect::None));
                assert!(matches!(children[1], Effect::Sequential(_)));
            },
            other => unreachable!("expected Parallel, got {other:?}"),
        }
    }
}
