//! # Boardsync Runtime
//!
//! The Store runtime: serializes reduction, executes effects, and feeds
//! effect results back into the reducer.
//!
//! ## Core Components
//!
//! - **Store**: owns state, reducer, and environment; the only mutation path
//! - **Effect execution**: spawns effect futures and dispatches the actions
//!   they resolve to back through the same serialized reduction path
//! - **Action broadcast**: every fed-back action is published so callers can
//!   await the confirmation of a request they dispatched
//!
//! All reduction happens behind a single write lock, so the store behaves as
//! one dispatch queue: no two actions ever interleave mid-mutation, and
//! effects suspend only at the remote-call boundary.
//!
//! ## Example
//!
//! ```ignore
//! use boardsync_runtime::Store;
//!
//! let store = Store::new(AppState::default(), AppReducer::new(), environment);
//!
//! // Dispatch a request and wait for its effect chain to finish
//! let handle = store.send(AppAction::Todolists(TodolistsAction::Fetch)).await?;
//! handle.wait().await;
//!
//! // Read state through a projection
//! let count = store.state(|s| s.todolists.todolists.len()).await;
//! ```

use boardsync_core::{effect::Effect, reducer::Reducer};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::{RwLock, broadcast, watch};

pub use error::StoreError;
pub use store::Store;

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;

    /// Errors that can occur during Store operations
    #[derive(Error, Debug)]
    pub enum StoreError {
        /// Store is shutting down and not accepting new actions
        #[error("Store is shutting down")]
        ShutdownInProgress,

        /// Shutdown timed out waiting for effects to complete
        #[error("Shutdown timed out with {0} effects still running")]
        ShutdownTimeout(usize),

        /// Timeout waiting for a matching action
        ///
        /// Returned by `send_and_wait_for` when the timeout expires before
        /// a matching action is fed back.
        #[error("Timeout waiting for action")]
        Timeout,

        /// Action broadcast channel closed
        #[error("Action broadcast channel closed")]
        ChannelClosed,
    }
}

/// Handle for tracking effect completion
///
/// Returned by [`Store::send()`]. Waiting on the handle blocks until every
/// effect spawned by the sent action has finished — including the reduction
/// of the action each effect fed back, since an effect task only completes
/// after its feedback dispatch returns.
#[derive(Clone)]
pub struct EffectHandle {
    effects: Arc<AtomicUsize>,
    completion: watch::Receiver<()>,
}

impl EffectHandle {
    fn new() -> (Self, EffectTracking) {
        let counter = Arc::new(AtomicUsize::new(0));
        let (tx, rx) = watch::channel(());

        let handle = Self {
            effects: Arc::clone(&counter),
            completion: rx,
        };

        let tracking = EffectTracking {
            counter,
            notifier: tx,
        };

        (handle, tracking)
    }

    /// Create a handle that's already complete
    ///
    /// Useful for initialization in loops where you need a `last_handle`.
    #[must_use]
    pub fn completed() -> Self {
        let (tx, rx) = watch::channel(());
        let _ = tx.send(());

        Self {
            effects: Arc::new(AtomicUsize::new(0)),
            completion: rx,
        }
    }

    /// Wait for all effects to complete
    pub async fn wait(&mut self) {
        while self.effects.load(Ordering::SeqCst) > 0 {
            if self.completion.changed().await.is_err() {
                break;
            }
        }
    }

    /// Wait for all effects to complete, with a timeout
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Timeout`] if the timeout expires before all
    /// effects complete.
    pub async fn wait_with_timeout(&mut self, timeout: Duration) -> Result<(), StoreError> {
        tokio::time::timeout(timeout, self.wait())
            .await
            .map_err(|_| StoreError::Timeout)
    }
}

impl std::fmt::Debug for EffectHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EffectHandle")
            .field("pending_effects", &self.effects.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

/// Internal: effect tracking context passed through effect execution
#[derive(Clone)]
struct EffectTracking {
    counter: Arc<AtomicUsize>,
    notifier: watch::Sender<()>,
}

impl EffectTracking {
    fn increment(&self) {
        self.counter.fetch_add(1, Ordering::SeqCst);
    }

    fn decrement(&self) {
        if self.counter.fetch_sub(1, Ordering::SeqCst) == 1 {
            // Counter reached zero, notify waiters
            let _ = self.notifier.send(());
        }
    }
}

/// Internal: RAII guard that decrements the effect counter on drop
///
/// Ensures the counter is decremented even if the effect panics.
struct DecrementGuard(EffectTracking);

impl Drop for DecrementGuard {
    fn drop(&mut self) {
        self.0.decrement();
    }
}

/// Guard that decrements an atomic counter on drop (for shutdown tracking)
struct AtomicCounterGuard(Arc<AtomicUsize>);

impl Drop for AtomicCounterGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Store module - the runtime for reducers
pub mod store {
    use super::{
        Arc, AtomicBool, AtomicCounterGuard, AtomicUsize, DecrementGuard, Duration, Effect,
        EffectHandle, EffectTracking, Ordering, Reducer, RwLock, StoreError, broadcast,
    };

    /// The Store - runtime coordinator for a reducer
    ///
    /// The Store manages:
    /// 1. State (behind an `RwLock`; the write lock is the dispatch queue)
    /// 2. Reducer (pure state logic)
    /// 3. Environment (injected dependencies)
    /// 4. Effect execution with the action feedback loop
    ///
    /// # Type Parameters
    ///
    /// - `S`: State type
    /// - `A`: Action type
    /// - `E`: Environment type
    /// - `R`: Reducer implementation
    pub struct Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        state: Arc<RwLock<S>>,
        reducer: Arc<R>,
        environment: Arc<E>,
        shutdown: Arc<AtomicBool>,
        pending_effects: Arc<AtomicUsize>,
        /// Actions produced by effects are broadcast to observers,
        /// enabling request/confirmation waiting via `send_and_wait_for`.
        action_broadcast: broadcast::Sender<A>,
    }

    impl<S, A, E, R> Clone for Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        fn clone(&self) -> Self {
            Self {
                state: Arc::clone(&self.state),
                reducer: Arc::clone(&self.reducer),
                environment: Arc::clone(&self.environment),
                shutdown: Arc::clone(&self.shutdown),
                pending_effects: Arc::clone(&self.pending_effects),
                action_broadcast: self.action_broadcast.clone(),
            }
        }
    }

    impl<S, A, E, R> Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E> + Send + Sync + 'static,
        A: Send + Clone + std::fmt::Debug + 'static,
        S: Send + Sync + 'static,
        E: Send + Sync + 'static,
    {
        /// Create a new store with initial state, reducer, and environment
        #[must_use]
        pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
            let (action_broadcast, _) = broadcast::channel(16);

            Self {
                state: Arc::new(RwLock::new(initial_state)),
                reducer: Arc::new(reducer),
                environment: Arc::new(environment),
                shutdown: Arc::new(AtomicBool::new(false)),
                pending_effects: Arc::new(AtomicUsize::new(0)),
                action_broadcast,
            }
        }

        /// Create a new store with a custom action broadcast capacity
        ///
        /// Default capacity is 16; increase it when many confirmations can
        /// be in flight at once and observers are slow.
        #[must_use]
        pub fn with_broadcast_capacity(
            initial_state: S,
            reducer: R,
            environment: E,
            capacity: usize,
        ) -> Self {
            let (action_broadcast, _) = broadcast::channel(capacity);

            Self {
                state: Arc::new(RwLock::new(initial_state)),
                reducer: Arc::new(reducer),
                environment: Arc::new(environment),
                shutdown: Arc::new(AtomicBool::new(false)),
                pending_effects: Arc::new(AtomicUsize::new(0)),
                action_broadcast,
            }
        }

        /// Read state through a projection
        ///
        /// Acquires the read lock, applies `f`, and releases the lock before
        /// returning. The projection must not hold references past the call.
        pub async fn state<F, T>(&self, f: F) -> T
        where
            F: FnOnce(&S) -> T,
        {
            let state = self.state.read().await;
            f(&state)
        }

        /// Send an action to the store
        ///
        /// 1. Acquires the write lock (serializing with every other action)
        /// 2. Runs the reducer
        /// 3. Spawns the returned effects; each effect's resulting action is
        ///    dispatched back through the same serialized path
        ///
        /// Returns an [`EffectHandle`] that can be awaited for effect
        /// completion. `send()` itself returns after starting effect
        /// execution, not after completion.
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::ShutdownInProgress`] if the store is
        /// shutting down.
        #[tracing::instrument(skip(self, action), name = "store_send")]
        pub async fn send(&self, action: A) -> Result<EffectHandle, StoreError> {
            if self.shutdown.load(Ordering::Acquire) {
                return Err(StoreError::ShutdownInProgress);
            }

            let (handle, tracking) = EffectHandle::new();
            self.dispatch(action, &tracking, false).await;
            Ok(handle)
        }

        /// Send an action and wait for a matching fed-back action
        ///
        /// Designed for request/confirmation flows: subscribe to the action
        /// broadcast BEFORE sending (no race), dispatch the request, and
        /// return the first effect-produced action matching the predicate.
        ///
        /// ```ignore
        /// let outcome = store.send_and_wait_for(
        ///     AppAction::Todolists(TodolistsAction::Create { title }),
        ///     |a| matches!(a,
        ///         AppAction::Todolists(TodolistsAction::CreateConfirmed { .. })
        ///         | AppAction::Todolists(TodolistsAction::CreateRejected)
        ///     ),
        ///     Duration::from_secs(10),
        /// ).await?;
        /// ```
        ///
        /// # Errors
        ///
        /// - [`StoreError::Timeout`]: no matching action before the deadline
        /// - [`StoreError::ChannelClosed`]: broadcast channel closed
        /// - [`StoreError::ShutdownInProgress`]: store is shutting down
        pub async fn send_and_wait_for<F>(
            &self,
            action: A,
            predicate: F,
            timeout: Duration,
        ) -> Result<A, StoreError>
        where
            F: Fn(&A) -> bool + Send,
        {
            let mut receiver = self.action_broadcast.subscribe();
            let _handle = self.send(action).await?;

            let deadline = tokio::time::Instant::now() + timeout;
            loop {
                let received = tokio::time::timeout_at(deadline, receiver.recv())
                    .await
                    .map_err(|_| StoreError::Timeout)?;

                match received {
                    Ok(candidate) if predicate(&candidate) => return Ok(candidate),
                    Ok(_) => {},
                    // A lagged observer just keeps waiting; the timeout
                    // bounds the loop either way.
                    Err(broadcast::error::RecvError::Lagged(_)) => {},
                    Err(broadcast::error::RecvError::Closed) => {
                        return Err(StoreError::ChannelClosed);
                    },
                }
            }
        }

        /// Initiate graceful shutdown of the store
        ///
        /// Sets the shutdown flag (rejecting new actions), then waits for
        /// pending effects to complete.
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::ShutdownTimeout`] if the timeout expires
        /// with effects still running.
        pub async fn shutdown(&self, timeout: Duration) -> Result<(), StoreError> {
            tracing::info!("Initiating graceful shutdown");
            self.shutdown.store(true, Ordering::Release);

            let start = std::time::Instant::now();
            let poll_interval = Duration::from_millis(100);

            loop {
                let pending = self.pending_effects.load(Ordering::Acquire);

                if pending == 0 {
                    tracing::info!("All effects completed, shutdown successful");
                    return Ok(());
                }

                if start.elapsed() >= timeout {
                    tracing::error!(pending_effects = pending, "Shutdown timed out");
                    return Err(StoreError::ShutdownTimeout(pending));
                }

                tokio::time::sleep(poll_interval).await;
            }
        }

        /// Run the reducer for one action and start its effects
        ///
        /// `from_effect` marks feedback dispatches: those are broadcast to
        /// observers after reduction, so a waiter that wakes on a
        /// confirmation always observes the already-updated state.
        async fn dispatch(&self, action: A, tracking: &EffectTracking, from_effect: bool) {
            metrics::counter!("store.actions").increment(1);
            tracing::debug!(action = ?action, from_effect, "dispatch");

            let effects = {
                let mut state = self.state.write().await;
                self.reducer.reduce(&mut state, action.clone(), &self.environment)
            };

            if from_effect {
                let _ = self.action_broadcast.send(action);
            }

            for effect in effects {
                self.spawn_effect(effect, tracking.clone());
            }
        }

        /// Start one effect on the runtime
        fn spawn_effect(&self, effect: Effect<A>, tracking: EffectTracking) {
            match effect {
                Effect::None => {},
                Effect::Parallel(children) => {
                    for child in children {
                        self.spawn_effect(child, tracking.clone());
                    }
                },
                Effect::Sequential(children) => {
                    tracking.increment();
                    self.pending_effects.fetch_add(1, Ordering::SeqCst);
                    let store = self.clone();
                    tokio::spawn(async move {
                        let _guard = DecrementGuard(tracking.clone());
                        let _pending = AtomicCounterGuard(Arc::clone(&store.pending_effects));
                        for child in children {
                            store.run_effect(child, &tracking).await;
                        }
                        metrics::counter!("store.effects.completed").increment(1);
                    });
                },
                Effect::Future(future) => {
                    tracking.increment();
                    self.pending_effects.fetch_add(1, Ordering::SeqCst);
                    let store = self.clone();
                    tokio::spawn(async move {
                        let _guard = DecrementGuard(tracking.clone());
                        let _pending = AtomicCounterGuard(Arc::clone(&store.pending_effects));
                        if let Some(action) = future.await {
                            store.dispatch(action, &tracking, true).await;
                        }
                        metrics::counter!("store.effects.completed").increment(1);
                    });
                },
            }
        }

        /// Run one effect inline (sequential-chain element)
        async fn run_effect(&self, effect: Effect<A>, tracking: &EffectTracking) {
            match effect {
                Effect::None => {},
                // Nested groups inside a chain re-enter the spawn path
                Effect::Parallel(_) | Effect::Sequential(_) => {
                    self.spawn_effect(effect, tracking.clone());
                },
                Effect::Future(future) => {
                    if let Some(action) = future.await {
                        self.dispatch(action, tracking, true).await;
                    }
                },
            }
        }
    }
}
