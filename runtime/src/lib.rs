//! # Rebound Runtime
//!
//! Store runtime for the Rebound action-binding architecture.
//!
//! This crate provides the [`Store`] that owns feature state, runs the
//! reducer, and executes effects, plus the [`Dispatcher`] handle it hands out
//! as the concrete [`DispatchSink`] for action binding.
//!
//! ## Core Components
//!
//! - **Store**: Owns state behind a lock, applies actions through the reducer,
//!   executes effect descriptions
//! - **Dispatcher**: A clonable, synchronous dispatch sink backed by the
//!   store's event loop channel
//! - **Event Loop**: Serializes dispatched actions and feeds effect-produced
//!   actions back into the reducer
//!
//! ## Example
//!
//! ```ignore
//! use rebound_runtime::Store;
//!
//! let store = Store::new(initial_state, my_reducer, environment);
//!
//! // Async path: apply an action directly
//! store.send(Action::DoSomething).await?;
//!
//! // Sync path: hand a dispatch sink to an action binder
//! let dispatcher = store.dispatcher();
//! dispatcher.dispatch(Action::DoSomethingElse)?;
//! store.settle().await;
//!
//! // Read state
//! let value = store.state(|s| s.some_field).await;
//! ```

use futures::future::BoxFuture;
use rebound_core::binder::{DispatchSink, SinkId};
use rebound_core::effect::Effect;
use rebound_core::error::DispatchError;
use rebound_core::reducer::Reducer;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::{Notify, RwLock, mpsc};

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;

    /// Errors that can occur during Store operations
    #[derive(Error, Debug)]
    pub enum StoreError {
        /// Store is shutting down and not accepting new actions
        #[error("store is shutting down")]
        ShutdownInProgress,
    }
}

pub use error::StoreError;

/// Feedback path for effect-produced actions.
///
/// Sends re-enter the store through the same channel the event loop drains,
/// so effect-produced actions serialize with dispatched ones.
struct Feedback<A> {
    tx: mpsc::UnboundedSender<A>,
    queued: Arc<AtomicUsize>,
}

impl<A> Feedback<A> {
    fn send(&self, action: A) {
        self.queued.fetch_add(1, Ordering::SeqCst);
        if self.tx.send(action).is_err() {
            self.queued.fetch_sub(1, Ordering::SeqCst);
            tracing::warn!("store closed, dropping effect-produced action");
        }
    }
}

impl<A> Clone for Feedback<A> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
            queued: Arc::clone(&self.queued),
        }
    }
}

/// Execute one effect description.
///
/// Recursion (Parallel/Sequential hold nested effects) requires the boxed
/// return type.
fn execute_effect<A>(effect: Effect<A>, feedback: Feedback<A>) -> BoxFuture<'static, ()>
where
    A: Send + 'static,
{
    Box::pin(async move {
        match effect {
            Effect::None => {},
            Effect::Parallel(effects) => {
                let tasks: Vec<_> = effects
                    .into_iter()
                    .map(|e| tokio::spawn(execute_effect(e, feedback.clone())))
                    .collect();
                for task in tasks {
                    if let Err(err) = task.await {
                        tracing::warn!(%err, "parallel effect task failed");
                    }
                }
            },
            Effect::Sequential(effects) => {
                for e in effects {
                    execute_effect(e, feedback.clone()).await;
                }
            },
            Effect::Delay { duration, action } => {
                tokio::time::sleep(duration).await;
                feedback.send(*action);
            },
            Effect::Future(future) => {
                if let Some(action) = future.await {
                    feedback.send(action);
                }
            },
        }
    })
}

struct Inner<S, E, R> {
    state: RwLock<S>,
    reducer: R,
    environment: E,
    pending_effects: Arc<AtomicUsize>,
}

/// The Store - owns state and coordinates reducer execution
///
/// The Store manages:
/// 1. State (behind `RwLock` for concurrent access)
/// 2. Reducer (state-transition logic)
/// 3. Environment (injected dependencies)
/// 4. Effect execution (with feedback loop)
///
/// Two ways in:
///
/// - [`Store::send`] applies an action directly (async, read-your-write)
/// - [`Store::dispatcher`] hands out a synchronous [`DispatchSink`]; actions
///   dispatched through it are serialized by the store's event loop
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
    inner: Arc<Inner<S, E, R>>,
    feedback: Feedback<A>,
    shutdown: Arc<AtomicBool>,
    shutdown_notify: Arc<Notify>,
    sink_id: SinkId,
}

impl<S, A, E, R> Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E> + Send + Sync + 'static,
    A: Send + 'static,
    S: Send + Sync + 'static,
    E: Send + Sync + 'static,
{
    /// Create a new store with initial state, reducer, and environment
    ///
    /// Spawns the store's event loop, which serializes actions arriving from
    /// [`Dispatcher`] handles and from effect feedback. The store's dispatch
    /// sink identity is minted here; a replacement store gets a new one.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime (the event loop is spawned
    /// immediately).
    #[must_use]
    pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<A>();
        let queued = Arc::new(AtomicUsize::new(0));
        let feedback = Feedback {
            tx,
            queued: Arc::clone(&queued),
        };

        let inner = Arc::new(Inner {
            state: RwLock::new(initial_state),
            reducer,
            environment,
            pending_effects: Arc::new(AtomicUsize::new(0)),
        });

        let shutdown_notify = Arc::new(Notify::new());
        let store = Self {
            inner: Arc::clone(&inner),
            feedback: feedback.clone(),
            shutdown: Arc::new(AtomicBool::new(false)),
            shutdown_notify: Arc::clone(&shutdown_notify),
            sink_id: SinkId::fresh(),
        };

        let sink_id = store.sink_id;
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    maybe_action = rx.recv() => match maybe_action {
                        Some(action) => {
                            process(&inner, &feedback, action).await;
                            queued.fetch_sub(1, Ordering::SeqCst);
                        },
                        None => break,
                    },
                    () = shutdown_notify.notified() => break,
                }
            }
            // Anything still queued will never be processed.
            queued.store(0, Ordering::SeqCst);
            tracing::debug!(%sink_id, "store event loop stopped");
        });

        store
    }

    /// Apply an action to the store
    ///
    /// Acquires the state write lock, runs the reducer, and spawns execution
    /// of the returned effects. State changes are visible as soon as this
    /// returns; effects may still be running (use [`Store::settle`] to wait).
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownInProgress`] if [`Store::shutdown`] was
    /// called.
    #[tracing::instrument(skip(self, action), name = "store_send")]
    pub async fn send(&self, action: A) -> Result<(), StoreError> {
        if self.shutdown.load(Ordering::Acquire) {
            return Err(StoreError::ShutdownInProgress);
        }
        process(&self.inner, &self.feedback, action).await;
        Ok(())
    }

    /// Read a projection of the current state
    pub async fn state<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&S) -> T,
    {
        let state = self.inner.state.read().await;
        f(&state)
    }

    /// Hand out a synchronous dispatch sink for this store
    ///
    /// All handles from one store share one [`SinkId`]; clones of a handle
    /// are interchangeable. Dispatch enqueues the action and returns
    /// immediately; the event loop applies it in dispatch order.
    #[must_use]
    pub fn dispatcher(&self) -> Dispatcher<A> {
        Dispatcher {
            tx: self.feedback.tx.clone(),
            queued: Arc::clone(&self.feedback.queued),
            closed: Arc::clone(&self.shutdown),
            id: self.sink_id,
        }
    }

    /// Wait until the store is quiescent
    ///
    /// Quiescent means the dispatch queue is empty and no spawned effects are
    /// still running. Does not block new dispatches; an effect that keeps
    /// feeding actions back keeps this waiting.
    pub async fn settle(&self) {
        let poll_interval = Duration::from_millis(1);
        loop {
            let queued = self.feedback.queued.load(Ordering::SeqCst);
            let pending = self.inner.pending_effects.load(Ordering::SeqCst);
            if queued == 0 && pending == 0 {
                return;
            }
            tokio::time::sleep(poll_interval).await;
        }
    }

    /// Stop the store
    ///
    /// The event loop exits, [`Store::send`] starts failing with
    /// [`StoreError::ShutdownInProgress`], and every [`Dispatcher`] starts
    /// failing with [`DispatchError::SinkClosed`]. An action dispatched
    /// concurrently with shutdown may be dropped without being applied.
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Release);
        self.shutdown_notify.notify_one();
        tracing::info!(sink_id = %self.sink_id, "store shutdown requested");
    }
}

impl<S, A, E, R> Clone for Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            feedback: self.feedback.clone(),
            shutdown: Arc::clone(&self.shutdown),
            shutdown_notify: Arc::clone(&self.shutdown_notify),
            sink_id: self.sink_id,
        }
    }
}

/// Run the reducer for one action and spawn its effects
async fn process<S, A, E, R>(inner: &Arc<Inner<S, E, R>>, feedback: &Feedback<A>, action: A)
where
    R: Reducer<State = S, Action = A, Environment = E>,
    A: Send + 'static,
{
    let effects = {
        let mut state = inner.state.write().await;
        inner.reducer.reduce(&mut state, action, &inner.environment)
    };

    for effect in effects {
        if matches!(effect, Effect::None) {
            continue;
        }
        let pending = Arc::clone(&inner.pending_effects);
        pending.fetch_add(1, Ordering::SeqCst);
        let feedback = feedback.clone();
        tokio::spawn(async move {
            execute_effect(effect, feedback).await;
            pending.fetch_sub(1, Ordering::SeqCst);
        });
    }
}

/// Synchronous dispatch sink backed by a store's event loop
///
/// This is the concrete [`DispatchSink`] an
/// [`ActionBinder`](rebound_core::binder::ActionBinder) binds factories to.
/// Dispatch either enqueues the action immediately or faults immediately;
/// processing happens in the store's event loop, in dispatch order.
pub struct Dispatcher<A> {
    tx: mpsc::UnboundedSender<A>,
    queued: Arc<AtomicUsize>,
    closed: Arc<AtomicBool>,
    id: SinkId,
}

impl<A> DispatchSink<A> for Dispatcher<A> {
    fn dispatch(&self, action: A) -> Result<(), DispatchError> {
        if self.closed.load(Ordering::Acquire) {
            return Err(DispatchError::SinkClosed);
        }
        self.queued.fetch_add(1, Ordering::SeqCst);
        if self.tx.send(action).is_err() {
            self.queued.fetch_sub(1, Ordering::SeqCst);
            return Err(DispatchError::SinkClosed);
        }
        Ok(())
    }

    fn identity(&self) -> SinkId {
        self.id
    }
}

impl<A> Clone for Dispatcher<A> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
            queued: Arc::clone(&self.queued),
            closed: Arc::clone(&self.closed),
            id: self.id,
        }
    }
}

impl<A> std::fmt::Debug for Dispatcher<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher").field("id", &self.id).finish()
    }
}
