//! # Rebound Core
//!
//! Core traits and types for the Rebound action-binding architecture.
//!
//! This crate provides the vocabulary for wiring pure action factories to a
//! store's dispatch sink, and the memoized binder that keeps the resulting
//! bound dispatchers referentially stable across repeated wiring passes.
//!
//! ## Core Concepts
//!
//! - **Action**: A plain enum describing an intended state transition
//! - **Factory**: Pure function `Args → Action` ([`factory::Factory`])
//! - **Dispatch Sink**: The single entry point that forwards an action into a
//!   store ([`binder::DispatchSink`])
//! - **Bound Dispatcher**: One factory paired with one sink; calling it
//!   constructs the action and dispatches it immediately
//! - **Action Binder**: A single-slot memoized cache of bound dispatchers,
//!   keyed by sink identity plus a caller-supplied dependency key
//! - **Reducer**: Pure function `(State, Action, Environment) → (State, Effects)`
//!
//! ## Architecture Principles
//!
//! - Unidirectional data flow: factories describe, sinks forward, reducers apply
//! - Explicit dependency injection: the sink is a parameter, never ambient state
//! - Closed shapes: "one factory or many" is a tagged enum, not runtime inspection
//! - Faults propagate: the binder never swallows a factory error
//!
//! ## Example
//!
//! ```
//! use rebound_core::binder::{ActionBinder, DispatchSink, SinkId};
//! use rebound_core::error::DispatchError;
//! use rebound_core::factory::{ActionFactories, Factory};
//!
//! #[derive(Clone, Debug, PartialEq)]
//! enum CounterAction {
//!     Add(i64),
//! }
//!
//! #[derive(Clone)]
//! struct NullSink(SinkId);
//!
//! impl DispatchSink<CounterAction> for NullSink {
//!     fn dispatch(&self, _action: CounterAction) -> Result<(), DispatchError> {
//!         Ok(())
//!     }
//!
//!     fn identity(&self) -> SinkId {
//!         self.0
//!     }
//! }
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let sink = NullSink(SinkId::fresh());
//! let factories = ActionFactories::single(Factory::new(CounterAction::Add));
//!
//! let mut binder = ActionBinder::new();
//! let bound = binder.bind(&factories, &sink, Some(()))?;
//! let again = binder.bind(&factories, &sink, Some(()))?;
//! assert!(bound.same_bindings(&again));
//! # Ok(())
//! # }
//! ```

// Re-export commonly used types
pub use chrono::{DateTime, Utc};
pub use serde::{Deserialize, Serialize};
pub use smallvec::{SmallVec, smallvec};

pub use binder::{ActionBinder, Bound, BoundDispatcher, DispatchSink, SinkId};
pub use error::{BindError, DispatchError, FactoryError};
pub use factory::{ActionFactories, Factory};

/// Error module - fault taxonomy for binding and dispatch
///
/// Three concerns, three types:
///
/// - [`BindError`]: the factory collection handed to the binder violates its
///   contract (detected at bind time, not deferred)
/// - [`FactoryError`]: an action factory faulted while constructing an action
/// - [`DispatchError`]: invoking a bound dispatcher failed, either because the
///   factory faulted or because the sink is no longer accepting actions
pub mod error {
    use thiserror::Error;

    /// Fault raised by an action factory while constructing an action.
    ///
    /// Factories are pure, so the only thing a fault can carry is a
    /// description of what the factory rejected.
    #[derive(Debug, Clone, PartialEq, Eq, Error)]
    #[error("action factory failed: {message}")]
    pub struct FactoryError {
        message: String,
    }

    impl FactoryError {
        /// Create a factory fault with the given description
        #[must_use]
        pub fn new(message: impl Into<String>) -> Self {
            Self {
                message: message.into(),
            }
        }

        /// The fault description
        #[must_use]
        pub fn message(&self) -> &str {
            &self.message
        }
    }

    /// Contract violation detected when binding a factory collection.
    ///
    /// The closed [`ActionFactories`](crate::factory::ActionFactories) shape
    /// makes "not a callable" unrepresentable; the residual violation is a
    /// collection with nothing in it to bind.
    #[derive(Debug, Clone, PartialEq, Eq, Error)]
    pub enum BindError {
        /// The factory list or map was empty
        #[error("no action factories supplied")]
        NoFactories,
    }

    /// Failure while invoking a bound dispatcher.
    #[derive(Debug, Clone, PartialEq, Eq, Error)]
    pub enum DispatchError {
        /// The factory faulted; nothing was dispatched
        #[error(transparent)]
        Factory(#[from] FactoryError),

        /// The sink's store has shut down and no longer accepts actions
        #[error("dispatch sink is closed")]
        SinkClosed,
    }
}

/// Factory module - pure action construction
///
/// A [`Factory`] wraps a pure function from call arguments to an action.
/// Factories never dispatch; they only describe. The closed
/// [`ActionFactories`] enum captures the supported collection shapes (one,
/// an ordered list, or a name-keyed map) so the binder can resolve each shape
/// explicitly instead of inspecting types at runtime.
pub mod factory {
    use crate::error::FactoryError;
    use std::collections::BTreeMap;
    use std::sync::Arc;

    type MakeFn<Args, A> = dyn Fn(Args) -> Result<A, FactoryError> + Send + Sync;

    /// A pure action factory: `Args → Action`.
    ///
    /// Cheap to clone (shared function pointer). Invoking a factory has no
    /// side effects; it either produces an action or faults.
    pub struct Factory<Args, A> {
        make: Arc<MakeFn<Args, A>>,
    }

    impl<Args, A> Factory<Args, A> {
        /// Create a factory from an infallible constructor
        #[must_use]
        pub fn new<F>(make: F) -> Self
        where
            F: Fn(Args) -> A + Send + Sync + 'static,
        {
            Self {
                make: Arc::new(move |args| Ok(make(args))),
            }
        }

        /// Create a factory whose constructor can fault
        ///
        /// The fault is propagated unchanged to whoever invokes the factory;
        /// nothing in this crate recovers from it.
        #[must_use]
        pub fn fallible<F>(make: F) -> Self
        where
            F: Fn(Args) -> Result<A, FactoryError> + Send + Sync + 'static,
        {
            Self {
                make: Arc::new(make),
            }
        }

        /// Construct an action from the given arguments
        ///
        /// # Errors
        ///
        /// Returns the [`FactoryError`] raised by a fallible constructor.
        pub fn create(&self, args: Args) -> Result<A, FactoryError> {
            (self.make)(args)
        }
    }

    impl<Args, A> Clone for Factory<Args, A> {
        fn clone(&self) -> Self {
            Self {
                make: Arc::clone(&self.make),
            }
        }
    }

    impl<Args, A> std::fmt::Debug for Factory<Args, A> {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "Factory(<fn>)")
        }
    }

    /// The collection shapes a binder accepts.
    ///
    /// All factories in one collection share the same argument type; callers
    /// with heterogeneous argument types bind one collection per type.
    /// `Named` uses a [`BTreeMap`] so iteration order is deterministic.
    #[derive(Debug)]
    pub enum ActionFactories<Args, A> {
        /// One factory
        Single(Factory<Args, A>),
        /// An ordered list of factories; binding preserves order
        List(Vec<Factory<Args, A>>),
        /// Factories keyed by name; binding preserves the names
        Named(BTreeMap<String, Factory<Args, A>>),
    }

    impl<Args, A> ActionFactories<Args, A> {
        /// Wrap a single factory
        #[must_use]
        pub const fn single(factory: Factory<Args, A>) -> Self {
            Self::Single(factory)
        }

        /// Collect an ordered list of factories
        #[must_use]
        pub fn list(factories: impl IntoIterator<Item = Factory<Args, A>>) -> Self {
            Self::List(factories.into_iter().collect())
        }

        /// Collect name-keyed factories
        #[must_use]
        pub fn named<N>(entries: impl IntoIterator<Item = (N, Factory<Args, A>)>) -> Self
        where
            N: Into<String>,
        {
            Self::Named(
                entries
                    .into_iter()
                    .map(|(name, factory)| (name.into(), factory))
                    .collect(),
            )
        }

        /// Number of factories in the collection
        #[must_use]
        pub fn len(&self) -> usize {
            match self {
                Self::Single(_) => 1,
                Self::List(factories) => factories.len(),
                Self::Named(factories) => factories.len(),
            }
        }

        /// Whether the collection has nothing to bind
        #[must_use]
        pub fn is_empty(&self) -> bool {
            self.len() == 0
        }
    }

    impl<Args, A> Clone for ActionFactories<Args, A> {
        fn clone(&self) -> Self {
            match self {
                Self::Single(factory) => Self::Single(factory.clone()),
                Self::List(factories) => Self::List(factories.clone()),
                Self::Named(factories) => Self::Named(factories.clone()),
            }
        }
    }

}

/// Binder module - memoized binding of factories to a dispatch sink
///
/// The binder is a pure single-slot cache: it rebuilds its bound dispatchers
/// only when the sink identity or the caller-supplied dependency key changes,
/// and otherwise hands back the previously built set unchanged. Identity of a
/// bound dispatcher is pointer identity of its shared allocation, so a cache
/// hit is observable through [`BoundDispatcher::same_binding`].
pub mod binder {
    use crate::error::{BindError, DispatchError};
    use crate::factory::{ActionFactories, Factory};
    use std::collections::BTreeMap;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU64, Ordering};

    /// Process-unique identity of a dispatch sink.
    ///
    /// Every store (or mock sink) mints one id at construction; handing out a
    /// new id is how "the store was replaced" becomes visible to the binder's
    /// memoization key.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct SinkId(u64);

    impl SinkId {
        /// Mint a new process-unique sink identity
        #[must_use]
        pub fn fresh() -> Self {
            static NEXT: AtomicU64 = AtomicU64::new(0);
            Self(NEXT.fetch_add(1, Ordering::Relaxed))
        }
    }

    impl std::fmt::Display for SinkId {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "sink-{}", self.0)
        }
    }

    /// The single entry point that forwards an action into a store.
    ///
    /// Dispatch is synchronous from the caller's perspective: it either
    /// accepts the action immediately or faults immediately. The sink is
    /// injected explicitly wherever binding happens; nothing in this crate
    /// reads ambient context.
    pub trait DispatchSink<A> {
        /// Forward one action into the store
        ///
        /// # Errors
        ///
        /// Returns [`DispatchError::SinkClosed`] if the store behind the sink
        /// no longer accepts actions.
        fn dispatch(&self, action: A) -> Result<(), DispatchError>;

        /// Stable identity of the store behind this sink
        ///
        /// All clones of one sink report the same id; a replacement store
        /// reports a different one.
        fn identity(&self) -> SinkId;
    }

    struct BoundInner<Args, A, D> {
        factory: Factory<Args, A>,
        sink: D,
    }

    /// One factory paired with one sink.
    ///
    /// Calling a bound dispatcher constructs the action and forwards it to
    /// the sink in a single synchronous step. Clones share the same pairing,
    /// so identity survives cloning.
    pub struct BoundDispatcher<Args, A, D> {
        inner: Arc<BoundInner<Args, A, D>>,
    }

    impl<Args, A, D> BoundDispatcher<Args, A, D>
    where
        D: DispatchSink<A>,
    {
        fn bind(factory: Factory<Args, A>, sink: D) -> Self {
            Self {
                inner: Arc::new(BoundInner { factory, sink }),
            }
        }

        /// Construct the action and dispatch it.
        ///
        /// Exactly one observable side effect on success: a single dispatch
        /// of the factory's action.
        ///
        /// # Errors
        ///
        /// - [`DispatchError::Factory`] if the factory faults; nothing is
        ///   dispatched in that case
        /// - [`DispatchError::SinkClosed`] if the sink rejects the action
        pub fn call(&self, args: Args) -> Result<(), DispatchError> {
            let action = self.inner.factory.create(args)?;
            self.inner.sink.dispatch(action)
        }
    }

    impl<Args, A, D> BoundDispatcher<Args, A, D> {
        /// Whether two handles are the same binding (cache-hit identity)
        #[must_use]
        pub fn same_binding(&self, other: &Self) -> bool {
            Arc::ptr_eq(&self.inner, &other.inner)
        }
    }

    impl<Args, A, D> Clone for BoundDispatcher<Args, A, D> {
        fn clone(&self) -> Self {
            Self {
                inner: Arc::clone(&self.inner),
            }
        }
    }

    impl<Args, A, D> std::fmt::Debug for BoundDispatcher<Args, A, D> {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "BoundDispatcher(<factory + sink>)")
        }
    }

    /// Bound dispatchers in the same shape as the factories they came from.
    #[derive(Debug)]
    pub enum Bound<Args, A, D> {
        /// Binding of [`ActionFactories::Single`]
        Single(BoundDispatcher<Args, A, D>),
        /// Binding of [`ActionFactories::List`], in factory order
        List(Vec<BoundDispatcher<Args, A, D>>),
        /// Binding of [`ActionFactories::Named`], under the same names
        Named(BTreeMap<String, BoundDispatcher<Args, A, D>>),
    }

    impl<Args, A, D> Bound<Args, A, D> {
        /// The single bound dispatcher, if this is a `Single` binding
        #[must_use]
        pub const fn as_single(&self) -> Option<&BoundDispatcher<Args, A, D>> {
            match self {
                Self::Single(bound) => Some(bound),
                _ => None,
            }
        }

        /// The ordered bindings, if this is a `List` binding
        #[must_use]
        pub fn as_list(&self) -> Option<&[BoundDispatcher<Args, A, D>]> {
            match self {
                Self::List(bound) => Some(bound),
                _ => None,
            }
        }

        /// The binding under `name`, if this is a `Named` binding
        #[must_use]
        pub fn named(&self, name: &str) -> Option<&BoundDispatcher<Args, A, D>> {
            match self {
                Self::Named(bound) => bound.get(name),
                _ => None,
            }
        }

        /// Whether two results hold the identical bindings, pairwise.
        ///
        /// False when the shapes differ. This is the observable form of the
        /// referential-stability guarantee: a cache hit returns bindings for
        /// which this is true.
        #[must_use]
        pub fn same_bindings(&self, other: &Self) -> bool {
            match (self, other) {
                (Self::Single(a), Self::Single(b)) => a.same_binding(b),
                (Self::List(a), Self::List(b)) => {
                    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.same_binding(y))
                },
                (Self::Named(a), Self::Named(b)) => {
                    a.len() == b.len()
                        && a.iter().zip(b).all(|((name_a, x), (name_b, y))| {
                            name_a == name_b && x.same_binding(y)
                        })
                },
                _ => false,
            }
        }
    }

    impl<Args, A, D> Clone for Bound<Args, A, D> {
        fn clone(&self) -> Self {
            match self {
                Self::Single(bound) => Self::Single(bound.clone()),
                Self::List(bound) => Self::List(bound.clone()),
                Self::Named(bound) => Self::Named(bound.clone()),
            }
        }
    }

    struct CacheEntry<Args, A, K, D> {
        sink: SinkId,
        deps: K,
        bound: Bound<Args, A, D>,
    }

    /// Single-slot memoized action binder.
    ///
    /// One binder per call site, exactly as a per-call-site memo primitive
    /// would behave: the slot holds the most recent `(sink identity, deps)`
    /// key and its bindings, nothing more. A changed key evicts the slot; an
    /// unchanged key returns the cached bindings without rebuilding anything.
    ///
    /// # Dependency key policy
    ///
    /// `deps` is a memoization trigger only; it is never passed to the
    /// factories. The two edge cases get one explicit policy each:
    ///
    /// - `deps = None` clears the slot and rebuilds on every call (no caching)
    /// - `deps = Some(())` caches once per sink lifetime
    pub struct ActionBinder<Args, A, K, D> {
        cache: Option<CacheEntry<Args, A, K, D>>,
    }

    impl<Args, A, K, D> ActionBinder<Args, A, K, D>
    where
        K: PartialEq,
        D: DispatchSink<A> + Clone,
    {
        /// Create a binder with an empty cache slot
        #[must_use]
        pub const fn new() -> Self {
            Self { cache: None }
        }

        /// Bind factories to the sink, memoized on `(sink identity, deps)`.
        ///
        /// Returns bindings in the same shape and order as `factories`. On a
        /// cache hit the returned handles are the identical bindings from the
        /// previous call ([`Bound::same_bindings`] is true); the factories
        /// argument is not consulted beyond its contract check, matching a
        /// memo primitive that only re-evaluates when its key changes.
        ///
        /// # Errors
        ///
        /// Returns [`BindError::NoFactories`] if `factories` is an empty list
        /// or map. The contract is checked on every call, before the cache.
        pub fn bind(
            &mut self,
            factories: &ActionFactories<Args, A>,
            sink: &D,
            deps: Option<K>,
        ) -> Result<Bound<Args, A, D>, BindError> {
            if factories.is_empty() {
                return Err(BindError::NoFactories);
            }

            let Some(deps) = deps else {
                // No key, no caching: rebuild every call.
                self.cache = None;
                return Ok(Self::rebind(factories, sink));
            };

            let sink_id = sink.identity();
            if let Some(entry) = &self.cache {
                if entry.sink == sink_id && entry.deps == deps {
                    return Ok(entry.bound.clone());
                }
            }

            let bound = Self::rebind(factories, sink);
            self.cache = Some(CacheEntry {
                sink: sink_id,
                deps,
                bound: bound.clone(),
            });
            Ok(bound)
        }

        fn rebind(factories: &ActionFactories<Args, A>, sink: &D) -> Bound<Args, A, D> {
            match factories {
                ActionFactories::Single(factory) => {
                    Bound::Single(BoundDispatcher::bind(factory.clone(), sink.clone()))
                },
                ActionFactories::List(factories) => Bound::List(
                    factories
                        .iter()
                        .map(|factory| BoundDispatcher::bind(factory.clone(), sink.clone()))
                        .collect(),
                ),
                ActionFactories::Named(factories) => Bound::Named(
                    factories
                        .iter()
                        .map(|(name, factory)| {
                            (name.clone(), BoundDispatcher::bind(factory.clone(), sink.clone()))
                        })
                        .collect(),
                ),
            }
        }
    }

    impl<Args, A, K, D> Default for ActionBinder<Args, A, K, D>
    where
        K: PartialEq,
        D: DispatchSink<A> + Clone,
    {
        fn default() -> Self {
            Self::new()
        }
    }

    #[cfg(test)]
    #[allow(clippy::unwrap_used, clippy::expect_used)]
    mod tests {
        use super::*;
        use crate::error::FactoryError;
        use std::sync::Mutex;

        #[derive(Debug, Clone, PartialEq)]
        enum TestAction {
            Add(i64),
            Clear,
        }

        #[derive(Debug, Clone)]
        struct VecSink {
            log: Arc<Mutex<Vec<TestAction>>>,
            id: SinkId,
        }

        impl VecSink {
            fn new() -> Self {
                Self {
                    log: Arc::new(Mutex::new(Vec::new())),
                    id: SinkId::fresh(),
                }
            }

            fn recorded(&self) -> Vec<TestAction> {
                self.log.lock().expect("sink log poisoned").clone()
            }
        }

        impl DispatchSink<TestAction> for VecSink {
            fn dispatch(&self, action: TestAction) -> Result<(), DispatchError> {
                self.log.lock().expect("sink log poisoned").push(action);
                Ok(())
            }

            fn identity(&self) -> SinkId {
                self.id
            }
        }

        fn add_factory() -> Factory<i64, TestAction> {
            Factory::new(TestAction::Add)
        }

        #[test]
        fn stable_across_calls_with_equal_deps() {
            let sink = VecSink::new();
            let factories = ActionFactories::single(add_factory());
            let mut binder = ActionBinder::new();

            let first = binder.bind(&factories, &sink, Some(("a", 1))).unwrap();
            let second = binder.bind(&factories, &sink, Some(("a", 1))).unwrap();

            assert!(first.same_bindings(&second));
        }

        #[test]
        fn recomputes_when_deps_change() {
            let sink = VecSink::new();
            let factories = ActionFactories::single(add_factory());
            let mut binder = ActionBinder::new();

            let first = binder.bind(&factories, &sink, Some(1)).unwrap();
            let second = binder.bind(&factories, &sink, Some(2)).unwrap();

            assert!(!first.same_bindings(&second));
        }

        #[test]
        fn recomputes_when_sink_identity_changes() {
            let factories = ActionFactories::single(add_factory());
            let mut binder = ActionBinder::new();

            let first = binder.bind(&factories, &VecSink::new(), Some(())).unwrap();
            let second = binder.bind(&factories, &VecSink::new(), Some(())).unwrap();

            assert!(!first.same_bindings(&second));
        }

        #[test]
        fn no_deps_rebuilds_every_call() {
            let sink = VecSink::new();
            let factories = ActionFactories::single(add_factory());
            let mut binder: ActionBinder<_, _, (), _> = ActionBinder::new();

            let first = binder.bind(&factories, &sink, None).unwrap();
            let second = binder.bind(&factories, &sink, None).unwrap();

            assert!(!first.same_bindings(&second));
            // Every rebuilt binding is still usable.
            second.as_single().unwrap().call(7).unwrap();
            assert_eq!(sink.recorded(), vec![TestAction::Add(7)]);
        }

        #[test]
        fn forwards_exactly_one_action() {
            let sink = VecSink::new();
            let factories = ActionFactories::single(add_factory());
            let mut binder = ActionBinder::new();

            let bound = binder.bind(&factories, &sink, Some(())).unwrap();
            bound.as_single().unwrap().call(5).unwrap();

            assert_eq!(sink.recorded(), vec![TestAction::Add(5)]);
        }

        #[test]
        fn list_preserves_shape_and_order() {
            let sink = VecSink::new();
            let factories = ActionFactories::list([
                Factory::new(TestAction::Add),
                Factory::new(|_: i64| TestAction::Clear),
            ]);
            let mut binder = ActionBinder::new();

            let bound = binder.bind(&factories, &sink, Some(())).unwrap();
            let list = bound.as_list().unwrap();
            assert_eq!(list.len(), 2);

            // Index 0 dispatches only the first factory's action.
            list[0].call(9).unwrap();
            assert_eq!(sink.recorded(), vec![TestAction::Add(9)]);

            list[1].call(0).unwrap();
            assert_eq!(sink.recorded(), vec![TestAction::Add(9), TestAction::Clear]);
        }

        #[test]
        fn named_binds_under_same_names() {
            let sink = VecSink::new();
            let factories = ActionFactories::named([("add", add_factory())]);
            let mut binder = ActionBinder::new();

            let bound = binder.bind(&factories, &sink, Some(())).unwrap();
            assert!(bound.named("missing").is_none());
            bound.named("add").unwrap().call(3).unwrap();

            assert_eq!(sink.recorded(), vec![TestAction::Add(3)]);
        }

        #[test]
        fn factory_fault_propagates_and_dispatches_nothing() {
            let sink = VecSink::new();
            let factories = ActionFactories::single(Factory::fallible(|_: i64| {
                Err::<TestAction, _>(FactoryError::new("rejected"))
            }));
            let mut binder = ActionBinder::new();

            let bound = binder.bind(&factories, &sink, Some(())).unwrap();
            let err = bound.as_single().unwrap().call(1).unwrap_err();

            assert_eq!(err, DispatchError::Factory(FactoryError::new("rejected")));
            assert!(sink.recorded().is_empty());
        }

        #[test]
        fn empty_collections_are_a_bind_fault() {
            let sink = VecSink::new();
            let mut binder: ActionBinder<i64, TestAction, (), _> = ActionBinder::new();

            let empty_list: ActionFactories<i64, TestAction> = ActionFactories::list([]);
            assert_eq!(
                binder.bind(&empty_list, &sink, Some(())).unwrap_err(),
                BindError::NoFactories
            );

            let empty_map: ActionFactories<i64, TestAction> =
                ActionFactories::named(Vec::<(String, _)>::new());
            assert_eq!(
                binder.bind(&empty_map, &sink, Some(())).unwrap_err(),
                BindError::NoFactories
            );
        }

        #[test]
        fn stale_entry_is_evicted_not_resurrected() {
            let sink = VecSink::new();
            let factories = ActionFactories::single(add_factory());
            let mut binder = ActionBinder::new();

            let first = binder.bind(&factories, &sink, Some(1)).unwrap();
            let _second = binder.bind(&factories, &sink, Some(2)).unwrap();
            // Returning to the first key must not return the first bindings:
            // the slot only remembers the most recent entry.
            let third = binder.bind(&factories, &sink, Some(1)).unwrap();

            assert!(!first.same_bindings(&third));
        }
    }
}

/// Reducer module - the core trait for state transitions
///
/// Reducers are pure functions `(State, Action, Environment) → (State,
/// Effects)`. They contain all state-transition logic; stores own one and run
/// it for every action a dispatch sink forwards.
pub mod reducer {
    use crate::effect::Effect;
    use smallvec::SmallVec;

    /// The Reducer trait - applies one action to state
    ///
    /// # Type Parameters
    ///
    /// - `State`: The domain state this reducer operates on
    /// - `Action`: The action type this reducer processes
    /// - `Environment`: The injected dependencies this reducer needs
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// Reduce an action into state changes and effects
        ///
        /// Pure: updates state in place and returns descriptions of side
        /// effects for the store runtime to execute. Must not perform I/O.
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
/// Effects are values, not execution. Reducers return them; the store runtime
/// executes them and feeds any produced actions back through the dispatch
/// channel.
pub mod effect {
    use std::future::Future;
    use std::pin::Pin;
    use std::time::Duration;

    /// Description of a side effect for the store runtime to execute
    pub enum Effect<Action> {
        /// No-op effect
        None,

        /// Run effects in parallel
        Parallel(Vec<Effect<Action>>),

        /// Run effects sequentially
        Sequential(Vec<Effect<Action>>),

        /// Dispatch an action after a delay
        Delay {
            /// How long to wait
            duration: Duration,
            /// Action to dispatch after the delay
            action: Box<Action>,
        },

        /// Arbitrary async computation
        ///
        /// If the future resolves to `Some(action)`, the action is fed back
        /// into the reducer.
        Future(Pin<Box<dyn Future<Output = Option<Action>> + Send>>),
    }

    // Manual Debug since Future doesn't implement it
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
                Effect::Delay { duration, action } => f
                    .debug_struct("Effect::Delay")
                    .field("duration", duration)
                    .field("action", action)
                    .finish(),
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
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn merge_is_parallel() {
            let merged: Effect<()> = Effect::merge(vec![Effect::None, Effect::None]);
            assert!(matches!(merged, Effect::Parallel(v) if v.len() == 2));
        }

        #[test]
        fn chain_is_sequential() {
            let chained: Effect<()> = Effect::chain(vec![Effect::None]);
            assert!(matches!(chained, Effect::Sequential(v) if v.len() == 1));
        }
    }
}

/// Environment module - dependency injection traits
///
/// External dependencies a reducer needs are abstracted behind traits and
/// injected via the Environment parameter.
pub mod environment {
    use chrono::{DateTime, Utc};

    /// Clock trait - abstracts time operations for testability
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;
    }
}
