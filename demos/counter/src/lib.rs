//! # Counter Demo
//!
//! A counter feature wired to a store through memoized action binding.
//!
//! This demo showcases:
//! - A pure reducer (every effect is `Effect::None`)
//! - Action factories as the feature's public dispatch vocabulary
//! - Binding a factory list to a store's dispatcher with an [`ActionBinder`]
//!
//! ## Example
//!
//! ```no_run
//! use counter::{CounterEnvironment, CounterReducer, CounterState, factories};
//! use rebound_core::binder::ActionBinder;
//! use rebound_runtime::Store;
//! use rebound_testing::test_clock;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let env = CounterEnvironment::new(test_clock());
//! let store = Store::new(CounterState::default(), CounterReducer::new(), env);
//!
//! let mut binder = ActionBinder::new();
//! let bound = binder.bind(&factories::stepping(), &store.dispatcher(), Some(()))?;
//! bound.as_list().ok_or("expected list")?[0].call(())?;
//!
//! store.settle().await;
//! assert_eq!(store.state(|s| s.count).await, 1);
//! # Ok(())
//! # }
//! ```

use rebound_core::effect::Effect;
use rebound_core::environment::Clock;
use rebound_core::reducer::Reducer;
use rebound_core::{SmallVec, smallvec};

/// Counter state
#[derive(Debug, Clone, Default)]
pub struct CounterState {
    /// Current count value
    pub count: i64,
}

/// Counter actions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CounterAction {
    /// Increment the counter by 1
    Increment,
    /// Decrement the counter by 1
    Decrement,
    /// Add an arbitrary amount to the counter
    IncrementBy(i64),
    /// Reset the counter to 0
    Reset,
}

/// Counter environment
///
/// The clock is injected for demonstration of the environment pattern; the
/// counter itself never reads it.
#[derive(Debug, Clone)]
pub struct CounterEnvironment<C: Clock> {
    /// Clock for time-based operations
    pub clock: C,
}

impl<C: Clock> CounterEnvironment<C> {
    /// Create a new counter environment with the given clock
    #[must_use]
    pub const fn new(clock: C) -> Self {
        Self { clock }
    }
}

/// Counter reducer
///
/// A pure state machine: applies each action to the count and produces no
/// effects. Generic over the clock so any [`Clock`] implementation works.
#[derive(Debug, Clone, Copy)]
pub struct CounterReducer<C> {
    _phantom: std::marker::PhantomData<C>,
}

impl<C> CounterReducer<C> {
    /// Create a new counter reducer
    #[must_use]
    pub const fn new() -> Self {
        Self {
            _phantom: std::marker::PhantomData,
        }
    }
}

impl<C> Default for CounterReducer<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> Reducer for CounterReducer<C> {
    type State = CounterState;
    type Action = CounterAction;
    type Environment = CounterEnvironment<C>;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        _environment: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            CounterAction::Increment => {
                state.count = state.count.saturating_add(1);
            },
            CounterAction::Decrement => {
                state.count = state.count.saturating_sub(1);
            },
            CounterAction::IncrementBy(amount) => {
                state.count = state.count.saturating_add(amount);
            },
            CounterAction::Reset => {
                state.count = 0;
            },
        }

        smallvec![Effect::None]
    }
}

/// Action factories - the counter's dispatch vocabulary
///
/// One factory per action, grouped into the shapes the binder accepts.
pub mod factories {
    use super::CounterAction;
    use rebound_core::factory::{ActionFactories, Factory};

    /// Factory for [`CounterAction::Increment`]
    #[must_use]
    pub fn increment() -> Factory<(), CounterAction> {
        Factory::new(|()| CounterAction::Increment)
    }

    /// Factory for [`CounterAction::Decrement`]
    #[must_use]
    pub fn decrement() -> Factory<(), CounterAction> {
        Factory::new(|()| CounterAction::Decrement)
    }

    /// Factory for [`CounterAction::Reset`]
    #[must_use]
    pub fn reset() -> Factory<(), CounterAction> {
        Factory::new(|()| CounterAction::Reset)
    }

    /// Factory for [`CounterAction::IncrementBy`]
    #[must_use]
    pub fn increment_by() -> Factory<i64, CounterAction> {
        Factory::new(CounterAction::IncrementBy)
    }

    /// The stepping controls, in UI order: increment, decrement, reset
    #[must_use]
    pub fn stepping() -> ActionFactories<(), CounterAction> {
        ActionFactories::list([increment(), decrement(), reset()])
    }
}
