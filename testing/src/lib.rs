//! # Rebound Testing
//!
//! Testing utilities and helpers for the Rebound action-binding architecture.
//!
//! This crate provides:
//! - Mock implementations of Environment traits ([`mocks::FixedClock`])
//! - A recording dispatch sink for binder tests ([`mocks::RecordingSink`])
//! - A fluent Given-When-Then harness for reducers ([`ReducerTest`])
//!
//! ## Example
//!
//! ```
//! use rebound_core::binder::ActionBinder;
//! use rebound_core::factory::{ActionFactories, Factory};
//! use rebound_testing::mocks::RecordingSink;
//!
//! #[derive(Clone, Debug, PartialEq)]
//! enum Action {
//!     Add(i64),
//! }
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let sink = RecordingSink::new();
//! let factories = ActionFactories::single(Factory::new(Action::Add));
//!
//! let mut binder = ActionBinder::new();
//! let bound = binder.bind(&factories, &sink, Some(()))?;
//! bound.as_single().ok_or("expected single binding")?.call(5)?;
//!
//! assert_eq!(sink.recorded(), vec![Action::Add(5)]);
//! # Ok(())
//! # }
//! ```

use chrono::{DateTime, Utc};
use rebound_core::environment::Clock;

/// Fluent reducer test harness
pub mod reducer_test;

/// Mock implementations for testing.
pub mod mocks {
    use super::{Clock, DateTime, Utc};
    use rebound_core::binder::{DispatchSink, SinkId};
    use rebound_core::error::DispatchError;
    use std::sync::{Arc, Mutex};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use rebound_testing::mocks::FixedClock;
    /// use rebound_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// assert_eq!(clock.now(), clock.now());
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    ///
    /// # Panics
    ///
    /// This function will panic if the hardcoded timestamp fails to parse,
    /// which should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
                .expect("hardcoded timestamp should always parse")
                .with_timezone(&Utc),
        )
    }

    /// Dispatch sink that records every action it receives
    ///
    /// The canonical sink for binder tests: forwarding, ordering, and
    /// fault-propagation properties are all observable through the log.
    /// Clones share the log and the identity; [`RecordingSink::reincarnate`]
    /// keeps the log but mints a fresh identity, simulating a store
    /// replacement.
    #[derive(Debug)]
    pub struct RecordingSink<A> {
        log: Arc<Mutex<Vec<A>>>,
        id: SinkId,
    }

    impl<A> RecordingSink<A> {
        /// Create a sink with an empty log and a fresh identity
        #[must_use]
        pub fn new() -> Self {
            Self {
                log: Arc::new(Mutex::new(Vec::new())),
                id: SinkId::fresh(),
            }
        }

        /// A sink sharing this log under a fresh identity
        ///
        /// From the binder's perspective this is a different store.
        #[must_use]
        pub fn reincarnate(&self) -> Self {
            Self {
                log: Arc::clone(&self.log),
                id: SinkId::fresh(),
            }
        }

        /// How many actions were dispatched
        ///
        /// # Panics
        ///
        /// Panics if a previous holder of the log panicked mid-dispatch.
        #[must_use]
        #[allow(clippy::expect_used)]
        pub fn len(&self) -> usize {
            self.log.lock().expect("recording sink log poisoned").len()
        }

        /// Whether nothing was dispatched
        #[must_use]
        pub fn is_empty(&self) -> bool {
            self.len() == 0
        }

        /// Forget everything dispatched so far
        ///
        /// # Panics
        ///
        /// Panics if a previous holder of the log panicked mid-dispatch.
        #[allow(clippy::expect_used)]
        pub fn clear(&self) {
            self.log.lock().expect("recording sink log poisoned").clear();
        }
    }

    impl<A: Clone> RecordingSink<A> {
        /// Snapshot of the dispatched actions, in dispatch order
        ///
        /// # Panics
        ///
        /// Panics if a previous holder of the log panicked mid-dispatch.
        #[must_use]
        #[allow(clippy::expect_used)]
        pub fn recorded(&self) -> Vec<A> {
            self.log.lock().expect("recording sink log poisoned").clone()
        }
    }

    impl<A> Default for RecordingSink<A> {
        fn default() -> Self {
            Self::new()
        }
    }

    impl<A> Clone for RecordingSink<A> {
        fn clone(&self) -> Self {
            Self {
                log: Arc::clone(&self.log),
                id: self.id,
            }
        }
    }

    impl<A> DispatchSink<A> for RecordingSink<A> {
        fn dispatch(&self, action: A) -> Result<(), DispatchError> {
            self.log
                .lock()
                .map_err(|_| DispatchError::SinkClosed)?
                .push(action);
            Ok(())
        }

        fn identity(&self) -> SinkId {
            self.id
        }
    }
}

// Re-export commonly used items
pub use mocks::{FixedClock, RecordingSink, test_clock};
pub use reducer_test::ReducerTest;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rebound_core::binder::DispatchSink;

    #[test]
    fn fixed_clock_is_deterministic() {
        let clock = test_clock();
        assert_eq!(clock.now(), clock.now());
    }

    #[test]
    fn recording_sink_keeps_order() {
        let sink = RecordingSink::new();
        sink.dispatch(1).unwrap();
        sink.dispatch(2).unwrap();
        sink.dispatch(3).unwrap();

        assert_eq!(sink.recorded(), vec![1, 2, 3]);
        sink.clear();
        assert!(sink.is_empty());
    }

    #[test]
    fn reincarnated_sink_has_fresh_identity() {
        let sink: RecordingSink<i64> = RecordingSink::new();
        let replacement = sink.reincarnate();

        assert_ne!(sink.identity(), replacement.identity());
        // Clones keep the identity.
        assert_eq!(sink.identity(), sink.clone().identity());
    }
}
