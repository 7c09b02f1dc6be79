//! Reducer logic for the todo list.

use crate::types::{TodoAction, TodoId, TodoItem, TodoState};
use rebound_core::effect::Effect;
use rebound_core::environment::Clock;
use rebound_core::reducer::Reducer;
use rebound_core::{SmallVec, smallvec};
use std::sync::Arc;

/// Environment dependencies for the todo reducer
#[derive(Clone)]
pub struct TodoEnvironment {
    /// Clock for creation timestamps
    pub clock: Arc<dyn Clock>,
}

impl TodoEnvironment {
    /// Creates a new `TodoEnvironment`
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }
}

/// Reducer for the todo list
///
/// Validation is presence-only: a blank title is rejected into `last_error`
/// and nothing is added. Toggling or removing an unknown id is a no-op.
#[derive(Clone, Debug, Default)]
pub struct TodoReducer;

impl TodoReducer {
    /// Creates a new `TodoReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Reducer for TodoReducer {
    type State = TodoState;
    type Action = TodoAction;
    type Environment = TodoEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            TodoAction::Add { title } => {
                if title.trim().is_empty() {
                    state.last_error = Some("todo title cannot be empty".to_string());
                } else {
                    state
                        .items
                        .push(TodoItem::new(TodoId::new(), title, env.clock.now()));
                    state.last_error = None;
                }
            },
            TodoAction::Toggle { id } => {
                if let Some(item) = state.items.iter_mut().find(|item| item.id == id) {
                    item.done = !item.done;
                }
                state.last_error = None;
            },
            TodoAction::Remove { id } => {
                state.items.retain(|item| item.id != id);
                state.last_error = None;
            },
        }

        smallvec![Effect::None]
    }
}
