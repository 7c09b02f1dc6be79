//! # Todo Demo
//!
//! A todo list feature wired to a store through memoized action binding.
//!
//! Two binding shapes are demonstrated:
//! - a single `add` factory (`Args = String`)
//! - an ordered `[toggle, remove]` list (`Args = TodoId`)
//!
//! Factories with different argument types bind through separate binders;
//! each binder stays referentially stable for the lifetime of the store.

pub mod reducer;
pub mod types;

pub use reducer::{TodoEnvironment, TodoReducer};
pub use types::{TodoAction, TodoId, TodoItem, TodoState};

/// Action factories - the todo list's dispatch vocabulary
pub mod factories {
    use crate::types::{TodoAction, TodoId};
    use rebound_core::factory::{ActionFactories, Factory};

    /// Factory for [`TodoAction::Add`]
    #[must_use]
    pub fn add() -> Factory<String, TodoAction> {
        Factory::new(|title| TodoAction::Add { title })
    }

    /// Factory for [`TodoAction::Toggle`]
    #[must_use]
    pub fn toggle() -> Factory<TodoId, TodoAction> {
        Factory::new(|id| TodoAction::Toggle { id })
    }

    /// Factory for [`TodoAction::Remove`]
    #[must_use]
    pub fn remove() -> Factory<TodoId, TodoAction> {
        Factory::new(|id| TodoAction::Remove { id })
    }

    /// The per-item controls, in UI order: toggle, remove
    #[must_use]
    pub fn item_controls() -> ActionFactories<TodoId, TodoAction> {
        ActionFactories::list([toggle(), remove()])
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rebound_core::binder::ActionBinder;
    use rebound_core::factory::ActionFactories;
    use rebound_runtime::Store;
    use rebound_testing::test_clock;
    use std::sync::Arc;

    fn todo_store() -> Store<TodoState, TodoAction, TodoEnvironment, TodoReducer> {
        let env = TodoEnvironment::new(Arc::new(test_clock()));
        Store::new(TodoState::default(), TodoReducer::new(), env)
    }

    #[tokio::test]
    async fn add_and_toggle_through_bound_dispatchers() {
        let store = todo_store();
        let dispatcher = store.dispatcher();

        let mut add_binder = ActionBinder::new();
        let add = add_binder
            .bind(
                &ActionFactories::single(factories::add()),
                &dispatcher,
                Some(()),
            )
            .unwrap();
        add.as_single().unwrap().call("buy milk".to_string()).unwrap();
        store.settle().await;

        let id = store.state(|s| s.items[0].id).await;

        let mut item_binder = ActionBinder::new();
        let controls = item_binder
            .bind(&factories::item_controls(), &dispatcher, Some(()))
            .unwrap();
        controls.as_list().unwrap()[0].call(id).unwrap();
        store.settle().await;

        assert_eq!(store.state(|s| s.done_count()).await, 1);
    }

    #[tokio::test]
    async fn remove_through_bound_dispatcher() {
        let store = todo_store();
        let dispatcher = store.dispatcher();

        store
            .send(TodoAction::Add {
                title: "ephemeral".to_string(),
            })
            .await
            .unwrap();
        let id = store.state(|s| s.items[0].id).await;

        let mut binder = ActionBinder::new();
        let controls = binder
            .bind(&factories::item_controls(), &dispatcher, Some(()))
            .unwrap();
        controls.as_list().unwrap()[1].call(id).unwrap();
        store.settle().await;

        assert_eq!(store.state(TodoState::count).await, 0);
    }
}
