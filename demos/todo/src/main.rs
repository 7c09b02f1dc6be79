//! Todo demo binary
//!
//! Drives a todo list through bound dispatchers, the way the containers of a
//! UI would: one binding for adding, one for the per-item controls.

#![allow(clippy::expect_used)] // demo binary, failures should be loud

use rebound_core::binder::ActionBinder;
use rebound_core::factory::ActionFactories;
use rebound_runtime::Store;
use std::sync::Arc;
use todo::{TodoEnvironment, TodoReducer, TodoState, factories};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// System clock for the demo
struct SystemClock;

impl rebound_core::environment::Clock for SystemClock {
    fn now(&self) -> rebound_core::DateTime<rebound_core::Utc> {
        rebound_core::Utc::now()
    }
}

async fn print_list(store: &Store<TodoState, todo::TodoAction, TodoEnvironment, TodoReducer>) {
    let lines = store
        .state(|s| {
            s.items
                .iter()
                .map(|item| {
                    let mark = if item.done { "x" } else { " " };
                    format!("  [{mark}] {}", item.title)
                })
                .collect::<Vec<_>>()
        })
        .await;
    if lines.is_empty() {
        println!("  (empty)");
    } else {
        for line in lines {
            println!("{line}");
        }
    }
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "todo=debug,rebound_runtime=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    println!("=== Todo Demo: Memoized Action Binding ===\n");

    let env = TodoEnvironment::new(Arc::new(SystemClock));
    let store = Store::new(TodoState::default(), TodoReducer::new(), env);
    let dispatcher = store.dispatcher();

    let mut add_binder = ActionBinder::new();
    let add_factories = ActionFactories::single(factories::add());
    let add = add_binder
        .bind(&add_factories, &dispatcher, Some(()))
        .expect("single factory is non-empty");
    let add = add.as_single().expect("binds as single");

    println!(">>> add(\"learn action binding\"), add(\"feed the cat\")");
    add.call("learn action binding".to_string())
        .expect("store is running");
    add.call("feed the cat".to_string()).expect("store is running");
    store.settle().await;
    print_list(&store).await;

    println!("\n>>> add(\"\") — rejected by presence validation");
    add.call(String::new()).expect("store is running");
    store.settle().await;
    let error = store.state(|s| s.last_error.clone()).await;
    println!("  last_error: {error:?}");

    let mut item_binder = ActionBinder::new();
    let item_factories = factories::item_controls();
    let controls = item_binder
        .bind(&item_factories, &dispatcher, Some(()))
        .expect("item controls are non-empty");
    let controls = controls.as_list().expect("binds as a list");

    let first_id = store.state(|s| s.items[0].id).await;
    println!("\n>>> toggle(first)");
    controls[0].call(first_id).expect("store is running");
    store.settle().await;
    print_list(&store).await;

    println!("\n>>> remove(first)");
    controls[1].call(first_id).expect("store is running");
    store.settle().await;
    print_list(&store).await;

    store.shutdown();
    println!("\n=== Demo Complete ===");
}
