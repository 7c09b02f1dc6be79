//! Counter demo binary
//!
//! Wires the counter feature to a store through a memoized action binder and
//! drives it the way a UI container would.

#![allow(clippy::expect_used)] // demo binary, failures should be loud

use counter::{CounterEnvironment, CounterReducer, CounterState, factories};
use rebound_core::binder::ActionBinder;
use rebound_runtime::Store;
use rebound_testing::test_clock;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "counter=debug,rebound_runtime=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    println!("=== Counter Demo: Memoized Action Binding ===\n");

    let env = CounterEnvironment::new(test_clock());
    let store = Store::new(CounterState::default(), CounterReducer::new(), env);
    let dispatcher = store.dispatcher();

    // Bind the stepping controls once; re-binding with the same deps returns
    // the identical bound dispatchers, like a container re-rendering.
    let stepping = factories::stepping();
    let mut binder = ActionBinder::new();
    let bound = binder
        .bind(&stepping, &dispatcher, Some(()))
        .expect("stepping controls are non-empty");
    let controls = bound.as_list().expect("stepping binds as a list");

    let rebound = binder
        .bind(&stepping, &dispatcher, Some(()))
        .expect("stepping controls are non-empty");
    println!(
        "Re-binding with unchanged deps is a cache hit: {}",
        bound.same_bindings(&rebound)
    );

    println!("\n>>> increment, increment, increment");
    for _ in 0..3 {
        controls[0].call(()).expect("store is running");
    }
    store.settle().await;
    println!("Count: {}", store.state(|s| s.count).await);

    println!("\n>>> decrement");
    controls[1].call(()).expect("store is running");
    store.settle().await;
    println!("Count: {}", store.state(|s| s.count).await);

    // A payload-carrying factory binds separately (different argument type).
    let mut amount_binder = ActionBinder::new();
    let add_ten = amount_binder
        .bind(
            &rebound_core::factory::ActionFactories::single(factories::increment_by()),
            &dispatcher,
            Some(()),
        )
        .expect("single factory is non-empty");
    println!("\n>>> increment_by(10)");
    add_ten
        .as_single()
        .expect("binds as single")
        .call(10)
        .expect("store is running");
    store.settle().await;
    println!("Count: {}", store.state(|s| s.count).await);

    println!("\n>>> reset");
    controls[2].call(()).expect("store is running");
    store.settle().await;
    println!("Count: {}", store.state(|s| s.count).await);

    store.shutdown();
    println!("\n=== Demo Complete ===");
}
