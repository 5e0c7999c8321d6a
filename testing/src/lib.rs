//! # Todosync Testing
//!
//! Testing utilities for reducers and the effects they return.
//!
//! This crate provides:
//! - [`ReducerTest`]: Given-When-Then builder for reducers
//! - [`assertions`]: Assertion helpers for effect lists
//! - [`effects`]: Drives effects to completion without a store
//! - [`init_test_tracing`]: Log output for tests that want it
//!
//! ## Example
//!
//! ```ignore
//! use todosync_testing::{ReducerTest, assertions};
//!
//! ReducerTest::new(TodolistsReducer)
//!     .with_env(())
//!     .given_state(TodolistsState::default())
//!     .when_action(TodolistsAction::TodolistAdded { id, title })
//!     .then_state(|state| assert_eq!(state.len(), 1))
//!     .then_effects(assertions::assert_no_effects)
//!     .run();
//! ```


pub use reducer_test::{ReducerTest, assertions};

/// Run effects outside a store
///
/// Reducer tests use this to see which action a command's effect would feed
/// back, against a mock environment, without spinning up a `Store`.
pub mod effects {
    use futures::future::BoxFuture;
    use futures::FutureExt;
    use todosync_core::effect::Effect;

    /// Execute every effect and collect the actions they produce
    ///
    /// `Parallel` children run concurrently and their actions are returned in
    /// declaration order. `Sequential` children run one after another.
    pub async fn collect_actions<A, I>(effects: I) -> Vec<A>
    where
        A: Send + 'static,
        I: IntoIterator<Item = Effect<A>>,
    {
        let mut actions = Vec::new();
        for effect in effects {
            actions.extend(run(effect).await);
        }
        actions
    }

    fn run<A: Send + 'static>(effect: Effect<A>) -> BoxFuture<'static, Vec<A>> {
        async move {
            match effect {
                Effect::None => Vec::new(),
                Effect::Future(fut) => fut.await.into_iter().collect(),
                Effect::Parallel(children) => futures::future::join_all(children.into_iter().map(run))
                    .await
                    .into_iter()
                    .flatten()
                    .collect(),
                Effect::Sequential(children) => {
                    let mut actions = Vec::new();
                    for child in children {
                        actions.extend(run(child).await);
                    }
                    actions
                },
            }
        }
        .boxed()
    }
}

/// Install a `tracing` subscriber that writes through the test harness
///
/// Honours `RUST_LOG`. Safe to call from every test; only the first call
/// installs anything.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
}
