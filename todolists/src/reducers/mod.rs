//! Reducers of the todolist client.
//!
//! [`AppReducer`] threads every action through the list container, the task
//! container and the synchronization procedures, in that order, within one
//! dispatch. A list cascade therefore never leaves the two containers out of
//! step.

use crate::actions::TodolistsAction;
use crate::environment::SyncEnvironment;
use crate::state::AppState;
use std::sync::Arc;
use todosync_core::composition::{combine_reducers, scope_reducer, CombinedReducer};
use todosync_core::{effect::Effect, reducer::Reducer, SmallVec};

mod sync;
mod tasks;
mod todolists;

pub use sync::SyncReducer;
pub use tasks::TasksReducer;
pub use todolists::TodolistsReducer;

/// Root reducer over [`AppState`]
#[derive(Clone)]
pub struct AppReducer {
    inner: CombinedReducer<AppState, TodolistsAction, SyncEnvironment>,
}

impl AppReducer {
    /// Creates the composed reducer
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: combine_reducers(vec![
                Arc::new(scope_reducer(TodolistsReducer::new(), |state: &mut AppState| {
                    &mut state.todolists
                })),
                Arc::new(scope_reducer(TasksReducer::new(), |state: &mut AppState| &mut state.tasks)),
                Arc::new(SyncReducer::new()),
            ]),
        }
    }
}

impl Default for AppReducer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for AppReducer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppReducer")
            .field("reducers", &self.inner.len())
            .finish()
    }
}

impl Reducer for AppReducer {
    type State = AppState;
    type Action = TodolistsAction;
    type Environment = SyncEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        tracing::trace!(action = action.kind(), "Reducing");
        self.inner.reduce(state, action, env)
    }
}
