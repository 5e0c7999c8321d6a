//! Application root: owns the one store of the todolist client.

use crate::actions::TodolistsAction;
use crate::environment::SyncEnvironment;
use crate::error::AppError;
use crate::reducers::AppReducer;
use crate::state::AppState;
use crate::transport::Transport;
use std::sync::Arc;
use std::time::Duration;
use todosync_runtime::{EffectHandle, Store};
use tokio::sync::broadcast;

/// The store type of the todolist client
pub type TodolistsStore = Store<AppState, TodolistsAction, SyncEnvironment, AppReducer>;

/// Long-lived owner of the client state
///
/// Cheap to clone; clones share the store.
///
/// # Example
///
/// ```ignore
/// let app = TodolistsApp::new(Arc::new(HttpTransport::new(&config.api)?), config.client.settle_timeout);
///
/// app.execute(TodolistsAction::FetchTodolists).await?;
/// let titles: Vec<String> = app.state(|s| s.todolists.items().iter().map(|tl| tl.title.clone()).collect()).await;
/// ```
#[derive(Clone)]
pub struct TodolistsApp {
    store: TodolistsStore,
    settle_timeout: Duration,
}

impl TodolistsApp {
    /// Create an app with empty state talking to `transport`
    ///
    /// `settle_timeout` bounds how long [`TodolistsApp::execute`] waits for
    /// a command's outcome.
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>, settle_timeout: Duration) -> Self {
        Self::with_state(AppState::new(), transport, settle_timeout)
    }

    /// Create an app starting from `state`
    #[must_use]
    pub fn with_state(state: AppState, transport: Arc<dyn Transport>, settle_timeout: Duration) -> Self {
        let store = Store::with_broadcast_capacity(
            state,
            AppReducer::new(),
            SyncEnvironment::new(transport),
            256,
        );
        Self {
            store,
            settle_timeout,
        }
    }

    /// Dispatch any action without waiting for its outcome
    ///
    /// Commands start their remote call and return immediately; the handle
    /// completes once the outcome has been reduced.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Store`] if the store is shutting down.
    pub async fn dispatch(&self, action: TodolistsAction) -> Result<EffectHandle, AppError> {
        Ok(self.store.send(action).await?)
    }

    /// Run a command and wait until its outcome has been reduced
    ///
    /// Returns the reconciling event on success.
    ///
    /// # Errors
    ///
    /// - [`AppError::NotACommand`]: `command` is an event; dispatch it instead
    /// - [`AppError::Sync`]: the remote call failed, or `UpdateTask` found no local task
    /// - [`AppError::Store`]: the outcome did not arrive within the settle timeout, or the store is shutting down
    pub async fn execute(&self, command: TodolistsAction) -> Result<TodolistsAction, AppError> {
        if !command.is_command() {
            return Err(AppError::NotACommand(command.kind()));
        }

        let kind = command.kind();
        let expected = command.clone();
        let outcome = self
            .store
            .send_and_wait_for(command, move |action| expected.settles(action), self.settle_timeout)
            .await?;

        match outcome {
            TodolistsAction::SyncFailed { error, .. } => Err(AppError::Sync(error)),
            event => {
                tracing::debug!(command = kind, event = event.kind(), "Command settled");
                Ok(event)
            },
        }
    }

    /// Read current state via a closure
    pub async fn state<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&AppState) -> T,
    {
        self.store.state(f).await
    }

    /// A copy of the current state
    pub async fn snapshot(&self) -> AppState {
        self.store.state(Clone::clone).await
    }

    /// Observe every action produced by a remote call, after it was reduced
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<TodolistsAction> {
        self.store.subscribe_actions()
    }

    /// Refuse new actions and wait for in-flight calls to be reconciled
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Store`] if calls are still running after `timeout`.
    pub async fn shutdown(&self, timeout: Duration) -> Result<(), AppError> {
        Ok(self.store.shutdown(timeout).await?)
    }
}

impl std::fmt::Debug for TodolistsApp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TodolistsApp")
            .field("settle_timeout", &self.settle_timeout)
            .finish_non_exhaustive()
    }
}
