//! # Todolists
//!
//! Client-side state for a todolist service: named lists of tasks, kept in
//! sync with the remote service through request/response calls.
//!
//! ## Layout
//!
//! - [`types`]: ids, status/priority codes, records, patches
//! - [`actions`]: the closed action vocabulary (commands and events)
//! - [`state`]: the list and task containers
//! - [`reducers`]: container reducers, synchronization procedures, the root reducer
//! - [`transport`]: the remote contract and its HTTP binding
//! - [`selectors`]: read projections
//! - [`app`]: the application root owning the store
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use std::time::Duration;
//! use todolists::{actions::TodolistsAction, app::TodolistsApp, mocks::InMemoryTransport, selectors};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), todolists::AppError> {
//! let app = TodolistsApp::new(Arc::new(InMemoryTransport::new()), Duration::from_secs(5));
//!
//! let TodolistsAction::TodolistAdded { id, .. } = app
//!     .execute(TodolistsAction::CreateTodolist { title: "Groceries".into() })
//!     .await?
//! else {
//!     unreachable!()
//! };
//! app.execute(TodolistsAction::CreateTask { todolist_id: id.clone(), title: "Milk".into() })
//!     .await?;
//!
//! let titles = app
//!     .state(|s| selectors::visible_tasks(s, &id).iter().map(|t| t.title.clone()).collect::<Vec<_>>())
//!     .await;
//! assert_eq!(titles, ["Milk"]);
//! # Ok(())
//! # }
//! ```

pub mod actions;
pub mod app;
pub mod config;
pub mod environment;
pub mod error;
pub mod mocks;
pub mod reducers;
pub mod selectors;
pub mod state;
pub mod transport;
pub mod types;

pub use actions::TodolistsAction;
pub use app::TodolistsApp;
pub use error::{AppError, SyncError};
pub use state::AppState;
