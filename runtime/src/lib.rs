//! # Todosync Runtime
//!
//! The [`Store`] is the only place state changes. It serialises every
//! action through the reducer, runs the returned effects on tokio and
//! feeds their results back in.
//!
//! ```ignore
//! use todosync_runtime::Store;
//!
//! let store = Store::new(AppState::default(), AppReducer::new(), environment);
//!
//! let mut handle = store.send(TodolistsAction::FetchTodolists).await?;
//! handle.wait().await;
//! let lists = store.state(|s| s.todolists.len()).await;
//! ```

mod error;
mod store;
mod tracker;

pub use error::StoreError;
pub use store::Store;
pub use tracker::EffectHandle;
