//! Error types for the todolist client

use crate::transport::TransportError;
use crate::types::{TaskId, TodolistId};
use thiserror::Error;
use todosync_runtime::StoreError;

/// Why a synchronization procedure did not reconcile local state
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SyncError {
    /// The remote call failed; local state is unchanged
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// An update targeted a task that is not in local state; no remote call was made
    #[error("Task {task_id} not found in todolist {todolist_id}")]
    TaskNotFound {
        /// List the update targeted
        todolist_id: TodolistId,
        /// Task the update targeted
        task_id: TaskId,
    },
}

/// Errors surfaced by [`crate::app::TodolistsApp`]
#[derive(Error, Debug)]
pub enum AppError {
    /// The store refused the action or the outcome did not arrive in time
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// The procedure ran and failed
    #[error("Sync failed: {0}")]
    Sync(#[from] SyncError),

    /// `execute` was given an event instead of a command
    #[error("{0} is not a command")]
    NotACommand(&'static str),
}
