//! Remote transport contract
//!
//! The synchronization procedures talk to the remote todolist service only
//! through [`Transport`]. [`HttpTransport`] binds it to the service's REST
//! API; [`crate::mocks::InMemoryTransport`] keeps a fake server in memory.

use crate::types::{Task, TaskId, Todolist, TodolistId, UpdateTaskModel};
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

mod http;

pub use http::HttpTransport;

/// Boxed future returned by every transport operation
pub type TransportFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, TransportError>> + Send + 'a>>;

/// Errors from the remote transport
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The request never produced a response (connect error, timeout)
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// The service rejected the credentials
    #[error("Unauthorized")]
    Unauthorized,

    /// The service answered with a non-success HTTP status
    #[error("API error {status}: {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Response body or reason
        message: String,
    },

    /// The service answered 200 but refused the operation (non-zero result code)
    #[error("Rejected by service (result code {result_code}): {}", messages.join("; "))]
    Rejected {
        /// The envelope's `resultCode`
        result_code: i32,
        /// The envelope's `messages`
        messages: Vec<String>,
    },

    /// The response body did not have the expected shape
    #[error("Failed to parse response: {0}")]
    ResponseParseFailed(String),
}

/// Remote operations on todolists and tasks
///
/// Every call may fail. Implementations must be usable from many tokio
/// tasks at once.
///
/// Methods return boxed futures so the trait stays object safe and can be
/// shared as `Arc<dyn Transport>`.
pub trait Transport: Send + Sync {
    /// All todolists, in server order
    fn list_todolists(&self) -> TransportFuture<'_, Vec<Todolist>>;

    /// Create a todolist; returns the stored record with its new id
    fn create_todolist(&self, title: &str) -> TransportFuture<'_, Todolist>;

    /// Rename a todolist
    fn update_todolist(&self, id: &TodolistId, title: &str) -> TransportFuture<'_, ()>;

    /// Delete a todolist and its tasks
    fn delete_todolist(&self, id: &TodolistId) -> TransportFuture<'_, ()>;

    /// The tasks of one list, in server order
    fn list_tasks(&self, todolist_id: &TodolistId) -> TransportFuture<'_, Vec<Task>>;

    /// Create a task; returns the stored record
    fn create_task(&self, todolist_id: &TodolistId, title: &str) -> TransportFuture<'_, Task>;

    /// Replace a task's editable fields with `model`
    fn update_task(
        &self,
        todolist_id: &TodolistId,
        task_id: &TaskId,
        model: &UpdateTaskModel,
    ) -> TransportFuture<'_, ()>;

    /// Delete a task
    fn delete_task(&self, todolist_id: &TodolistId, task_id: &TaskId) -> TransportFuture<'_, ()>;
}
