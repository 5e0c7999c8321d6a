//! The closed action vocabulary of the todolist client.
//!
//! Commands start a synchronization procedure (one remote call). Events are
//! the state changes the reducers apply, dispatched by procedures once the
//! remote call succeeded, or directly for client-only changes such as the
//! list filter.

use crate::error::SyncError;
use crate::types::{FilterValue, Task, TaskId, TaskPatch, Todolist, TodolistId};
use todosync_macros::Action;

/// Every input the todolist reducers accept
#[derive(Action, Clone, Debug, PartialEq, Eq)]
pub enum TodolistsAction {
    // Commands
    /// Load every list from the service and replace the local collection
    #[command]
    FetchTodolists,

    /// Load one list's tasks and replace its bucket
    #[command]
    FetchTasks {
        /// List to load
        todolist_id: TodolistId,
    },

    /// Create a list remotely, then add it locally with the server's id
    #[command]
    CreateTodolist {
        /// Title of the new list
        title: String,
    },

    /// Delete a list remotely, then remove it and its bucket locally
    #[command]
    RemoveTodolist {
        /// List to delete
        id: TodolistId,
    },

    /// Rename a list remotely, then locally
    #[command]
    UpdateTodolistTitle {
        /// List to rename
        id: TodolistId,
        /// New title
        title: String,
    },

    /// Create a task remotely, then prepend the server's record locally
    #[command]
    CreateTask {
        /// Owning list
        todolist_id: TodolistId,
        /// Title of the new task
        title: String,
    },

    /// Delete a task remotely, then locally
    #[command]
    RemoveTask {
        /// Owning list
        todolist_id: TodolistId,
        /// Task to delete
        task_id: TaskId,
    },

    /// Merge `patch` onto the local task, send the full record, then apply `patch` locally
    #[command]
    UpdateTask {
        /// Owning list
        todolist_id: TodolistId,
        /// Task to update
        task_id: TaskId,
        /// Fields to change
        patch: TaskPatch,
    },

    // Events
    /// Replace every list, in the given order, each with filter `All`
    #[event]
    TodolistsSet {
        /// Lists as returned by the service
        todolists: Vec<Todolist>,
    },

    /// Append a list with filter `All` and create its empty bucket
    #[event]
    TodolistAdded {
        /// Server-assigned id
        id: TodolistId,
        /// New title
        title: String,
    },

    /// Remove a list and its bucket
    #[event]
    TodolistRemoved {
        /// Affected list
        id: TodolistId,
    },

    /// Replace a list's title
    #[event]
    TodolistTitleChanged {
        /// Affected list
        id: TodolistId,
        /// New title
        title: String,
    },

    /// Replace a list's filter (client-only, no remote call)
    #[event]
    TodolistFilterChanged {
        /// Affected list
        id: TodolistId,
        /// Filter to show
        filter: FilterValue,
    },

    /// Replace a list's bucket, in server order
    #[event]
    TasksSet {
        /// Owning list
        todolist_id: TodolistId,
        /// Full bucket contents, server order
        tasks: Vec<Task>,
    },

    /// Prepend a task to its list's bucket
    #[event]
    TaskAdded {
        /// The server's record
        task: Task,
    },

    /// Remove a task from its list's bucket
    #[event]
    TaskRemoved {
        /// Owning list
        todolist_id: TodolistId,
        /// Affected task
        task_id: TaskId,
    },

    /// Overwrite the patched fields of one task
    #[event]
    TaskUpdated {
        /// Owning list
        todolist_id: TodolistId,
        /// Affected task
        task_id: TaskId,
        /// Exactly the fields the caller asked to change
        patch: TaskPatch,
    },

    /// A procedure finished without reconciling; no reducer changes state
    #[event]
    SyncFailed {
        /// The command that failed
        command: Box<TodolistsAction>,
        /// Why it failed
        error: SyncError,
    },
}

impl TodolistsAction {
    /// Whether `outcome` is the terminal action of this command
    ///
    /// A command settles with its reconciliation event on success, or with a
    /// `SyncFailed` carrying an equal command. Two identical commands in
    /// flight at once cannot be told apart; either outcome settles both.
    ///
    /// Creations are matched without comparing titles, since the service may
    /// store a normalised title. A `CreateTodolist` settles on any
    /// `TodolistAdded` and a `CreateTask` on any `TaskAdded` for its list, so
    /// concurrent creations in one list may settle on each other's record.
    #[must_use]
    pub fn settles(&self, outcome: &Self) -> bool {
        use TodolistsAction as A;

        if let A::SyncFailed { command, .. } = outcome {
            return command.as_ref() == self;
        }

        match (self, outcome) {
            (A::FetchTodolists, A::TodolistsSet { .. }) | (A::CreateTodolist { .. }, A::TodolistAdded { .. }) => true,
            (A::FetchTasks { todolist_id }, A::TasksSet { todolist_id: set, .. }) => todolist_id == set,
            (A::RemoveTodolist { id }, A::TodolistRemoved { id: removed }) => id == removed,
            (
                A::UpdateTodolistTitle { id, title },
                A::TodolistTitleChanged {
                    id: changed,
                    title: new_title,
                },
            ) => id == changed && title == new_title,
            (A::CreateTask { todolist_id, .. }, A::TaskAdded { task }) => *todolist_id == task.todo_list_id,
            (
                A::RemoveTask {
                    todolist_id,
                    task_id,
                },
                A::TaskRemoved {
                    todolist_id: list,
                    task_id: removed,
                },
            ) => todolist_id == list && task_id == removed,
            (
                A::UpdateTask {
                    todolist_id,
                    task_id,
                    patch,
                },
                A::TaskUpdated {
                    todolist_id: list,
                    task_id: updated,
                    patch: applied,
                },
            ) => todolist_id == list && task_id == updated && patch == applied,
            _ => false,
        }
    }

    /// Wrap a failure of this command
    #[must_use]
    pub fn failed(self, error: impl Into<SyncError>) -> Self {
        Self::SyncFailed {
            command: Box::new(self),
            error: error.into(),
        }
    }
}
