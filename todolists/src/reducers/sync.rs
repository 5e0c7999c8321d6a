//! Synchronization procedures.
//!
//! Each command reduces to exactly one effect performing exactly one remote
//! call. On success the effect feeds back the event that reconciles local
//! state; on failure it feeds back [`TodolistsAction::SyncFailed`], which no
//! reducer applies. Nothing touches state before the remote call succeeds.

use crate::actions::TodolistsAction;
use crate::environment::SyncEnvironment;
use crate::error::SyncError;
use crate::state::AppState;
use crate::types::UpdateTaskModel;
use todosync_core::{async_effect, effect::Effect, reducer::Reducer, smallvec, SmallVec};

/// Turns commands into remote calls
///
/// Operates on [`AppState`] because `UpdateTask` reads the current task to
/// build the full record the service requires.
#[derive(Clone, Debug, Default)]
pub struct SyncReducer;

impl SyncReducer {
    /// Creates a new `SyncReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

/// Feed back `event` on success, or the command's failure
fn settle<T>(
    command: TodolistsAction,
    result: Result<T, impl Into<SyncError>>,
    event: impl FnOnce(T) -> TodolistsAction,
) -> Option<TodolistsAction> {
    match result {
        Ok(value) => Some(event(value)),
        Err(error) => {
            let error = error.into();
            tracing::warn!(command = command.kind(), %error, "Remote call failed");
            Some(command.failed(error))
        },
    }
}

impl Reducer for SyncReducer {
    type State = AppState;
    type Action = TodolistsAction;
    type Environment = SyncEnvironment;

    #[allow(clippy::too_many_lines)] // One arm per procedure
    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        if !action.is_command() {
            return SmallVec::new();
        }

        let transport = env.transport.clone();
        let command = action.clone();
        tracing::debug!(command = command.kind(), "Starting remote call");

        let effect = match action {
            TodolistsAction::FetchTodolists => async_effect! {
                let result = transport.list_todolists().await;
                settle(command, result, |todolists| TodolistsAction::TodolistsSet { todolists })
            },
            TodolistsAction::FetchTasks { todolist_id } => async_effect! {
                let result = transport.list_tasks(&todolist_id).await;
                settle(command, result, |tasks| TodolistsAction::TasksSet { todolist_id, tasks })
            },
            TodolistsAction::CreateTodolist { title } => async_effect! {
                let result = transport.create_todolist(&title).await;
                settle(command, result, |todolist| TodolistsAction::TodolistAdded {
                    id: todolist.id,
                    title: todolist.title,
                })
            },
            TodolistsAction::RemoveTodolist { id } => async_effect! {
                let result = transport.delete_todolist(&id).await;
                settle(command, result, |()| TodolistsAction::TodolistRemoved { id })
            },
            TodolistsAction::UpdateTodolistTitle { id, title } => async_effect! {
                let result = transport.update_todolist(&id, &title).await;
                settle(command, result, |()| TodolistsAction::TodolistTitleChanged { id, title })
            },
            TodolistsAction::CreateTask { todolist_id, title } => async_effect! {
                let result = transport.create_task(&todolist_id, &title).await;
                settle(command, result, |task| TodolistsAction::TaskAdded { task })
            },
            TodolistsAction::RemoveTask {
                todolist_id,
                task_id,
            } => async_effect! {
                let result = transport.delete_task(&todolist_id, &task_id).await;
                settle(command, result, |()| TodolistsAction::TaskRemoved { todolist_id, task_id })
            },
            TodolistsAction::UpdateTask {
                todolist_id,
                task_id,
                patch,
            } => {
                let Some(task) = state.tasks.task(&todolist_id, &task_id) else {
                    tracing::warn!(%todolist_id, %task_id, "Update aborted: task not in local state");
                    let error = SyncError::TaskNotFound {
                        todolist_id,
                        task_id,
                    };
                    return smallvec![async_effect! { Some(command.failed(error)) }];
                };

                let model = UpdateTaskModel::merge(task, &patch);
                async_effect! {
                    let result = transport.update_task(&todolist_id, &task_id, &model).await;
                    settle(command, result, |()| TodolistsAction::TaskUpdated {
                        todolist_id,
                        task_id,
                        patch,
                    })
                }
            },
            _ => return SmallVec::new(),
        };

        smallvec![effect]
    }
}
