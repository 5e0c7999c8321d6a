//! Reducer for the task container.
//!
//! Besides the task events it reacts to the list lifecycle events, keeping
//! exactly one bucket per known list:
//!
//! | Action | Bucket change |
//! |---|---|
//! | `TodolistAdded` | empty bucket created (existing bucket kept) |
//! | `TodolistRemoved` | bucket dropped |
//! | `TodolistsSet` | buckets of vanished lists dropped, new lists get empty buckets |
//!
//! Task events against a missing bucket or task are no-ops.

use crate::actions::TodolistsAction;
use crate::environment::SyncEnvironment;
use crate::state::TasksState;
use std::collections::HashSet;
use todosync_core::{effect::Effect, reducer::Reducer, SmallVec};

/// Applies task and list lifecycle events to [`TasksState`]
#[derive(Clone, Debug, Default)]
pub struct TasksReducer;

impl TasksReducer {
    /// Creates a new `TasksReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Reducer for TasksReducer {
    type State = TasksState;
    type Action = TodolistsAction;
    type Environment = SyncEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        _env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            TodolistsAction::TasksSet { todolist_id, tasks } => {
                if let Some(bucket) = state.bucket_mut(&todolist_id) {
                    *bucket = tasks;
                } else {
                    tracing::debug!(%todolist_id, "Dropping tasks for unknown todolist");
                }
            },
            TodolistsAction::TaskAdded { task } => {
                if let Some(bucket) = state.bucket_mut(&task.todo_list_id) {
                    if !bucket.iter().any(|t| t.id == task.id) {
                        bucket.insert(0, task);
                    }
                }
            },
            TodolistsAction::TaskRemoved {
                todolist_id,
                task_id,
            } => {
                if let Some(bucket) = state.bucket_mut(&todolist_id) {
                    bucket.retain(|t| t.id != task_id);
                }
            },
            TodolistsAction::TaskUpdated {
                todolist_id,
                task_id,
                patch,
            } => {
                if let Some(task) = state
                    .bucket_mut(&todolist_id)
                    .and_then(|bucket| bucket.iter_mut().find(|t| t.id == task_id))
                {
                    task.apply_patch(&patch);
                }
            },
            TodolistsAction::TodolistAdded { id, .. } => state.ensure_bucket(id),
            TodolistsAction::TodolistRemoved { id } => state.remove_bucket(&id),
            TodolistsAction::TodolistsSet { todolists } => {
                let ids: HashSet<_> = todolists.into_iter().map(|tl| tl.id).collect();
                state.retain_buckets(|id| ids.contains(id));
                for id in ids {
                    state.ensure_bucket(id);
                }
            },
            _ => {},
        }

        SmallVec::new()
    }
}
