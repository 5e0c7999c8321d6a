//! Read projections over [`AppState`].
//!
//! Pure functions; none of them fails on a missing list or bucket.

use crate::state::AppState;
use crate::types::{DomainTodolist, FilterValue, Task, TaskId, TodolistId};

/// All lists in display order
#[must_use]
pub fn todolists(state: &AppState) -> &[DomainTodolist] {
    state.todolists.items()
}

/// Tasks of a list restricted by `filter`, in bucket order
///
/// Empty if the bucket does not exist yet.
#[must_use]
pub fn tasks_for_list<'a>(state: &'a AppState, todolist_id: &TodolistId, filter: FilterValue) -> Vec<&'a Task> {
    state
        .tasks
        .tasks(todolist_id)
        .iter()
        .filter(|task| filter.matches(task.status))
        .collect()
}

/// Tasks of a list under the list's own filter
///
/// Unknown lists show all tasks of their bucket, if any.
#[must_use]
pub fn visible_tasks<'a>(state: &'a AppState, todolist_id: &TodolistId) -> Vec<&'a Task> {
    let filter = state
        .todolists
        .get(todolist_id)
        .map_or(FilterValue::All, |tl| tl.filter);
    tasks_for_list(state, todolist_id, filter)
}

/// One task, if both its list bucket and the task are present
#[must_use]
pub fn task<'a>(state: &'a AppState, todolist_id: &TodolistId, task_id: &TaskId) -> Option<&'a Task> {
    state.tasks.task(todolist_id, task_id)
}
