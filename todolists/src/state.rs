//! State containers held by the store.

use crate::types::{DomainTodolist, Task, TaskId, TodolistId};
use std::collections::HashMap;

/// Ordered collection of todolists; order is display order
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TodolistsState {
    items: Vec<DomainTodolist>,
}

impl TodolistsState {
    /// Creates a new empty collection
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// All lists in display order
    #[must_use]
    pub fn items(&self) -> &[DomainTodolist] {
        &self.items
    }

    /// Returns a list by id
    #[must_use]
    pub fn get(&self, id: &TodolistId) -> Option<&DomainTodolist> {
        self.items.iter().find(|tl| tl.id == *id)
    }

    pub(crate) fn get_mut(&mut self, id: &TodolistId) -> Option<&mut DomainTodolist> {
        self.items.iter_mut().find(|tl| tl.id == *id)
    }

    /// Whether a list with this id exists
    #[must_use]
    pub fn contains(&self, id: &TodolistId) -> bool {
        self.get(id).is_some()
    }

    /// Returns the number of lists
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if there are no lists
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub(crate) fn push(&mut self, todolist: DomainTodolist) {
        self.items.push(todolist);
    }

    pub(crate) fn remove(&mut self, id: &TodolistId) {
        self.items.retain(|tl| tl.id != *id);
    }

    pub(crate) fn replace(&mut self, items: Vec<DomainTodolist>) {
        self.items = items;
    }
}

impl FromIterator<DomainTodolist> for TodolistsState {
    fn from_iter<I: IntoIterator<Item = DomainTodolist>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

/// Task buckets keyed by owning list
///
/// Every read is guarded: a missing bucket reads as empty.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TasksState {
    buckets: HashMap<TodolistId, Vec<Task>>,
}

impl TasksState {
    /// Creates a new state with no buckets
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Tasks of a list, newest first; empty if the bucket does not exist
    #[must_use]
    pub fn tasks(&self, todolist_id: &TodolistId) -> &[Task] {
        self.bucket(todolist_id).unwrap_or_default()
    }

    /// Returns the bucket itself, if it exists
    #[must_use]
    pub fn bucket(&self, todolist_id: &TodolistId) -> Option<&[Task]> {
        self.buckets.get(todolist_id).map(Vec::as_slice)
    }

    /// Returns a task by id
    #[must_use]
    pub fn task(&self, todolist_id: &TodolistId, task_id: &TaskId) -> Option<&Task> {
        self.tasks(todolist_id).iter().find(|t| t.id == *task_id)
    }

    /// Whether a bucket exists for this list
    #[must_use]
    pub fn has_bucket(&self, todolist_id: &TodolistId) -> bool {
        self.buckets.contains_key(todolist_id)
    }

    /// Ids of every list with a bucket, in no particular order
    pub fn bucket_ids(&self) -> impl Iterator<Item = &TodolistId> {
        self.buckets.keys()
    }

    /// Returns the number of buckets
    #[must_use]
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    pub(crate) fn bucket_mut(&mut self, todolist_id: &TodolistId) -> Option<&mut Vec<Task>> {
        self.buckets.get_mut(todolist_id)
    }

    pub(crate) fn ensure_bucket(&mut self, todolist_id: TodolistId) {
        self.buckets.entry(todolist_id).or_default();
    }

    pub(crate) fn remove_bucket(&mut self, todolist_id: &TodolistId) {
        self.buckets.remove(todolist_id);
    }

    pub(crate) fn retain_buckets<F>(&mut self, mut keep: F)
    where
        F: FnMut(&TodolistId) -> bool,
    {
        self.buckets.retain(|id, _| keep(id));
    }
}

impl FromIterator<(TodolistId, Vec<Task>)> for TasksState {
    fn from_iter<I: IntoIterator<Item = (TodolistId, Vec<Task>)>>(iter: I) -> Self {
        Self {
            buckets: iter.into_iter().collect(),
        }
    }
}

/// The combined state owned by the store
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AppState {
    /// Todolist container
    pub todolists: TodolistsState,
    /// Task container
    pub tasks: TasksState,
}

impl AppState {
    /// Creates a new empty state
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_bucket_reads_as_empty() {
        let state = TasksState::new();
        let id = TodolistId::new("pending");

        assert!(state.tasks(&id).is_empty());
        assert!(state.bucket(&id).is_none());
        assert!(state.task(&id, &TaskId::new("T1")).is_none());
    }

    #[test]
    fn ensure_bucket_keeps_existing_tasks() {
        let id = TodolistId::new("L1");
        let task = Task::new(TaskId::new("T1"), id.clone(), "Milk");
        let mut state: TasksState = [(id.clone(), vec![task])].into_iter().collect();

        state.ensure_bucket(id.clone());
        assert_eq!(state.tasks(&id).len(), 1);
    }

    #[test]
    fn todolist_lookup_by_id() {
        let state: TodolistsState = [
            DomainTodolist::new(TodolistId::new("L1"), "a".into()),
            DomainTodolist::new(TodolistId::new("L2"), "b".into()),
        ]
        .into_iter()
        .collect();

        assert!(state.contains(&TodolistId::new("L2")));
        assert_eq!(state.get(&TodolistId::new("L1")).map(|tl| tl.title.as_str()), Some("a"));
        assert_eq!(state.len(), 2);
    }
}
