//! Reducer for the todolist container.

use crate::actions::TodolistsAction;
use crate::environment::SyncEnvironment;
use crate::state::TodolistsState;
use crate::types::DomainTodolist;
use todosync_core::{effect::Effect, reducer::Reducer, SmallVec};

/// Applies list events to [`TodolistsState`]
///
/// Unknown ids are silent no-ops; the container is a cache of the remote
/// service, and completions may arrive after the list is gone.
#[derive(Clone, Debug, Default)]
pub struct TodolistsReducer;

impl TodolistsReducer {
    /// Creates a new `TodolistsReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Reducer for TodolistsReducer {
    type State = TodolistsState;
    type Action = TodolistsAction;
    type Environment = SyncEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        _env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            TodolistsAction::TodolistsSet { todolists } => {
                let mut items: Vec<DomainTodolist> = Vec::with_capacity(todolists.len());
                for todolist in todolists {
                    // First occurrence wins
                    if !items.iter().any(|tl| tl.id == todolist.id) {
                        items.push(todolist.into());
                    }
                }
                state.replace(items);
            },
            TodolistsAction::TodolistAdded { id, title } => {
                if !state.contains(&id) {
                    state.push(DomainTodolist::new(id, title));
                }
            },
            TodolistsAction::TodolistRemoved { id } => state.remove(&id),
            TodolistsAction::TodolistTitleChanged { id, title } => {
                if let Some(todolist) = state.get_mut(&id) {
                    todolist.title = title;
                }
            },
            TodolistsAction::TodolistFilterChanged { id, filter } => {
                if let Some(todolist) = state.get_mut(&id) {
                    todolist.filter = filter;
                }
            },
            _ => {},
        }

        SmallVec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::InMemoryTransport;
    use crate::types::{FilterValue, Todolist, TodolistId};
    use std::sync::Arc;
    use todosync_testing::{assertions, ReducerTest};

    fn env() -> SyncEnvironment {
        SyncEnvironment::new(Arc::new(InMemoryTransport::new()))
    }

    fn list(id: &str, title: &str) -> DomainTodolist {
        DomainTodolist::new(TodolistId::new(id), title.to_string())
    }

    fn remote(id: &str, title: &str) -> Todolist {
        Todolist {
            id: TodolistId::new(id),
            title: title.to_string(),
            added_date: None,
            order: 0,
        }
    }

    #[test]
    fn added_list_is_appended_with_filter_all() {
        ReducerTest::new(TodolistsReducer::new())
            .with_env(env())
            .given_state([list("L0", "Work")].into_iter().collect())
            .when_action(TodolistsAction::TodolistAdded {
                id: TodolistId::new("L1"),
                title: "Groceries".into(),
            })
            .then_state(|state: &TodolistsState| {
                assert_eq!(state.items(), &[list("L0", "Work"), list("L1", "Groceries")]);
                assert_eq!(state.items()[1].filter, FilterValue::All);
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn duplicate_add_is_ignored() {
        ReducerTest::new(TodolistsReducer::new())
            .with_env(env())
            .given_state([list("L1", "Groceries")].into_iter().collect())
            .when_action(TodolistsAction::TodolistAdded {
                id: TodolistId::new("L1"),
                title: "Again".into(),
            })
            .then_state(|state: &TodolistsState| {
                assert_eq!(state.items(), &[list("L1", "Groceries")]);
            })
            .run();
    }

    #[test]
    fn remove_missing_list_is_noop() {
        ReducerTest::new(TodolistsReducer::new())
            .with_env(env())
            .given_state([list("L1", "Groceries")].into_iter().collect())
            .when_action(TodolistsAction::TodolistRemoved {
                id: TodolistId::new("gone"),
            })
            .then_state(|state: &TodolistsState| assert_eq!(state.len(), 1))
            .run();
    }

    #[test]
    fn title_and_filter_change_only_the_target() {
        ReducerTest::new(TodolistsReducer::new())
            .with_env(env())
            .given_state([list("L1", "a"), list("L2", "b")].into_iter().collect())
            .when_actions(vec![
                TodolistsAction::TodolistTitleChanged {
                    id: TodolistId::new("L2"),
                    title: "renamed".into(),
                },
                TodolistsAction::TodolistFilterChanged {
                    id: TodolistId::new("L2"),
                    filter: FilterValue::Completed,
                },
                TodolistsAction::TodolistTitleChanged {
                    id: TodolistId::new("missing"),
                    title: "ignored".into(),
                },
            ])
            .then_state(|state: &TodolistsState| {
                assert_eq!(state.items()[0], list("L1", "a"));
                assert_eq!(state.items()[1].title, "renamed");
                assert_eq!(state.items()[1].filter, FilterValue::Completed);
            })
            .run();
    }

    #[test]
    fn set_replaces_in_order_and_resets_filters() {
        let mut filtered = list("L1", "old");
        filtered.filter = FilterValue::Active;

        ReducerTest::new(TodolistsReducer::new())
            .with_env(env())
            .given_state([filtered].into_iter().collect())
            .when_action(TodolistsAction::TodolistsSet {
                todolists: vec![remote("L2", "b"), remote("L1", "a"), remote("L2", "dup")],
            })
            .then_state(|state: &TodolistsState| {
                assert_eq!(state.items(), &[list("L2", "b"), list("L1", "a")]);
            })
            .run();
    }

    #[test]
    fn commands_do_not_touch_state() {
        ReducerTest::new(TodolistsReducer::new())
            .with_env(env())
            .given_state([list("L1", "a")].into_iter().collect())
            .when_action(TodolistsAction::RemoveTodolist {
                id: TodolistId::new("L1"),
            })
            .then_state(|state: &TodolistsState| assert_eq!(state.len(), 1))
            .then_effects(assertions::assert_no_effects)
            .run();
    }
}
