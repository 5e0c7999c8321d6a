//! Reducer composition utilities
//!
//! This module provides utilities for composing reducers:
//! - **`combine_reducers`**: Run several reducers on the same state/action, in order
//! - **`scope_reducer`**: Focus a reducer on one field of a larger state
//!
//! Together they let two independent state containers react to the same
//! action inside a single dispatch: scope each container's reducer onto its
//! field of the root state, then combine the scoped reducers in a fixed order.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use todosync_core::composition::{combine_reducers, scope_reducer};
//! use todosync_core::{Effect, Reducer, SmallVec};
//!
//! #[derive(Clone, Debug)]
//! enum Action {
//!     ListAdded(String),
//! }
//!
//! #[derive(Default)]
//! struct Lists(Vec<String>);
//! #[derive(Default)]
//! struct Buckets(Vec<(String, Vec<String>)>);
//! #[derive(Default)]
//! struct Root {
//!     lists: Lists,
//!     buckets: Buckets,
//! }
//!
//! struct ListsReducer;
//! impl Reducer for ListsReducer {
//!     type State = Lists;
//!     type Action = Action;
//!     type Environment = ();
//!     fn reduce(&self, state: &mut Lists, action: Action, _env: &()) -> SmallVec<[Effect<Action>; 4]> {
//!         let Action::ListAdded(id) = action;
//!         state.0.push(id);
//!         SmallVec::new()
//!     }
//! }
//!
//! struct BucketsReducer;
//! impl Reducer for BucketsReducer {
//!     type State = Buckets;
//!     type Action = Action;
//!     type Environment = ();
//!     fn reduce(&self, state: &mut Buckets, action: Action, _env: &()) -> SmallVec<[Effect<Action>; 4]> {
//!         let Action::ListAdded(id) = action;
//!         state.0.push((id, Vec::new()));
//!         SmallVec::new()
//!     }
//! }
//!
//! let root = combine_reducers(vec![
//!     Arc::new(scope_reducer(ListsReducer, |root: &mut Root| &mut root.lists)),
//!     Arc::new(scope_reducer(BucketsReducer, |root: &mut Root| &mut root.buckets)),
//! ]);
//!
//! let mut state = Root::default();
//! let _ = root.reduce(&mut state, Action::ListAdded("L1".into()), &());
//! assert_eq!(state.lists.0, vec!["L1".to_string()]);
//! assert_eq!(state.buckets.0.len(), 1);
//! ```

use crate::effect::Effect;
use crate::reducer::Reducer;
use smallvec::SmallVec;
use std::sync::Arc;

/// A shareable reducer trait object, as accepted by [`combine_reducers`].
pub type SharedReducer<S, A, E> =
    Arc<dyn Reducer<State = S, Action = A, Environment = E> + Send + Sync>;

/// Combines multiple reducers that operate on the same state and action types.
///
/// Each reducer is run in the order given and receives its own clone of the
/// action. All effects are collected and concatenated in the same order.
///
/// # Type Parameters
///
/// - `S`: The state type
/// - `A`: The action type
/// - `E`: The environment type
#[must_use]
pub fn combine_reducers<S, A, E>(reducers: Vec<SharedReducer<S, A, E>>) -> CombinedReducer<S, A, E>
where
    A: Clone,
{
    CombinedReducer { reducers }
}

/// A combined reducer that runs multiple reducers in sequence.
///
/// Created by [`combine_reducers`]. Cloning is cheap: the reducers are shared.
pub struct CombinedReducer<S, A, E> {
    reducers: Vec<SharedReducer<S, A, E>>,
}

impl<S, A, E> CombinedReducer<S, A, E> {
    /// Number of reducers in the chain
    #[must_use]
    pub fn len(&self) -> usize {
        self.reducers.len()
    }

    /// Returns true if no reducers were combined
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.reducers.is_empty()
    }
}

impl<S, A, E> Clone for CombinedReducer<S, A, E> {
    fn clone(&self) -> Self {
        Self {
            reducers: self.reducers.clone(),
        }
    }
}

impl<S, A, E> Reducer for CombinedReducer<S, A, E>
where
    A: Clone,
{
    type State = S;
    type Action = A;
    type Environment = E;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        let mut all_effects = SmallVec::new();

        for reducer in &self.reducers {
            let effects = reducer.reduce(state, action.clone(), env);
            all_effects.extend(effects.into_iter().filter(|effect| !effect.is_none()));
        }

        all_effects
    }
}

/// Scopes a reducer to operate on one field of a larger state.
///
/// The `lens` hands the child reducer a mutable borrow of its sub-state, so
/// nothing outside that field can be touched by the child.
///
/// # Type Parameters
///
/// - `S`: The parent state type
/// - `SubS`: The child state type (a field of `S`)
/// - `R`: The child reducer
pub fn scope_reducer<S, SubS, R>(reducer: R, lens: fn(&mut S) -> &mut SubS) -> ScopedReducer<S, SubS, R>
where
    R: Reducer<State = SubS>,
{
    ScopedReducer { reducer, lens }
}

/// A scoped reducer that operates on a subset of state.
///
/// Created by [`scope_reducer`].
pub struct ScopedReducer<S, SubS, R> {
    reducer: R,
    lens: fn(&mut S) -> &mut SubS,
}

impl<S, SubS, R: Clone> Clone for ScopedReducer<S, SubS, R> {
    fn clone(&self) -> Self {
        Self {
            reducer: self.reducer.clone(),
            lens: self.lens,
        }
    }
}

impl<S, SubS, R> Reducer for ScopedReducer<S, SubS, R>
where
    R: Reducer<State = SubS>,
{
    type State = S;
    type Action = R::Action;
    type Environment = R::Environment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        self.reducer.reduce((self.lens)(state), action, env)
    }
}
