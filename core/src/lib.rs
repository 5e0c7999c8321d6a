//! # Todosync Core
//!
//! Core traits and types for the todosync client state layer.
//!
//! The client keeps its local view of the remote todolist service in plain
//! state structs and changes it only through a closed vocabulary of actions.
//!
//! ## Core Concepts
//!
//! - **State**: In-memory containers (todolists, task buckets)
//! - **Action**: Every input to a reducer (synchronization commands and state events)
//! - **Reducer**: Pure function `(State, Action, Environment) → (State, Effects)`
//! - **Effect**: Description of asynchronous work (a remote call), not its execution
//! - **Environment**: Injected dependencies such as the remote transport
//!
//! ## Example
//!
//! ```
//! use todosync_core::{Effect, Reducer, SmallVec};
//!
//! #[derive(Clone, Debug, Default)]
//! struct ListState {
//!     titles: Vec<String>,
//! }
//!
//! #[derive(Clone, Debug)]
//! enum ListAction {
//!     Added { title: String },
//! }
//!
//! struct ListReducer;
//!
//! impl Reducer for ListReducer {
//!     type State = ListState;
//!     type Action = ListAction;
//!     type Environment = ();
//!
//!     fn reduce(
//!         &self,
//!         state: &mut ListState,
//!         action: ListAction,
//!         _env: &(),
//!     ) -> SmallVec<[Effect<ListAction>; 4]> {
//!         match action {
//!             ListAction::Added { title } => state.titles.push(title),
//!         }
//!         SmallVec::new()
//!     }
//! }
//!
//! let mut state = ListState::default();
//! let effects = ListReducer.reduce(&mut state, ListAction::Added { title: "Groceries".into() }, &());
//! assert!(effects.is_empty());
//! assert_eq!(state.titles, vec!["Groceries".to_string()]);
//! ```

pub use smallvec::{smallvec, SmallVec};

pub mod composition;
#[macro_use]
mod effect_macros;

pub use effect::Effect;
pub use reducer::Reducer;

/// State transitions
pub mod reducer {
    use super::effect::Effect;
    use smallvec::SmallVec;

    /// Turns one action into a state change plus follow-up work
    ///
    /// `reduce` runs synchronously and to completion while the caller holds
    /// the state exclusively. Anything that has to wait, such as a remote
    /// call, is handed back as an [`Effect`] for the runtime to execute.
    ///
    /// Actions a reducer does not care about must leave state untouched and
    /// return no effects. That is what lets several reducers share one
    /// action type (see [`crate::composition`]).
    pub trait Reducer {
        /// State this reducer owns
        type State;

        #[allow(missing_docs)]
        type Action;

        /// Dependencies effects may use, such as a remote transport
        type Environment;

        /// Apply `action` to `state`, returning the effects to run next
        ///
        /// Most actions return zero or one effect, which fits inline.
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]>;
    }
}

/// Descriptions of asynchronous work
pub mod effect {
    use std::fmt;
    use std::future::Future;
    use std::pin::Pin;

    /// Work a reducer asks the runtime to do
    ///
    /// Building an effect does nothing. The runtime executes it after the
    /// reduction that produced it has finished.
    pub enum Effect<Action> {
        /// Nothing to do
        None,

        /// Start all at once; they finish in any order
        Parallel(Vec<Effect<Action>>),

        /// Start each after the previous one finished
        Sequential(Vec<Effect<Action>>),

        /// An async computation; `Some(action)` is reduced when it resolves
        Future(Pin<Box<dyn Future<Output = Option<Action>> + Send>>),
    }

    impl<Action> fmt::Debug for Effect<Action> {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                Self::None => f.write_str("None"),
                Self::Parallel(effects) => f.debug_tuple("Parallel").field(effects).finish(),
                Self::Sequential(effects) => f.debug_tuple("Sequential").field(effects).finish(),
                Self::Future(_) => f.write_str("Future(..)"),
            }
        }
    }

    impl<Action> Effect<Action> {
        /// Shorthand for [`Effect::Parallel`]
        #[must_use]
        pub const fn merge(effects: Vec<Self>) -> Self {
            Self::Parallel(effects)
        }

        /// Shorthand for [`Effect::Sequential`]
        #[must_use]
        pub const fn chain(effects: Vec<Self>) -> Self {
            Self::Sequential(effects)
        }

        /// Whether executing this effect would do nothing
        ///
        /// True for [`Effect::None`] and for compositions containing only
        /// such effects.
        #[must_use]
        pub fn is_none(&self) -> bool {
            match self {
                Self::None => true,
                Self::Parallel(effects) | Self::Sequential(effects) => effects.iter().all(Self::is_none),
                Self::Future(_) => false,
            }
        }
    }
}
