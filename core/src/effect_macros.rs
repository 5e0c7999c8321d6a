//! `async_effect!`: an `Effect::Future` from an async body.

/// Create an `Effect::Future` from an async block body
///
/// The body runs inside `async move`, so it takes ownership of everything it
/// captures. It must evaluate to `Option<Action>`: `Some` feeds the action back
/// into the store, `None` ends the effect silently.
///
/// # Example
///
/// ```
/// use todosync_core::{async_effect, Effect};
///
/// #[derive(Debug)]
/// enum ListAction {
///     Loaded { count: usize },
/// }
///
/// let titles = vec!["Groceries".to_string()];
/// let effect: Effect<ListAction> = async_effect! {
///     Some(ListAction::Loaded { count: titles.len() })
/// };
/// assert!(matches!(effect, Effect::Future(_)));
/// ```
#[macro_export]
macro_rules! async_effect {
    ($($body:tt)*) => {
        $crate::effect::Effect::Future(
            ::std::boxed::Box::pin(async move { $($body)* })
        )
    };
}
