//! Store errors.

use thiserror::Error;

/// Failures reported by [`crate::Store`] and [`crate::EffectHandle`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// `send` was called after `shutdown` started
    ///
    /// Actions fed back by effects that were already running are still
    /// reduced; only new input is refused.
    #[error("store is draining and refuses new actions")]
    ShutdownInProgress,

    /// `shutdown` gave up with this many effects still running
    #[error("{0} effect(s) still running when the drain deadline passed")]
    ShutdownTimeout(usize),

    /// No outcome arrived before the deadline
    #[error("deadline passed before the awaited outcome")]
    Timeout,

    /// Every sender of the action feed is gone
    #[error("action feed closed")]
    ChannelClosed,
}
