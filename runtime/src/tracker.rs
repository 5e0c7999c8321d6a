//! Counting running effects.
//!
//! A [`Tracker`] publishes how many effects registered with it are still
//! running over a `watch` channel. Each effect holds a [`Running`] guard
//! for its whole lifetime, so the count also drops when the effect's task
//! panics and unwinds.

use crate::error::StoreError;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

/// Shared running-effect counter
#[derive(Clone)]
pub(crate) struct Tracker(Arc<watch::Sender<usize>>);

impl Tracker {
    /// A counter at zero and a receiver observing it
    pub(crate) fn new() -> (Self, watch::Receiver<usize>) {
        let (tx, rx) = watch::channel(0);
        (Self(Arc::new(tx)), rx)
    }

    /// Register one running effect until the guard is dropped
    pub(crate) fn start(&self) -> Running {
        self.0.send_modify(|n| *n += 1);
        Running(self.clone())
    }

    pub(crate) fn count(&self) -> usize {
        *self.0.borrow()
    }
}

/// Guard for one running effect
pub(crate) struct Running(Tracker);

impl Drop for Running {
    fn drop(&mut self) {
        self.0 .0.send_modify(|n| *n = n.saturating_sub(1));
    }
}

/// Wait until the observed counter reaches zero
///
/// Also returns once every [`Tracker`] clone is gone, since nothing can be
/// running then.
pub(crate) async fn drained(rx: &mut watch::Receiver<usize>) {
    let _ = rx.wait_for(|n| *n == 0).await;
}

/// Completion handle for the effects started by one `send`
///
/// Effects started later, by the actions these effects feed back, are not
/// covered.
///
/// ```ignore
/// let mut handle = store.send(TodolistsAction::FetchTodolists).await?;
/// handle.wait_with_timeout(Duration::from_secs(5)).await?;
/// // the fetch result is in state now
/// ```
#[derive(Clone)]
pub struct EffectHandle {
    remaining: watch::Receiver<usize>,
}

impl EffectHandle {
    pub(crate) const fn new(remaining: watch::Receiver<usize>) -> Self {
        Self { remaining }
    }

    /// A handle with nothing to wait for
    #[must_use]
    pub fn completed() -> Self {
        let (_, remaining) = watch::channel(0);
        Self { remaining }
    }

    /// Effects of this dispatch that have not finished yet
    #[must_use]
    pub fn pending(&self) -> usize {
        *self.remaining.borrow()
    }

    /// Wait until every effect of this dispatch has finished and its
    /// feedback action, if any, was reduced
    pub async fn wait(&mut self) {
        drained(&mut self.remaining).await;
    }

    /// [`EffectHandle::wait`] bounded by `timeout`
    ///
    /// # Errors
    ///
    /// [`StoreError::Timeout`] if effects are still running at the deadline.
    pub async fn wait_with_timeout(&mut self, timeout: Duration) -> Result<(), StoreError> {
        tokio::time::timeout(timeout, self.wait())
            .await
            .map_err(|_| StoreError::Timeout)
    }
}

impl std::fmt::Debug for EffectHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EffectHandle")
            .field("pending", &self.pending())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn count_follows_guards() {
        let (tracker, rx) = Tracker::new();

        let first = tracker.start();
        let second = tracker.start();
        assert_eq!(tracker.count(), 2);
        assert_eq!(*rx.borrow(), 2);

        drop(first);
        assert_eq!(tracker.count(), 1);
        drop(second);
        assert_eq!(tracker.count(), 0);
    }

    #[tokio::test]
    async fn handle_wakes_when_last_guard_drops() -> Result<(), StoreError> {
        let (tracker, rx) = Tracker::new();
        let running = tracker.start();
        drop(tracker);

        let mut handle = EffectHandle::new(rx);
        assert_eq!(handle.pending(), 1);

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            drop(running);
        });

        handle.wait_with_timeout(Duration::from_secs(1)).await?;
        assert_eq!(handle.pending(), 0);
        Ok(())
    }

    #[tokio::test]
    async fn completed_handle_returns_immediately() {
        let mut handle = EffectHandle::completed();
        handle.wait().await;
        assert_eq!(handle.pending(), 0);
    }

    #[tokio::test]
    #[allow(clippy::panic)] // the effect under test panics on purpose
    async fn guard_released_when_task_panics() {
        let (tracker, mut rx) = Tracker::new();
        let running = tracker.start();

        let blow_up = true;
        let task = tokio::spawn(async move {
            let _running = running;
            if blow_up {
                panic!("effect blew up");
            }
        });
        assert!(task.await.is_err());

        drained(&mut rx).await;
        assert_eq!(tracker.count(), 0);
    }
}
