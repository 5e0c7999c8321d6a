//! The store: one state, one reducer, many effects.

use crate::error::StoreError;
use crate::tracker::{self, EffectHandle, Tracker};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};
use todosync_core::{effect::Effect, reducer::Reducer};
use tokio::sync::{RwLock, broadcast, watch};

/// Long-lived owner of application state
///
/// Every action, whether sent by a caller or fed back by an effect, is
/// reduced under the state's write lock, so reductions never interleave.
/// Effects run as tokio tasks. Their feedback actions are reduced in the
/// order the effects *finish*, then published on the action feed.
///
/// Clones share state, environment and the action feed.
pub struct Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    state: Arc<RwLock<S>>,
    reducer: R,
    environment: E,
    closing: Arc<AtomicBool>,
    in_flight: Tracker,
    in_flight_rx: watch::Receiver<usize>,
    feed: broadcast::Sender<A>,
}

impl<S, A, E, R> Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E> + Clone + Send + Sync + 'static,
    A: Clone + Send + 'static,
    S: Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    /// Store with an action feed buffering 16 actions per subscriber
    #[must_use]
    pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
        Self::with_broadcast_capacity(initial_state, reducer, environment, 16)
    }

    /// Store whose action feed buffers `capacity` actions per subscriber
    ///
    /// A subscriber that falls further behind skips the oldest actions.
    #[must_use]
    pub fn with_broadcast_capacity(initial_state: S, reducer: R, environment: E, capacity: usize) -> Self {
        let (feed, _) = broadcast::channel(capacity.max(1));
        let (in_flight, in_flight_rx) = Tracker::new();

        Self {
            state: Arc::new(RwLock::new(initial_state)),
            reducer,
            environment,
            closing: Arc::new(AtomicBool::new(false)),
            in_flight,
            in_flight_rx,
            feed,
        }
    }

    /// Reduce `action` and start the effects it returns
    ///
    /// Returns once the reducer ran. The handle completes when those effects
    /// have finished and their feedback was reduced.
    ///
    /// # Errors
    ///
    /// [`StoreError::ShutdownInProgress`] once [`Store::shutdown`] was called.
    ///
    /// # Panics
    ///
    /// A panic in the reducer propagates to the caller.
    #[tracing::instrument(skip_all, name = "store_send")]
    pub async fn send(&self, action: A) -> Result<EffectHandle, StoreError> {
        if self.closing.load(Ordering::Acquire) {
            tracing::warn!("Action refused, store is draining");
            metrics::counter!("store.shutdown.rejected_actions").increment(1);
            return Err(StoreError::ShutdownInProgress);
        }

        Ok(self.dispatch(action).await)
    }

    /// Send `action`, then wait for the first fed-back action accepted by
    /// `predicate`
    ///
    /// The feed is subscribed before sending, so a fast effect cannot be
    /// missed. Feedback is published after it is reduced, so state already
    /// includes the returned action.
    ///
    /// # Errors
    ///
    /// - [`StoreError::ShutdownInProgress`] if the store is draining
    /// - [`StoreError::Timeout`] if nothing matched within `timeout`
    /// - [`StoreError::ChannelClosed`] if the feed closed while waiting
    pub async fn send_and_wait_for<F>(&self, action: A, predicate: F, timeout: Duration) -> Result<A, StoreError>
    where
        F: Fn(&A) -> bool,
    {
        let mut feed = self.feed.subscribe();
        self.send(action).await?;

        let outcome = async {
            loop {
                match feed.recv().await {
                    Ok(action) if predicate(&action) => break Ok(action),
                    Ok(_) => {},
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "Outcome waiter fell behind the action feed");
                    },
                    Err(broadcast::error::RecvError::Closed) => break Err(StoreError::ChannelClosed),
                }
            }
        };

        tokio::time::timeout(timeout, outcome)
            .await
            .unwrap_or(Err(StoreError::Timeout))
    }

    /// Subscribe to fed-back actions
    ///
    /// Only actions produced by effects are published. Actions passed to
    /// [`Store::send`] are not.
    #[must_use]
    pub fn subscribe_actions(&self) -> broadcast::Receiver<A> {
        self.feed.subscribe()
    }

    /// Run `f` against the current state under the read lock
    pub async fn state<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&S) -> T,
    {
        f(&*self.state.read().await)
    }

    /// Refuse new actions, then wait for running effects to finish
    ///
    /// Feedback from effects that are already running is still reduced
    /// while draining. Calling it again just waits again.
    ///
    /// # Errors
    ///
    /// [`StoreError::ShutdownTimeout`] if effects are still running after `timeout`.
    pub async fn shutdown(&self, timeout: Duration) -> Result<(), StoreError> {
        if !self.closing.swap(true, Ordering::AcqRel) {
            tracing::info!(in_flight = self.in_flight.count(), "Store draining");
            metrics::counter!("store.shutdown.initiated").increment(1);
        }

        let mut in_flight = self.in_flight_rx.clone();
        if tokio::time::timeout(timeout, tracker::drained(&mut in_flight)).await.is_ok() {
            tracing::info!("Store drained");
            metrics::counter!("store.shutdown.completed").increment(1);
            return Ok(());
        }

        let running = self.in_flight.count();
        tracing::error!(running, ?timeout, "Store did not drain in time");
        metrics::counter!("store.shutdown.timeout").increment(1);
        Err(StoreError::ShutdownTimeout(running))
    }

    /// Reduce and start effects without checking the closing flag
    async fn dispatch(&self, action: A) -> EffectHandle {
        metrics::counter!("store.commands.total").increment(1);

        let effects = {
            let mut state = self.state.write().await;
            let started = Instant::now();
            let effects = self.reducer.reduce(&mut state, action, &self.environment);
            metrics::histogram!("store.reducer.duration_seconds").record(started.elapsed().as_secs_f64());
            effects
        };
        tracing::trace!(effects = effects.len(), "Reduced");

        let (dispatch, remaining) = Tracker::new();
        for effect in effects {
            self.run(effect, &dispatch);
        }
        EffectHandle::new(remaining)
    }

    async fn feedback(&self, action: A) {
        let _ = self.dispatch(action.clone()).await;
        // nobody listening is fine
        let _ = self.feed.send(action);
    }

    /// Start `effect`, counting it against `dispatch` and the store
    ///
    /// Spawned tasks hold their guards until they end, panics included.
    fn run(&self, effect: Effect<A>, dispatch: &Tracker) {
        match effect {
            Effect::None => {
                metrics::counter!("store.effects.executed", "type" => "none").increment(1);
            },
            Effect::Future(future) => {
                metrics::counter!("store.effects.executed", "type" => "future").increment(1);
                let guards = (dispatch.start(), self.in_flight.start());
                let store = self.clone();

                tokio::spawn(async move {
                    let _guards = guards;
                    match future.await {
                        Some(action) => store.feedback(action).await,
                        None => tracing::trace!("Effect finished without feedback"),
                    }
                });
            },
            Effect::Parallel(effects) => {
                metrics::counter!("store.effects.executed", "type" => "parallel").increment(1);
                for effect in effects {
                    self.run(effect, dispatch);
                }
            },
            Effect::Sequential(effects) => {
                metrics::counter!("store.effects.executed", "type" => "sequential").increment(1);
                let guards = (dispatch.start(), self.in_flight.start());
                let store = self.clone();

                tokio::spawn(async move {
                    let _guards = guards;
                    for effect in effects {
                        let (step, mut done) = Tracker::new();
                        store.run(effect, &step);
                        drop(step);
                        tracker::drained(&mut done).await;
                    }
                });
            },
        }
    }
}

impl<S, A, E, R> Clone for Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E> + Clone,
    E: Clone,
{
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            reducer: self.reducer.clone(),
            environment: self.environment.clone(),
            closing: Arc::clone(&self.closing),
            in_flight: self.in_flight.clone(),
            in_flight_rx: self.in_flight_rx.clone(),
            feed: self.feed.clone(),
        }
    }
}
