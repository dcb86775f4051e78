//! State distribution
//!
//! The canonical [`AppState`] sits in a `tokio::sync::watch` channel. Every
//! action commits through [`StateChannel::commit`] so one mutation is one
//! publish, and subscribers always read a complete snapshot. Watch channels
//! coalesce: a slow subscriber sees the latest state, not every
//! intermediate one.

use tokio::sync::watch;

use super::state::AppState;
use super::Backend;

/// Owner of the canonical state
#[derive(Debug)]
pub struct StateChannel {
    tx: watch::Sender<AppState>,
}

impl StateChannel {
    pub fn new(initial: AppState) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx }
    }

    /// Clone of the current state
    pub fn snapshot(&self) -> AppState {
        self.tx.borrow().clone()
    }

    /// Read without cloning the whole state
    ///
    /// `f` must not call back into the channel.
    pub fn read<R>(&self, f: impl FnOnce(&AppState) -> R) -> R {
        f(&self.tx.borrow())
    }

    /// Apply one mutation and notify subscribers
    pub(crate) fn commit(&self, mutate: impl FnOnce(&mut AppState)) {
        self.tx.send_modify(mutate);
    }

    /// Apply a mutation that may turn out to be a no-op
    ///
    /// Subscribers are only notified when `mutate` returns true.
    pub(crate) fn commit_if(&self, mutate: impl FnOnce(&mut AppState) -> bool) -> bool {
        self.tx.send_if_modified(mutate)
    }

    pub fn subscribe(&self) -> StateSubscription {
        StateSubscription { rx: self.tx.subscribe() }
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

/// A consumer's view of the state
#[derive(Debug, Clone)]
pub struct StateSubscription {
    rx: watch::Receiver<AppState>,
}

impl StateSubscription {
    /// Latest state, without marking it seen
    pub fn current(&self) -> AppState {
        self.rx.borrow().clone()
    }

    /// Wait for the next commit and return the state it produced
    ///
    /// Returns `None` once the backend has been dropped.
    pub async fn changed(&mut self) -> Option<AppState> {
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }

    /// Whether a commit happened since the last [`changed`](Self::changed)
    pub fn has_changed(&self) -> bool {
        self.rx.has_changed().unwrap_or(false)
    }
}

/// What a consumer component is handed: the state plus the bound actions
#[derive(Clone)]
pub struct BackendContext {
    pub state: StateSubscription,
    pub actions: Backend,
}

impl BackendContext {
    pub fn snapshot(&self) -> AppState {
        self.state.current()
    }
}
