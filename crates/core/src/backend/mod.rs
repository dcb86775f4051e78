//! The backend store
//!
//! [`Backend`] owns the canonical [`AppState`], the active [`Connector`] and
//! the clock. It is cheap to clone; every clone drives the same state.
//! Actions live in [`actions`]; consumers obtain a [`BackendContext`] via
//! [`Backend::connect`].

mod actions;
mod channel;
mod in_flight;
mod state;

use std::sync::Arc;
use std::time::Duration;

use chrono::DateTime;
use chrono::Utc;

pub use channel::{BackendContext, StateChannel, StateSubscription};
pub use state::{AppState, SessionStatus};

use self::in_flight::InFlightTasks;
use crate::clock::{Clock, SystemClock};
use crate::connector::Connector;

/// Shared handle to the backend store
#[derive(Clone)]
pub struct Backend {
    inner: Arc<BackendInner>,
}

struct BackendInner {
    connector: Arc<dyn Connector>,
    clock: Arc<dyn Clock>,
    channel: StateChannel,
    in_flight: InFlightTasks,
    auto_dismiss: Option<Duration>,
}

impl Backend {
    /// Backend with the system clock and no auto-dismiss
    pub fn new(connector: Arc<dyn Connector>) -> Self {
        Self::builder(connector).build()
    }

    pub fn builder(connector: Arc<dyn Connector>) -> BackendBuilder {
        BackendBuilder { connector, clock: None, auto_dismiss: None }
    }

    /// Current state
    pub fn snapshot(&self) -> AppState {
        self.inner.channel.snapshot()
    }

    pub fn subscribe(&self) -> StateSubscription {
        self.inner.channel.subscribe()
    }

    /// State subscription plus the bound actions, for one consumer
    pub fn connect(&self) -> BackendContext {
        BackendContext { state: self.subscribe(), actions: self.clone() }
    }

    pub fn connector_name(&self) -> &str {
        self.inner.connector.name()
    }

    pub fn clock(&self) -> Arc<dyn Clock> {
        Arc::clone(&self.inner.clock)
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.inner.clock.now()
    }

    /// Whether a start/stop for `task_id` is still outstanding
    pub fn is_task_busy(&self, task_id: &str) -> bool {
        self.inner.in_flight.contains(task_id)
    }
}

impl std::fmt::Debug for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Backend")
            .field("connector", &self.inner.connector.name())
            .field("auto_dismiss", &self.inner.auto_dismiss)
            .finish_non_exhaustive()
    }
}

/// Builder for [`Backend`]
pub struct BackendBuilder {
    connector: Arc<dyn Connector>,
    clock: Option<Arc<dyn Clock>>,
    auto_dismiss: Option<Duration>,
}

impl BackendBuilder {
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Drop queued errors on their own after `after`
    pub fn auto_dismiss_after(mut self, after: Option<Duration>) -> Self {
        self.auto_dismiss = after;
        self
    }

    pub fn build(self) -> Backend {
        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));
        let initial = AppState::new(clock.today());

        Backend {
            inner: Arc::new(BackendInner {
                connector: self.connector,
                clock,
                channel: StateChannel::new(initial),
                in_flight: InFlightTasks::default(),
                auto_dismiss: self.auto_dismiss,
            }),
        }
    }
}
