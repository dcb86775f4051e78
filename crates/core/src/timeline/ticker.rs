//! Live ticker for the running task's timeline block
//!
//! While a task runs, its open block's `end` is advanced to "now" once per
//! period through [`Backend::update_active_timeline_block`]. Nothing is
//! persisted; the server learns the real end when the task stops. The loop
//! handle is tracked, cancellation is explicit and `stop` joins with a
//! timeout.

use std::time::Duration;

use tickbook_domain::constants::{DEFAULT_TICK_INTERVAL_MS, TICKER_STOP_TIMEOUT_MS};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

use super::error::{TickerError, TickerResult};
use crate::backend::{AppState, Backend};

/// Ticker timing
#[derive(Debug, Clone, Copy)]
pub struct TickerConfig {
    /// Time between two updates of the block's end
    pub period: Duration,
    /// How long `stop` waits for the loop to exit
    pub stop_timeout: Duration,
}

impl Default for TickerConfig {
    fn default() -> Self {
        Self {
            period: Duration::from_millis(DEFAULT_TICK_INTERVAL_MS),
            stop_timeout: Duration::from_millis(TICKER_STOP_TIMEOUT_MS),
        }
    }
}

struct TickerRun {
    block_id: String,
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

/// Drives the `end` of one active block forward
pub struct ActiveBlockTicker {
    backend: Backend,
    config: TickerConfig,
    run: Option<TickerRun>,
}

impl ActiveBlockTicker {
    pub fn new(backend: Backend) -> Self {
        Self::with_config(backend, TickerConfig::default())
    }

    pub fn with_config(backend: Backend, config: TickerConfig) -> Self {
        Self { backend, config, run: None }
    }

    /// Tick `block_id`
    ///
    /// Returns `Ok(false)` when that block is already being ticked. A loop
    /// for another block is cancelled first.
    pub fn start(&mut self, block_id: &str) -> TickerResult<bool> {
        if self.is_ticking(block_id) {
            trace!(block_id, "Ticker already running for block");
            return Ok(false);
        }

        let runtime = Handle::try_current().map_err(|_| TickerError::NoRuntime)?;
        self.cancel_current();

        let cancel = CancellationToken::new();
        let handle = runtime.spawn(tick_loop(
            self.backend.clone(),
            block_id.to_string(),
            self.config.period,
            cancel.clone(),
        ));

        info!(block_id, period_ms = self.config.period.as_millis() as u64, "Ticker started");
        self.run = Some(TickerRun { block_id: block_id.to_string(), cancel, handle });
        Ok(true)
    }

    /// Cancel the loop and wait for it to exit
    pub async fn stop(&mut self) -> TickerResult<()> {
        let Some(run) = self.run.take() else {
            return Ok(());
        };

        run.cancel.cancel();
        let stop_timeout = self.config.stop_timeout;
        tokio::time::timeout(stop_timeout, run.handle)
            .await
            .map_err(|_| TickerError::Timeout { millis: stop_timeout.as_millis() as u64 })?
            .map_err(|err| TickerError::JoinFailed(err.to_string()))?;

        info!(block_id = %run.block_id, "Ticker stopped");
        Ok(())
    }

    /// Tick the active block of `state`, or stop when there is none
    pub async fn sync_with(&mut self, state: &AppState) -> TickerResult<()> {
        match state.active_block() {
            Some(block) => self.start(&block.id).map(|_| ()),
            None => self.stop().await,
        }
    }

    /// Returns true while a tick loop is alive.
    pub fn is_running(&self) -> bool {
        self.run.as_ref().is_some_and(|run| !run.handle.is_finished())
    }

    /// Block currently being ticked
    pub fn block_id(&self) -> Option<&str> {
        self.run.as_ref().filter(|run| !run.handle.is_finished()).map(|run| run.block_id.as_str())
    }

    fn is_ticking(&self, block_id: &str) -> bool {
        self.block_id() == Some(block_id)
    }

    fn cancel_current(&mut self) {
        if let Some(run) = self.run.take() {
            debug!(block_id = %run.block_id, "Cancelling previous tick loop");
            run.cancel.cancel();
        }
    }
}

impl Drop for ActiveBlockTicker {
    fn drop(&mut self) {
        if let Some(run) = self.run.take() {
            if !run.handle.is_finished() {
                warn!(block_id = %run.block_id, "Ticker dropped while running; cancelling");
            }
            run.cancel.cancel();
        }
    }
}

async fn tick_loop(backend: Backend, block_id: String, period: Duration, cancel: CancellationToken) {
    let mut interval = tokio::time::interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            () = cancel.cancelled() => {
                debug!(block_id = %block_id, "Tick loop cancelled");
                break;
            }
            _ = interval.tick() => {
                let now = backend.now();
                if !backend.update_active_timeline_block(&block_id, now) {
                    trace!(block_id = %block_id, "Tick changed nothing");
                }
            }
        }
    }
}
