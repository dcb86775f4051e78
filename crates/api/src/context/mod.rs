//! Application context - dependency injection container

use std::sync::Arc;

use tickbook_core::{
    ActiveBlockTicker, Backend, BackendContext, Clock, Connector, SystemClock, TickerConfig,
};
use tickbook_domain::constants::TICKER_STOP_TIMEOUT_MS;
use tickbook_domain::{Config, Result};
use tickbook_infra::build_connector;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Application context - holds the backend and everything around it
pub struct AppContext {
    pub config: Config,
    pub backend: Backend,
    ticker: Mutex<ActiveBlockTicker>,
}

impl AppContext {
    /// Wire the connector named by `config` with the system clock
    ///
    /// # Errors
    /// Returns `TickbookError::Config` for an invalid config or an unknown
    /// connector kind.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let connector = build_connector(&config.connector)?;
        Ok(Self::with_parts(config, connector, Arc::new(SystemClock)))
    }

    /// Load configuration (environment, file, defaults) and wire it
    ///
    /// # Errors
    /// See [`tickbook_infra::config::load`] and [`AppContext::new`].
    pub fn from_environment() -> Result<Self> {
        let config = tickbook_infra::config::load()?;
        Self::new(config)
    }

    /// Wire explicit parts; tests use this to inject connectors and clocks
    pub fn with_parts(config: Config, connector: Arc<dyn Connector>, clock: Arc<dyn Clock>) -> Self {
        let backend = Backend::builder(connector)
            .clock(clock)
            .auto_dismiss_after(config.errors.auto_dismiss())
            .build();

        let ticker = ActiveBlockTicker::with_config(
            backend.clone(),
            TickerConfig {
                period: config.timeline.tick_interval(),
                stop_timeout: std::time::Duration::from_millis(TICKER_STOP_TIMEOUT_MS),
            },
        );

        info!(
            connector = backend.connector_name(),
            tick_interval_ms = config.timeline.tick_interval_ms,
            auto_dismiss_ms = config.errors.auto_dismiss_ms,
            "Application context ready"
        );

        Self { config, backend, ticker: Mutex::new(ticker) }
    }

    /// A consumer handle: state subscription plus actions
    pub fn connect(&self) -> BackendContext {
        self.backend.connect()
    }

    /// Point the live ticker at the current active block, or stop it
    pub async fn sync_ticker(&self) {
        let state = self.backend.snapshot();
        let mut ticker = self.ticker.lock().await;
        if let Err(err) = ticker.sync_with(&state).await {
            warn!(error = %err, "Failed to sync timeline ticker");
        }
        debug!(block_id = ?ticker.block_id(), "Ticker synced");
    }

    /// Block the ticker is advancing, if any
    pub async fn ticking_block(&self) -> Option<String> {
        self.ticker.lock().await.block_id().map(str::to_string)
    }

    /// Stop background work
    ///
    /// # Errors
    /// Returns `TickbookError::Internal` when the ticker does not stop in time.
    pub async fn shutdown(&self) -> Result<()> {
        self.ticker.lock().await.stop().await?;
        info!("Application context shut down");
        Ok(())
    }
}
