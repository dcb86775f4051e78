//! Configuration loader
//!
//! Loads application configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If `TICKBOOK_CONNECTOR_KIND` is unset, falls back to loading from file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//! 5. With no file anywhere, uses the built-in defaults
//!
//! Every loaded configuration is validated before it is returned.
//!
//! ## Environment Variables
//! - `TICKBOOK_CONNECTOR_KIND`: Connector to wire in (required for env
//!   loading)
//! - `TICKBOOK_CONNECTOR_HOST`: Backend host handed to login
//! - `TICKBOOK_CONNECTOR_SEED_DEMO`: Seed the memory connector (true/false)
//! - `TICKBOOK_TICK_INTERVAL_MS`: Live timeline tick period
//! - `TICKBOOK_ERROR_AUTO_DISMISS_MS`: Auto-dismiss queued errors after this
//!   many milliseconds
//! - `TICKBOOK_LOG_LEVEL`: Default log filter when `RUST_LOG` is unset
//! - `TICKBOOK_LOG_JSON`: Emit JSON log lines (true/false)
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./config.json` or `./config.toml` (current working directory)
//! 2. `./tickbook.json` or `./tickbook.toml` (current working directory)
//! 3. `../config.json` or `../config.toml` (parent directory)
//! 4. Relative to executable location

use std::path::{Path, PathBuf};
use std::str::FromStr;

use tickbook_domain::{
    Config, ConnectorConfig, ErrorQueueConfig, LoggingConfig, Result, TickbookError,
    TimelineConfig,
};

use crate::errors::InfraError;

const CONNECTOR_KIND: &str = "TICKBOOK_CONNECTOR_KIND";
const CONNECTOR_HOST: &str = "TICKBOOK_CONNECTOR_HOST";
const CONNECTOR_SEED_DEMO: &str = "TICKBOOK_CONNECTOR_SEED_DEMO";
const TICK_INTERVAL_MS: &str = "TICKBOOK_TICK_INTERVAL_MS";
const ERROR_AUTO_DISMISS_MS: &str = "TICKBOOK_ERROR_AUTO_DISMISS_MS";
const LOG_LEVEL: &str = "TICKBOOK_LOG_LEVEL";
const LOG_JSON: &str = "TICKBOOK_LOG_JSON";

/// Load configuration with automatic fallback strategy
///
/// Environment first, then the first config file found, then defaults.
///
/// # Errors
/// Returns `TickbookError::Config` if a source is present but malformed, or
/// if the resulting configuration fails validation.
pub fn load() -> Result<Config> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = ?e, "Failed to load from environment, trying file");
            match probe_config_paths() {
                Some(path) => load_from_file(Some(path)),
                None => {
                    tracing::info!("No config file found; using defaults");
                    let config = Config::default();
                    config.validate()?;
                    Ok(config)
                }
            }
        }
    }
}

/// Load configuration from environment variables
///
/// `TICKBOOK_CONNECTOR_KIND` must be present; every other variable falls
/// back to its default.
///
/// # Errors
/// Returns `TickbookError::Config` if the connector kind is missing or a
/// numeric variable does not parse.
pub fn load_from_env() -> Result<Config> {
    let defaults = Config::default();

    let config = Config {
        connector: ConnectorConfig {
            kind: env_var(CONNECTOR_KIND)?,
            host: std::env::var(CONNECTOR_HOST).unwrap_or(defaults.connector.host),
            seed_demo: env_bool(CONNECTOR_SEED_DEMO, defaults.connector.seed_demo),
        },
        timeline: TimelineConfig {
            tick_interval_ms: env_parse(TICK_INTERVAL_MS, "tick interval")?
                .unwrap_or(defaults.timeline.tick_interval_ms),
        },
        errors: ErrorQueueConfig {
            auto_dismiss_ms: env_parse(ERROR_AUTO_DISMISS_MS, "auto-dismiss delay")?,
        },
        logging: LoggingConfig {
            level: std::env::var(LOG_LEVEL).unwrap_or(defaults.logging.level),
            json: env_bool(LOG_JSON, defaults.logging.json),
        },
    };

    config.validate()?;
    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `TickbookError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
/// - Values fail validation
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(TickbookError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            TickbookError::Config(
                "No config file found in any of the standard locations".to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path).map_err(InfraError::from)?;
    let config = parse_config(&contents, &config_path)?;
    config.validate()?;
    Ok(config)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => Ok(toml::from_str(contents).map_err(InfraError::from)?),
        "json" => Ok(serde_json::from_str(contents).map_err(InfraError::from)?),
        _ => Err(TickbookError::Config(format!("Unsupported config format: {}", extension))),
    }
}

/// Probe multiple paths for configuration files
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    const NAMES: [&str; 4] = ["config.json", "config.toml", "tickbook.json", "tickbook.toml"];

    let mut roots = Vec::new();
    if let Ok(cwd) = std::env::current_dir() {
        roots.push(cwd.clone());
        roots.push(cwd.join(".."));
    }
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            roots.push(exe_dir.to_path_buf());
        }
    }

    roots
        .iter()
        .flat_map(|root| NAMES.iter().map(move |name| root.join(name)))
        .find(|path| path.exists())
}

/// Get required environment variable
fn env_var(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| {
        TickbookError::Config(format!("Missing required environment variable: {}", key))
    })
}

/// Parse an optional environment variable
///
/// # Errors
/// Returns `TickbookError::Config` when the variable is set but does not
/// parse.
fn env_parse<T>(key: &str, what: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| TickbookError::Config(format!("Invalid {}: {}", what, e))),
        Err(_) => Ok(None),
    }
}

/// Parse boolean from environment variable
///
/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}
