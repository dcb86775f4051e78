//! Connector error taxonomy
//!
//! Every failure coming out of a backend connector is a [`ConnectorError`].
//! The seven categories carry no behavioural difference beyond their
//! [`ErrorKind`] tag: presentation layers switch on the kind to pick an
//! icon, an intent, and how long the notification stays on screen.
//!
//! A `ConnectorError` is plain data. Construction never fails, and once an
//! error has been built it is never mutated; the backend shares it behind an
//! `Arc` so that queue membership is decided by pointer identity.

use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
#[cfg(feature = "ts-gen")]
use ts_rs::TS;
use uuid::Uuid;

use crate::constants::DEFAULT_ERROR_TIMEOUT_MS;
use crate::impl_domain_status_conversions;

/// Result type alias for connector operations
pub type ConnectorResult<T> = std::result::Result<T, ConnectorError>;

/// Shared, thread-safe cause attached to a [`ConnectorError`]
type SharedCause = Arc<dyn StdError + Send + Sync + 'static>;

/// Failure category of a connector call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Login,
    Read,
    Update,
    Create,
    Delete,
    NotReady,
    InvalidOperation,
}

impl_domain_status_conversions!(ErrorKind {
    Login => "login",
    Read => "read",
    Update => "update",
    Create => "create",
    Delete => "delete",
    NotReady => "not_ready",
    InvalidOperation => "invalid_operation",
});

impl ErrorKind {
    /// Every kind, in declaration order.
    pub const ALL: [Self; 7] = [
        Self::Login,
        Self::Read,
        Self::Update,
        Self::Create,
        Self::Delete,
        Self::NotReady,
        Self::InvalidOperation,
    ];

    /// Severity used for routing and log levels
    pub fn severity(self) -> ErrorSeverity {
        match self {
            Self::Login | Self::NotReady | Self::InvalidOperation => ErrorSeverity::Warning,
            Self::Read | Self::Update | Self::Create | Self::Delete => ErrorSeverity::Error,
        }
    }

    /// Icon name shown next to the notification
    pub fn icon(self) -> &'static str {
        match self {
            Self::Login => "log-in",
            Self::Read => "cloud-download",
            Self::Update => "cloud-upload",
            Self::Create => "add",
            Self::Delete => "trash",
            Self::NotReady => "offline",
            Self::InvalidOperation => "disable",
        }
    }

    /// Visual intent derived from the severity
    pub fn intent(self) -> ErrorIntent {
        match self.severity() {
            ErrorSeverity::Info => ErrorIntent::Primary,
            ErrorSeverity::Warning => ErrorIntent::Warning,
            ErrorSeverity::Error | ErrorSeverity::Critical => ErrorIntent::Danger,
        }
    }
}

/// Error severity levels for monitoring and notification routing
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
#[serde(rename_all = "snake_case")]
pub enum ErrorSeverity {
    /// Informational, typically for debugging
    Info,
    /// Warning, should be monitored but not critical
    Warning,
    /// Error, requires attention and action
    Error,
    /// Critical, immediate action required
    Critical,
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "INFO"),
            Self::Warning => write!(f, "WARN"),
            Self::Error => write!(f, "ERROR"),
            Self::Critical => write!(f, "CRITICAL"),
        }
    }
}

/// Visual intent of a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorIntent {
    Primary,
    Warning,
    Danger,
}

/// Structured diagnostics reported by the remote server
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
pub struct ErrorInfo {
    /// Human-readable messages produced by the server, in order
    #[serde(default)]
    pub server_messages: Vec<String>,
    /// Remote stack traces, one group of lines per trace
    #[serde(default, alias = "remoteTrace")]
    pub remote_trace: Vec<Vec<String>>,
}

impl ErrorInfo {
    /// Info carrying only server messages
    pub fn with_server_messages<I, S>(messages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { server_messages: messages.into_iter().map(Into::into).collect(), ..Self::default() }
    }

    /// Append one remote trace group
    pub fn push_remote_trace<I, S>(&mut self, lines: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.remote_trace.push(lines.into_iter().map(Into::into).collect());
    }

    pub fn is_empty(&self) -> bool {
        self.server_messages.is_empty() && self.remote_trace.is_empty()
    }
}

/// How a presentation layer should render an error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
pub struct ErrorPresentation {
    pub icon: &'static str,
    pub intent: ErrorIntent,
    #[cfg_attr(feature = "ts-gen", ts(type = "number"))]
    pub timeout_ms: u64,
}

impl ErrorPresentation {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// A categorised connector failure
#[derive(Debug, Clone)]
pub struct ConnectorError {
    id: Uuid,
    kind: ErrorKind,
    message: String,
    info: Option<ErrorInfo>,
    original: Option<SharedCause>,
}

impl ConnectorError {
    /// Create an error of the given kind
    pub fn new<S: Into<String>>(kind: ErrorKind, message: S) -> Self {
        Self { id: Uuid::now_v7(), kind, message: message.into(), info: None, original: None }
    }

    /// Create a login error
    pub fn login<S: Into<String>>(message: S) -> Self {
        Self::new(ErrorKind::Login, message)
    }

    /// Create a read error
    pub fn read<S: Into<String>>(message: S) -> Self {
        Self::new(ErrorKind::Read, message)
    }

    /// Create an update error
    pub fn update<S: Into<String>>(message: S) -> Self {
        Self::new(ErrorKind::Update, message)
    }

    /// Create a create error
    pub fn create<S: Into<String>>(message: S) -> Self {
        Self::new(ErrorKind::Create, message)
    }

    /// Create a delete error
    pub fn delete<S: Into<String>>(message: S) -> Self {
        Self::new(ErrorKind::Delete, message)
    }

    /// Create a connector-not-ready error
    pub fn not_ready<S: Into<String>>(message: S) -> Self {
        Self::new(ErrorKind::NotReady, message)
    }

    /// Create an invalid-operation error
    pub fn invalid_operation<S: Into<String>>(message: S) -> Self {
        Self::new(ErrorKind::InvalidOperation, message)
    }

    /// Attach server diagnostics
    pub fn with_info(mut self, info: ErrorInfo) -> Self {
        self.info = Some(info);
        self
    }

    /// Attach the error that caused this one
    pub fn with_source<E>(self, source: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        self.with_shared_source(Arc::new(source))
    }

    /// Attach an already shared cause
    pub fn with_shared_source(mut self, source: SharedCause) -> Self {
        self.original = Some(source);
        self
    }

    /// Unique id, stable for the lifetime of the error
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn info(&self) -> Option<&ErrorInfo> {
        self.info.as_ref()
    }

    /// The wrapped cause, if any
    pub fn original(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        self.original.as_deref()
    }

    pub fn severity(&self) -> ErrorSeverity {
        self.kind.severity()
    }

    /// Rendering hints for notification toasts
    pub fn presentation(&self) -> ErrorPresentation {
        ErrorPresentation {
            icon: self.kind.icon(),
            intent: self.kind.intent(),
            timeout_ms: DEFAULT_ERROR_TIMEOUT_MS,
        }
    }

    /// Message, server diagnostics and the full cause chain as one string.
    pub fn diagnostic(&self) -> String {
        let mut out = format!("[{}] {}", self.kind, self.message);

        if let Some(info) = &self.info {
            for message in &info.server_messages {
                out.push_str(&format!("\n  server: {}", message));
            }
            for trace in &info.remote_trace {
                out.push_str("\n  remote trace:\n");
                out.push_str(&trace.join("\n"));
            }
        }

        let mut cause = self.source();
        while let Some(err) = cause {
            out.push_str(&format!("\n  caused by: {}", err));
            cause = err.source();
        }

        out
    }
}

impl fmt::Display for ConnectorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl StdError for ConnectorError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.original.as_deref().map(|err| err as &(dyn StdError + 'static))
    }
}
