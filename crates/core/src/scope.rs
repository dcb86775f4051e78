//! Consumer view scopes
//!
//! A view that triggers actions may go away before they finish. Wrapping
//! the action in [`ViewScope::guard`] lets the action run to completion
//! (state still updates, errors still queue) while the view stops waiting
//! for, and never receives, the outcome once the scope is closed.

use std::future::Future;

use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Lifetime of one consumer view
#[derive(Debug, Default)]
pub struct ViewScope {
    token: CancellationToken,
}

impl ViewScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scope that closes with `self` but can also be closed on its own
    pub fn child(&self) -> Self {
        Self { token: self.token.child_token() }
    }

    /// Run `action` detached and wait for its output while the scope is open
    ///
    /// Yields `None` if the scope closes first, or if it was closed when
    /// the action finished. An already-closed scope does not start the
    /// action at all.
    pub async fn guard<F>(&self, action: F) -> Option<F::Output>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        if self.token.is_cancelled() {
            debug!("View scope closed; action not started");
            return None;
        }

        let handle = tokio::spawn(action);
        tokio::select! {
            biased;
            () = self.token.cancelled() => None,
            joined = handle => match joined {
                Ok(output) if !self.token.is_cancelled() => Some(output),
                Ok(_) => None,
                Err(err) => {
                    warn!(error = %err, "Scoped action failed to complete");
                    None
                }
            },
        }
    }

    /// Stop delivering outcomes to this view
    pub fn close(&self) {
        self.token.cancel();
    }

    pub fn is_closed(&self) -> bool {
        self.token.is_cancelled()
    }
}

impl Drop for ViewScope {
    fn drop(&mut self) {
        self.token.cancel();
    }
}
