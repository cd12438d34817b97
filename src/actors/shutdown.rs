//! Single broadcast signal that stops every poll worker
//!
//! ```rust,ignore
//! let (trigger, listener) = shutdown::channel();
//!
//! let handles = start_workers(settings, fetcher, sink, &listener);
//!
//! trigger.trigger();
//! join_workers(handles).await;
//! ```

use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Create the trigger and a first listener.
pub fn channel() -> (ShutdownTrigger, ShutdownListener) {
    let token = CancellationToken::new();
    let listener = ShutdownListener {
        token: token.clone(),
    };
    (ShutdownTrigger { token }, listener)
}

/// Sending half. `trigger` consumes it, so the signal can fire only once.
#[derive(Debug)]
pub struct ShutdownTrigger {
    token: CancellationToken,
}

impl ShutdownTrigger {
    pub fn trigger(self) {
        debug!("signalling shutdown");
        self.token.cancel();
    }
}

/// Receiving half, cloned into every worker.
#[derive(Debug, Clone)]
pub struct ShutdownListener {
    token: CancellationToken,
}

impl ShutdownListener {
    /// Resolves once the trigger has fired. Returns immediately afterwards.
    pub async fn wait(&self) {
        self.token.cancelled().await;
    }
}
