//! Periodic expiry sweep
//!
//! Drives [`OverlayRegistry::remove_stale`] on a fixed cadence for as long
//! as the hosting screen is active. The sweeper has exactly two states:
//! `Running` while the screen is up, `Stopped` after teardown.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use super::store::OverlayRegistry;

/// Lifecycle state of the expiry sweeper
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweeperState {
    /// Ticking on the configured interval
    Running,
    /// Not sweeping; screen inactive or torn down
    Stopped,
}

/// Periodic task that prunes stale overlays from the registry
///
/// Started when the scanner screen comes up and stopped synchronously on
/// teardown: [`stop`](Self::stop) cancels the tick loop and joins it, so no
/// sweep fires against a registry that is going away.
pub struct ExpirySweeper {
    registry: Arc<OverlayRegistry>,
    handle: Option<JoinHandle<()>>,
    cancel_token: Option<CancellationToken>,
}

impl ExpirySweeper {
    /// Create a sweeper for the given registry, initially stopped
    pub fn new(registry: Arc<OverlayRegistry>) -> Self {
        Self {
            registry,
            handle: None,
            cancel_token: None,
        }
    }

    /// Start sweeping on the registry's configured interval
    ///
    /// Starting an already running sweeper is a no-op.
    pub fn start(&mut self) {
        if self.handle.is_some() {
            return;
        }

        let cancel_token = CancellationToken::new();
        let token = cancel_token.clone();
        let registry = Arc::clone(&self.registry);

        self.handle = Some(tokio::spawn(sweep_loop(registry, token)));
        self.cancel_token = Some(cancel_token);

        tracing::debug!(
            interval_ms = self.registry.config().sweep_interval.as_millis() as u64,
            timeout_ms = self.registry.config().staleness_timeout.as_millis() as u64,
            "Expiry sweeper started"
        );
    }

    /// Stop sweeping
    ///
    /// Cancels the tick loop and waits for it to exit; once this returns no
    /// further sweep can touch the registry. Stopping a stopped sweeper is a
    /// no-op.
    pub async fn stop(&mut self) {
        if let Some(token) = self.cancel_token.take() {
            token.cancel();
        }

        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.await {
                tracing::warn!(error = %e, "Sweep loop join failed");
            }
        }
    }

    /// Current lifecycle state
    pub fn state(&self) -> SweeperState {
        if self.handle.is_some() {
            SweeperState::Running
        } else {
            SweeperState::Stopped
        }
    }

    /// Whether the sweeper is currently running
    pub fn is_running(&self) -> bool {
        self.state() == SweeperState::Running
    }
}

impl Drop for ExpirySweeper {
    fn drop(&mut self) {
        // Backstop for sessions dropped without an explicit stop
        if let Some(token) = self.cancel_token.take() {
            token.cancel();
        }
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

async fn sweep_loop(registry: Arc<OverlayRegistry>, cancel_token: CancellationToken) {
    let interval = registry.config().sweep_interval;
    let timeout = registry.config().staleness_timeout;

    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                registry.remove_stale(Instant::now(), timeout).await;
            }
            _ = cancel_token.cancelled() => {
                tracing::debug!("Expiry sweeper shutting down");
                break;
            }
        }
    }
}
