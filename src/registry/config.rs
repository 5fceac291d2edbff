//! Registry configuration

use std::time::Duration;

/// Configuration for the overlay registry and its expiry sweep
///
/// The staleness timeout and the sweep interval are independent knobs. With
/// the defaults they coincide, so an overlay not refreshed within one sweep
/// interval is evicted on the next tick; shortening the sweep interval
/// tightens the eviction window without changing the staleness policy.
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    /// Maximum time since the last detection before an overlay is evicted
    pub staleness_timeout: Duration,

    /// Cadence of the expiry sweep
    pub sweep_interval: Duration,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            staleness_timeout: Duration::from_millis(1000),
            sweep_interval: Duration::from_millis(1000),
        }
    }
}

impl RegistryConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the staleness timeout
    pub fn staleness_timeout(mut self, timeout: Duration) -> Self {
        self.staleness_timeout = timeout;
        self
    }

    /// Set the sweep interval
    pub fn sweep_interval(mut self, interval: Duration) -> Self {
        self.sweep_interval = interval;
        self
    }
}
