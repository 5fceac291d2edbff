//! Scan session lifecycle
//!
//! A [`ScanSession`] is the screen-scoped owner of the whole tracking loop:
//! it builds the registry, starts the sweeper, and spawns the analysis
//! worker when the scanner screen comes up, and tears all of it down when
//! the screen goes away. Nothing here is a global; each screen visit gets
//! its own session.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::profile::ProfileId;
use crate::registry::config::RegistryConfig;
use crate::registry::entry::OverlayEntry;
use crate::registry::store::OverlayRegistry;
use crate::registry::sweeper::ExpirySweeper;
use crate::stats::{ScannerStats, StatsSnapshot};

use super::bridge::ScanBridge;
use super::decoder::BarcodeDecoder;
use super::frame::{CameraFrame, FrameSlot};
use super::resolver::ProfileResolver;

/// One active scanner screen: registry, sweeper and analysis worker
///
/// The frame pipeline driver feeds [`submit_frame`](Self::submit_frame), the
/// render pass polls [`overlays`](Self::overlays) every pass, and taps go
/// through [`overlay_at`](Self::overlay_at). [`shutdown`](Self::shutdown)
/// consumes the session, so nothing can submit into a torn-down loop.
pub struct ScanSession {
    registry: Arc<OverlayRegistry>,
    slot: Arc<FrameSlot>,
    stats: Arc<ScannerStats>,
    sweeper: ExpirySweeper,
    cancel_token: CancellationToken,
    worker: Option<JoinHandle<()>>,
}

impl ScanSession {
    /// Start a session with the given collaborators
    ///
    /// Spawns the analysis worker and starts the expiry sweeper immediately.
    pub fn start<D, R>(config: RegistryConfig, decoder: D, resolver: R) -> Self
    where
        D: BarcodeDecoder,
        R: ProfileResolver,
    {
        let registry = Arc::new(OverlayRegistry::with_config(config));
        let stats = Arc::new(ScannerStats::new());
        let slot = Arc::new(FrameSlot::new());
        let cancel_token = CancellationToken::new();

        let mut sweeper = ExpirySweeper::new(Arc::clone(&registry));
        sweeper.start();

        let bridge = ScanBridge::new(
            decoder,
            resolver,
            Arc::clone(&registry),
            Arc::clone(&stats),
            cancel_token.clone(),
        );
        let worker = tokio::spawn(bridge.run(Arc::clone(&slot)));

        tracing::info!("Scan session started");

        Self {
            registry,
            slot,
            stats,
            sweeper,
            cancel_token,
            worker: Some(worker),
        }
    }

    /// Hand a camera frame to the analysis loop
    ///
    /// Keep-only-latest: if the loop is still busy with an earlier frame,
    /// the pending one is dropped in favor of this one. Never blocks on
    /// decoding or resolution.
    pub async fn submit_frame(&self, frame: CameraFrame) {
        if self.slot.submit(frame).await {
            self.stats.record_frame_dropped();
        }
    }

    /// Point-in-time view of the current overlays for the render pass
    pub async fn overlays(&self) -> Vec<OverlayEntry> {
        self.registry.snapshot_all().await
    }

    /// Map a tap position to the overlay under it, if any
    ///
    /// The returned id is the navigation target for the profile detail view.
    pub async fn overlay_at(&self, x: f32, y: f32) -> Option<ProfileId> {
        self.registry.find_at(x, y).await
    }

    /// The session's overlay registry
    pub fn registry(&self) -> &Arc<OverlayRegistry> {
        &self.registry
    }

    /// Current pipeline counters
    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    /// Tear the session down
    ///
    /// Ordered teardown: cancel the analysis loop, close the frame slot,
    /// join the worker, stop the sweeper, close the registry. In-flight
    /// resolutions finishing later write into a closed registry and vanish.
    pub async fn shutdown(mut self) {
        self.cancel_token.cancel();
        self.slot.close().await;

        if let Some(worker) = self.worker.take() {
            if let Err(e) = worker.await {
                tracing::warn!(error = %e, "Analysis worker join failed");
            }
        }

        self.sweeper.stop().await;
        self.registry.close().await;

        tracing::info!("Scan session shut down");
    }
}
