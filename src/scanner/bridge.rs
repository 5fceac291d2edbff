//! Detection-to-registry bridge
//!
//! Per-frame glue between the frame pipeline, the decoder, the resolver and
//! the overlay registry: decode the frame, parse each payload as a profile
//! id, resolve it, and on success upsert the overlay. Every failure path is
//! absorbed here; nothing propagates into the registry or up to the user.

use std::sync::Arc;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::geometry::BoundingBox;
use crate::profile::{ProfileId, ProfileSnapshot};
use crate::registry::store::OverlayRegistry;
use crate::stats::ScannerStats;

use super::decoder::BarcodeDecoder;
use super::frame::{CameraFrame, FrameSlot};
use super::resolver::ProfileResolver;

/// Bridges decoded frames into overlay registry updates
///
/// Owns the decoder, shares the resolver with the per-code resolution tasks
/// it spawns, and never blocks frame delivery on resolution: the frame is
/// released as soon as decoding finishes, while resolutions run detached.
pub struct ScanBridge<D, R> {
    decoder: D,
    resolver: Arc<R>,
    registry: Arc<OverlayRegistry>,
    stats: Arc<ScannerStats>,
    cancel_token: CancellationToken,
}

impl<D, R> ScanBridge<D, R>
where
    D: BarcodeDecoder,
    R: ProfileResolver,
{
    /// Create a new bridge
    pub fn new(
        decoder: D,
        resolver: R,
        registry: Arc<OverlayRegistry>,
        stats: Arc<ScannerStats>,
        cancel_token: CancellationToken,
    ) -> Self {
        Self {
            decoder,
            resolver: Arc::new(resolver),
            registry,
            stats,
            cancel_token,
        }
    }

    /// Consume frames from the slot until cancelled or the slot closes
    pub async fn run(self, slot: Arc<FrameSlot>) {
        loop {
            tokio::select! {
                _ = self.cancel_token.cancelled() => {
                    tracing::debug!("Analysis loop cancelled");
                    break;
                }
                frame = slot.recv() => {
                    match frame {
                        Some(frame) => {
                            self.stats.record_frame_analyzed();
                            self.process_frame(frame).await;
                        }
                        None => {
                            tracing::debug!("Frame slot closed, analysis loop exiting");
                            break;
                        }
                    }
                }
            }
        }
    }

    /// Analyze a single frame
    ///
    /// The frame is consumed and released exactly once, whether decoding
    /// fails, finds nothing, or fans out into resolution tasks; those tasks
    /// outlive the frame and only carry the decoded payloads.
    pub async fn process_frame(&self, frame: CameraFrame) {
        let detections = match self.decoder.decode(&frame).await {
            Ok(detections) => detections,
            Err(e) => {
                self.stats.record_decode_failure();
                tracing::warn!(error = %e, "Barcode decode failed");
                return;
            }
        };

        // Release the frame back to the driver before resolution starts
        drop(frame);

        if detections.is_empty() {
            return;
        }
        self.stats.record_codes_detected(detections.len() as u64);

        for detection in detections {
            let id: ProfileId = match detection.raw_text.parse() {
                Ok(id) => id,
                Err(_) => {
                    tracing::trace!(payload = %detection.raw_text, "Ignoring non-numeric payload");
                    continue;
                }
            };

            let resolver = Arc::clone(&self.resolver);
            let registry = Arc::clone(&self.registry);
            let stats = Arc::clone(&self.stats);
            let cancel_token = self.cancel_token.clone();
            tokio::spawn(async move {
                resolve_and_track(
                    resolver,
                    registry,
                    stats,
                    cancel_token,
                    id,
                    detection.bounding_box,
                )
                .await;
            });
        }
    }
}

/// Resolve one decoded id and upsert the overlay on success
///
/// Misses and resolver errors are absorbed. A resolution that completes
/// after cancellation leaves the registry untouched; the registry's closed
/// flag backs this up for stragglers that race the token.
async fn resolve_and_track<R: ProfileResolver>(
    resolver: Arc<R>,
    registry: Arc<OverlayRegistry>,
    stats: Arc<ScannerStats>,
    cancel_token: CancellationToken,
    id: ProfileId,
    bounding_box: BoundingBox,
) {
    let profile: Option<ProfileSnapshot> = match resolver.resolve(id).await {
        Ok(profile) => profile,
        Err(e) => {
            tracing::debug!(profile = %id, error = %e, "Profile resolution failed");
            return;
        }
    };

    match profile {
        Some(profile) => {
            if cancel_token.is_cancelled() {
                tracing::trace!(profile = %id, "Resolution finished after teardown, dropped");
                return;
            }
            registry.upsert(id, profile, bounding_box, Instant::now()).await;
            stats.record_profile_resolved();
        }
        None => {
            stats.record_resolver_miss();
            tracing::debug!(profile = %id, "No stored profile for decoded id");
        }
    }
}
