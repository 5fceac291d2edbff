//! AR overlay tracking for QR-scanned profiles
//!
//! This crate implements the tracking loop behind a "scan a QR code, see the
//! profile floating over it" camera view: decoded codes are resolved against
//! a profile store and tracked in a concurrently-updated overlay registry
//! that the render pass polls and a periodic sweeper prunes.
//!
//! # Architecture
//!
//! ```text
//!  camera ──► FrameSlot ──► ScanBridge ──► ProfileResolver
//!  driver    (keep only     decode +            │
//!             latest)       parse ids           ▼
//!                                        OverlayRegistry ◄── ExpirySweeper
//!                                               │             (periodic
//!                                               ▼              remove_stale)
//!                                          render pass
//!                                         (snapshot_all)
//! ```
//!
//! All of it is scoped to a [`ScanSession`]: one per visit to the scanner
//! screen, torn down when the screen goes away. The registry is the only
//! shared mutable state and owns its own synchronization; decode failures,
//! unknown ids and post-teardown stragglers all degrade to "no overlay
//! shown" rather than surfacing errors.
//!
//! # Example
//!
//! ```ignore
//! use qrtrack_rs::{CameraFrame, MemoryProfileStore, RegistryConfig, ScanSession};
//!
//! let session = ScanSession::start(RegistryConfig::default(), my_decoder, my_resolver);
//!
//! // camera callback:
//! session.submit_frame(frame).await;
//!
//! // render pass:
//! for overlay in session.overlays().await {
//!     draw_panel(&overlay.profile, overlay.bounding_box);
//! }
//!
//! // tap handler:
//! if let Some(id) = session.overlay_at(x, y).await {
//!     navigate_to_profile(id);
//! }
//!
//! session.shutdown().await;
//! ```

pub mod geometry;
pub mod profile;
pub mod registry;
pub mod scanner;
pub mod stats;

pub use geometry::BoundingBox;
pub use profile::{ProfileId, ProfileSnapshot};
pub use registry::{ExpirySweeper, OverlayEntry, OverlayRegistry, RegistryConfig, SweeperState};
pub use scanner::{
    BarcodeDecoder, CameraFrame, DecodeError, Detection, FrameSlot, MemoryProfileStore,
    ProfileResolver, ResolveError, ScanBridge, ScanSession,
};
pub use stats::{ScannerStats, StatsSnapshot};
