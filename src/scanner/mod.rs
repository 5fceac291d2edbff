//! Camera-side scanning pipeline
//!
//! Everything between the frame pipeline driver and the overlay registry:
//! the collaborator contracts ([`BarcodeDecoder`], [`ProfileResolver`]), the
//! keep-only-latest frame handoff ([`FrameSlot`]), the per-frame bridge
//! ([`ScanBridge`]) and the screen-scoped session ([`ScanSession`]).
//!
//! # Data flow
//!
//! ```text
//!  camera driver ──submit_frame──► FrameSlot (newest frame only)
//!                                     │
//!                                     ▼
//!                              ScanBridge::run
//!                        decode ──► parse id ──► spawn per code
//!                                                    │
//!                                     ProfileResolver::resolve
//!                                                    │
//!                                          OverlayRegistry::upsert
//! ```
//!
//! Failure handling is strictly absorb-and-log: decode errors, resolver
//! errors and unknown ids all degrade to "no overlay shown".

pub mod bridge;
pub mod decoder;
pub mod error;
pub mod frame;
pub mod resolver;
pub mod session;

pub use bridge::ScanBridge;
pub use decoder::BarcodeDecoder;
pub use error::{DecodeError, ResolveError};
pub use frame::{CameraFrame, Detection, FrameSlot};
pub use resolver::{MemoryProfileStore, ProfileResolver};
pub use session::ScanSession;
