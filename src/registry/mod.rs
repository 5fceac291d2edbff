//! Overlay registry for currently visible profiles
//!
//! The registry tracks which profiles the camera currently sees and where,
//! and is the only shared mutable state in the tracking loop. Resolution
//! tasks upsert into it, the render pass snapshots it, and the expiry
//! sweeper prunes it, all concurrently.
//!
//! # Architecture
//!
//! ```text
//!                        Arc<OverlayRegistry>
//!                   ┌───────────────────────────┐
//!                   │ overlays: HashMap<        │
//!                   │   ProfileId,              │
//!                   │   OverlayEntry {          │
//!                   │     profile, bounding_box,│
//!                   │     last_seen_at,         │
//!                   │   }                       │
//!                   │ >                         │
//!                   └─────────────┬─────────────┘
//!                                 │
//!         ┌───────────────────────┼───────────────────────┐
//!         │                       │                       │
//!         ▼                       ▼                       ▼
//!   [Resolution task]       [Render pass]          [ExpirySweeper]
//!   upsert(id, ..)          snapshot_all()         remove_stale(now, t)
//! ```
//!
//! # Consistency
//!
//! Entries are read fully formed or not at all; the registry owns all of the
//! locking. The only cross-writer guarantee is last-write-wins per profile
//! id, with `last_seen_at` monotonic while an entry exists. After `close()`
//! every write is a silent no-op, so resolutions finishing mid-teardown
//! cannot resurrect state.

pub mod config;
pub mod entry;
pub mod store;
pub mod sweeper;

pub use config::RegistryConfig;
pub use entry::OverlayEntry;
pub use store::OverlayRegistry;
pub use sweeper::{ExpirySweeper, SweeperState};
