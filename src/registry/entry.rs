//! Overlay entry types
//!
//! This module defines the per-profile state stored in the registry.

use std::time::Duration;

use tokio::time::Instant;

use crate::geometry::BoundingBox;
use crate::profile::{ProfileId, ProfileSnapshot};

/// One profile currently believed visible on screen
///
/// Created on the first successful resolution of a profile id, refreshed in
/// place on every re-detection, and removed by the expiry sweep once stale.
#[derive(Debug, Clone)]
pub struct OverlayEntry {
    /// Profile id (the registry key)
    pub profile_id: ProfileId,

    /// Displayable fields captured at resolution time
    pub profile: ProfileSnapshot,

    /// Last-known screen-space rectangle of the detected code
    pub bounding_box: BoundingBox,

    /// Timestamp of the most recent successful detection
    pub last_seen_at: Instant,
}

impl OverlayEntry {
    /// Create a new overlay entry
    pub(super) fn new(
        profile_id: ProfileId,
        profile: ProfileSnapshot,
        bounding_box: BoundingBox,
        now: Instant,
    ) -> Self {
        Self {
            profile_id,
            profile,
            bounding_box,
            last_seen_at: now,
        }
    }

    /// Refresh the mutable fields after a re-detection
    ///
    /// Position and snapshot are last-write-wins; `last_seen_at` never moves
    /// backwards, so a delayed writer cannot make a fresh overlay look stale.
    pub(super) fn refresh(
        &mut self,
        profile: ProfileSnapshot,
        bounding_box: BoundingBox,
        now: Instant,
    ) {
        self.profile = profile;
        self.bounding_box = bounding_box;
        if now > self.last_seen_at {
            self.last_seen_at = now;
        }
    }

    /// Time elapsed since the last detection
    pub fn age(&self, now: Instant) -> Duration {
        now.duration_since(self.last_seen_at)
    }

    /// Whether the entry is overdue for eviction
    ///
    /// An entry is stale when its age strictly exceeds the timeout; an age
    /// exactly equal to the timeout keeps the entry alive.
    pub fn is_stale(&self, now: Instant, timeout: Duration) -> bool {
        self.age(now) > timeout
    }
}
