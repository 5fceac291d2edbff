//! Overlay registry implementation
//!
//! The central registry that tracks which profiles are currently visible in
//! the camera view and where their codes were last seen.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::time::Instant;

use crate::geometry::BoundingBox;
use crate::profile::{ProfileId, ProfileSnapshot};

use super::config::RegistryConfig;
use super::entry::OverlayEntry;

/// Central registry for all currently visible overlays
///
/// Thread-safe via `RwLock`. Resolution tasks upsert concurrently while the
/// render pass snapshots and the sweeper prunes; the registry owns all of the
/// synchronization, callers never lock around it.
pub struct OverlayRegistry {
    /// Map of profile id to overlay entry
    overlays: RwLock<HashMap<ProfileId, Arc<RwLock<OverlayEntry>>>>,

    /// Set on teardown; makes every later upsert a no-op
    closed: AtomicBool,

    /// Configuration
    config: RegistryConfig,
}

impl OverlayRegistry {
    /// Create a new overlay registry with default configuration
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    /// Create a new overlay registry with custom configuration
    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            overlays: RwLock::new(HashMap::new()),
            closed: AtomicBool::new(false),
            config,
        }
    }

    /// Get the registry configuration
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Insert a new overlay or refresh an existing one
    ///
    /// Re-detection of a known profile overwrites the bounding box and the
    /// profile snapshot and advances `last_seen_at`; it never duplicates the
    /// entry. Concurrent calls for the same id are last-write-wins. After
    /// [`close`](Self::close) this is a silent no-op, so a resolution that
    /// completes mid-teardown cannot resurrect state.
    pub async fn upsert(
        &self,
        id: ProfileId,
        profile: ProfileSnapshot,
        bounding_box: BoundingBox,
        now: Instant,
    ) {
        if self.closed.load(Ordering::Acquire) {
            tracing::trace!(profile = %id, "Upsert after close ignored");
            return;
        }

        // Fast path: refresh an existing entry under the shared map lock
        {
            let overlays = self.overlays.read().await;
            if let Some(entry_arc) = overlays.get(&id) {
                let mut entry = entry_arc.write().await;
                entry.refresh(profile, bounding_box, now);
                tracing::trace!(profile = %id, rect = %entry.bounding_box, "Overlay refreshed");
                return;
            }
        }

        let mut overlays = self.overlays.write().await;

        // Re-check under the exclusive lock: close() may have won the race
        if self.closed.load(Ordering::Acquire) {
            tracing::trace!(profile = %id, "Upsert after close ignored");
            return;
        }

        match overlays.entry(id) {
            Entry::Occupied(slot) => {
                // Another writer created the entry while we upgraded
                let mut entry = slot.get().write().await;
                entry.refresh(profile, bounding_box, now);
            }
            Entry::Vacant(slot) => {
                slot.insert(Arc::new(RwLock::new(OverlayEntry::new(
                    id,
                    profile,
                    bounding_box,
                    now,
                ))));
                tracing::debug!(profile = %id, "Overlay created");
            }
        }
    }

    /// Take a point-in-time snapshot of all current overlays
    ///
    /// Returns fully-formed copies for the render pass; an entry mid-refresh
    /// is read either before or after the refresh, never in between. Order is
    /// unspecified.
    pub async fn snapshot_all(&self) -> Vec<OverlayEntry> {
        let overlays = self.overlays.read().await;

        let mut entries = Vec::with_capacity(overlays.len());
        for entry_arc in overlays.values() {
            entries.push(entry_arc.read().await.clone());
        }

        entries
    }

    /// Remove every overlay whose last detection is older than `timeout`
    ///
    /// An entry with age exactly equal to the timeout is retained. Entries
    /// currently being refreshed are skipped; they are fresh by definition.
    pub async fn remove_stale(&self, now: Instant, timeout: Duration) {
        let mut overlays = self.overlays.write().await;

        let stale: Vec<ProfileId> = overlays
            .iter()
            .filter_map(|(id, entry_arc)| {
                if let Ok(entry) = entry_arc.try_read() {
                    if entry.is_stale(now, timeout) {
                        return Some(*id);
                    }
                }
                None
            })
            .collect();

        for id in stale {
            overlays.remove(&id);
            tracing::debug!(profile = %id, "Overlay expired");
        }
    }

    /// Find the overlay under a screen point, if any
    ///
    /// Used to turn a tap on a panel into a navigation target. When boxes
    /// overlap, the most recently seen overlay wins.
    pub async fn find_at(&self, x: f32, y: f32) -> Option<ProfileId> {
        self.snapshot_all()
            .await
            .into_iter()
            .filter(|entry| entry.bounding_box.contains(x, y))
            .max_by_key(|entry| entry.last_seen_at)
            .map(|entry| entry.profile_id)
    }

    /// Number of current overlays
    pub async fn len(&self) -> usize {
        self.overlays.read().await.len()
    }

    /// Whether the registry has no overlays
    pub async fn is_empty(&self) -> bool {
        self.overlays.read().await.is_empty()
    }

    /// Whether the registry has been closed
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Tear the registry down
    ///
    /// Clears all overlays and turns every subsequent upsert into a no-op.
    /// Called when the hosting screen goes away; in-flight resolutions may
    /// still complete afterwards, their writes just vanish.
    pub async fn close(&self) {
        self.closed.store(true, Ordering::Release);

        let mut overlays = self.overlays.write().await;
        let evicted = overlays.len();
        overlays.clear();

        tracing::info!(overlays = evicted, "Overlay registry closed");
    }
}

impl Default for OverlayRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    fn snapshot(id: i64, name: &str) -> ProfileSnapshot {
        ProfileSnapshot::new(ProfileId::new(id), name, format!("{name}@example.com"))
    }

    fn rect(left: f32, top: f32) -> BoundingBox {
        BoundingBox::new(left, top, left + 100.0, top + 100.0)
    }

    #[tokio::test]
    async fn test_upsert_distinct_ids() {
        let registry = OverlayRegistry::new();
        let now = Instant::now();

        registry.upsert(ProfileId::new(1), snapshot(1, "one"), rect(0.0, 0.0), now).await;
        registry.upsert(ProfileId::new(2), snapshot(2, "two"), rect(50.0, 0.0), now).await;
        registry.upsert(ProfileId::new(3), snapshot(3, "three"), rect(100.0, 0.0), now).await;

        let mut entries = registry.snapshot_all().await;
        entries.sort_by_key(|e| e.profile_id);

        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].profile_id, ProfileId::new(1));
        assert_eq!(entries[2].profile.name, "three");
    }

    #[tokio::test]
    async fn test_redetection_overwrites_not_duplicates() {
        let registry = OverlayRegistry::new();
        let base = Instant::now();

        let box_a = rect(0.0, 0.0);
        let box_b = rect(200.0, 200.0);
        let t10 = base + Duration::from_millis(10);
        let t20 = base + Duration::from_millis(20);

        registry.upsert(ProfileId::new(3), snapshot(3, "three"), box_a, t10).await;
        registry.upsert(ProfileId::new(3), snapshot(3, "three"), box_b, t20).await;

        let entries = registry.snapshot_all().await;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].bounding_box, box_b);
        assert_eq!(entries[0].last_seen_at, t20);
    }

    #[tokio::test]
    async fn test_remove_stale_boundary() {
        let registry = OverlayRegistry::new();
        let base = Instant::now();
        let timeout = Duration::from_millis(400);

        // 1500 - 1000 = 500 > 400: evicted
        registry
            .upsert(
                ProfileId::new(7),
                snapshot(7, "seven"),
                rect(0.0, 0.0),
                base + Duration::from_millis(1000),
            )
            .await;
        registry.remove_stale(base + Duration::from_millis(1500), timeout).await;
        assert!(registry.is_empty().await);

        // 1300 - 1000 = 300 < 400: retained
        registry
            .upsert(
                ProfileId::new(7),
                snapshot(7, "seven"),
                rect(0.0, 0.0),
                base + Duration::from_millis(1000),
            )
            .await;
        registry.remove_stale(base + Duration::from_millis(1300), timeout).await;
        assert_eq!(registry.len().await, 1);

        // 1400 - 1000 = 400 == 400: boundary is inclusive on the keep side
        registry.remove_stale(base + Duration::from_millis(1400), timeout).await;
        assert_eq!(registry.len().await, 1);
    }

    #[tokio::test]
    async fn test_remove_stale_mixed_ages() {
        let registry = OverlayRegistry::new();
        let base = Instant::now();

        registry
            .upsert(ProfileId::new(1), snapshot(1, "old"), rect(0.0, 0.0), base)
            .await;
        registry
            .upsert(
                ProfileId::new(2),
                snapshot(2, "fresh"),
                rect(50.0, 0.0),
                base + Duration::from_millis(900),
            )
            .await;

        registry
            .remove_stale(base + Duration::from_millis(1100), Duration::from_millis(1000))
            .await;

        let entries = registry.snapshot_all().await;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].profile_id, ProfileId::new(2));
    }

    #[tokio::test]
    async fn test_concurrent_upserts_no_lost_updates() {
        let registry = Arc::new(OverlayRegistry::new());
        let now = Instant::now();

        let mut handles = Vec::with_capacity(100);
        for i in 0..100i64 {
            let registry = Arc::clone(&registry);
            handles.push(tokio::spawn(async move {
                registry
                    .upsert(
                        ProfileId::new(i),
                        snapshot(i, "bulk"),
                        rect(i as f32, 0.0),
                        now,
                    )
                    .await;
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(registry.len().await, 100);

        let entries = registry.snapshot_all().await;
        let mut ids: Vec<i64> = entries.iter().map(|e| e.profile_id.0).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 100);
    }

    #[tokio::test]
    async fn test_concurrent_upserts_same_id_single_entry() {
        let registry = Arc::new(OverlayRegistry::new());
        let now = Instant::now();

        let mut handles = Vec::new();
        for i in 0..32u32 {
            let registry = Arc::clone(&registry);
            handles.push(tokio::spawn(async move {
                registry
                    .upsert(
                        ProfileId::new(5),
                        snapshot(5, "five"),
                        rect(i as f32, i as f32),
                        now + Duration::from_millis(i as u64),
                    )
                    .await;
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(registry.len().await, 1);
    }

    #[tokio::test]
    async fn test_upsert_after_close_is_noop() {
        let registry = OverlayRegistry::new();
        let now = Instant::now();

        registry.upsert(ProfileId::new(1), snapshot(1, "one"), rect(0.0, 0.0), now).await;
        registry.close().await;

        assert!(registry.is_closed());
        assert!(registry.is_empty().await);

        // The straggler write from a late resolution disappears
        registry.upsert(ProfileId::new(2), snapshot(2, "late"), rect(0.0, 0.0), now).await;
        assert!(registry.snapshot_all().await.is_empty());
    }

    #[tokio::test]
    async fn test_sweep_concurrent_with_upserts() {
        let registry = Arc::new(OverlayRegistry::new());
        let base = Instant::now();

        let writer = {
            let registry = Arc::clone(&registry);
            tokio::spawn(async move {
                for i in 0..50i64 {
                    registry
                        .upsert(
                            ProfileId::new(i),
                            snapshot(i, "w"),
                            rect(0.0, 0.0),
                            base + Duration::from_millis(2000),
                        )
                        .await;
                }
            })
        };
        let sweeper = {
            let registry = Arc::clone(&registry);
            tokio::spawn(async move {
                for _ in 0..10 {
                    registry
                        .remove_stale(base + Duration::from_millis(1000), Duration::from_millis(500))
                        .await;
                }
            })
        };

        writer.await.unwrap();
        sweeper.await.unwrap();

        // Every written entry is timestamped in the sweep's future, so all
        // survive and every snapshot observation is fully formed.
        assert_eq!(registry.len().await, 50);
    }

    #[tokio::test]
    async fn test_find_at_hit_and_miss() {
        let registry = OverlayRegistry::new();
        let now = Instant::now();

        registry
            .upsert(
                ProfileId::new(1),
                snapshot(1, "one"),
                BoundingBox::new(0.0, 0.0, 100.0, 100.0),
                now,
            )
            .await;

        assert_eq!(registry.find_at(50.0, 50.0).await, Some(ProfileId::new(1)));
        assert_eq!(registry.find_at(150.0, 50.0).await, None);
    }

    #[tokio::test]
    async fn test_find_at_overlap_prefers_most_recent() {
        let registry = OverlayRegistry::new();
        let base = Instant::now();

        let overlap = BoundingBox::new(0.0, 0.0, 100.0, 100.0);
        registry.upsert(ProfileId::new(1), snapshot(1, "old"), overlap, base).await;
        registry
            .upsert(
                ProfileId::new(2),
                snapshot(2, "new"),
                overlap,
                base + Duration::from_millis(5),
            )
            .await;

        assert_eq!(registry.find_at(10.0, 10.0).await, Some(ProfileId::new(2)));
    }
}
