//! Pipeline counters
//!
//! Cheap atomic counters over the scanning pipeline. Tracing carries the
//! per-event detail; these aggregate what a status view or a test wants to
//! assert on.

use std::sync::atomic::{AtomicU64, Ordering};

/// Live counters for one scan session
#[derive(Debug, Default)]
pub struct ScannerStats {
    frames_analyzed: AtomicU64,
    frames_dropped: AtomicU64,
    codes_detected: AtomicU64,
    decode_failures: AtomicU64,
    profiles_resolved: AtomicU64,
    resolver_misses: AtomicU64,
}

impl ScannerStats {
    /// Create a zeroed counter set
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_frame_analyzed(&self) {
        self.frames_analyzed.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_frame_dropped(&self) {
        self.frames_dropped.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_codes_detected(&self, count: u64) {
        self.codes_detected.fetch_add(count, Ordering::Relaxed);
    }

    pub(crate) fn record_decode_failure(&self) {
        self.decode_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_profile_resolved(&self) {
        self.profiles_resolved.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_resolver_miss(&self) {
        self.resolver_misses.fetch_add(1, Ordering::Relaxed);
    }

    /// Take a point-in-time copy of all counters
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            frames_analyzed: self.frames_analyzed.load(Ordering::Relaxed),
            frames_dropped: self.frames_dropped.load(Ordering::Relaxed),
            codes_detected: self.codes_detected.load(Ordering::Relaxed),
            decode_failures: self.decode_failures.load(Ordering::Relaxed),
            profiles_resolved: self.profiles_resolved.load(Ordering::Relaxed),
            resolver_misses: self.resolver_misses.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of the session counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    /// Frames handed to the decoder
    pub frames_analyzed: u64,
    /// Frames superseded in the slot before analysis
    pub frames_dropped: u64,
    /// Codes reported by the decoder
    pub codes_detected: u64,
    /// Frames the decoder failed on
    pub decode_failures: u64,
    /// Detections that resolved to a stored profile
    pub profiles_resolved: u64,
    /// Detections whose id had no stored profile
    pub resolver_misses: u64,
}
