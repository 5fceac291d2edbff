//! Profile resolver contract
//!
//! Decoded ids mean nothing until the local profile store confirms them.
//! The resolver is the seam to that store; the tracking loop only ever sees
//! display snapshots.

use std::collections::HashMap;
use std::future::Future;

use tokio::sync::RwLock;

use crate::profile::{ProfileId, ProfileSnapshot};

use super::error::ResolveError;

/// Adapter over the profile store
///
/// "Not found" is a valid, non-error outcome reported as `Ok(None)`; the
/// bridge silently drops such detections. Like [`super::BarcodeDecoder`],
/// implementations can use `async fn` directly.
pub trait ProfileResolver: Send + Sync + 'static {
    /// Look up the display snapshot for a profile id
    fn resolve(
        &self,
        id: ProfileId,
    ) -> impl Future<Output = Result<Option<ProfileSnapshot>, ResolveError>> + Send;
}

/// In-memory profile resolver
///
/// Backs tests and demos; real deployments wrap their storage layer instead.
pub struct MemoryProfileStore {
    profiles: RwLock<HashMap<ProfileId, ProfileSnapshot>>,
}

impl MemoryProfileStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            profiles: RwLock::new(HashMap::new()),
        }
    }

    /// Insert or replace a profile
    pub async fn insert(&self, profile: ProfileSnapshot) {
        self.profiles.write().await.insert(profile.id, profile);
    }

    /// Remove a profile
    pub async fn remove(&self, id: ProfileId) {
        self.profiles.write().await.remove(&id);
    }

    /// Number of stored profiles
    pub async fn len(&self) -> usize {
        self.profiles.read().await.len()
    }

    /// Whether the store is empty
    pub async fn is_empty(&self) -> bool {
        self.profiles.read().await.is_empty()
    }
}

impl Default for MemoryProfileStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ProfileResolver for MemoryProfileStore {
    async fn resolve(&self, id: ProfileId) -> Result<Option<ProfileSnapshot>, ResolveError> {
        Ok(self.profiles.read().await.get(&id).cloned())
    }
}
