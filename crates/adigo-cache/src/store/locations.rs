//! Friend location store

use adigo_core::{RepoResult, UserLocation, UserLocationRepository};
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::watch;

/// Latest position per friend, keyed by user id
///
/// Entries are overwritten on every update; no history is kept.
pub struct UserLocationStore {
    locations: DashMap<String, UserLocation>,
    snapshot: watch::Sender<Vec<UserLocation>>,
}

impl UserLocationStore {
    #[must_use]
    pub fn new() -> Self {
        let (snapshot, _) = watch::channel(Vec::new());
        Self {
            locations: DashMap::new(),
            snapshot,
        }
    }

    #[must_use]
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Subscribe to full snapshots, published after every write
    pub fn subscribe(&self) -> watch::Receiver<Vec<UserLocation>> {
        self.snapshot.subscribe()
    }

    /// Number of cached locations
    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    fn sorted(&self) -> Vec<UserLocation> {
        let mut all: Vec<UserLocation> = self.locations.iter().map(|e| e.value().clone()).collect();
        all.sort_by(|a, b| a.id.cmp(&b.id));
        all
    }

    fn publish(&self) {
        self.snapshot.send_replace(self.sorted());
    }
}

impl Default for UserLocationStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserLocationRepository for UserLocationStore {
    async fn find_by_id(&self, id: &str) -> RepoResult<Option<UserLocation>> {
        Ok(self.locations.get(id).map(|e| e.value().clone()))
    }

    async fn list(&self) -> RepoResult<Vec<UserLocation>> {
        Ok(self.sorted())
    }

    async fn upsert_many(&self, locations: Vec<UserLocation>) -> RepoResult<()> {
        let count = locations.len();
        for location in locations {
            self.locations.insert(location.id.clone(), location);
        }
        self.publish();

        tracing::trace!(count, total = self.locations.len(), "Upserted friend locations");
        Ok(())
    }

    async fn delete(&self, id: &str) -> RepoResult<()> {
        if self.locations.remove(id).is_some() {
            self.publish();
        }
        Ok(())
    }
}
