//! User store - the current user and their friends

use adigo_core::{RepoResult, User, UserRepository};
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::watch;

/// Cached users keyed by id
pub struct UserStore {
    users: DashMap<i64, User>,
    snapshot: watch::Sender<Vec<User>>,
}

impl UserStore {
    #[must_use]
    pub fn new() -> Self {
        let (snapshot, _) = watch::channel(Vec::new());
        Self {
            users: DashMap::new(),
            snapshot,
        }
    }

    #[must_use]
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Subscribe to full snapshots, published after every write
    pub fn subscribe(&self) -> watch::Receiver<Vec<User>> {
        self.snapshot.subscribe()
    }

    fn sorted(&self) -> Vec<User> {
        let mut all: Vec<User> = self.users.iter().map(|e| e.value().clone()).collect();
        all.sort_by_key(|u| u.id);
        all
    }

    fn publish(&self) {
        self.snapshot.send_replace(self.sorted());
    }
}

impl Default for UserStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn find_by_id(&self, id: i64) -> RepoResult<Option<User>> {
        Ok(self.users.get(&id).map(|e| e.value().clone()))
    }

    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        Ok(self
            .users
            .iter()
            .find(|e| e.value().email.eq_ignore_ascii_case(email))
            .map(|e| e.value().clone()))
    }

    async fn list(&self) -> RepoResult<Vec<User>> {
        Ok(self.sorted())
    }

    async fn upsert(&self, user: User) -> RepoResult<()> {
        self.users.insert(user.id, user);
        self.publish();
        Ok(())
    }

    async fn replace_all(&self, users: Vec<User>) -> RepoResult<()> {
        self.users.clear();
        for user in users {
            self.users.insert(user.id, user);
        }
        self.publish();

        tracing::debug!(count = self.users.len(), "Replaced cached users");
        Ok(())
    }

    async fn delete(&self, id: i64) -> RepoResult<()> {
        if self.users.remove(&id).is_some() {
            self.publish();
        }
        Ok(())
    }
}
