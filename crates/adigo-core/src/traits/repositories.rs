//! Repository traits (ports) - define the interface for local data access
//!
//! The local cache is a read-mostly mirror of server state. The domain layer
//! defines what it needs, and the cache layer provides the implementation.

use async_trait::async_trait;

use crate::entities::{ChatRoom, User, UserLocation};
use crate::error::DomainError;

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// User Repository
// ============================================================================

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by ID
    async fn find_by_id(&self, id: i64) -> RepoResult<Option<User>>;

    /// Find user by email
    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>>;

    /// List all cached users
    async fn list(&self) -> RepoResult<Vec<User>>;

    /// Insert or replace a user
    async fn upsert(&self, user: User) -> RepoResult<()>;

    /// Replace the whole table with the given users (e.g. a fresh friend list)
    async fn replace_all(&self, users: Vec<User>) -> RepoResult<()>;

    /// Delete a user
    async fn delete(&self, id: i64) -> RepoResult<()>;
}

// ============================================================================
// User Location Repository
// ============================================================================

#[async_trait]
pub trait UserLocationRepository: Send + Sync {
    /// Find the latest location for a user
    async fn find_by_id(&self, id: &str) -> RepoResult<Option<UserLocation>>;

    /// List all cached locations
    async fn list(&self) -> RepoResult<Vec<UserLocation>>;

    /// Insert or replace locations, last write wins per id
    async fn upsert_many(&self, locations: Vec<UserLocation>) -> RepoResult<()>;

    /// Delete the location for a user
    async fn delete(&self, id: &str) -> RepoResult<()>;
}

// ============================================================================
// Chat Room Repository
// ============================================================================

#[async_trait]
pub trait ChatRoomRepository: Send + Sync {
    /// Find chat room by ID
    async fn find_by_id(&self, id: &str) -> RepoResult<Option<ChatRoom>>;

    /// List all chat rooms
    async fn list(&self) -> RepoResult<Vec<ChatRoom>>;

    /// Insert or replace a chat room
    async fn upsert(&self, room: ChatRoom) -> RepoResult<()>;

    /// Delete a chat room
    async fn delete(&self, id: &str) -> RepoResult<()>;
}
