//! # adigo-cache
//!
//! Local cache for offline reads of server-provided entities.
//!
//! ## Features
//!
//! - **Users**: the current user and the friend list
//! - **Friend locations**: latest position per friend, last write wins
//! - **Chat rooms**: schema only, kept for future chat features
//! - **Reactive snapshots**: every store publishes its full contents through a
//!   `tokio::sync::watch` channel after each write
//!
//! The cache mirrors the server and is never the source of truth.
//!
//! ## Example
//!
//! ```ignore
//! use adigo_cache::UserLocationStore;
//! use adigo_core::{UserLocation, UserLocationRepository};
//!
//! let store = UserLocationStore::new_shared();
//! let mut updates = store.subscribe();
//!
//! store.upsert_many(vec![UserLocation::new("7", 37.45, 127.13)]).await?;
//! updates.changed().await?;
//! assert_eq!(updates.borrow().len(), 1);
//! ```

pub mod store;

pub use store::{ChatRoomStore, UserLocationStore, UserStore};
