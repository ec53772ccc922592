//! # adigo-core
//!
//! Domain layer containing entities, geo value objects, and repository traits.
//! This crate has zero dependencies on infrastructure (network, storage, etc.).

pub mod entities;
pub mod error;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{Authority, ChatBubble, ChatRoom, User, UserLocation};
pub use error::DomainError;
pub use traits::{ChatRoomRepository, RepoResult, UserLocationRepository, UserRepository};
pub use value_objects::{Coordinate, EARTH_RADIUS_METERS};
