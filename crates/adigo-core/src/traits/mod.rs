//! Repository traits (ports)

mod repositories;

pub use repositories::{ChatRoomRepository, RepoResult, UserLocationRepository, UserRepository};
