//! Location sharing over the STOMP session
//!
//! The publisher pushes the device position to the server; the receiver
//! listens on the per-user friends queue and mirrors what arrives into the
//! location cache.

mod error;
mod friends;
mod payload;
mod provider;
mod publisher;
mod receiver;

pub use error::{LocationError, LocationResult};
pub use friends::{friend_locations, FriendLocationInfo};
pub use payload::{parse_friend_locations, LocationUpdate};
pub use provider::{ChannelLocationProvider, FixedLocationProvider, LocationProvider};
pub use publisher::{LocationPublisher, LOCATION_UPDATE_DESTINATION, REQUEST_FRIENDS_DESTINATION};
pub use receiver::{apply_friend_locations, LocationReceiver};
