//! # adigo-service
//!
//! Application layer on top of the REST client, the STOMP session and the
//! local cache.
//!
//! - [`location`]: publishes the device position and ingests friends'
//!   positions into the location cache
//! - [`ranging`]: UWB ranging session manager over a pluggable platform
//!   backend
//!
//! The `adigo-agent` binary wires both to a live server.

pub mod location;
pub mod ranging;

pub use location::{
    friend_locations, ChannelLocationProvider, FixedLocationProvider, FriendLocationInfo,
    LocationError, LocationProvider, LocationPublisher, LocationReceiver, LocationResult,
    LOCATION_UPDATE_DESTINATION, REQUEST_FRIENDS_DESTINATION,
};
pub use ranging::{
    ComplexChannel, LocalEndpoint, RangingBackend, RangingConfig, RangingError, RangingEvent,
    RangingParameters, RangingRole, UpdateRate, UwbAddress, UwbRangingManager,
};
