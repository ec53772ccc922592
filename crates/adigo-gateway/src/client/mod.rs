//! STOMP session management

mod config;
mod error;
mod stomp_client;
mod subscriptions;

pub use config::{StompConfig, FRIENDS_LOCATION_QUEUE};
pub use error::StompError;
pub use stomp_client::{ConnectionState, StompClient, StompMessage};
