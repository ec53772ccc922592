//! STOMP client settings

use adigo_common::GatewayConfig;
use std::time::Duration;

/// Per-user queue the server answers friend-location requests on
pub const FRIENDS_LOCATION_QUEUE: &str = "/user/queue/friendsLocationResponse";

/// Capacity of the MESSAGE broadcast; slow receivers lose the oldest entries
const DEFAULT_MESSAGE_CAPACITY: usize = 64;

#[derive(Debug, Clone)]
pub struct StompConfig {
    pub url: String,
    pub reconnect_initial: Duration,
    pub reconnect_max: Duration,
    /// Outgoing heart-beat we offer (zero disables)
    pub heartbeat_outgoing: Duration,
    /// Incoming heart-beat we ask for (zero disables)
    pub heartbeat_incoming: Duration,
    /// Pause between DISCONNECT and closing the socket
    pub disconnect_grace: Duration,
    /// Destinations subscribed on every CONNECTED
    pub default_destinations: Vec<String>,
    pub message_capacity: usize,
}

impl StompConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            reconnect_initial: Duration::from_secs(1),
            reconnect_max: Duration::from_secs(30),
            heartbeat_outgoing: Duration::from_secs(10),
            heartbeat_incoming: Duration::from_secs(10),
            disconnect_grace: Duration::from_millis(250),
            default_destinations: vec![FRIENDS_LOCATION_QUEUE.to_string()],
            message_capacity: DEFAULT_MESSAGE_CAPACITY,
        }
    }

    pub fn from_gateway(config: &GatewayConfig) -> Self {
        Self {
            reconnect_initial: Duration::from_millis(config.reconnect_initial_ms),
            reconnect_max: Duration::from_millis(config.reconnect_max_ms),
            heartbeat_outgoing: Duration::from_millis(config.heartbeat_outgoing_ms),
            heartbeat_incoming: Duration::from_millis(config.heartbeat_incoming_ms),
            disconnect_grace: Duration::from_millis(config.disconnect_grace_ms),
            ..Self::new(config.url.clone())
        }
    }

    /// `heart-beat` header values in milliseconds
    pub(crate) fn heart_beat_ms(&self) -> (u64, u64) {
        (
            self.heartbeat_outgoing.as_millis() as u64,
            self.heartbeat_incoming.as_millis() as u64,
        )
    }
}
