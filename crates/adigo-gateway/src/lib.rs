//! # adigo-gateway
//!
//! STOMP 1.2 client over WebSocket.
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │ StompClient │────►│  Transport  │────►│   Broker    │
//! │             │◄────│   (trait)   │◄────│  /ws-stomp  │
//! └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! - `protocol`: frame codec
//! - `connection`: transport seam, WebSocket and in-memory transports, backoff
//! - `client`: subscription table, reconnect loop, heart-beats, token renewal

pub mod client;
pub mod connection;
pub mod protocol;

pub use client::{
    ConnectionState, StompClient, StompConfig, StompError, StompMessage, FRIENDS_LOCATION_QUEUE,
};
pub use connection::{
    Backoff, MemoryListener, MemoryPeer, MemoryTransport, Outbound, Transport, TransportError,
    TransportEvent, TransportLink, WebSocketTransport,
};
pub use protocol::{FrameError, StompCommand, StompFrame};
