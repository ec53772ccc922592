//! Transport seam and reconnect timing

mod backoff;
mod memory;
mod transport;
mod websocket;

pub use backoff::Backoff;
pub use memory::{MemoryListener, MemoryPeer, MemoryTransport};
pub use transport::{Outbound, Transport, TransportError, TransportEvent, TransportLink};
pub use websocket::WebSocketTransport;
