//! Transport trait
//!
//! A transport opens one bidirectional text link. The STOMP client only ever
//! talks to the link through these two channels, so tests can swap the
//! WebSocket for an in-memory pair.

use async_trait::async_trait;
use tokio::sync::mpsc;

/// Command for the writer side of a link
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outbound {
    Text(String),
    Close { code: u16, reason: String },
}

/// Event produced by the reader side of a link
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    Text(String),
    /// Peer closed the link (`code` is absent when the stream just ended)
    Closed { code: Option<u16>, reason: String },
    Failed(String),
}

/// An open link
pub struct TransportLink {
    pub outbound: mpsc::UnboundedSender<Outbound>,
    pub inbound: mpsc::Receiver<TransportEvent>,
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("Connection failed: {0}")]
    Connect(String),

    #[error("Transport is no longer accepting connections")]
    Unavailable,
}

#[async_trait]
pub trait Transport: Send + Sync {
    async fn open(&self, url: &str) -> Result<TransportLink, TransportError>;
}
