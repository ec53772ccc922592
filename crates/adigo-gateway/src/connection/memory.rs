//! In-process transport
//!
//! Every successful `open` hands a [`MemoryPeer`] to the [`MemoryListener`],
//! which plays the broker side of the link.

use async_trait::async_trait;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;

use super::transport::{Outbound, Transport, TransportError, TransportEvent, TransportLink};
use crate::protocol::StompFrame;

pub struct MemoryTransport {
    accepted: mpsc::UnboundedSender<MemoryPeer>,
    refuse: AtomicU32,
    attempts: AtomicU32,
}

impl MemoryTransport {
    pub fn new() -> (Arc<Self>, MemoryListener) {
        let (tx, rx) = mpsc::unbounded_channel();
        let transport = Arc::new(Self {
            accepted: tx,
            refuse: AtomicU32::new(0),
            attempts: AtomicU32::new(0),
        });
        (transport, MemoryListener { incoming: rx })
    }

    /// Make the next `count` opens fail
    pub fn refuse_next(&self, count: u32) {
        self.refuse.store(count, Ordering::SeqCst);
    }

    /// Number of `open` calls so far, failed ones included
    pub fn attempts(&self) -> u32 {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Transport for MemoryTransport {
    async fn open(&self, url: &str) -> Result<TransportLink, TransportError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);

        let refused = self
            .refuse
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if refused {
            return Err(TransportError::Connect("connection refused".to_string()));
        }

        let (out_tx, out_rx) = mpsc::unbounded_channel();
        let (in_tx, in_rx) = mpsc::channel(64);
        let peer = MemoryPeer {
            url: url.to_string(),
            received: out_rx,
            events: in_tx,
        };
        self.accepted
            .send(peer)
            .map_err(|_| TransportError::Unavailable)?;

        Ok(TransportLink {
            outbound: out_tx,
            inbound: in_rx,
        })
    }
}

/// Receives the broker side of every opened link
pub struct MemoryListener {
    incoming: mpsc::UnboundedReceiver<MemoryPeer>,
}

impl MemoryListener {
    pub async fn accept(&mut self) -> Option<MemoryPeer> {
        self.incoming.recv().await
    }

    /// Non-blocking check for a pending link
    pub fn try_accept(&mut self) -> Option<MemoryPeer> {
        self.incoming.try_recv().ok()
    }
}

/// Broker side of one in-memory link
pub struct MemoryPeer {
    pub url: String,
    received: mpsc::UnboundedReceiver<Outbound>,
    events: mpsc::Sender<TransportEvent>,
}

impl MemoryPeer {
    /// Next thing the client wrote, heart-beats included
    pub async fn recv(&mut self) -> Option<Outbound> {
        self.received.recv().await
    }

    /// Next frame the client wrote, skipping heart-beats
    ///
    /// Returns `None` once the client closes the link.
    pub async fn next_frame(&mut self) -> Option<StompFrame> {
        loop {
            match self.received.recv().await? {
                Outbound::Text(text) => {
                    if let Ok(Some(frame)) = StompFrame::parse(&text) {
                        return Some(frame);
                    }
                }
                Outbound::Close { .. } => return None,
            }
        }
    }

    /// Anything the client wrote that has not been read yet
    pub fn drain(&mut self) -> Vec<Outbound> {
        let mut out = Vec::new();
        while let Ok(item) = self.received.try_recv() {
            out.push(item);
        }
        out
    }

    pub async fn send_frame(&self, frame: &StompFrame) {
        self.send_text(frame.to_wire()).await;
    }

    pub async fn send_text(&self, text: impl Into<String>) {
        let _ = self.events.send(TransportEvent::Text(text.into())).await;
    }

    /// Close from the broker side
    pub async fn close(&self, code: u16, reason: &str) {
        let _ = self
            .events
            .send(TransportEvent::Closed {
                code: Some(code),
                reason: reason.to_string(),
            })
            .await;
    }

    pub async fn fail(&self, error: &str) {
        let _ = self.events.send(TransportEvent::Failed(error.to_string())).await;
    }
}
