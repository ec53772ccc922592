//! WebSocket transport on tokio-tungstenite

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::Message;

use super::transport::{Outbound, Transport, TransportError, TransportEvent, TransportLink};

const DEFAULT_INBOUND_CAPACITY: usize = 256;

/// Plain WebSocket transport, one reader and one writer task per link
#[derive(Debug, Clone)]
pub struct WebSocketTransport {
    inbound_capacity: usize,
}

impl WebSocketTransport {
    pub fn new() -> Self {
        Self {
            inbound_capacity: DEFAULT_INBOUND_CAPACITY,
        }
    }
}

impl Default for WebSocketTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for WebSocketTransport {
    async fn open(&self, url: &str) -> Result<TransportLink, TransportError> {
        let (stream, response) = connect_async(url)
            .await
            .map_err(|e| TransportError::Connect(e.to_string()))?;
        tracing::debug!(url = %url, status = response.status().as_u16(), "WebSocket opened");

        let (mut sink, mut stream) = stream.split();
        let (out_tx, mut out_rx) = mpsc::unbounded_channel::<Outbound>();
        let (in_tx, in_rx) = mpsc::channel(self.inbound_capacity);

        tokio::spawn(async move {
            while let Some(cmd) = out_rx.recv().await {
                match cmd {
                    Outbound::Text(text) => {
                        if let Err(e) = sink.send(Message::Text(text)).await {
                            tracing::debug!(error = %e, "WebSocket write failed");
                            break;
                        }
                    }
                    Outbound::Close { code, reason } => {
                        let frame = CloseFrame {
                            code: CloseCode::from(code),
                            reason: reason.into(),
                        };
                        let _ = sink.send(Message::Close(Some(frame))).await;
                        break;
                    }
                }
            }
            let _ = sink.close().await;
        });

        tokio::spawn(async move {
            while let Some(message) = stream.next().await {
                let event = match message {
                    Ok(Message::Text(text)) => TransportEvent::Text(text),
                    Ok(Message::Binary(bytes)) => match String::from_utf8(bytes) {
                        Ok(text) => TransportEvent::Text(text),
                        Err(_) => {
                            tracing::debug!("Dropping non UTF-8 binary message");
                            continue;
                        }
                    },
                    Ok(Message::Close(frame)) => {
                        let (code, reason) = frame
                            .map(|f| (Some(u16::from(f.code)), f.reason.into_owned()))
                            .unwrap_or((None, String::new()));
                        let _ = in_tx.send(TransportEvent::Closed { code, reason }).await;
                        return;
                    }
                    Ok(_) => continue,
                    Err(e) => {
                        let _ = in_tx.send(TransportEvent::Failed(e.to_string())).await;
                        return;
                    }
                };
                if in_tx.send(event).await.is_err() {
                    return;
                }
            }
            let _ = in_tx
                .send(TransportEvent::Closed {
                    code: None,
                    reason: "stream ended".to_string(),
                })
                .await;
        });

        Ok(TransportLink {
            outbound: out_tx,
            inbound: in_rx,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_connect_refused() {
        // Port 9 (discard) is closed on CI machines
        let result = WebSocketTransport::new().open("ws://127.0.0.1:9/ws-stomp").await;
        assert!(matches!(result, Err(TransportError::Connect(_))));
    }
}
