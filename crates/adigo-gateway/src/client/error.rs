//! STOMP client errors

use adigo_common::ClientError;

use crate::connection::TransportError;
use crate::protocol::FrameError;

#[derive(Debug, thiserror::Error)]
pub enum StompError {
    #[error("STOMP session is not connected")]
    NotConnected,

    #[error("STOMP client has been shut down")]
    ShutDown,

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Frame(#[from] FrameError),
}

impl From<StompError> for ClientError {
    fn from(err: StompError) -> Self {
        match err {
            StompError::NotConnected | StompError::ShutDown => Self::NotConnected,
            StompError::Transport(e) => Self::Network(e.to_string()),
            StompError::Frame(e) => Self::Protocol(e.to_string()),
        }
    }
}
