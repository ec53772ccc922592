//! Location sharing errors

use adigo_common::ClientError;
use adigo_core::DomainError;
use adigo_gateway::StompError;

/// Errors raised while publishing or ingesting locations
#[derive(Debug, thiserror::Error)]
pub enum LocationError {
    #[error(transparent)]
    Stomp(#[from] StompError),

    #[error("Malformed location payload: {0}")]
    Payload(#[from] serde_json::Error),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl LocationError {
    /// True when the message was dropped only because the session is down
    #[must_use]
    pub fn is_not_connected(&self) -> bool {
        matches!(self, Self::Stomp(StompError::NotConnected))
    }
}

impl From<LocationError> for ClientError {
    fn from(err: LocationError) -> Self {
        match err {
            LocationError::Stomp(e) => e.into(),
            LocationError::Payload(e) => ClientError::Protocol(e.to_string()),
            LocationError::Domain(e) => ClientError::Domain(e),
        }
    }
}

pub type LocationResult<T> = Result<T, LocationError>;
