//! Ranging errors

use adigo_common::ClientError;

#[derive(Debug, thiserror::Error)]
pub enum RangingError {
    #[error("UWB is not available on this device")]
    Unsupported,

    #[error("No complex channel assigned to the controller")]
    NoChannel,

    #[error("Ranging session setup failed: {0}")]
    Setup(String),
}

impl From<RangingError> for ClientError {
    fn from(err: RangingError) -> Self {
        ClientError::Internal(anyhow::Error::new(err))
    }
}
