//! Domain errors - error types for the domain layer

use thiserror::Error;

/// Domain layer errors
///
/// Raised when data from the server or a device sensor cannot be turned into
/// a domain value.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Invalid coordinate: lat={latitude}, lng={longitude}")]
    InvalidCoordinate { latitude: f64, longitude: f64 },

    #[error("Unknown authority: {0}")]
    UnknownAuthority(String),
}

impl DomainError {
    /// Get an error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidCoordinate { .. } => "INVALID_COORDINATE",
            Self::UnknownAuthority(_) => "UNKNOWN_AUTHORITY",
        }
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidCoordinate { .. } | Self::UnknownAuthority(_)
        )
    }
}
