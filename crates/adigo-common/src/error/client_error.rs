//! Client error types
//!
//! Unified error surface for the client library, independent of which layer
//! (HTTP, STOMP, local cache) produced it.

use adigo_core::DomainError;
use std::fmt;

/// Client-wide error type
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    // Authentication errors
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Token expired")]
    TokenExpired,

    #[error("Missing authentication")]
    MissingAuth,

    // Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    // Remote errors
    #[error("Server responded with {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Not connected")]
    NotConnected,

    // Local errors
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error")]
    Internal(#[source] anyhow::Error),

    // Domain errors
    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl ClientError {
    /// HTTP status code associated with this error, if it came from the server
    /// or maps onto one
    #[must_use]
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            Self::InvalidCredentials | Self::InvalidToken | Self::TokenExpired | Self::MissingAuth => {
                Some(401)
            }
            Self::Validation(_) => Some(400),
            Self::Domain(e) if e.is_validation() => Some(400),
            _ => None,
        }
    }

    /// Stable error code for logs and callers
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::InvalidToken => "INVALID_TOKEN",
            Self::TokenExpired => "TOKEN_EXPIRED",
            Self::MissingAuth => "MISSING_AUTH",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Http { .. } => "HTTP_ERROR",
            Self::Network(_) => "NETWORK_ERROR",
            Self::Protocol(_) => "PROTOCOL_ERROR",
            Self::NotConnected => "NOT_CONNECTED",
            Self::Storage(_) => "STORAGE_ERROR",
            Self::Config(_) => "CONFIG_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
            Self::Domain(e) => e.code(),
        }
    }

    /// Whether retrying the same operation later may succeed
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) | Self::NotConnected => true,
            Self::Http { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }

    /// Check if this is an authentication error
    #[must_use]
    pub fn is_auth_error(&self) -> bool {
        self.status_code() == Some(401)
    }

    /// Create a validation error
    #[must_use]
    pub fn validation(msg: impl fmt::Display) -> Self {
        Self::Validation(msg.to_string())
    }

    /// Create an internal error from any error
    pub fn internal(err: impl Into<anyhow::Error>) -> Self {
        Self::Internal(err.into())
    }
}

/// Result type alias for client operations
pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ClientError::InvalidCredentials.status_code(), Some(401));
        assert_eq!(
            ClientError::Http {
                status: 503,
                message: "down".to_string()
            }
            .status_code(),
            Some(503)
        );
        assert_eq!(ClientError::validation("x").status_code(), Some(400));
        assert_eq!(
            ClientError::Domain(DomainError::UnknownAuthority("ROLE_X".to_string())).status_code(),
            Some(400)
        );
        assert_eq!(ClientError::NotConnected.status_code(), None);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(ClientError::TokenExpired.error_code(), "TOKEN_EXPIRED");
        assert_eq!(ClientError::NotConnected.error_code(), "NOT_CONNECTED");
        assert_eq!(
            ClientError::Domain(DomainError::UnknownAuthority("ROLE_X".to_string())).error_code(),
            "UNKNOWN_AUTHORITY"
        );
    }

    #[test]
    fn test_is_retryable() {
        assert!(ClientError::Network("reset".to_string()).is_retryable());
        assert!(ClientError::Http {
            status: 429,
            message: String::new()
        }
        .is_retryable());
        assert!(!ClientError::Http {
            status: 404,
            message: String::new()
        }
        .is_retryable());
        assert!(!ClientError::InvalidCredentials.is_retryable());
    }

    #[test]
    fn test_is_auth_error() {
        assert!(ClientError::MissingAuth.is_auth_error());
        assert!(ClientError::Http {
            status: 401,
            message: String::new()
        }
        .is_auth_error());
        assert!(!ClientError::Storage("disk".to_string()).is_auth_error());
    }

    #[test]
    fn test_display() {
        let err = ClientError::Http {
            status: 409,
            message: "duplicated".to_string(),
        };
        assert_eq!(err.to_string(), "Server responded with 409: duplicated");
        assert_eq!(ClientError::validation("email is required").to_string(), "Validation error: email is required");
    }
}
