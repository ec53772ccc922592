//! REST client error types

use adigo_common::{ClientError, TokenStoreError};
use thiserror::Error;
use validator::ValidationErrors;

/// Error returned by every endpoint wrapper
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Server responded with {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Unexpected response body: {0}")]
    Decode(String),

    #[error("Response envelope carried no data")]
    MissingData,

    #[error("Token storage failed: {0}")]
    Storage(#[from] TokenStoreError),

    #[error("Invalid client configuration: {0}")]
    Config(String),
}

impl ApiError {
    /// HTTP status of the failed response, if there was one
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// True when the server rejected our credentials even after a refresh
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }
}

impl From<ApiError> for ClientError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Validation(e) => Self::validation(e),
            ApiError::Status { status: 401, .. } => Self::InvalidCredentials,
            ApiError::Status { status, message } => Self::Http { status, message },
            ApiError::Transport(e) => match e.status() {
                Some(status) => Self::Http {
                    status: status.as_u16(),
                    message: e.to_string(),
                },
                None => Self::Network(e.to_string()),
            },
            ApiError::Decode(msg) => Self::Protocol(msg),
            ApiError::MissingData => Self::Protocol("response envelope carried no data".to_string()),
            ApiError::Storage(e) => Self::Storage(e.to_string()),
            ApiError::Config(msg) => Self::Config(msg),
        }
    }
}

/// Result alias for REST calls
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_accessor() {
        let err = ApiError::Status {
            status: 401,
            message: "expired".to_string(),
        };
        assert_eq!(err.status(), Some(401));
        assert!(err.is_unauthorized());
        assert_eq!(ApiError::MissingData.status(), None);
    }

    #[test]
    fn test_into_client_error() {
        let unauthorized: ClientError = ApiError::Status {
            status: 401,
            message: String::new(),
        }
        .into();
        assert!(matches!(unauthorized, ClientError::InvalidCredentials));

        let conflict: ClientError = ApiError::Status {
            status: 409,
            message: "duplicated".to_string(),
        }
        .into();
        assert_eq!(conflict.status_code(), Some(409));

        let decode: ClientError = ApiError::decode("bad json").into();
        assert_eq!(decode.error_code(), "PROTOCOL_ERROR");
    }
}
