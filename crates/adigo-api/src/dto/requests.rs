//! Request DTOs
//!
//! All request DTOs implement `Serialize` and, where user input is involved,
//! `Validate`.

use serde::Serialize;
use validator::Validate;

// ============================================================================
// Auth Requests
// ============================================================================

/// `POST auth/login`
#[derive(Debug, Clone, Serialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

impl LoginRequest {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

/// `POST auth/signup`
#[derive(Debug, Clone, Serialize, Validate)]
pub struct SignUpRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,

    #[validate(length(min = 1, max = 32, message = "Name must be 1-32 characters"))]
    pub name: String,

    #[validate(length(min = 1, message = "Phone number is required"))]
    pub phone: String,
}

/// `POST auth/reissue`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReissueRequest {
    pub access_token: String,
    pub refresh_token: String,
}

// ============================================================================
// Member Requests
// ============================================================================

/// `PUT member/nickname`
#[derive(Debug, Clone, Serialize, Validate)]
pub struct NicknameUpdateRequest {
    #[validate(length(min = 1, max = 32, message = "Nickname must be 1-32 characters"))]
    pub nickname: String,
}

/// `POST member/friend/reply`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FriendRequestReply {
    pub requester_email: String,
    pub accept: bool,
}

// ============================================================================
// Push / WebAuthn Requests
// ============================================================================

/// `POST push/token/register`
#[derive(Debug, Clone, Serialize, Validate)]
pub struct PushTokenRequest {
    #[validate(length(min = 1, message = "Push token is required"))]
    pub token: String,
}

/// `POST webauthn/assertion/result`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssertionResultRequest {
    pub request_id: String,
    /// Credential JSON exactly as produced by the platform authenticator
    pub credential: String,
}
