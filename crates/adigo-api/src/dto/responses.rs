//! Response DTOs
//!
//! Every endpoint answers with the same `{status, message, data}` envelope.

use adigo_core::Authority;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::ApiError;

/// Response envelope used by every endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse<T> {
    #[serde(default)]
    pub status: i32,
    #[serde(default)]
    pub message: String,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// Unwrap the payload, failing when the server sent `data: null`
    pub fn into_data(self) -> Result<T, ApiError> {
        self.data.ok_or(ApiError::MissingData)
    }
}

/// Result of `auth/signup`
#[derive(Debug, Clone, Deserialize)]
pub struct SignUpResult {
    pub email: String,
    pub nickname: String,
    pub name: String,
}

/// Result of the SMS send/verify checks
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct SmsResult {
    pub success: bool,
}

/// Result of `auth/check/duplicatedEmail`
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct DuplicatedEmail {
    pub duplicated: bool,
}

/// Result of `auth/check/duplicatedNumber`
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct DuplicatedNumber {
    #[serde(rename = "isDuplicated", alias = "duplicated")]
    pub is_duplicated: bool,
}

/// User as returned by `member/me` and `member/friend/list`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub id: i64,
    pub email: String,
    pub nickname: String,
    #[serde(default)]
    pub profile_image: Option<String>,
    #[serde(default)]
    pub authority: Authority,
}

/// Pending friendship request, `member/friend/lookup`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FriendshipRequestLookup {
    pub id: i64,
    pub requester_name: String,
    pub requester_email: String,
    pub addressee_email: String,
    pub status: String,
}

/// WebAuthn assertion challenge, `webauthn/assertion/options`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssertionOptions {
    pub request_id: String,
    /// Passed through untouched to the platform authenticator
    pub public_key_credential_request_options: Map<String, Value>,
}

impl AssertionOptions {
    /// Options serialized back to JSON, as the platform credential API expects
    pub fn options_json(&self) -> String {
        Value::Object(self.public_key_credential_request_options.clone()).to_string()
    }
}
