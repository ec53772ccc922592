//! JWT inspection
//!
//! The client never holds the signing secret; it only reads the claims of the
//! access token it was issued to decide whether the token is still usable.

use chrono::Utc;
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::error::ClientError;

/// Claims carried by an Adigo access token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Subject (user email or id)
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Granted authority, e.g. `ROLE_USER`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth: Option<String>,
}

impl AccessClaims {
    /// Check if the token is expired
    #[must_use]
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }
}

/// Decode the claims of a token without verifying its signature
///
/// # Errors
/// Returns `InvalidToken` if the token is not a well-formed JWT or lacks `exp`
pub fn decode_unverified(token: &str) -> Result<AccessClaims, ClientError> {
    let mut validation = Validation::default();
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;

    decode::<AccessClaims>(token, &DecodingKey::from_secret(&[]), &validation)
        .map(|data| data.claims)
        .map_err(|_| ClientError::InvalidToken)
}

/// Returns true if the token is expired or cannot be decoded
#[must_use]
pub fn is_token_expired(token: &str) -> bool {
    match decode_unverified(token) {
        Ok(claims) => {
            let expired = claims.is_expired();
            tracing::debug!(expired, "Checked access token expiry");
            expired
        }
        Err(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};

    fn token_with_exp(exp: i64) -> String {
        let claims = AccessClaims {
            sub: "test@example.com".to_string(),
            exp,
            auth: Some("ROLE_USER".to_string()),
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"server-side-secret"),
        )
        .unwrap()
    }

    #[test]
    fn test_decode_without_secret() {
        let exp = Utc::now().timestamp() + 600;
        let claims = decode_unverified(&token_with_exp(exp)).unwrap();
        assert_eq!(claims.sub, "test@example.com");
        assert_eq!(claims.exp, exp);
        assert_eq!(claims.auth.as_deref(), Some("ROLE_USER"));
    }

    #[test]
    fn test_fresh_token_not_expired() {
        let token = token_with_exp(Utc::now().timestamp() + 600);
        assert!(!is_token_expired(&token));
    }

    #[test]
    fn test_past_token_expired() {
        let token = token_with_exp(Utc::now().timestamp() - 10);
        assert!(is_token_expired(&token));
    }

    #[test]
    fn test_garbage_counts_as_expired() {
        assert!(decode_unverified("not.a.jwt").is_err());
        assert!(is_token_expired("garbage"));
    }
}
