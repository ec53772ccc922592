//! `auth/reissue` call

use adigo_common::TokenPair;
use async_trait::async_trait;

use crate::dto::{ApiResponse, ReissueRequest};
use crate::error::{ApiError, ApiResult};

/// Exchanges a refresh token for a new token pair
#[async_trait]
pub trait TokenRefresher: Send + Sync {
    async fn reissue(&self, access_token: &str, refresh_token: &str) -> ApiResult<TokenPair>;
}

/// Refresher that calls `POST auth/reissue` on a client without the bearer
/// pipeline, so a refresh can never recurse into another refresh
#[derive(Debug, Clone)]
pub struct HttpTokenRefresher {
    http: reqwest::Client,
    base_url: String,
}

impl HttpTokenRefresher {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl TokenRefresher for HttpTokenRefresher {
    async fn reissue(&self, access_token: &str, refresh_token: &str) -> ApiResult<TokenPair> {
        let body = ReissueRequest {
            access_token: access_token.to_string(),
            refresh_token: refresh_token.to_string(),
        };

        let response = self
            .http
            .post(format!("{}auth/reissue", self.base_url))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<ApiResponse<TokenPair>>()
            .await
            .map_err(|e| ApiError::decode(e.to_string()))?
            .into_data()
    }
}
