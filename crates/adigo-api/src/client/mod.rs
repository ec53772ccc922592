//! HTTP client and request pipeline
//!
//! Authenticated requests carry `Authorization: Bearer <access>` whenever a
//! token is stored. A 401 goes through the [`TokenAuthenticator`] and the
//! request is retried with whatever token it hands back; a second 401 is
//! returned to the caller.

mod builder;

pub use builder::ApiClientBuilder;

use adigo_common::{SharedTokenStore, TokenStore};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::sync::Arc;

use crate::auth::TokenAuthenticator;
use crate::dto::ApiResponse;
use crate::error::{ApiError, ApiResult};

/// REST client for the Adigo backend
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<Inner>,
}

struct Inner {
    base_url: String,
    /// Client without bearer injection (login, signup, checks)
    bare: Client,
    /// Client used for every bearer-authenticated call
    authed: Client,
    store: SharedTokenStore,
    authenticator: Arc<TokenAuthenticator>,
}

impl ApiClient {
    #[must_use]
    pub fn builder(base_url: impl Into<String>) -> ApiClientBuilder {
        ApiClientBuilder::new(base_url)
    }

    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    pub fn token_store(&self) -> &SharedTokenStore {
        &self.inner.store
    }

    /// Authenticator shared with other transports (the STOMP client renews
    /// its session through it)
    pub fn authenticator(&self) -> Arc<TokenAuthenticator> {
        self.inner.authenticator.clone()
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.inner.base_url, path.trim_start_matches('/'))
    }

    /// Send a request without bearer injection
    pub(crate) async fn execute_public<F>(&self, build: F) -> ApiResult<Response>
    where
        F: Fn(&Client) -> RequestBuilder,
    {
        Ok(build(&self.inner.bare).send().await?)
    }

    /// Send a bearer-authenticated request, refreshing and retrying on 401
    ///
    /// `build` is called again for every attempt, so request bodies are
    /// rebuilt rather than cloned.
    pub(crate) async fn execute<F>(&self, build: F) -> ApiResult<Response>
    where
        F: Fn(&Client) -> RequestBuilder,
    {
        let mut token = self.inner.store.access_token().filter(|t| !t.is_empty());
        let mut response_count = 0;

        loop {
            let mut request = build(&self.inner.authed);
            if let Some(token) = &token {
                request = request.bearer_auth(token);
            }

            let response = request.send().await?;
            response_count += 1;

            if response.status() != StatusCode::UNAUTHORIZED {
                return Ok(response);
            }

            tracing::debug!(url = %response.url(), response_count, "Request unauthorized");
            match self
                .inner
                .authenticator
                .authenticate(token.as_deref(), response_count)
                .await
            {
                Some(fresh) => token = Some(fresh),
                None => return Ok(response),
            }
        }
    }

    /// Bearer-authenticated call decoded through the response envelope
    pub(crate) async fn call<T, F>(&self, build: F) -> ApiResult<ApiResponse<T>>
    where
        T: DeserializeOwned,
        F: Fn(&Client) -> RequestBuilder,
    {
        decode(self.execute(build).await?).await
    }

    /// Bearer-authenticated call whose body is not wrapped in the envelope
    pub(crate) async fn call_plain<T, F>(&self, build: F) -> ApiResult<T>
    where
        T: DeserializeOwned,
        F: Fn(&Client) -> RequestBuilder,
    {
        let response = self.execute(build).await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }
        response
            .json()
            .await
            .map_err(|e| ApiError::decode(e.to_string()))
    }

    /// Unauthenticated call decoded through the response envelope
    pub(crate) async fn call_public<T, F>(&self, build: F) -> ApiResult<ApiResponse<T>>
    where
        T: DeserializeOwned,
        F: Fn(&Client) -> RequestBuilder,
    {
        decode(self.execute_public(build).await?).await
    }
}

/// Turn a response into the envelope, mapping non-2xx to `ApiError::Status`
pub(crate) async fn decode<T: DeserializeOwned>(response: Response) -> ApiResult<ApiResponse<T>> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        let message = serde_json::from_str::<ApiResponse<serde_json::Value>>(&body)
            .map(|env| env.message)
            .ok()
            .filter(|m| !m.is_empty())
            .unwrap_or(body);
        tracing::warn!(status = status.as_u16(), message = %message, "API call failed");
        return Err(ApiError::Status {
            status: status.as_u16(),
            message,
        });
    }

    // Some endpoints answer 200 with an empty body
    if body.trim().is_empty() {
        return Ok(ApiResponse {
            status: i32::from(status.as_u16()),
            message: String::new(),
            data: None,
        });
    }

    serde_json::from_str(&body).map_err(|e| ApiError::decode(format!("{e}: {body}")))
}
