//! HTTP client factory

use adigo_common::{ApiConfig, MemoryTokenStore, SharedTokenStore};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;

use super::{ApiClient, Inner};
use crate::auth::{HttpTokenRefresher, TokenAuthenticator, TokenRefresher};
use crate::error::{ApiError, ApiResult};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Builds the bare and authenticated HTTP clients with shared timeouts
pub struct ApiClientBuilder {
    base_url: String,
    connect_timeout: Duration,
    timeout: Duration,
    store: Option<SharedTokenStore>,
    refresher: Option<Arc<dyn TokenRefresher>>,
}

impl ApiClientBuilder {
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        Self {
            base_url,
            connect_timeout: DEFAULT_TIMEOUT,
            timeout: DEFAULT_TIMEOUT,
            store: None,
            refresher: None,
        }
    }

    pub fn from_config(config: &ApiConfig) -> Self {
        Self::new(config.base_url.clone())
            .connect_timeout(config.timeout())
            .timeout(config.timeout())
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn token_store(mut self, store: SharedTokenStore) -> Self {
        self.store = Some(store);
        self
    }

    /// Replace the `auth/reissue` refresher
    pub fn refresher(mut self, refresher: Arc<dyn TokenRefresher>) -> Self {
        self.refresher = Some(refresher);
        self
    }

    fn http_client(&self) -> ApiResult<Client> {
        Client::builder()
            .connect_timeout(self.connect_timeout)
            .timeout(self.timeout)
            .user_agent(concat!("adigo/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ApiError::Config(e.to_string()))
    }

    pub fn build(self) -> ApiResult<ApiClient> {
        let bare = self.http_client()?;
        let authed = self.http_client()?;

        let store = self
            .store
            .unwrap_or_else(|| Arc::new(MemoryTokenStore::new()));
        let refresher = self
            .refresher
            .unwrap_or_else(|| Arc::new(HttpTokenRefresher::new(bare.clone(), self.base_url.clone())));
        let authenticator = Arc::new(TokenAuthenticator::new(store.clone(), refresher));

        tracing::debug!(base_url = %self.base_url, "Built API client");

        Ok(ApiClient {
            inner: Arc::new(Inner {
                base_url: self.base_url,
                bare,
                authed,
                store,
                authenticator,
            }),
        })
    }
}
