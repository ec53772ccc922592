//! Token-refresh authenticator
//!
//! Called when a request comes back 401. Refreshes are serialized: when
//! several requests fail with the same stale token at once, only the first
//! one calls `auth/reissue` and the rest pick up the token it stored.

use adigo_common::{SessionRenewer, SharedTokenStore};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;

use super::refresher::TokenRefresher;

/// Give up once this many responses are in the chain (original + one retry)
pub const MAX_RESPONSE_COUNT: u32 = 2;

pub struct TokenAuthenticator {
    store: SharedTokenStore,
    refresher: Arc<dyn TokenRefresher>,
    refresh_lock: Mutex<()>,
}

impl TokenAuthenticator {
    pub fn new(store: SharedTokenStore, refresher: Arc<dyn TokenRefresher>) -> Self {
        Self {
            store,
            refresher,
            refresh_lock: Mutex::new(()),
        }
    }

    /// Decide which access token a request rejected with 401 should be
    /// retried with.
    ///
    /// `failed_token` is the bearer the rejected request carried and
    /// `response_count` the number of responses in its chain so far
    /// (1 for the first 401). Returns `None` when the request must not be
    /// retried.
    pub async fn authenticate(&self, failed_token: Option<&str>, response_count: u32) -> Option<String> {
        if response_count >= MAX_RESPONSE_COUNT {
            tracing::debug!(response_count, "Retry budget exhausted, giving up");
            return None;
        }

        let _guard = self.refresh_lock.lock().await;

        let current = self.store.access_token()?;
        if failed_token != Some(current.as_str()) {
            tracing::debug!("Access token already refreshed, retrying with stored token");
            return Some(current);
        }

        let Some(refresh_token) = self.store.refresh_token() else {
            tracing::warn!("No refresh token stored, cannot refresh");
            return None;
        };

        match self.refresher.reissue(&current, &refresh_token).await {
            Ok(pair) => {
                if let Err(e) = self.store.save(&pair) {
                    tracing::error!(error = %e, "Failed to persist refreshed tokens");
                    return None;
                }
                tracing::info!("Access token refreshed");
                Some(pair.access_token)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Token refresh failed");
                None
            }
        }
    }
}

#[async_trait]
impl SessionRenewer for TokenAuthenticator {
    async fn renew(&self, stale_token: Option<&str>) -> Option<String> {
        self.authenticate(stale_token, 1).await
    }
}
