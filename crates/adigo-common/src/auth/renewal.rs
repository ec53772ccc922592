//! Session renewal seam
//!
//! Implemented by the REST layer's authenticator and consumed by the STOMP
//! client, which must not depend on the HTTP stack.

use async_trait::async_trait;
use std::sync::Arc;

/// Obtains a fresh access token after the server rejected `stale_token`
#[async_trait]
pub trait SessionRenewer: Send + Sync {
    /// Returns the access token to use from now on, or `None` when the
    /// session cannot be renewed and the user has to log in again.
    async fn renew(&self, stale_token: Option<&str>) -> Option<String>;
}

pub type SharedSessionRenewer = Arc<dyn SessionRenewer>;
