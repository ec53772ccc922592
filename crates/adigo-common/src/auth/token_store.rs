//! Token store
//!
//! Persists the access/refresh token pair. Every authenticated network path
//! (REST bearer injection, STOMP CONNECT, token refresh) reads from here.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::jwt::is_token_expired;

/// Access/refresh token pair as issued by `auth/login` and `auth/reissue`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    #[serde(default = "default_grant_type")]
    pub grant_type: String,
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default)]
    pub token_expires_in: String,
    #[serde(default)]
    pub refresh_token_expires_in: String,
}

fn default_grant_type() -> String {
    "Bearer".to_string()
}

impl TokenPair {
    /// Create a bearer token pair without expiry metadata
    pub fn bearer(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            grant_type: default_grant_type(),
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
            token_expires_in: String::new(),
            refresh_token_expires_in: String::new(),
        }
    }
}

/// Token store errors
#[derive(Debug, thiserror::Error)]
pub enum TokenStoreError {
    #[error("Token file I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error("Token file is not valid JSON: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Storage for the current token pair
pub trait TokenStore: Send + Sync {
    /// Current access token, if logged in
    fn access_token(&self) -> Option<String>;

    /// Current refresh token, if logged in
    fn refresh_token(&self) -> Option<String>;

    /// Persist a new token pair, replacing the previous one
    fn save(&self, pair: &TokenPair) -> Result<(), TokenStoreError>;

    /// Forget all tokens (logout)
    fn clear(&self) -> Result<(), TokenStoreError>;

    /// True when there is no access token or it is past its `exp`
    fn is_access_expired(&self) -> bool {
        self.access_token()
            .map_or(true, |token| is_token_expired(&token))
    }
}

/// Shared, dynamically typed token store
pub type SharedTokenStore = Arc<dyn TokenStore>;

// ============================================================================
// In-memory store
// ============================================================================

/// Token store that lives only as long as the process
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    pair: RwLock<Option<TokenPair>>,
}

impl MemoryTokenStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store already holding a token pair
    #[must_use]
    pub fn with_tokens(pair: TokenPair) -> Self {
        Self {
            pair: RwLock::new(Some(pair)),
        }
    }

    #[must_use]
    pub fn shared() -> SharedTokenStore {
        Arc::new(Self::new())
    }
}

impl TokenStore for MemoryTokenStore {
    fn access_token(&self) -> Option<String> {
        self.pair.read().as_ref().map(|p| p.access_token.clone())
    }

    fn refresh_token(&self) -> Option<String> {
        self.pair.read().as_ref().map(|p| p.refresh_token.clone())
    }

    fn save(&self, pair: &TokenPair) -> Result<(), TokenStoreError> {
        *self.pair.write() = Some(pair.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), TokenStoreError> {
        *self.pair.write() = None;
        Ok(())
    }
}

// ============================================================================
// File-backed store
// ============================================================================

/// Token store persisted as a JSON file
///
/// Writes go to a sibling temp file first and are renamed into place, so a
/// crash never leaves a half-written token file behind.
#[derive(Debug)]
pub struct FileTokenStore {
    path: PathBuf,
    pair: RwLock<Option<TokenPair>>,
}

impl FileTokenStore {
    /// Open the store at `path`, loading any previously saved tokens
    ///
    /// A corrupt file is deleted and the store starts empty.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or removed
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, TokenStoreError> {
        let path = path.into();
        let pair = Self::load(&path)?;

        Ok(Self {
            path,
            pair: RwLock::new(pair),
        })
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(path: &Path) -> Result<Option<TokenPair>, TokenStoreError> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_str(&raw) {
            Ok(pair) => Ok(Some(pair)),
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "Token file is corrupt, discarding it"
                );
                fs::remove_file(path)?;
                Ok(None)
            }
        }
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl TokenStore for FileTokenStore {
    fn access_token(&self) -> Option<String> {
        self.pair.read().as_ref().map(|p| p.access_token.clone())
    }

    fn refresh_token(&self) -> Option<String> {
        self.pair.read().as_ref().map(|p| p.refresh_token.clone())
    }

    fn save(&self, pair: &TokenPair) -> Result<(), TokenStoreError> {
        let mut guard = self.pair.write();

        let json = serde_json::to_vec_pretty(pair)?;
        let tmp = self.temp_path();
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;

        *guard = Some(pair.clone());
        tracing::debug!(path = %self.path.display(), "Saved token pair");
        Ok(())
    }

    fn clear(&self) -> Result<(), TokenStoreError> {
        let mut guard = self.pair.write();

        match fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }

        *guard = None;
        tracing::debug!(path = %self.path.display(), "Cleared token pair");
        Ok(())
    }
}
