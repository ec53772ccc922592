//! # adigo-common
//!
//! Shared utilities including configuration, error handling, token storage, and telemetry.

pub mod auth;
pub mod config;
pub mod error;
pub mod telemetry;

// Re-export commonly used types at crate root
pub use auth::{
    decode_unverified, is_token_expired, AccessClaims, FileTokenStore, MemoryTokenStore,
    SessionRenewer, SharedSessionRenewer, SharedTokenStore, TokenPair, TokenStore, TokenStoreError,
};
pub use config::{
    AgentConfig, ApiConfig, AppSettings, ClientConfig, ConfigError, Environment, GatewayConfig,
    LocationConfig, StorageConfig,
};
pub use error::{ClientError, ClientResult};
pub use telemetry::{
    init_tracing, init_tracing_with_config, try_init_tracing, try_init_tracing_with_config,
    TracingConfig, TracingError,
};
