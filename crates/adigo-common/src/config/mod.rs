//! Configuration structs

mod app_config;

pub use app_config::{
    AgentConfig, ApiConfig, AppSettings, ClientConfig, ConfigError, Environment, GatewayConfig,
    LocationConfig, StorageConfig,
};
