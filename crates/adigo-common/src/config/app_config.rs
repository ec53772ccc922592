//! Client configuration structs
//!
//! Loads configuration from environment variables (and a `.env` file if present).

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Main client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub app: AppSettings,
    pub api: ApiConfig,
    pub gateway: GatewayConfig,
    pub location: LocationConfig,
    pub storage: StorageConfig,
    pub agent: AgentConfig,
}

/// General application settings
#[derive(Debug, Clone)]
pub struct AppSettings {
    pub name: String,
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "production" => Ok(Self::Production),
            "staging" => Ok(Self::Staging),
            "development" => Ok(Self::Development),
            other => Err(ConfigError::InvalidValue("ADIGO_ENV", other.to_string())),
        }
    }
}

/// REST API configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL, always ending with `/`
    pub base_url: String,
    pub timeout_secs: u64,
}

impl ApiConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// STOMP gateway configuration
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub url: String,
    pub reconnect_initial_ms: u64,
    pub reconnect_max_ms: u64,
    /// Outgoing heart-beat interval we offer in CONNECT (0 = none)
    pub heartbeat_outgoing_ms: u64,
    /// Incoming heart-beat interval we ask for in CONNECT (0 = none)
    pub heartbeat_incoming_ms: u64,
    pub disconnect_grace_ms: u64,
}

/// Location sharing configuration
#[derive(Debug, Clone)]
pub struct LocationConfig {
    pub update_interval_ms: u64,
    pub friends_poll_ms: u64,
}

/// Local storage configuration
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub token_path: PathBuf,
}

/// Settings used only by the headless agent
#[derive(Debug, Clone, Default)]
pub struct AgentConfig {
    pub email: Option<String>,
    pub password: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

// Default value functions
fn default_app_name() -> String {
    "adigo".to_string()
}

fn default_api_base_url() -> String {
    "https://adigo.site/api/".to_string()
}

fn default_ws_url() -> String {
    "ws://adigo.site/ws-stomp".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_reconnect_initial_ms() -> u64 {
    1_000
}

fn default_reconnect_max_ms() -> u64 {
    30_000
}

fn default_heartbeat_ms() -> u64 {
    10_000
}

fn default_disconnect_grace_ms() -> u64 {
    250
}

fn default_location_interval_ms() -> u64 {
    5_000
}

fn default_friends_poll_ms() -> u64 {
    10_000
}

fn default_token_path() -> PathBuf {
    PathBuf::from("./adigo_tokens.json")
}

/// Read and parse an environment variable, falling back to `default` when unset
fn parse_var<T: FromStr>(name: &'static str, default: impl FnOnce() -> T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(name, raw)),
        Err(_) => Ok(default()),
    }
}

/// Read and parse an optional environment variable
fn parse_optional<T: FromStr>(name: &'static str) -> Result<Option<T>, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue(name, raw)),
        Err(_) => Ok(None),
    }
}

fn normalize_base_url(mut url: String) -> String {
    if !url.ends_with('/') {
        url.push('/');
    }
    url
}

impl ClientConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if a variable is set to a value that cannot be parsed
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let config = Self {
            app: AppSettings {
                name: env::var("ADIGO_APP_NAME").unwrap_or_else(|_| default_app_name()),
                env: parse_var("ADIGO_ENV", Environment::default)?,
            },
            api: ApiConfig {
                base_url: normalize_base_url(
                    env::var("ADIGO_API_BASE_URL").unwrap_or_else(|_| default_api_base_url()),
                ),
                timeout_secs: parse_var("ADIGO_HTTP_TIMEOUT_SECS", default_timeout_secs)?,
            },
            gateway: GatewayConfig {
                url: env::var("ADIGO_WS_URL").unwrap_or_else(|_| default_ws_url()),
                reconnect_initial_ms: parse_var(
                    "ADIGO_RECONNECT_INITIAL_MS",
                    default_reconnect_initial_ms,
                )?,
                reconnect_max_ms: parse_var("ADIGO_RECONNECT_MAX_MS", default_reconnect_max_ms)?,
                heartbeat_outgoing_ms: parse_var("ADIGO_HEARTBEAT_OUT_MS", default_heartbeat_ms)?,
                heartbeat_incoming_ms: parse_var("ADIGO_HEARTBEAT_IN_MS", default_heartbeat_ms)?,
                disconnect_grace_ms: parse_var(
                    "ADIGO_DISCONNECT_GRACE_MS",
                    default_disconnect_grace_ms,
                )?,
            },
            location: LocationConfig {
                update_interval_ms: parse_var(
                    "ADIGO_LOCATION_INTERVAL_MS",
                    default_location_interval_ms,
                )?,
                friends_poll_ms: parse_var("ADIGO_FRIENDS_POLL_MS", default_friends_poll_ms)?,
            },
            storage: StorageConfig {
                token_path: env::var("ADIGO_TOKEN_PATH")
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| default_token_path()),
            },
            agent: AgentConfig {
                email: env::var("ADIGO_EMAIL").ok(),
                password: env::var("ADIGO_PASSWORD").ok(),
                latitude: parse_optional("ADIGO_LATITUDE")?,
                longitude: parse_optional("ADIGO_LONGITUDE")?,
            },
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.gateway.reconnect_initial_ms == 0 {
            return Err(ConfigError::InvalidValue(
                "ADIGO_RECONNECT_INITIAL_MS",
                "must be greater than zero".to_string(),
            ));
        }
        if self.gateway.reconnect_max_ms < self.gateway.reconnect_initial_ms {
            return Err(ConfigError::InvalidValue(
                "ADIGO_RECONNECT_MAX_MS",
                format!(
                    "{} is below the initial delay {}",
                    self.gateway.reconnect_max_ms, self.gateway.reconnect_initial_ms
                ),
            ));
        }
        if self.location.update_interval_ms == 0 {
            return Err(ConfigError::InvalidValue(
                "ADIGO_LOCATION_INTERVAL_MS",
                "must be greater than zero".to_string(),
            ));
        }
        if self.location.friends_poll_ms == 0 {
            return Err(ConfigError::InvalidValue(
                "ADIGO_FRIENDS_POLL_MS",
                "must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            app: AppSettings {
                name: default_app_name(),
                env: Environment::default(),
            },
            api: ApiConfig {
                base_url: default_api_base_url(),
                timeout_secs: default_timeout_secs(),
            },
            gateway: GatewayConfig {
                url: default_ws_url(),
                reconnect_initial_ms: default_reconnect_initial_ms(),
                reconnect_max_ms: default_reconnect_max_ms(),
                heartbeat_outgoing_ms: default_heartbeat_ms(),
                heartbeat_incoming_ms: default_heartbeat_ms(),
                disconnect_grace_ms: default_disconnect_grace_ms(),
            },
            location: LocationConfig {
                update_interval_ms: default_location_interval_ms(),
                friends_poll_ms: default_friends_poll_ms(),
            },
            storage: StorageConfig {
                token_path: default_token_path(),
            },
            agent: AgentConfig::default(),
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
