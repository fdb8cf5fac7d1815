//! Gateway configuration types.
//!
//! This module defines configuration structures for the HTTP gateway and
//! loads them from the environment.

use std::time::Duration;

use device_catalog_service::ServiceConfig;
use serde::Deserialize;
use thiserror::Error;

/// Value of `DATA_DIR` that selects the in-memory store.
pub const IN_MEMORY_DATA_DIR: &str = ":memory:";

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An environment variable holds a value that cannot be parsed.
    #[error("invalid value for {var}: {value}")]
    InvalidValue {
        /// The variable name.
        var: &'static str,
        /// The rejected value.
        value: String,
    },

    /// An API client entry is not of the form `key:hash`.
    #[error("invalid API client entry: {0}")]
    InvalidApiClient(String),

    /// An API client secret hash is not a hex blake3 digest.
    #[error("invalid secret hash for API key {0}")]
    InvalidSecretHash(String),

    /// No API clients are configured and anonymous access is not enabled.
    #[error("no API_KEYS configured; set ALLOW_ANONYMOUS=true to run without authentication")]
    NoApiClients,
}

/// A client allowed to call the API.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ApiClientConfig {
    /// The value expected in the `API-Key` header.
    pub key: String,
    /// Hex blake3 digest of the value expected in the `API-Secret` header.
    pub secret_hash: String,
}

/// Configuration for the gateway service.
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
    /// Listen address (e.g., "0.0.0.0:8080").
    #[serde(default = "GatewayConfig::default_listen_addr")]
    pub listen_addr: String,

    /// `RocksDB` directory, or `:memory:` for a process-local store.
    #[serde(default = "GatewayConfig::default_data_dir")]
    pub data_dir: String,

    /// Allowed CORS origins.
    #[serde(default)]
    pub cors_origins: Vec<String>,

    /// Maximum request body size in bytes.
    #[serde(default = "GatewayConfig::default_max_body")]
    pub max_body_bytes: usize,

    /// Request timeout in seconds.
    #[serde(default = "GatewayConfig::default_request_timeout")]
    pub request_timeout_seconds: u64,

    /// Page size for listings that do not ask for one.
    #[serde(default = "GatewayConfig::default_page_size")]
    pub default_page_size: u32,

    /// Largest page size a listing may ask for.
    #[serde(default = "GatewayConfig::default_max_page_size")]
    pub max_page_size: u32,

    /// Clients allowed to call `/api`.
    #[serde(default)]
    pub api_keys: Vec<ApiClientConfig>,

    /// Admit `/api` requests without credentials. Off unless set.
    #[serde(default)]
    pub allow_anonymous: bool,

    /// Load the demo catalog at startup.
    #[serde(default)]
    pub seed_demo_data: bool,
}

impl GatewayConfig {
    fn default_listen_addr() -> String {
        "0.0.0.0:8080".to_string()
    }

    fn default_data_dir() -> String {
        "/data/device-catalog".to_string()
    }

    const fn default_max_body() -> usize {
        64 * 1024 // 64 KB
    }

    const fn default_request_timeout() -> u64 {
        30
    }

    const fn default_page_size() -> u32 {
        10
    }

    const fn default_max_page_size() -> u32 {
        100
    }

    /// Load configuration from environment variables, falling back to defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is present but malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is present but malformed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(v) = lookup("LISTEN_ADDR") {
            config.listen_addr = v;
        }
        if let Some(v) = lookup("DATA_DIR") {
            config.data_dir = v;
        }
        if let Some(v) = lookup("CORS_ORIGINS") {
            config.cors_origins = v
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(String::from)
                .collect();
        }
        if let Some(v) = lookup("MAX_BODY_BYTES") {
            config.max_body_bytes = parse_var("MAX_BODY_BYTES", v)?;
        }
        if let Some(v) = lookup("REQUEST_TIMEOUT_SECONDS") {
            config.request_timeout_seconds = parse_var("REQUEST_TIMEOUT_SECONDS", v)?;
        }
        if let Some(v) = lookup("DEFAULT_PAGE_SIZE") {
            config.default_page_size = parse_var("DEFAULT_PAGE_SIZE", v)?;
        }
        if let Some(v) = lookup("MAX_PAGE_SIZE") {
            config.max_page_size = parse_var("MAX_PAGE_SIZE", v)?;
        }
        if let Some(v) = lookup("API_KEYS") {
            config.api_keys = parse_api_keys(&v)?;
        }
        if let Some(v) = lookup("ALLOW_ANONYMOUS") {
            config.allow_anonymous = parse_var("ALLOW_ANONYMOUS", v)?;
        }
        if let Some(v) = lookup("SEED_DEMO_DATA") {
            config.seed_demo_data = parse_var("SEED_DEMO_DATA", v)?;
        }

        Ok(config)
    }

    /// Check that `/api` is either protected by API clients or explicitly open.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NoApiClients` if no clients are configured and
    /// anonymous access is off.
    pub fn ensure_auth_configured(&self) -> Result<(), ConfigError> {
        if self.api_keys.is_empty() && !self.allow_anonymous {
            return Err(ConfigError::NoApiClients);
        }
        Ok(())
    }

    /// Returns true if the gateway should run on the in-memory store.
    #[must_use]
    pub fn is_in_memory(&self) -> bool {
        self.data_dir == IN_MEMORY_DATA_DIR
    }

    /// Get the request timeout as a `Duration`.
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }

    /// Listing settings for the device service.
    #[must_use]
    pub fn service_config(&self) -> ServiceConfig {
        ServiceConfig {
            default_page_size: self.default_page_size,
            max_page_size: self.max_page_size,
        }
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            listen_addr: Self::default_listen_addr(),
            data_dir: Self::default_data_dir(),
            cors_origins: vec!["*".to_string()],
            max_body_bytes: Self::default_max_body(),
            request_timeout_seconds: Self::default_request_timeout(),
            default_page_size: Self::default_page_size(),
            max_page_size: Self::default_max_page_size(),
            api_keys: Vec::new(),
            allow_anonymous: false,
            seed_demo_data: false,
        }
    }
}

fn parse_var<T: std::str::FromStr>(var: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue { var, value })
}

/// Parse `key:hash,key:hash` into client entries.
fn parse_api_keys(value: &str) -> Result<Vec<ApiClientConfig>, ConfigError> {
    value
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let (key, hash) = entry
                .split_once(':')
                .ok_or_else(|| ConfigError::InvalidApiClient(entry.to_string()))?;
            if key.is_empty() || hash.is_empty() {
                return Err(ConfigError::InvalidApiClient(entry.to_string()));
            }
            Ok(ApiClientConfig {
                key: key.to_string(),
                secret_hash: hash.to_string(),
            })
        })
        .collect()
}
