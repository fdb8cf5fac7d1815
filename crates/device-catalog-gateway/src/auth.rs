//! API key authentication.
//!
//! Callers identify themselves with the `API-Key` and `API-Secret` headers.
//! The gateway stores only the blake3 digest of each secret.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use device_catalog_service::DeviceService;

use crate::config::{ApiClientConfig, ConfigError};
use crate::error::ApiError;
use crate::state::GatewayState;

/// Header carrying the client key.
pub const API_KEY_HEADER: &str = "api-key";

/// Header carrying the client secret.
pub const API_SECRET_HEADER: &str = "api-secret";

/// Key reported for requests admitted without credentials.
pub const ANONYMOUS_CLIENT: &str = "anonymous";

/// An authenticated API client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiClient {
    /// The client's API key.
    pub key: String,
}

/// Checks API credentials.
#[async_trait]
pub trait ApiKeyValidator: Send + Sync {
    /// Authenticate a request from its (possibly missing) credentials.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unauthorized` if the credentials are rejected.
    async fn authenticate(&self, key: Option<&str>, secret: Option<&str>)
        -> Result<ApiClient, ApiError>;
}

/// Validator over a fixed set of clients.
///
/// Requests without valid credentials are rejected unless anonymous access
/// was enabled with [`StaticApiKeyValidator::allow_anonymous`], in which
/// case they are admitted as [`ANONYMOUS_CLIENT`].
#[derive(Debug, Default)]
pub struct StaticApiKeyValidator {
    clients: HashMap<String, blake3::Hash>,
    allow_anonymous: bool,
}

impl StaticApiKeyValidator {
    /// Build a validator from configured clients.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidSecretHash` if a hash is not 64 hex digits.
    pub fn from_config(clients: &[ApiClientConfig]) -> Result<Self, ConfigError> {
        let clients = clients
            .iter()
            .map(|client| {
                let hash = blake3::Hash::from_hex(&client.secret_hash)
                    .map_err(|_| ConfigError::InvalidSecretHash(client.key.clone()))?;
                Ok((client.key.clone(), hash))
            })
            .collect::<Result<_, ConfigError>>()?;

        Ok(Self {
            clients,
            allow_anonymous: false,
        })
    }

    /// Admit requests that carry no credentials.
    #[must_use]
    pub fn allow_anonymous(mut self, allow: bool) -> Self {
        self.allow_anonymous = allow;
        self
    }

    /// Returns true if requests without credentials are admitted.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.allow_anonymous
    }
}

#[async_trait]
impl ApiKeyValidator for StaticApiKeyValidator {
    async fn authenticate(
        &self,
        key: Option<&str>,
        secret: Option<&str>,
    ) -> Result<ApiClient, ApiError> {
        let (Some(key), Some(secret)) = (key, secret) else {
            if self.allow_anonymous && key.is_none() && secret.is_none() {
                return Ok(ApiClient {
                    key: ANONYMOUS_CLIENT.to_string(),
                });
            }
            return Err(ApiError::Unauthorized);
        };
        let expected = self.clients.get(key).ok_or(ApiError::Unauthorized)?;

        // blake3::Hash equality is constant-time
        if blake3::hash(secret.as_bytes()) != *expected {
            tracing::debug!(api_key = %key, "Rejected API secret");
            return Err(ApiError::Unauthorized);
        }

        Ok(ApiClient {
            key: key.to_string(),
        })
    }
}

/// Hex blake3 digest of a secret, in the form stored in `API_KEYS`.
#[must_use]
pub fn hash_secret(secret: &str) -> String {
    blake3::hash(secret.as_bytes()).to_hex().to_string()
}

impl<D, V> FromRequestParts<Arc<GatewayState<D, V>>> for ApiClient
where
    D: DeviceService + 'static,
    V: ApiKeyValidator + 'static,
{
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<GatewayState<D, V>>,
    ) -> Result<Self, Self::Rejection> {
        let key = parts
            .headers
            .get(API_KEY_HEADER)
            .and_then(|v| v.to_str().ok());
        let secret = parts
            .headers
            .get(API_SECRET_HEADER)
            .and_then(|v| v.to_str().ok());

        state.api_keys.authenticate(key, secret).await
    }
}
