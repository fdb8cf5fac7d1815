//! State shared by the device catalog routes.
//!
//! Every handler and the authentication middleware receive a clone of
//! [`GatewayState`]; cloning only bumps the reference counts.

use std::sync::Arc;

use device_catalog_service::DeviceService;

use crate::auth::ApiKeyValidator;
use crate::config::GatewayConfig;

/// Device service, API client validator and settings behind the `/api` routes.
pub struct GatewayState<D, V>
where
    D: DeviceService,
    V: ApiKeyValidator,
{
    /// Catalog operations the device handlers delegate to.
    pub devices: Arc<D>,
    /// Checks `API-Key`/`API-Secret` on every `/api` request.
    pub api_keys: Arc<V>,
    /// Settings read at startup, such as CORS origins and body limits.
    pub config: GatewayConfig,
}

impl<D, V> GatewayState<D, V>
where
    D: DeviceService,
    V: ApiKeyValidator,
{
    /// Bundle the catalog service and the API client validator.
    #[must_use]
    pub fn new(devices: Arc<D>, api_keys: Arc<V>, config: GatewayConfig) -> Self {
        Self {
            devices,
            api_keys,
            config,
        }
    }
}

impl<D, V> Clone for GatewayState<D, V>
where
    D: DeviceService,
    V: ApiKeyValidator,
{
    fn clone(&self) -> Self {
        Self {
            devices: Arc::clone(&self.devices),
            api_keys: Arc::clone(&self.api_keys),
            config: self.config.clone(),
        }
    }
}
