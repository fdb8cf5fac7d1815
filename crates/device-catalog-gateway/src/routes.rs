//! Router configuration.
//!
//! This module sets up the Axum router with all routes and middleware.

use std::sync::Arc;

use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use device_catalog_service::DeviceService;

use crate::auth::ApiKeyValidator;
use crate::handlers::{devices, health};
use crate::state::GatewayState;

/// Create the gateway router with all routes and middleware.
///
/// # Routes
///
/// ## Public
/// - `GET /health` - Health check
///
/// ## Devices (authenticated)
/// - `GET /api/devices` - List devices
/// - `POST /api/devices` - Create device
/// - `GET /api/devices/{device_id}` - Get device
/// - `PUT /api/devices/{device_id}` - Replace device
/// - `PATCH /api/devices/{device_id}` - Partially update device
/// - `DELETE /api/devices/{device_id}` - Delete device
pub fn create_router<D, V>(state: GatewayState<D, V>) -> Router
where
    D: DeviceService + 'static,
    V: ApiKeyValidator + 'static,
{
    // Extract config values before moving state
    let cors = build_cors_layer(&state.config.cors_origins);
    let max_body_bytes = state.config.max_body_bytes;
    let request_timeout = state.config.request_timeout();

    let state = Arc::new(state);

    Router::new()
        // Health (public)
        .route("/health", get(health::health))
        // Devices
        .route(
            "/api/devices",
            get(devices::list_devices::<D, V>).post(devices::create_device::<D, V>),
        )
        .route(
            "/api/devices/{device_id}",
            get(devices::get_device::<D, V>)
                .put(devices::update_device::<D, V>)
                .patch(devices::patch_device::<D, V>)
                .delete(devices::delete_device::<D, V>),
        )
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ))
        .with_state(state)
}

/// Build the CORS layer from configured origins.
fn build_cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|o| o == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}
