//! HTTP gateway for the device catalog.
//!
//! This crate provides the public-facing REST API over the device service.
//! It handles:
//!
//! - API key authentication (`API-Key` / `API-Secret` headers)
//! - REST endpoints for device management
//! - Request validation and error formatting
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         Clients                             │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  device-catalog-gateway                     │
//! │  ┌─────────────┐ ┌─────────────┐ ┌─────────────────────┐    │
//! │  │   API key   │ │   Router    │ │   Request           │    │
//! │  │  Extractor  │ │  + Handlers │ │   validation        │    │
//! │  └─────────────┘ └─────────────┘ └─────────────────────┘    │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//!                      ┌──────────────┐
//!                      │    Device    │
//!                      │   Service    │
//!                      └──────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use device_catalog_gateway::{create_router, GatewayConfig, GatewayState, StaticApiKeyValidator};
//! use device_catalog_service::DeviceCatalogService;
//! use device_catalog_store::RocksStore;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = GatewayConfig::default();
//!
//! // Initialize dependencies
//! let store = Arc::new(RocksStore::open("/tmp/device-catalog")?);
//! let devices = Arc::new(DeviceCatalogService::new(store, config.service_config()));
//! let api_keys = Arc::new(
//!     StaticApiKeyValidator::from_config(&config.api_keys)?.allow_anonymous(config.allow_anonymous),
//! );
//!
//! // Create router
//! let app = create_router(GatewayState::new(devices, api_keys, config));
//!
//! // Run server
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use auth::{ApiClient, ApiKeyValidator, StaticApiKeyValidator};
pub use config::{ConfigError, GatewayConfig};
pub use error::ApiError;
pub use routes::create_router;
pub use state::GatewayState;
