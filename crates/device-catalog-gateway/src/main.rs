//! Device Catalog Gateway - HTTP API
//!
//! This is the main entry point for the gateway service. Configuration is
//! read from the environment; see [`GatewayConfig::from_env`].
//!
//! # Storage
//!
//! `DATA_DIR` selects the `RocksDB` directory. `DATA_DIR=:memory:` runs on a
//! process-local store that is lost on exit.
//!
//! # Authentication
//!
//! `API_KEYS=key:hash,...` lists the accepted clients, where `hash` is the
//! hex blake3 digest of the client secret. Without `API_KEYS` the gateway
//! refuses to start unless `ALLOW_ANONYMOUS=true` is set.

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use device_catalog_gateway::{create_router, GatewayConfig, GatewayState, StaticApiKeyValidator};
use device_catalog_service::seed;
use device_catalog_service::DeviceCatalogService;
use device_catalog_store::{MemoryStore, RocksStore, Store};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,device_catalog=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Device Catalog Gateway");

    let config = GatewayConfig::from_env()?;
    config.ensure_auth_configured()?;

    tracing::info!(
        listen_addr = %config.listen_addr,
        data_dir = %config.data_dir,
        cors_origins = ?config.cors_origins,
        api_clients = config.api_keys.len(),
        allow_anonymous = config.allow_anonymous,
        seed_demo_data = config.seed_demo_data,
        "Gateway configuration loaded"
    );

    if config.is_in_memory() {
        tracing::warn!("Using in-memory store - data is lost on exit");
        serve(Arc::new(MemoryStore::new()), config).await
    } else {
        tracing::info!(path = %config.data_dir, "Opening RocksDB store");
        let store = Arc::new(RocksStore::open(&config.data_dir)?);
        serve(store, config).await
    }
}

async fn serve<S: Store + 'static>(
    store: Arc<S>,
    config: GatewayConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let devices = Arc::new(DeviceCatalogService::new(store, config.service_config()));

    if config.seed_demo_data {
        let inserted = seed::load_demo_catalog(devices.as_ref()).await?;
        tracing::info!(inserted, "Demo catalog ready");
    }

    let api_keys = Arc::new(
        StaticApiKeyValidator::from_config(&config.api_keys)?
            .allow_anonymous(config.allow_anonymous),
    );
    if api_keys.is_open() {
        tracing::warn!("ALLOW_ANONYMOUS set - requests without credentials are admitted");
    }

    let listen_addr = config.listen_addr.clone();
    let app = create_router(GatewayState::new(devices, api_keys, config));

    tracing::info!(listen_addr = %listen_addr, "Starting HTTP server");
    let listener = tokio::net::TcpListener::bind(&listen_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
