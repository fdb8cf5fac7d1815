#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use device_catalog_gateway::auth::hash_secret;
use device_catalog_gateway::config::ApiClientConfig;
use device_catalog_gateway::{create_router, GatewayConfig, GatewayState, StaticApiKeyValidator};
use device_catalog_service::DeviceCatalogService;
use device_catalog_store::MemoryStore;

pub const API_KEY: &str = "test-client";
pub const API_SECRET: &str = "test-secret";

/// Build a gateway over an empty in-memory store.
///
/// With `secured` the single client `API_KEY`/`API_SECRET` is required;
/// otherwise the gateway admits anonymous requests.
pub fn build_test_app(secured: bool) -> Router {
    let api_keys = if secured {
        vec![ApiClientConfig {
            key: API_KEY.to_string(),
            secret_hash: hash_secret(API_SECRET),
        }]
    } else {
        Vec::new()
    };

    build_app(GatewayConfig {
        data_dir: ":memory:".to_string(),
        api_keys,
        allow_anonymous: !secured,
        ..Default::default()
    })
}

/// Build a gateway over an in-memory store from `config`.
pub fn build_app(config: GatewayConfig) -> Router {
    let store = Arc::new(MemoryStore::new());
    let devices = Arc::new(DeviceCatalogService::new(store, config.service_config()));
    let validator = Arc::new(
        StaticApiKeyValidator::from_config(&config.api_keys)
            .unwrap()
            .allow_anonymous(config.allow_anonymous),
    );

    create_router(GatewayState::new(devices, validator, config))
}

/// Build an authenticated request with an optional JSON body.
pub fn request(method: Method, uri: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("API-Key", API_KEY)
        .header("API-Secret", API_SECRET);

    match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Send a request and return the status and parsed JSON body (`Null` if empty).
pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

/// Create a device through the API and return its ID.
pub async fn create_device(app: &Router, name: &str, brand: &str, state: &str) -> String {
    let (status, json) = send(
        app,
        request(
            Method::POST,
            "/api/devices",
            Some(serde_json::json!({ "name": name, "brand": brand, "state": state })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create failed: {json}");
    json["id"].as_str().unwrap().to_string()
}
