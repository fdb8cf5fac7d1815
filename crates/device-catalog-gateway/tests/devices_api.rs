//! Device endpoints exercised through the full router.

mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::{build_test_app, create_device, request, send};

#[tokio::test]
async fn create_returns_created_device() {
    let app = build_test_app(true);

    let (status, json) = send(
        &app,
        request(
            Method::POST,
            "/api/devices",
            Some(json!({"name": "Edge 60", "brand": "Motorola", "state": "AVAILABLE"})),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["name"], "Edge 60");
    assert_eq!(json["brand"], "Motorola");
    assert_eq!(json["state"], "AVAILABLE");
    assert!(json["id"].is_string());
    assert!(json["createdAt"].is_string());

    let id = json["id"].as_str().unwrap();
    let (status, fetched) = send(&app, request(Method::GET, &format!("/api/devices/{id}"), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, json);
}

#[tokio::test]
async fn create_reports_every_invalid_field() {
    let app = build_test_app(true);

    let (status, json) = send(
        &app,
        request(
            Method::POST,
            "/api/devices",
            Some(json!({"name": "X1", "brand": "  "})),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let errors = &json["error"]["fieldErrors"];
    assert_eq!(json["error"]["code"], "validation_failed");
    assert_eq!(errors["name"], "size must be between 3 and 50");
    assert_eq!(errors["brand"], "must not be blank");
    assert_eq!(errors["state"], "must not be blank");
}

#[tokio::test]
async fn create_rejects_unknown_state() {
    let app = build_test_app(true);

    let (status, json) = send(
        &app,
        request(
            Method::POST,
            "/api/devices",
            Some(json!({"name": "Edge 60", "brand": "Motorola", "state": "available"})),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], "bad_request");
}

#[tokio::test]
async fn malformed_body_is_bad_request() {
    let app = build_test_app(true);

    let mut req = request(Method::POST, "/api/devices", None);
    *req.body_mut() = axum::body::Body::from("{not json");
    req.headers_mut()
        .insert("content-type", "application/json".parse().unwrap());

    let (status, json) = send(&app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["status"], 400);
}

#[tokio::test]
async fn duplicate_identity_conflicts() {
    let app = build_test_app(true);
    create_device(&app, "Edge 60", "Motorola", "AVAILABLE").await;

    let (status, json) = send(
        &app,
        request(
            Method::POST,
            "/api/devices",
            Some(json!({"name": "Edge 60", "brand": "Motorola", "state": "INACTIVE"})),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["error"]["code"], "conflict");
}

#[tokio::test]
async fn locked_device_lifecycle() {
    let app = build_test_app(true);
    let id = create_device(&app, "Edge 60", "Motorola", "IN_USE").await;
    let uri = format!("/api/devices/{id}");

    // Identity frozen while in use
    let (status, _) = send(
        &app,
        request(Method::PATCH, &uri, Some(json!({"name": "Edge 70"}))),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // Delete refused while in use
    let (status, _) = send(&app, request(Method::DELETE, &uri, None)).await;
    assert_eq!(status, StatusCode::CONFLICT);

    // Full update keeping the identity may still change the state
    let (status, json) = send(
        &app,
        request(
            Method::PUT,
            &uri,
            Some(json!({"name": "Edge 60", "brand": "Motorola", "state": "AVAILABLE"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["state"], "AVAILABLE");

    // Unlocked: rename and delete succeed
    let (status, json) = send(
        &app,
        request(Method::PATCH, &uri, Some(json!({"name": "Edge 70"}))),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["name"], "Edge 70");
    assert_eq!(json["brand"], "Motorola");

    let (status, body) = send(&app, request(Method::DELETE, &uri, None)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_null());

    let (status, _) = send(&app, request(Method::GET, &uri, None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn rename_onto_taken_identity_conflicts() {
    let app = build_test_app(true);
    create_device(&app, "Galaxy S24", "Samsung", "AVAILABLE").await;
    let id = create_device(&app, "Galaxy S23", "Samsung", "AVAILABLE").await;

    let (status, _) = send(
        &app,
        request(
            Method::PATCH,
            &format!("/api/devices/{id}"),
            Some(json!({"name": "Galaxy S24"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn patch_rejects_short_name() {
    let app = build_test_app(true);
    let id = create_device(&app, "Edge 60", "Motorola", "AVAILABLE").await;
    let uri = format!("/api/devices/{id}");

    let (status, json) = send(&app, request(Method::PATCH, &uri, Some(json!({"name": "X"})))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], "bad_request");

    let (_, json) = send(&app, request(Method::GET, &uri, None)).await;
    assert_eq!(json["name"], "Edge 60");
}

#[tokio::test]
async fn full_update_requires_every_field() {
    let app = build_test_app(true);
    let id = create_device(&app, "Edge 60", "Motorola", "AVAILABLE").await;

    let (status, json) = send(
        &app,
        request(
            Method::PUT,
            &format!("/api/devices/{id}"),
            Some(json!({"name": "Edge 70", "brand": "Motorola"})),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["fieldErrors"]["state"], "must not be blank");
}

#[tokio::test]
async fn invalid_and_unknown_ids() {
    let app = build_test_app(true);

    let (status, json) = send(&app, request(Method::GET, "/api/devices/not-a-uuid", None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], "bad_request");

    let (status, json) = send(
        &app,
        request(
            Method::DELETE,
            "/api/devices/7f3c1a52-9a51-4d5e-8f43-2a4c9d7e1b00",
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"]["code"], "not_found");
}

#[tokio::test]
async fn list_filters_and_pages() {
    let app = build_test_app(true);
    create_device(&app, "Pixel 8", "Google", "AVAILABLE").await;
    create_device(&app, "Pixel 9", "Google", "IN_USE").await;
    create_device(&app, "Edge 60", "Motorola", "IN_USE").await;
    create_device(&app, "iPhone 15", "Apple", "INACTIVE").await;

    let (status, json) = send(&app, request(Method::GET, "/api/devices", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["totalElements"], 4);
    assert_eq!(json["page"], 0);
    assert_eq!(json["size"], 10);
    assert_eq!(json["totalPages"], 1);
    let brands: Vec<&str> = json["devices"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["brand"].as_str().unwrap())
        .collect();
    assert_eq!(brands, ["Apple", "Google", "Google", "Motorola"]);

    let (_, json) = send(&app, request(Method::GET, "/api/devices?brand=goo", None)).await;
    assert_eq!(json["totalElements"], 2);

    let (_, json) = send(&app, request(Method::GET, "/api/devices?state=IN_USE", None)).await;
    assert_eq!(json["totalElements"], 2);

    let (_, json) = send(
        &app,
        request(Method::GET, "/api/devices?brand=Google&state=IN_USE", None),
    )
    .await;
    assert_eq!(json["totalElements"], 1);
    assert_eq!(json["devices"][0]["name"], "Pixel 9");

    let (_, json) = send(
        &app,
        request(Method::GET, "/api/devices?page=1&size=3&ascending=false", None),
    )
    .await;
    assert_eq!(json["totalElements"], 4);
    assert_eq!(json["page"], 1);
    assert_eq!(json["size"], 3);
    assert_eq!(json["totalPages"], 2);
    assert_eq!(json["devices"].as_array().unwrap().len(), 1);
    assert_eq!(json["devices"][0]["brand"], "Apple");
}

#[tokio::test]
async fn list_rejects_unknown_state() {
    let app = build_test_app(true);

    let (status, _) = send(&app, request(Method::GET, "/api/devices?state=BROKEN", None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn list_by_creation_window() {
    let app = build_test_app(true);
    create_device(&app, "Edge 60", "Motorola", "AVAILABLE").await;

    let (status, json) = send(
        &app,
        request(
            Method::GET,
            "/api/devices?startDate=2000-01-01T00-00-00",
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["totalElements"], 1);

    let (_, json) = send(
        &app,
        request(
            Method::GET,
            "/api/devices?endDateTime=2000-01-01T00:00:00Z",
            None,
        ),
    )
    .await;
    assert_eq!(json["totalElements"], 0);

    let (status, json) = send(
        &app,
        request(Method::GET, "/api/devices?startDate=yesterday", None),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"]["fieldErrors"]["startDate"].is_string());
}
