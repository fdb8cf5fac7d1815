//! Device catalog endpoints.
//!
//! Request bodies are checked here before they reach the service: identity
//! fields must be non-blank and 3 to 50 characters long on create and full
//! update. Partial updates are passed through as-is.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;

use device_catalog_core::device::IDENTITY_FIELD_LEN;
use device_catalog_core::DeviceId;
use device_catalog_service::{
    CreateDeviceRequest, DeviceService, ListDevicesQuery, PatchDeviceRequest, UpdateDeviceRequest,
};

use crate::auth::{ApiClient, ApiKeyValidator};
use crate::error::ApiError;
use crate::state::GatewayState;

/// Legacy query timestamp format, read as UTC.
const LEGACY_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H-%M-%S";

// =============================================================================
// Request Types
// =============================================================================

/// Body of a create or full update request.
///
/// Fields are optional so that missing ones are reported per field.
#[derive(Debug, Default, Deserialize)]
pub struct DeviceBody {
    /// Model name.
    #[serde(default)]
    pub name: Option<String>,
    /// Manufacturer.
    #[serde(default)]
    pub brand: Option<String>,
    /// State wire name.
    #[serde(default)]
    pub state: Option<String>,
}

/// Query parameters for listing devices.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListDevicesParams {
    /// Name substring.
    pub name: Option<String>,
    /// Brand substring.
    pub brand: Option<String>,
    /// Exact state.
    pub state: Option<String>,
    /// Inclusive lower bound on creation time.
    #[serde(alias = "startDateTime")]
    pub start_date: Option<String>,
    /// Inclusive upper bound on creation time.
    #[serde(alias = "endDateTime")]
    pub end_date: Option<String>,
    /// Zero-based page index.
    pub page: Option<u32>,
    /// Page size.
    pub size: Option<u32>,
    /// Sort ascending (default) or descending.
    pub ascending: Option<bool>,
}

/// Validated create / full update fields.
#[derive(Debug)]
struct ValidDevice {
    name: String,
    brand: String,
    state: String,
}

impl DeviceBody {
    fn validate(self) -> Result<ValidDevice, ApiError> {
        let mut errors = BTreeMap::new();

        check_identity_field(&mut errors, "name", self.name.as_deref());
        check_identity_field(&mut errors, "brand", self.brand.as_deref());
        if is_blank(self.state.as_deref()) {
            errors.insert("state".to_string(), "must not be blank".to_string());
        }

        match (self.name, self.brand, self.state) {
            (Some(name), Some(brand), Some(state)) if errors.is_empty() => {
                Ok(ValidDevice { name, brand, state })
            }
            _ => Err(ApiError::Validation(errors)),
        }
    }
}

fn is_blank(value: Option<&str>) -> bool {
    value.is_none_or(|v| v.trim().is_empty())
}

fn check_identity_field(errors: &mut BTreeMap<String, String>, field: &str, value: Option<&str>) {
    let message = match value {
        _ if is_blank(value) => "must not be blank".to_string(),
        Some(v) if !IDENTITY_FIELD_LEN.contains(&v.chars().count()) => format!(
            "size must be between {} and {}",
            IDENTITY_FIELD_LEN.start(),
            IDENTITY_FIELD_LEN.end()
        ),
        _ => return,
    };
    errors.insert(field.to_string(), message);
}

impl ListDevicesParams {
    fn into_query(self) -> Result<ListDevicesQuery, ApiError> {
        let created_after = self
            .start_date
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .map(|s| parse_timestamp("startDate", s))
            .transpose()?;
        let created_before = self
            .end_date
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .map(|s| parse_timestamp("endDate", s))
            .transpose()?;

        Ok(ListDevicesQuery {
            name: self.name,
            brand: self.brand,
            state: self.state,
            created_after,
            created_before,
            page: self.page.unwrap_or(0),
            size: self.size,
            ascending: self.ascending.unwrap_or(true),
        })
    }
}

/// Parse an RFC 3339 timestamp, or the legacy `yyyy-MM-ddTHH-mm-ss` form as UTC.
fn parse_timestamp(field: &str, value: &str) -> Result<DateTime<Utc>, ApiError> {
    let value = value.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Ok(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(value, LEGACY_TIMESTAMP_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|_| ApiError::field(field, format!("invalid date-time: {value}")))
}

fn parse_device_id(s: &str) -> Result<DeviceId, ApiError> {
    s.parse()
        .map_err(|_| ApiError::BadRequest(format!("invalid device ID: {s}")))
}

// =============================================================================
// Handlers
// =============================================================================

/// Create a new device.
///
/// # Errors
///
/// Returns an error if the body fails validation, the state is unknown, or
/// the `(name, brand)` identity is taken.
pub async fn create_device<D, V>(
    State(state): State<Arc<GatewayState<D, V>>>,
    _client: ApiClient,
    body: Result<Json<DeviceBody>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
    D: DeviceService + 'static,
    V: ApiKeyValidator + 'static,
{
    let Json(body) = body?;
    let valid = body.validate()?;

    let device = state
        .devices
        .create(CreateDeviceRequest::with_state(
            valid.name,
            valid.brand,
            valid.state,
        ))
        .await?;

    Ok((StatusCode::CREATED, Json(device)))
}

/// List devices matching the query.
///
/// # Errors
///
/// Returns an error if a query parameter is malformed.
pub async fn list_devices<D, V>(
    State(state): State<Arc<GatewayState<D, V>>>,
    _client: ApiClient,
    params: Result<Query<ListDevicesParams>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError>
where
    D: DeviceService + 'static,
    V: ApiKeyValidator + 'static,
{
    let Query(params) = params?;
    let page = state.devices.get_all(params.into_query()?).await?;

    Ok(Json(page))
}

/// Get a single device by ID.
///
/// # Errors
///
/// Returns an error if the ID is malformed or the device is not found.
pub async fn get_device<D, V>(
    State(state): State<Arc<GatewayState<D, V>>>,
    _client: ApiClient,
    Path(device_id): Path<String>,
) -> Result<impl IntoResponse, ApiError>
where
    D: DeviceService + 'static,
    V: ApiKeyValidator + 'static,
{
    let device_id = parse_device_id(&device_id)?;
    let device = state.devices.get_one(&device_id).await?;

    Ok(Json(device))
}

/// Replace every field of a device.
///
/// # Errors
///
/// Returns an error if the body fails validation, the device is not found,
/// the device is locked, or the new identity is taken.
pub async fn update_device<D, V>(
    State(state): State<Arc<GatewayState<D, V>>>,
    _client: ApiClient,
    Path(device_id): Path<String>,
    body: Result<Json<DeviceBody>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
    D: DeviceService + 'static,
    V: ApiKeyValidator + 'static,
{
    let device_id = parse_device_id(&device_id)?;
    let Json(body) = body?;
    let valid = body.validate()?;

    let device = state
        .devices
        .update(
            &device_id,
            UpdateDeviceRequest {
                name: valid.name,
                brand: valid.brand,
                state: valid.state,
            },
        )
        .await?;

    Ok(Json(device))
}

/// Change the fields present in the body.
///
/// # Errors
///
/// Returns an error if the device is not found, the device is locked, or the
/// new identity is taken.
pub async fn patch_device<D, V>(
    State(state): State<Arc<GatewayState<D, V>>>,
    _client: ApiClient,
    Path(device_id): Path<String>,
    body: Result<Json<PatchDeviceRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
    D: DeviceService + 'static,
    V: ApiKeyValidator + 'static,
{
    let device_id = parse_device_id(&device_id)?;
    let Json(request) = body?;

    let device = state.devices.patch(&device_id, request).await?;

    Ok(Json(device))
}

/// Delete a device.
///
/// # Errors
///
/// Returns an error if the device is not found or is in use.
pub async fn delete_device<D, V>(
    State(state): State<Arc<GatewayState<D, V>>>,
    _client: ApiClient,
    Path(device_id): Path<String>,
) -> Result<impl IntoResponse, ApiError>
where
    D: DeviceService + 'static,
    V: ApiKeyValidator + 'static,
{
    let device_id = parse_device_id(&device_id)?;
    state.devices.delete(&device_id).await?;

    Ok(StatusCode::NO_CONTENT)
}
