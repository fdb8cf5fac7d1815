//! Request and response types for device service operations.
//!
//! These types define the API contracts for the catalog. JSON field names are
//! camelCase.

use chrono::{DateTime, Utc};
use device_catalog_core::{Device, DeviceId, DeviceState};
use device_catalog_store::Page;
use serde::{Deserialize, Serialize};

/// Request to create a new device.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDeviceRequest {
    /// Model name.
    pub name: String,
    /// Manufacturer.
    pub brand: String,
    /// Initial state. `AVAILABLE` if absent or empty.
    #[serde(default)]
    pub state: Option<String>,
}

impl CreateDeviceRequest {
    /// Create a request for an `AVAILABLE` device.
    #[must_use]
    pub fn new(name: impl Into<String>, brand: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            brand: brand.into(),
            state: None,
        }
    }

    /// Create a request with an explicit initial state.
    #[must_use]
    pub fn with_state(
        name: impl Into<String>,
        brand: impl Into<String>,
        state: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            brand: brand.into(),
            state: Some(state.into()),
        }
    }
}

/// Full update: every field is required and applied.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateDeviceRequest {
    /// New model name.
    pub name: String,
    /// New manufacturer.
    pub brand: String,
    /// New state.
    pub state: String,
}

/// Partial update: absent or empty fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PatchDeviceRequest {
    /// New model name.
    #[serde(default)]
    pub name: Option<String>,
    /// New manufacturer.
    #[serde(default)]
    pub brand: Option<String>,
    /// New state.
    #[serde(default)]
    pub state: Option<String>,
}

impl PatchDeviceRequest {
    /// A patch that only changes the state.
    #[must_use]
    pub fn state(state: impl Into<String>) -> Self {
        Self {
            state: Some(state.into()),
            ..Self::default()
        }
    }
}

/// A device as returned to API callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceResponse {
    /// Unique identifier.
    pub id: DeviceId,
    /// Model name.
    pub name: String,
    /// Manufacturer.
    pub brand: String,
    /// Current state.
    pub state: DeviceState,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl From<&Device> for DeviceResponse {
    fn from(device: &Device) -> Self {
        Self {
            id: device.id(),
            name: device.name().to_string(),
            brand: device.brand().to_string(),
            state: device.state(),
            created_at: device.created_at(),
        }
    }
}

impl From<Device> for DeviceResponse {
    fn from(device: Device) -> Self {
        Self::from(&device)
    }
}

/// Criteria and paging for listing devices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListDevicesQuery {
    /// Name substring, case-insensitive.
    pub name: Option<String>,
    /// Brand substring, case-insensitive.
    pub brand: Option<String>,
    /// Exact state, by wire name.
    pub state: Option<String>,
    /// Inclusive lower bound on creation time.
    pub created_after: Option<DateTime<Utc>>,
    /// Inclusive upper bound on creation time.
    pub created_before: Option<DateTime<Utc>>,
    /// Zero-based page index.
    pub page: u32,
    /// Page size. Uses the configured default if absent.
    pub size: Option<u32>,
    /// Sort direction.
    pub ascending: bool,
}

impl Default for ListDevicesQuery {
    fn default() -> Self {
        Self {
            name: None,
            brand: None,
            state: None,
            created_after: None,
            created_before: None,
            page: 0,
            size: None,
            ascending: true,
        }
    }
}

/// One page of devices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DevicePage {
    /// Devices on this page.
    pub devices: Vec<DeviceResponse>,
    /// Zero-based page index.
    pub page: u32,
    /// Page size used.
    pub size: u32,
    /// Number of matching devices across all pages.
    pub total_elements: u64,
    /// Number of pages needed to list every match.
    pub total_pages: u64,
}

impl From<Page<DeviceResponse>> for DevicePage {
    fn from(page: Page<DeviceResponse>) -> Self {
        let total_pages = page.total_pages();
        Self {
            devices: page.items,
            page: page.page,
            size: page.size,
            total_elements: page.total_elements,
            total_pages,
        }
    }
}

/// Configuration for the device service.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Page size when a listing does not ask for one.
    pub default_page_size: u32,
    /// Largest page size a listing may ask for.
    pub max_page_size: u32,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            default_page_size: 10,
            max_page_size: 100,
        }
    }
}
