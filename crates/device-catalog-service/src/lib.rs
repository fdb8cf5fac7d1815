//! Business logic for the device catalog.
//!
//! This crate sits between the HTTP gateway and the storage layer. It owns
//! the rules that span more than one device: identity uniqueness, listing
//! filters, and the single-write update flow.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Gateway (HTTP)                          │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   DeviceCatalogService                      │
//! │  ┌─────────────┐ ┌─────────────┐ ┌─────────────────────┐    │
//! │  │  Identity   │ │   Filter    │ │   Device entity     │    │
//! │  │  Validator  │ │   Builder   │ │   (lock guards)     │    │
//! │  └─────────────┘ └─────────────┘ └─────────────────────┘    │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//!                       ┌──────────────┐
//!                       │    Store     │
//!                       │ (RocksDB or  │
//!                       │   memory)    │
//!                       └──────────────┘
//! ```
//!
//! # Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use device_catalog_service::{CreateDeviceRequest, DeviceCatalogService, DeviceService};
//! use device_catalog_store::RocksStore;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = Arc::new(RocksStore::open("/tmp/device-catalog")?);
//! let service = DeviceCatalogService::with_defaults(store);
//!
//! let device = service
//!     .create(CreateDeviceRequest::new("Edge 60", "Motorola"))
//!     .await?;
//!
//! println!("Created device: {}", device.id);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod filter;
pub mod identity;
pub mod seed;
pub mod service;
pub mod types;

pub use error::{Result, ServiceError};
pub use filter::DeviceFilterBuilder;
pub use service::{DeviceCatalogService, DeviceService};
pub use types::{
    CreateDeviceRequest, DevicePage, DeviceResponse, ListDevicesQuery, PatchDeviceRequest,
    ServiceConfig, UpdateDeviceRequest,
};

// Re-export commonly used types from dependencies for convenience
pub use device_catalog_core::{Device, DeviceId, DeviceState};
