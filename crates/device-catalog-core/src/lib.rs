//! Core types for the device catalog.
//!
//! This crate provides the foundational types used throughout the catalog:
//!
//! - **Identifiers**: the strongly-typed `DeviceId`
//! - **Device**: the entity and its lock-guarded state machine
//! - **Error types**: violations raised by the entity's guards
//!
//! # Example
//!
//! ```
//! use device_catalog_core::{Device, DeviceState};
//!
//! let mut device = Device::create("Edge 60", "Motorola", DeviceState::Available).unwrap();
//!
//! // A device in use is locked: its identity cannot change...
//! device.change_state(DeviceState::InUse);
//! assert!(device.is_locked());
//! assert!(device.rename("Edge 70").is_err());
//!
//! // ...but its state always can.
//! device.change_state_str("AVAILABLE").unwrap();
//! device.rename("Edge 70").unwrap();
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod device;
pub mod error;
pub mod ids;

pub use device::{Device, DeviceState};
pub use error::{CoreError, Result};
pub use ids::{DeviceId, IdError};
