//! Key encoding utilities for `RocksDB`.
//!
//! This module provides functions to encode and decode keys for the device
//! record and its identity index.

use device_catalog_core::DeviceId;

use crate::error::{Result, StoreError};

/// Encode a device key (just the device ID bytes).
#[must_use]
pub fn device_key(device_id: &DeviceId) -> Vec<u8> {
    device_id.as_bytes().to_vec()
}

/// Encode an identity index key: `len(name) || name || brand`.
///
/// The big-endian length prefix keeps `("ab", "c")` and `("a", "bc")` apart.
#[must_use]
pub fn identity_key(name: &str, brand: &str) -> Vec<u8> {
    let name_len = u32::try_from(name.len()).unwrap_or(u32::MAX);
    let mut key = Vec::with_capacity(4 + name.len() + brand.len());
    key.extend_from_slice(&name_len.to_be_bytes());
    key.extend_from_slice(name.as_bytes());
    key.extend_from_slice(brand.as_bytes());
    key
}

/// Decode the device ID stored as an identity index value.
///
/// # Errors
///
/// Returns `StoreError::Serialization` if the value is not 16 bytes.
pub fn device_id_from_index_value(value: &[u8]) -> Result<DeviceId> {
    DeviceId::try_from(value).map_err(|e| StoreError::Serialization(e.to_string()))
}
