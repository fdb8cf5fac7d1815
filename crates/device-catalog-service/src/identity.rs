//! Identity validation.
//!
//! A device's identity is its `(name, brand)` pair, which must be unique
//! across the catalog. These checks run before a write so callers get a
//! precise error. The store's unique index backs them up against races.

use device_catalog_core::DeviceId;
use device_catalog_store::Store;

use crate::error::{Result, ServiceError};

/// Validate the identity of a device about to be created.
///
/// # Errors
///
/// Returns `ServiceError::InvalidNullValue` if `name` or `brand` is empty
/// (name is checked first), or `ServiceError::DuplicatedValues` if another
/// device already holds the identity.
pub fn validate_identification<S: Store + ?Sized>(store: &S, name: &str, brand: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(ServiceError::InvalidNullValue { field: "name" });
    }
    if brand.trim().is_empty() {
        return Err(ServiceError::InvalidNullValue { field: "brand" });
    }
    validate_duplicates(store, None, name, brand)
}

/// Check that no device other than `excluded` holds `(name, brand)`.
///
/// `excluded` is the device being updated; holding its own identity is not a
/// conflict. Devices are compared by ID.
///
/// # Errors
///
/// Returns `ServiceError::DuplicatedValues` on conflict.
pub fn validate_duplicates<S: Store + ?Sized>(
    store: &S,
    excluded: Option<&DeviceId>,
    name: &str,
    brand: &str,
) -> Result<()> {
    let conflict = store
        .find_by_name_and_brand(name, brand)?
        .into_iter()
        .any(|holder| Some(&holder.id()) != excluded);

    if conflict {
        return Err(ServiceError::duplicated_identity(name, brand));
    }
    Ok(())
}
