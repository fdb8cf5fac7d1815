//! Error types for the device service.
//!
//! Every rule the service enforces surfaces as one variant here, so the
//! gateway can map errors to responses without inspecting messages.

use device_catalog_core::{CoreError, DeviceId};
use device_catalog_store::StoreError;
use thiserror::Error;

/// A result type using `ServiceError`.
pub type Result<T> = std::result::Result<T, ServiceError>;

/// Errors that can occur in device service operations.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// A field holds a value outside its domain.
    #[error("invalid value({value}) for field[{field}]")]
    InvalidFieldValue {
        /// The offending field.
        field: &'static str,
        /// The rejected value.
        value: String,
    },

    /// A required field is missing or empty.
    #[error("field[{field}] must not be empty")]
    InvalidNullValue {
        /// The missing field.
        field: &'static str,
    },

    /// The values would collide with another device's identity.
    #[error("duplicated values {values:?} for fields {fields:?}")]
    DuplicatedValues {
        /// The fields forming the identity.
        fields: Vec<&'static str>,
        /// The contested values, in field order.
        values: Vec<String>,
    },

    /// An identity field was changed on a locked device.
    #[error("cannot change {field} of device {device_id} while it is in use")]
    UpdateOnLock {
        /// The locked device.
        device_id: DeviceId,
        /// The field whose change was refused.
        field: &'static str,
    },

    /// A locked device was asked to be deleted.
    #[error("cannot delete device {0} while it is in use")]
    DeleteOnLock(DeviceId),

    /// The requested device was not found.
    #[error("device not found: {0}")]
    DeviceNotFound(DeviceId),

    /// Storage layer error.
    #[error("storage error: {0}")]
    Store(StoreError),
}

impl ServiceError {
    /// Duplicate error for the `(name, brand)` identity.
    #[must_use]
    pub fn duplicated_identity(name: impl Into<String>, brand: impl Into<String>) -> Self {
        Self::DuplicatedValues {
            fields: vec!["name", "brand"],
            values: vec![name.into(), brand.into()],
        }
    }

    /// Returns the appropriate HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::InvalidFieldValue { .. } | Self::InvalidNullValue { .. } => 400,
            Self::DeviceNotFound(_) => 404,
            Self::DuplicatedValues { .. } | Self::UpdateOnLock { .. } | Self::DeleteOnLock(_) => {
                409
            }
            Self::Store(_) => 500,
        }
    }
}

impl From<CoreError> for ServiceError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InvalidFieldValue { field, value } => Self::InvalidFieldValue { field, value },
            CoreError::UpdateOnLock { device_id, field } => Self::UpdateOnLock { device_id, field },
            CoreError::DeleteOnLock(device_id) => Self::DeleteOnLock(device_id),
        }
    }
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateIdentity { name, brand, .. } => {
                Self::duplicated_identity(name, brand)
            }
            other => Self::Store(other),
        }
    }
}
