//! Errors raised by the device entity's guards.

use crate::ids::DeviceId;
use thiserror::Error;

/// A result type using `CoreError`.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Violations detected by the device entity itself.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// A supplied value fails a format or enumeration constraint.
    #[error("invalid value({value}) for field[{field}]")]
    InvalidFieldValue {
        /// The offending field.
        field: &'static str,
        /// The rejected value.
        value: String,
    },

    /// An identity field was targeted while the device is locked.
    #[error("cannot change {field} of device {device_id} while it is in use")]
    UpdateOnLock {
        /// The locked device.
        device_id: DeviceId,
        /// The field the caller tried to change.
        field: &'static str,
    },

    /// The device is locked and cannot be deleted.
    #[error("cannot delete device {0} while it is in use")]
    DeleteOnLock(DeviceId),
}
