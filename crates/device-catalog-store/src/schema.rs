//! Database schema definitions and column families.
//!
//! This module defines the column families used in `RocksDB` storage.

/// Column family names for the `RocksDB` database.
pub mod cf {
    /// Primary device records, keyed by `device_id`.
    pub const DEVICES: &str = "devices";

    /// Unique index: device ID by identity, keyed by `len(name) || name || brand`.
    pub const DEVICES_BY_IDENTITY: &str = "devices_by_identity";
}

/// Returns all column family names for database initialization.
#[must_use]
pub fn all_column_families() -> Vec<&'static str> {
    vec![cf::DEVICES, cf::DEVICES_BY_IDENTITY]
}
