//! Storage layer for the device catalog.
//!
//! This crate defines the query contract the service layer relies on
//! ([`Store`]) and two implementations:
//!
//! - [`RocksStore`]: persistent storage on `RocksDB`
//! - [`MemoryStore`]: an in-process map, used by tests and ephemeral runs
//!
//! # Architecture
//!
//! The `RocksDB` storage uses the following column families:
//!
//! - `devices`: Primary device records, keyed by `device_id`
//! - `devices_by_identity`: Unique index from `(name, brand)` to `device_id`
//!
//! Both implementations enforce the `(name, brand)` uniqueness invariant on
//! write, so a check-then-save race between two writers ends with one of them
//! receiving [`StoreError::DuplicateIdentity`].
//!
//! # Example
//!
//! ```no_run
//! use device_catalog_core::{Device, DeviceState};
//! use device_catalog_store::{DeviceFilter, PageRequest, RocksStore, Store};
//!
//! let store = RocksStore::open("/tmp/device-catalog-db").unwrap();
//!
//! let device = Device::create("Edge 60", "Motorola", DeviceState::Available).unwrap();
//! store.save(&device).unwrap();
//!
//! let page = store.find_all(&DeviceFilter::all(), &PageRequest::default()).unwrap();
//! assert_eq!(page.total_elements, 1);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod keys;
pub mod memory;
pub mod query;
pub mod rocks;
pub mod schema;

pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use query::{DeviceFilter, Page, PageRequest, SortDirection};
pub use rocks::RocksStore;

use device_catalog_core::{Device, DeviceId};

/// The storage trait defining all database operations.
///
/// This trait abstracts the storage layer, allowing for different implementations
/// (e.g., `RocksDB`, in-memory for testing).
pub trait Store: Send + Sync {
    /// Insert or update a device record.
    ///
    /// This also maintains the identity index.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::DuplicateIdentity` if another device already holds
    /// the same `(name, brand)` pair, or an error if the database operation fails.
    fn save(&self, device: &Device) -> Result<()>;

    /// Get a device by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn find_by_id(&self, device_id: &DeviceId) -> Result<Option<Device>>;

    /// Find the devices holding an exact `(name, brand)` identity.
    ///
    /// The uniqueness invariant means at most one device is returned.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn find_by_name_and_brand(&self, name: &str, brand: &str) -> Result<Vec<Device>>;

    /// Read the current record, let `change` mutate it, and write it back.
    ///
    /// The read, `change` and the write happen under the store's write lock,
    /// so `change` sees the latest committed record and no other writer can
    /// commit in between. Nothing is written if `change` fails.
    ///
    /// `change` must not call back into the store.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` (converted into `E`) if the device
    /// doesn't exist, the error returned by `change`, or
    /// `StoreError::DuplicateIdentity` if the changed identity is taken.
    fn modify<F, E>(&self, device_id: &DeviceId, change: F) -> std::result::Result<Device, E>
    where
        F: FnOnce(&mut Device) -> std::result::Result<(), E>,
        E: From<StoreError>;

    /// Delete a device by ID.
    ///
    /// This also removes the device from the identity index.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the device doesn't exist.
    fn delete(&self, device_id: &DeviceId) -> Result<()>;

    /// Delete a device if `guard` accepts its current record.
    ///
    /// `guard` runs under the store's write lock against the latest committed
    /// record and must not call back into the store. Returns the removed device.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` (converted into `E`) if the device
    /// doesn't exist, or the error returned by `guard`.
    fn delete_if<F, E>(&self, device_id: &DeviceId, guard: F) -> std::result::Result<Device, E>
    where
        F: FnOnce(&Device) -> std::result::Result<(), E>,
        E: From<StoreError>;

    /// Return one page of the devices matching `filter`, in catalog order.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn find_all(&self, filter: &DeviceFilter, page: &PageRequest) -> Result<Page<Device>>;

    /// Count all stored devices.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn count(&self) -> Result<u64>;
}
