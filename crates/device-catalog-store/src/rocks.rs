//! `RocksDB` storage implementation.
//!
//! This module provides the `RocksStore` implementation of the `Store` trait.

use std::path::Path;
use std::sync::Arc;

use device_catalog_core::{Device, DeviceId};
use parking_lot::Mutex;
use rocksdb::{
    BoundColumnFamily, ColumnFamilyDescriptor, DBWithThreadMode, IteratorMode, MultiThreaded,
    Options, WriteBatch,
};

use crate::error::{Result, StoreError};
use crate::keys;
use crate::query::{paginate, DeviceFilter, Page, PageRequest};
use crate::schema::{all_column_families, cf};
use crate::Store;

/// RocksDB-backed storage implementation.
pub struct RocksStore {
    db: Arc<DBWithThreadMode<MultiThreaded>>,
    /// Held by every write. Read-check-write sequences such as `modify`
    /// and `delete_if` run under a single hold.
    write_lock: Mutex<()>,
}

impl RocksStore {
    /// Open or create a `RocksDB` database at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or created.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_descriptors: Vec<_> = all_column_families()
            .into_iter()
            .map(|name| ColumnFamilyDescriptor::new(name, Options::default()))
            .collect();

        let db = DBWithThreadMode::open_cf_descriptors(&opts, path.as_ref(), cf_descriptors)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        tracing::debug!(path = %path.as_ref().display(), "Opened device store");

        Ok(Self {
            db: Arc::new(db),
            write_lock: Mutex::new(()),
        })
    }

    /// Get a column family handle.
    fn cf(&self, name: &str) -> Result<Arc<BoundColumnFamily<'_>>> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| StoreError::Database(format!("column family not found: {name}")))
    }

    /// Serialize a value using CBOR.
    fn serialize<T: serde::Serialize>(value: &T) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        ciborium::into_writer(value, &mut buf)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        Ok(buf)
    }

    /// Deserialize a value from CBOR.
    fn deserialize<T: serde::de::DeserializeOwned>(data: &[u8]) -> Result<T> {
        ciborium::from_reader(data).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    /// Look up the holder of an identity in the index.
    fn identity_holder(&self, name: &str, brand: &str) -> Result<Option<DeviceId>> {
        let cf = self.cf(cf::DEVICES_BY_IDENTITY)?;
        self.db
            .get_cf(&cf, keys::identity_key(name, brand))
            .map_err(|e| StoreError::Database(e.to_string()))?
            .map(|value| keys::device_id_from_index_value(&value))
            .transpose()
    }

    /// Write `device` over `previous`, keeping the identity index in step.
    ///
    /// Callers must hold `write_lock`.
    fn put_locked(&self, device: &Device, previous: Option<&Device>) -> Result<()> {
        let cf_devices = self.cf(cf::DEVICES)?;
        let cf_by_identity = self.cf(cf::DEVICES_BY_IDENTITY)?;

        if let Some(existing) = self.identity_holder(device.name(), device.brand())? {
            if existing != device.id() {
                return Err(StoreError::DuplicateIdentity {
                    name: device.name().to_string(),
                    brand: device.brand().to_string(),
                    existing,
                });
            }
        }

        let device_key = keys::device_key(&device.id());
        let identity_key = keys::identity_key(device.name(), device.brand());
        let value = Self::serialize(device)?;

        let mut batch = WriteBatch::default();
        batch.put_cf(&cf_devices, &device_key, &value);

        if let Some(old) = previous.map(|old| keys::identity_key(old.name(), old.brand())) {
            if old != identity_key {
                batch.delete_cf(&cf_by_identity, &old);
            }
        }
        batch.put_cf(&cf_by_identity, &identity_key, &device_key);

        self.db
            .write(batch)
            .map_err(|e| StoreError::Database(e.to_string()))
    }

    /// Remove `device` and its identity entry.
    ///
    /// Callers must hold `write_lock`.
    fn remove_locked(&self, device: &Device) -> Result<()> {
        let cf_devices = self.cf(cf::DEVICES)?;
        let cf_by_identity = self.cf(cf::DEVICES_BY_IDENTITY)?;

        let mut batch = WriteBatch::default();
        batch.delete_cf(&cf_devices, keys::device_key(&device.id()));
        batch.delete_cf(
            &cf_by_identity,
            keys::identity_key(device.name(), device.brand()),
        );

        self.db
            .write(batch)
            .map_err(|e| StoreError::Database(e.to_string()))
    }
}

impl Store for RocksStore {
    fn save(&self, device: &Device) -> Result<()> {
        let _guard = self.write_lock.lock();
        let previous = self.find_by_id(&device.id())?;
        self.put_locked(device, previous.as_ref())
    }

    fn modify<F, E>(&self, device_id: &DeviceId, change: F) -> std::result::Result<Device, E>
    where
        F: FnOnce(&mut Device) -> std::result::Result<(), E>,
        E: From<StoreError>,
    {
        let _guard = self.write_lock.lock();
        let previous = self.find_by_id(device_id)?.ok_or(StoreError::NotFound)?;

        let mut device = previous.clone();
        change(&mut device)?;
        self.put_locked(&device, Some(&previous))?;

        Ok(device)
    }

    fn find_by_id(&self, device_id: &DeviceId) -> Result<Option<Device>> {
        let cf = self.cf(cf::DEVICES)?;
        let key = keys::device_key(device_id);

        self.db
            .get_cf(&cf, key)
            .map_err(|e| StoreError::Database(e.to_string()))?
            .map(|data| Self::deserialize(&data))
            .transpose()
    }

    fn find_by_name_and_brand(&self, name: &str, brand: &str) -> Result<Vec<Device>> {
        let Some(device_id) = self.identity_holder(name, brand)? else {
            return Ok(Vec::new());
        };
        Ok(self.find_by_id(&device_id)?.into_iter().collect())
    }

    fn delete(&self, device_id: &DeviceId) -> Result<()> {
        let _guard = self.write_lock.lock();
        let device = self.find_by_id(device_id)?.ok_or(StoreError::NotFound)?;
        self.remove_locked(&device)
    }

    fn delete_if<F, E>(&self, device_id: &DeviceId, guard: F) -> std::result::Result<Device, E>
    where
        F: FnOnce(&Device) -> std::result::Result<(), E>,
        E: From<StoreError>,
    {
        let _guard = self.write_lock.lock();
        let device = self.find_by_id(device_id)?.ok_or(StoreError::NotFound)?;

        guard(&device)?;
        self.remove_locked(&device)?;

        Ok(device)
    }

    fn find_all(&self, filter: &DeviceFilter, page: &PageRequest) -> Result<Page<Device>> {
        let cf = self.cf(cf::DEVICES)?;

        let mut matches = Vec::new();
        for item in self.db.iterator_cf(&cf, IteratorMode::Start) {
            let (_, value) = item.map_err(|e| StoreError::Database(e.to_string()))?;
            let device: Device = Self::deserialize(&value)?;
            if filter.matches(&device) {
                matches.push(device);
            }
        }

        Ok(paginate(matches, page))
    }

    fn count(&self) -> Result<u64> {
        let cf = self.cf(cf::DEVICES)?;

        let mut count = 0u64;
        for item in self.db.iterator_cf(&cf, IteratorMode::Start) {
            item.map_err(|e| StoreError::Database(e.to_string()))?;
            count += 1;
        }

        Ok(count)
    }
}
