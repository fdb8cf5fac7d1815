//! In-memory storage implementation.
//!
//! Keeps every device in a map behind a single lock. Nothing survives the
//! process, which makes it the store of choice for tests and throwaway runs.

use std::collections::HashMap;

use device_catalog_core::{Device, DeviceId};
use parking_lot::RwLock;

use crate::error::{Result, StoreError};
use crate::query::{paginate, DeviceFilter, Page, PageRequest};
use crate::Store;

#[derive(Debug, Default)]
struct Tables {
    devices: HashMap<DeviceId, Device>,
    by_identity: HashMap<(String, String), DeviceId>,
}

/// A `Store` backed by process memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    /// Create a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn identity(device: &Device) -> (String, String) {
    (device.name().to_string(), device.brand().to_string())
}

impl Tables {
    /// Insert or replace `device`, keeping the identity index in step.
    fn put(&mut self, device: &Device) -> Result<()> {
        let key = identity(device);

        if let Some(&existing) = self.by_identity.get(&key) {
            if existing != device.id() {
                return Err(StoreError::DuplicateIdentity {
                    name: key.0,
                    brand: key.1,
                    existing,
                });
            }
        }

        if let Some(old) = self.devices.insert(device.id(), device.clone()) {
            let old_key = identity(&old);
            if old_key != key {
                self.by_identity.remove(&old_key);
            }
        }
        self.by_identity.insert(key, device.id());

        Ok(())
    }

    fn remove(&mut self, device_id: &DeviceId) -> Option<Device> {
        let device = self.devices.remove(device_id)?;
        self.by_identity.remove(&identity(&device));
        Some(device)
    }
}

impl Store for MemoryStore {
    fn save(&self, device: &Device) -> Result<()> {
        self.tables.write().put(device)
    }

    fn modify<F, E>(&self, device_id: &DeviceId, change: F) -> std::result::Result<Device, E>
    where
        F: FnOnce(&mut Device) -> std::result::Result<(), E>,
        E: From<StoreError>,
    {
        let mut tables = self.tables.write();
        let mut device = tables
            .devices
            .get(device_id)
            .cloned()
            .ok_or(StoreError::NotFound)?;

        change(&mut device)?;
        tables.put(&device)?;

        Ok(device)
    }

    fn find_by_id(&self, device_id: &DeviceId) -> Result<Option<Device>> {
        Ok(self.tables.read().devices.get(device_id).cloned())
    }

    fn find_by_name_and_brand(&self, name: &str, brand: &str) -> Result<Vec<Device>> {
        let tables = self.tables.read();
        let key = (name.to_string(), brand.to_string());
        Ok(tables
            .by_identity
            .get(&key)
            .and_then(|id| tables.devices.get(id))
            .cloned()
            .into_iter()
            .collect())
    }

    fn delete(&self, device_id: &DeviceId) -> Result<()> {
        self.tables
            .write()
            .remove(device_id)
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }

    fn delete_if<F, E>(&self, device_id: &DeviceId, guard: F) -> std::result::Result<Device, E>
    where
        F: FnOnce(&Device) -> std::result::Result<(), E>,
        E: From<StoreError>,
    {
        let mut tables = self.tables.write();
        let device = tables.devices.get(device_id).ok_or(StoreError::NotFound)?;
        guard(device)?;

        Ok(tables.remove(device_id).ok_or(StoreError::NotFound)?)
    }

    fn find_all(&self, filter: &DeviceFilter, page: &PageRequest) -> Result<Page<Device>> {
        let matches = self
            .tables
            .read()
            .devices
            .values()
            .filter(|device| filter.matches(device))
            .cloned()
            .collect();
        Ok(paginate(matches, page))
    }

    fn count(&self) -> Result<u64> {
        Ok(self.tables.read().devices.len() as u64)
    }
}
