//! Device service implementation.
//!
//! This module provides the `DeviceService` trait and the
//! `DeviceCatalogService` implementation that coordinates identity
//! validation, lock guards and persistence.

use std::sync::Arc;

use async_trait::async_trait;
use device_catalog_core::{CoreError, Device, DeviceId, DeviceState};
use device_catalog_store::{PageRequest, SortDirection, Store, StoreError};

use crate::error::{Result, ServiceError};
use crate::filter::DeviceFilterBuilder;
use crate::identity;
use crate::types::{
    CreateDeviceRequest, DevicePage, DeviceResponse, ListDevicesQuery, PatchDeviceRequest,
    ServiceConfig, UpdateDeviceRequest,
};

/// Trait defining the device catalog operations.
#[async_trait]
pub trait DeviceService: Send + Sync {
    /// Create a new device.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::InvalidFieldValue` for an unknown state,
    /// `ServiceError::InvalidNullValue` for an empty name or brand, and
    /// `ServiceError::DuplicatedValues` if the identity is taken.
    async fn create(&self, request: CreateDeviceRequest) -> Result<DeviceResponse>;

    /// Replace every field of a device.
    ///
    /// A name or brand equal to the stored value is skipped, so a full update
    /// that keeps the identity may still change the state of an `IN_USE`
    /// device, including back to `AVAILABLE`.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::DeviceNotFound` if the device doesn't exist,
    /// `ServiceError::UpdateOnLock` if an identity field changes on a locked
    /// device, and the validation errors of [`DeviceService::create`].
    async fn update(&self, device_id: &DeviceId, request: UpdateDeviceRequest)
        -> Result<DeviceResponse>;

    /// Change only the fields that are present and non-empty.
    ///
    /// # Errors
    ///
    /// Same as [`DeviceService::update`].
    async fn patch(&self, device_id: &DeviceId, request: PatchDeviceRequest)
        -> Result<DeviceResponse>;

    /// Get a device by ID.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::DeviceNotFound` if the device doesn't exist.
    async fn get_one(&self, device_id: &DeviceId) -> Result<DeviceResponse>;

    /// List one page of devices matching the query.
    async fn get_all(&self, query: ListDevicesQuery) -> Result<DevicePage>;

    /// Delete a device.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::DeviceNotFound` if the device doesn't exist, or
    /// `ServiceError::DeleteOnLock` if it is in use.
    async fn delete(&self, device_id: &DeviceId) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UpdateMode {
    Full,
    Partial,
}

/// The main device service implementation.
pub struct DeviceCatalogService<S: Store> {
    store: Arc<S>,
    config: ServiceConfig,
}

impl<S: Store> DeviceCatalogService<S> {
    /// Create a new device service.
    #[must_use]
    pub fn new(store: Arc<S>, config: ServiceConfig) -> Self {
        Self { store, config }
    }

    /// Create with default configuration.
    #[must_use]
    pub fn with_defaults(store: Arc<S>) -> Self {
        Self::new(store, ServiceConfig::default())
    }

    /// Get a reference to the store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Get the configuration.
    #[must_use]
    pub const fn config(&self) -> &ServiceConfig {
        &self.config
    }

    fn load(&self, device_id: &DeviceId) -> Result<Device> {
        self.store
            .find_by_id(device_id)?
            .ok_or(ServiceError::DeviceNotFound(*device_id))
    }

    /// Apply an update and write it once every guard passed.
    ///
    /// The duplicate lookup runs first against a snapshot so callers get a
    /// precise error. The lock guards then run again inside
    /// [`Store::modify`] against the latest record, where the store's unique
    /// index also re-checks the identity before the write.
    fn apply_update(
        &self,
        device_id: &DeviceId,
        name: Option<String>,
        brand: Option<String>,
        state: Option<String>,
        mode: UpdateMode,
    ) -> Result<Device> {
        let current = self.load(device_id)?;

        let (name, brand, state) = match mode {
            UpdateMode::Full => (
                Some(required("name", name)?),
                Some(required("brand", brand)?),
                Some(required("state", state)?),
            ),
            UpdateMode::Partial => (present(name), present(brand), present(state)),
        };
        let state = state.map(|s| s.parse::<DeviceState>()).transpose()?;

        let new_name = name.filter(|n| n != current.name());
        let new_brand = brand.filter(|b| b != current.brand());

        if new_name.is_some() || new_brand.is_some() {
            identity::validate_duplicates(
                &*self.store,
                Some(device_id),
                new_name.as_deref().unwrap_or(current.name()),
                new_brand.as_deref().unwrap_or(current.brand()),
            )?;
        }

        self.store
            .modify(device_id, |device| {
                if let Some(name) = new_name.filter(|n| n != device.name()) {
                    device.rename(name).inspect_err(log_lock_rejection)?;
                }
                if let Some(brand) = new_brand.filter(|b| b != device.brand()) {
                    device.rebrand(brand).inspect_err(log_lock_rejection)?;
                }
                if let Some(state) = state {
                    device.change_state(state);
                }
                Ok::<_, ServiceError>(())
            })
            .map_err(|e| missing_as_not_found(e, device_id))
    }
}

/// Report a record that vanished under a writer as the missing device.
fn missing_as_not_found(err: ServiceError, device_id: &DeviceId) -> ServiceError {
    match err {
        ServiceError::Store(StoreError::NotFound) => ServiceError::DeviceNotFound(*device_id),
        other => other,
    }
}

fn required(field: &'static str, value: Option<String>) -> Result<String> {
    present(value).ok_or(ServiceError::InvalidNullValue { field })
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn log_lock_rejection(err: &CoreError) {
    if let CoreError::UpdateOnLock { device_id, field } = err {
        tracing::warn!(device_id = %device_id, field = *field, "Rejected update on locked device");
    }
}

#[async_trait]
impl<S: Store + 'static> DeviceService for DeviceCatalogService<S> {
    async fn create(&self, request: CreateDeviceRequest) -> Result<DeviceResponse> {
        let state = present(request.state)
            .map(|s| s.parse::<DeviceState>())
            .transpose()?
            .unwrap_or_default();

        identity::validate_identification(&*self.store, &request.name, &request.brand)?;

        let device = Device::create(request.name, request.brand, state)?;
        self.store.save(&device)?;

        tracing::info!(
            device_id = %device.id(),
            brand = %device.brand(),
            state = ?device.state(),
            "Created device"
        );

        Ok(device.into())
    }

    async fn update(
        &self,
        device_id: &DeviceId,
        request: UpdateDeviceRequest,
    ) -> Result<DeviceResponse> {
        let device = self.apply_update(
            device_id,
            Some(request.name),
            Some(request.brand),
            Some(request.state),
            UpdateMode::Full,
        )?;

        tracing::info!(
            device_id = %device_id,
            brand = %device.brand(),
            state = ?device.state(),
            "Updated device"
        );

        Ok(device.into())
    }

    async fn patch(
        &self,
        device_id: &DeviceId,
        request: PatchDeviceRequest,
    ) -> Result<DeviceResponse> {
        let device = self.apply_update(
            device_id,
            request.name,
            request.brand,
            request.state,
            UpdateMode::Partial,
        )?;

        tracing::info!(
            device_id = %device_id,
            brand = %device.brand(),
            state = ?device.state(),
            "Patched device"
        );

        Ok(device.into())
    }

    async fn get_one(&self, device_id: &DeviceId) -> Result<DeviceResponse> {
        let device = self.load(device_id)?;
        tracing::debug!(device_id = %device_id, "Located device");
        Ok(device.into())
    }

    async fn get_all(&self, query: ListDevicesQuery) -> Result<DevicePage> {
        let state = present(query.state)
            .map(|s| s.parse::<DeviceState>())
            .transpose()?;

        let filter = DeviceFilterBuilder::new()
            .name(query.name.as_deref())
            .brand(query.brand.as_deref())
            .state(state)
            .created_after(query.created_after)
            .created_before(query.created_before)
            .build();

        let size = query
            .size
            .unwrap_or(self.config.default_page_size)
            .clamp(1, self.config.max_page_size.max(1));
        let request = PageRequest::new(
            query.page,
            size,
            SortDirection::from_ascending(query.ascending),
        );

        let page = self.store.find_all(&filter, &request)?;

        tracing::debug!(
            clauses = filter.len(),
            page = request.page,
            size = request.size,
            total = page.total_elements,
            "Listed devices"
        );

        Ok(page.map(DeviceResponse::from).into())
    }

    async fn delete(&self, device_id: &DeviceId) -> Result<()> {
        let device = self
            .store
            .delete_if(device_id, |device| {
                device.ensure_deletable().map_err(|err| {
                    tracing::warn!(
                        device_id = %device_id,
                        brand = %device.brand(),
                        "Rejected delete of locked device"
                    );
                    ServiceError::from(err)
                })
            })
            .map_err(|e| missing_as_not_found(e, device_id))?;

        tracing::info!(device_id = %device_id, brand = %device.brand(), "Deleted device");

        Ok(())
    }
}
