//! The device entity and its lifecycle state machine.
//!
//! # State Machine
//!
//! ```text
//!        ┌─────────────┐          ┌─────────────┐
//!        │  AVAILABLE  │◄────────►│  INACTIVE   │
//!        └──────┬──────┘          └──────┬──────┘
//!               │  ▲                  ▲  │
//!               ▼  │                  │  ▼
//!        ┌─────────┴──────────────────┴────┐
//!        │             IN_USE              │  (locked)
//!        └─────────────────────────────────┘
//! ```
//!
//! Every state can follow every other. What the state machine restricts is
//! everything *else*: while a device is `IN_USE` its name and brand are frozen
//! and it cannot be deleted.
//!
//! Fields are private. A `Device` is only changed through [`Device::rename`],
//! [`Device::rebrand`] and [`Device::change_state`], so the lock cannot be
//! bypassed. Deserialized records pass the same identity checks as
//! [`Device::create`].

use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::ids::DeviceId;

/// Accepted character length for `name` and `brand`.
pub const IDENTITY_FIELD_LEN: RangeInclusive<usize> = 3..=50;

/// Lifecycle states for a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeviceState {
    /// Free to be assigned.
    #[default]
    Available,
    /// Assigned and in use. Locks the device.
    InUse,
    /// Retired or out of service.
    Inactive,
}

impl DeviceState {
    /// All states, in declaration order.
    pub const ALL: [Self; 3] = [Self::Available, Self::InUse, Self::Inactive];

    /// The canonical upper-case name used on the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Available => "AVAILABLE",
            Self::InUse => "IN_USE",
            Self::Inactive => "INACTIVE",
        }
    }

    /// Returns true if a device in this state is locked.
    #[must_use]
    pub const fn is_locking(self) -> bool {
        matches!(self, Self::InUse)
    }
}

impl fmt::Display for DeviceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeviceState {
    type Err = CoreError;

    /// Parse a state from its wire name. Matching is case-sensitive.
    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|state| state.as_str() == s)
            .ok_or_else(|| CoreError::InvalidFieldValue {
                field: "state",
                value: s.to_string(),
            })
    }
}

/// A physical device in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "DeviceRecord")]
pub struct Device {
    id: DeviceId,
    name: String,
    brand: String,
    state: DeviceState,
    created_at: DateTime<Utc>,
}

impl Device {
    /// Create a new device with a fresh ID and the current time.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidFieldValue` if `name` or `brand` is blank
    /// or not 3 to 50 characters long.
    pub fn create(
        name: impl Into<String>,
        brand: impl Into<String>,
        state: DeviceState,
    ) -> Result<Self> {
        Self::create_at(name, brand, state, Utc::now())
    }

    /// Create a new device with an explicit creation time.
    ///
    /// Used when importing records whose creation time is already known.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidFieldValue` if `name` or `brand` is blank
    /// or not 3 to 50 characters long.
    pub fn create_at(
        name: impl Into<String>,
        brand: impl Into<String>,
        state: DeviceState,
        created_at: DateTime<Utc>,
    ) -> Result<Self> {
        let name = identity_field("name", name.into())?;
        let brand = identity_field("brand", brand.into())?;

        Ok(Self {
            id: DeviceId::generate(),
            name,
            brand,
            state,
            created_at,
        })
    }

    /// Unique identifier.
    #[must_use]
    pub const fn id(&self) -> DeviceId {
        self.id
    }

    /// Human-readable model name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Manufacturer.
    #[must_use]
    pub fn brand(&self) -> &str {
        &self.brand
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> DeviceState {
        self.state
    }

    /// Creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns true if the device is in use and therefore locked.
    #[must_use]
    pub const fn is_locked(&self) -> bool {
        self.state.is_locking()
    }

    /// Change the device name.
    ///
    /// Callers should skip the call when the value is unchanged: a locked
    /// device rejects even a same-value rename.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidFieldValue` if the name is blank or out of
    /// length, or
    /// `CoreError::UpdateOnLock` if the device is locked.
    pub fn rename(&mut self, name: impl Into<String>) -> Result<()> {
        let name = self.check_identity_update("name", name.into())?;
        self.name = name;
        Ok(())
    }

    /// Change the device brand.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidFieldValue` if the brand is blank or out of
    /// length, or
    /// `CoreError::UpdateOnLock` if the device is locked.
    pub fn rebrand(&mut self, brand: impl Into<String>) -> Result<()> {
        let brand = self.check_identity_update("brand", brand.into())?;
        self.brand = brand;
        Ok(())
    }

    /// Move the device to another state. Always permitted.
    pub fn change_state(&mut self, state: DeviceState) {
        self.state = state;
    }

    /// Move the device to the state named by `state`.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidFieldValue` if `state` is not one of
    /// `AVAILABLE`, `IN_USE` or `INACTIVE`.
    pub fn change_state_str(&mut self, state: &str) -> Result<()> {
        self.change_state(state.parse()?);
        Ok(())
    }

    /// Check that the device may be deleted.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::DeleteOnLock` if the device is locked.
    pub fn ensure_deletable(&self) -> Result<()> {
        if self.is_locked() {
            return Err(CoreError::DeleteOnLock(self.id));
        }
        Ok(())
    }

    fn check_identity_update(&self, field: &'static str, value: String) -> Result<String> {
        let value = identity_field(field, value)?;
        if self.is_locked() {
            return Err(CoreError::UpdateOnLock {
                device_id: self.id,
                field,
            });
        }
        Ok(value)
    }
}

fn identity_field(field: &'static str, value: String) -> Result<String> {
    if value.trim().is_empty() || !IDENTITY_FIELD_LEN.contains(&value.chars().count()) {
        return Err(CoreError::InvalidFieldValue { field, value });
    }
    Ok(value)
}

/// Unchecked serialized form of a [`Device`].
#[derive(Deserialize)]
struct DeviceRecord {
    id: DeviceId,
    name: String,
    brand: String,
    state: DeviceState,
    created_at: DateTime<Utc>,
}

impl TryFrom<DeviceRecord> for Device {
    type Error = CoreError;

    fn try_from(record: DeviceRecord) -> Result<Self> {
        Ok(Self {
            id: record.id,
            name: identity_field("name", record.name)?,
            brand: identity_field("brand", record.brand)?,
            state: record.state,
            created_at: record.created_at,
        })
    }
}
