//! Listing filters.
//!
//! [`DeviceFilterBuilder`] turns optional listing criteria into a
//! [`DeviceFilter`]: one predicate per criterion that is present, all of
//! which must hold. The builder only describes the filter; the store runs it.

use chrono::{DateTime, Utc};
use device_catalog_core::DeviceState;
use device_catalog_store::DeviceFilter;

/// Builds a conjunctive [`DeviceFilter`] from optional criteria.
///
/// Absent or blank text criteria add no clause.
#[derive(Debug, Default)]
pub struct DeviceFilterBuilder {
    filter: DeviceFilter,
}

impl DeviceFilterBuilder {
    /// Start with a filter that matches every device.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Case-insensitive substring match on the name.
    #[must_use]
    pub fn name(mut self, name: Option<&str>) -> Self {
        if let Some(needle) = lowercase_needle(name) {
            self.filter = self
                .filter
                .and(move |device| device.name().to_lowercase().contains(&needle));
        }
        self
    }

    /// Case-insensitive substring match on the brand.
    #[must_use]
    pub fn brand(mut self, brand: Option<&str>) -> Self {
        if let Some(needle) = lowercase_needle(brand) {
            self.filter = self
                .filter
                .and(move |device| device.brand().to_lowercase().contains(&needle));
        }
        self
    }

    /// Exact state match.
    #[must_use]
    pub fn state(mut self, state: Option<DeviceState>) -> Self {
        if let Some(state) = state {
            self.filter = self.filter.and(move |device| device.state() == state);
        }
        self
    }

    /// Inclusive lower bound on the creation time.
    #[must_use]
    pub fn created_after(mut self, after: Option<DateTime<Utc>>) -> Self {
        if let Some(after) = after {
            self.filter = self.filter.and(move |device| device.created_at() >= after);
        }
        self
    }

    /// Inclusive upper bound on the creation time.
    #[must_use]
    pub fn created_before(mut self, before: Option<DateTime<Utc>>) -> Self {
        if let Some(before) = before {
            self.filter = self.filter.and(move |device| device.created_at() <= before);
        }
        self
    }

    /// Finish the filter.
    #[must_use]
    pub fn build(self) -> DeviceFilter {
        self.filter
    }
}

fn lowercase_needle(value: Option<&str>) -> Option<String> {
    value
        .filter(|v| !v.trim().is_empty())
        .map(str::to_lowercase)
}
