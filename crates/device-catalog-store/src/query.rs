//! Query contract for listing devices: filter, page request and page.
//!
//! Both store implementations evaluate a [`DeviceFilter`] against each
//! record and then hand the matches to [`paginate`], so ordering and page
//! arithmetic are identical across backends.

use std::cmp::Ordering;
use std::fmt;

use device_catalog_core::Device;
use serde::{Deserialize, Serialize};

/// A single filter clause.
pub type DevicePredicate = Box<dyn Fn(&Device) -> bool + Send + Sync>;

/// A conjunction of predicates over devices.
///
/// An empty filter matches every device.
#[derive(Default)]
pub struct DeviceFilter {
    clauses: Vec<DevicePredicate>,
}

impl DeviceFilter {
    /// A filter that matches every device.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Add a clause. A device must satisfy every clause to match.
    #[must_use]
    pub fn and<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&Device) -> bool + Send + Sync + 'static,
    {
        self.clauses.push(Box::new(predicate));
        self
    }

    /// Returns true if `device` satisfies every clause.
    #[must_use]
    pub fn matches(&self, device: &Device) -> bool {
        self.clauses.iter().all(|clause| clause(device))
    }

    /// Number of clauses.
    #[must_use]
    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    /// Returns true if the filter has no clauses.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }
}

impl fmt::Debug for DeviceFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeviceFilter")
            .field("clauses", &self.clauses.len())
            .finish()
    }
}

/// Sort direction for listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Smallest first.
    #[default]
    Ascending,
    /// Largest first.
    Descending,
}

impl SortDirection {
    /// `Ascending` when `ascending` is true, otherwise `Descending`.
    #[must_use]
    pub const fn from_ascending(ascending: bool) -> Self {
        if ascending {
            Self::Ascending
        } else {
            Self::Descending
        }
    }
}

/// Which page of a listing to return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// Zero-based page index.
    pub page: u32,
    /// Page size. Zero yields empty pages.
    pub size: u32,
    /// Sort direction.
    pub direction: SortDirection,
}

impl PageRequest {
    /// Default page size.
    pub const DEFAULT_SIZE: u32 = 10;

    /// Create a page request.
    #[must_use]
    pub const fn new(page: u32, size: u32, direction: SortDirection) -> Self {
        Self {
            page,
            size,
            direction,
        }
    }

    /// Index of the first item on this page.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.page as usize * self.size as usize
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(0, Self::DEFAULT_SIZE, SortDirection::Ascending)
    }
}

/// One page of results plus the total number of matches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Items on this page.
    pub items: Vec<T>,
    /// Zero-based page index.
    pub page: u32,
    /// Requested page size.
    pub size: u32,
    /// Number of matches across all pages.
    pub total_elements: u64,
}

impl<T> Page<T> {
    /// Map the items, keeping the page metadata.
    #[must_use]
    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            size: self.size,
            total_elements: self.total_elements,
        }
    }

    /// Number of pages needed to hold every match.
    #[must_use]
    pub fn total_pages(&self) -> u64 {
        if self.size == 0 {
            return 0;
        }
        self.total_elements.div_ceil(u64::from(self.size))
    }
}

/// Catalog order: brand, then name, then creation time, then ID.
#[must_use]
pub fn catalog_order(a: &Device, b: &Device) -> Ordering {
    a.brand()
        .cmp(b.brand())
        .then_with(|| a.name().cmp(b.name()))
        .then_with(|| a.created_at().cmp(&b.created_at()))
        .then_with(|| a.id().cmp(&b.id()))
}

/// Sort the matches in catalog order and cut out the requested page.
#[must_use]
pub fn paginate(mut matches: Vec<Device>, request: &PageRequest) -> Page<Device> {
    matches.sort_by(|a, b| match request.direction {
        SortDirection::Ascending => catalog_order(a, b),
        SortDirection::Descending => catalog_order(b, a),
    });

    let total_elements = matches.len() as u64;
    let items = matches
        .into_iter()
        .skip(request.offset())
        .take(request.size as usize)
        .collect();

    Page {
        items,
        page: request.page,
        size: request.size,
        total_elements,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use device_catalog_core::DeviceState;

    fn device(name: &str, brand: &str) -> Device {
        Device::create(name, brand, DeviceState::Available).unwrap()
    }

    #[test]
    fn empty_filter_matches_everything() {
        let filter = DeviceFilter::all();
        assert!(filter.is_empty());
        assert!(filter.matches(&device("Edge 60", "Motorola")));
    }

    #[test]
    fn clauses_are_conjunctive() {
        let filter = DeviceFilter::all()
            .and(|d| d.brand() == "Motorola")
            .and(|d| d.name().starts_with("Edge"));
        assert_eq!(filter.len(), 2);

        assert!(filter.matches(&device("Edge 60", "Motorola")));
        assert!(!filter.matches(&device("Razr 50", "Motorola")));
        assert!(!filter.matches(&device("Edge 60", "Samsung")));
    }

    #[test]
    fn paginate_orders_by_brand_then_name() {
        let devices = vec![
            device("Zeta", "Apple"),
            device("Alpha", "Samsung"),
            device("Alpha", "Apple"),
        ];

        let page = paginate(devices.clone(), &PageRequest::default());
        let names: Vec<_> = page
            .items
            .iter()
            .map(|d| (d.brand(), d.name()))
            .collect();
        assert_eq!(
            names,
            vec![("Apple", "Alpha"), ("Apple", "Zeta"), ("Samsung", "Alpha")]
        );

        let desc = paginate(devices, &PageRequest::new(0, 10, SortDirection::Descending));
        assert_eq!(desc.items[0].brand(), "Samsung");
    }

    #[test]
    fn paginate_slices_and_counts() {
        let devices: Vec<_> = (0..25).map(|i| device(&format!("Model {i:02}"), "Acme")).collect();

        let page = paginate(devices.clone(), &PageRequest::new(2, 10, SortDirection::Ascending));
        assert_eq!(page.items.len(), 5);
        assert_eq!(page.total_elements, 25);
        assert_eq!(page.total_pages(), 3);
        assert_eq!(page.items[0].name(), "Model 20");

        let beyond = paginate(devices, &PageRequest::new(9, 10, SortDirection::Ascending));
        assert!(beyond.items.is_empty());
        assert_eq!(beyond.total_elements, 25);
    }

    #[test]
    fn page_map_keeps_metadata() {
        let page = Page {
            items: vec![1, 2, 3],
            page: 1,
            size: 3,
            total_elements: 7,
        };
        let mapped = page.map(|n| n * 10);
        assert_eq!(mapped.items, vec![10, 20, 30]);
        assert_eq!(mapped.page, 1);
        assert_eq!(mapped.total_elements, 7);
    }
}
