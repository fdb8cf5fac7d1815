//! Demo catalog.
//!
//! A fixed set of phones used to populate an empty catalog for local runs.

use crate::error::{Result, ServiceError};
use crate::service::DeviceService;
use crate::types::CreateDeviceRequest;

/// `(name, brand)` pairs of the demo catalog, grouped by brand.
pub const DEMO_CATALOG: &[(&str, &str)] = &[
    ("Evolve", "BlackBerry"),
    ("keyone", "BlackBerry"),
    ("Leap", "BlackBerry"),
    ("Passport", "BlackBerry"),
    ("R600", "Ericsson"),
    ("T36", "Ericsson"),
    ("A2618", "Ericsson"),
    ("R380", "Ericsson"),
    ("Moto G57", "Motorola"),
    ("Moto Pad 60 Neo", "Motorola"),
    ("G96", "Motorola"),
    ("Edge 60", "Motorola"),
    ("3210", "Nokia"),
    ("C300", "Nokia"),
    ("XR21", "Nokia"),
    ("G400", "Nokia"),
    ("Poco F8 Ultra", "Xiaomi"),
    ("Poco Pad X1", "Xiaomi"),
    ("Redmi K90", "Xiaomi"),
    ("Pad 8 Pro", "Xiaomi"),
    ("Galaxy M17", "Samsung"),
    ("Galaxy A26", "Samsung"),
    ("Galaxy ZFold7", "Samsung"),
    ("PGalaxy Tab S11", "Samsung"),
    ("IPhone 17", "Apple"),
    ("IPhone Air", "Apple"),
    ("IPhone 16 Pro", "Apple"),
    ("IPad Air 13", "Apple"),
    ("Xperia 1 V", "Sony"),
    ("Xperia 10", "Sony"),
    ("Xperia L2", "Sony"),
    ("Xperia XA1 Ultra", "Sony"),
    ("9600", "Qtek"),
    ("A9100", "Qtek"),
    ("8020", "Qtek"),
    ("S100", "Qtek"),
    ("Pad Pro", "OnePlus"),
    ("Ace 3V", "OnePlus"),
    ("13T", "OnePlus"),
    ("OnePlus 15", "OnePlus"),
    ("Mate X7", "Huawei"),
    ("nova 14 Lite", "Huawei"),
    ("Pura 80 Pro+", "Huawei"),
    ("Nova Y73", "Huawei"),
    ("W31", "LG Electronics"),
    ("K42", "LG Electronics"),
    ("Q31", "LG Electronics"),
    ("Velvet", "LG Electronics"),
    ("A62", "Alcatel"),
    ("Alcatel 1B", "Alcatel"),
    ("3T 8", "Alcatel"),
    ("Tetra", "Alcatel"),
    ("GSmart M3447", "Gigabyte"),
    ("GSmart i350", "Gigabyte"),
    ("GSmart Simba SX1", "Gigabyte"),
    ("GSmart Aku A1", "Gigabyte"),
    ("M800", "Mitsubishi"),
    ("Trium Eclipse", "Mitsubishi"),
    ("Trium Mars", "Mitsubishi"),
    ("M520", "Mitsubishi"),
    ("Pixi", "Palm"),
    ("Treo Pro", "Palm"),
    ("Pre 2", "Palm"),
    ("Centro", "Palm"),
    ("A31", "Siemens"),
    ("S75", "Siemens"),
    ("CX75", "Siemens"),
    ("SL65", "Siemens"),
];

/// Insert every demo device as `AVAILABLE`, skipping identities that exist.
///
/// Returns the number of devices inserted.
///
/// # Errors
///
/// Returns the first error other than a duplicate identity.
pub async fn load_demo_catalog<D: DeviceService + ?Sized>(service: &D) -> Result<usize> {
    let mut inserted = 0;

    for &(name, brand) in DEMO_CATALOG {
        match service.create(CreateDeviceRequest::new(name, brand)).await {
            Ok(_) => inserted += 1,
            Err(ServiceError::DuplicatedValues { .. }) => {}
            Err(e) => return Err(e),
        }
    }

    tracing::info!(
        inserted,
        skipped = DEMO_CATALOG.len() - inserted,
        "Loaded demo catalog"
    );

    Ok(inserted)
}
