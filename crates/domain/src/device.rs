//! Device addressing: which lighting device the controller drives.

use serde::{Deserialize, Serialize};

/// USB identifiers of the lighting device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeviceAddress {
    pub vendor_id: u16,
    /// When absent, the first device of the vendor is used.
    pub product_id: Option<u16>,
}

impl DeviceAddress {
    #[must_use]
    pub fn new(vendor_id: u16, product_id: Option<u16>) -> Self {
        Self {
            vendor_id,
            product_id,
        }
    }
}

impl std::fmt::Display for DeviceAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.product_id {
            Some(pid) => write!(f, "{:04x}:{pid:04x}", self.vendor_id),
            None => write!(f, "{:04x}:*", self.vendor_id),
        }
    }
}
