//! Vendor (ferretería) records.

use crate::ids::VendorId;
use serde::{Deserialize, Serialize};

/// A hardware store selling through the storefront.
///
/// Only `id` and `name` matter to pricing; the rest is shown to shoppers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Vendor {
    pub id: VendorId,
    pub name: String,
    #[serde(default)]
    pub location: Option<String>,
    /// Delivery window shown to shoppers (e.g. "2-4 horas").
    #[serde(default)]
    pub delivery_time: Option<String>,
    #[serde(default)]
    pub verified: bool,
    #[serde(default)]
    pub rating: f32,
}

impl Vendor {
    pub fn new(id: impl Into<VendorId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            location: None,
            delivery_time: None,
            verified: false,
            rating: 0.0,
        }
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_delivery_time(mut self, window: impl Into<String>) -> Self {
        self.delivery_time = Some(window.into());
        self
    }

    pub fn verified(mut self) -> Self {
        self.verified = true;
        self
    }
}
