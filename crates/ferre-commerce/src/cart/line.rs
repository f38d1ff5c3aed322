//! Cart line items.

use crate::catalog::WeightClass;
use crate::ids::{ProductId, VendorId};
use crate::money::Money;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

/// Pricing mode of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    /// Per-item price, shopper-chosen quantity.
    #[default]
    Unit,
    /// Fixed bundle price and quantity.
    Bulk,
}

impl Tier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Unit => "unit",
            Tier::Bulk => "bulk",
        }
    }

    pub fn is_bulk(&self) -> bool {
        matches!(self, Tier::Bulk)
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity of a line within a cart.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LineKey {
    pub product_id: ProductId,
    pub vendor_id: VendorId,
    pub tier: Tier,
}

impl LineKey {
    pub fn new(product_id: impl Into<ProductId>, vendor_id: impl Into<VendorId>, tier: Tier) -> Self {
        Self {
            product_id: product_id.into(),
            vendor_id: vendor_id.into(),
            tier,
        }
    }
}

impl fmt::Display for LineKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{} ({})", self.product_id, self.vendor_id, self.tier)
    }
}

/// One priced selection in a cart.
///
/// Every field defaults so that a client-held snapshot with holes still
/// deserializes; the validator reports the holes as defects.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct CartLineItem {
    pub product_id: ProductId,
    pub vendor_id: VendorId,
    pub tier: Tier,
    /// Price actually charged: unit price, or bundle price for bulk lines.
    #[serde(deserialize_with = "lenient_price")]
    pub price: Money,
    /// Units requested.
    #[serde(deserialize_with = "lenient_quantity")]
    pub quantity: i64,
    /// Units per bundle, recorded for bulk lines at pricing time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bundle_size: Option<i64>,
    /// Display copies taken when the line was priced. Not authoritative.
    pub name: String,
    pub brand: String,
    pub image: String,
    pub weight_class: WeightClass,
}

impl CartLineItem {
    pub fn key(&self) -> LineKey {
        LineKey {
            product_id: self.product_id.clone(),
            vendor_id: self.vendor_id.clone(),
            tier: self.tier,
        }
    }

    pub fn matches(&self, key: &LineKey) -> bool {
        self.tier == key.tier && self.product_id == key.product_id && self.vendor_id == key.vendor_id
    }

    /// Number of times `price` is charged.
    ///
    /// Unit lines are charged per unit. Bulk lines are charged per started
    /// bundle; a bulk line without a recorded bundle size is charged per unit.
    pub fn billable_units(&self) -> i64 {
        match (self.tier, self.bundle_size) {
            (Tier::Bulk, Some(size)) if size > 0 => {
                if self.quantity <= 0 {
                    0
                } else {
                    self.quantity / size + i64::from(self.quantity % size != 0)
                }
            }
            _ => self.quantity,
        }
    }

    /// Amount charged for this line.
    pub fn line_total(&self) -> Money {
        self.price.saturating_multiply(self.billable_units())
    }

    #[must_use]
    pub fn with_quantity(mut self, quantity: i64) -> Self {
        self.quantity = quantity;
        self
    }

    #[must_use]
    pub fn with_price(mut self, price: Money) -> Self {
        self.price = price;
        self
    }
}

/// Read a price, mapping null or non-numeric values to zero so the line
/// is reported as InvalidPrice instead of failing the whole snapshot.
fn lenient_price<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Money, D::Error> {
    let amount = match Value::deserialize(deserializer)? {
        Value::Number(n) => n.to_string().parse().ok(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    };
    Ok(amount.unwrap_or_default())
}

/// Read a quantity, mapping fractional or non-numeric values to zero so the
/// line is reported as InvalidQuantity.
fn lenient_quantity<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    let quantity = match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                .map(|f| f as i64)
        }),
        _ => None,
    };
    Ok(quantity.unwrap_or(0))
}
