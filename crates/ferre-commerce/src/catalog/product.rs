//! Product and vendor offer types.

use crate::ids::{ProductId, VendorId};
use crate::money::Money;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Weight class driving delivery fee selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum WeightClass {
    /// Hand-carried items (screws, tools).
    #[default]
    Small,
    /// Items delivered by truck (cement bags).
    Heavy,
}

impl WeightClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            WeightClass::Small => "small",
            WeightClass::Heavy => "heavy",
        }
    }

    pub fn is_heavy(&self) -> bool {
        matches!(self, WeightClass::Heavy)
    }
}

impl fmt::Display for WeightClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A product in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    /// Unique product identifier.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    pub brand: String,
    pub category: String,
    /// Weight class for delivery.
    #[serde(default)]
    pub weight_class: WeightClass,
    /// Image URL.
    #[serde(default)]
    pub image: String,
    /// Offers from each vendor, in display order.
    pub offers: Vec<VendorOffer>,
    /// Specification bullet points.
    #[serde(default)]
    pub specifications: Vec<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl Product {
    /// Create a product with no offers yet.
    pub fn new(
        id: impl Into<ProductId>,
        name: impl Into<String>,
        brand: impl Into<String>,
        category: impl Into<String>,
        weight_class: WeightClass,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            brand: brand.into(),
            category: category.into(),
            weight_class,
            image: String::new(),
            offers: Vec::new(),
            specifications: Vec::new(),
            description: None,
        }
    }

    /// Add a vendor offer.
    pub fn with_offer(mut self, offer: VendorOffer) -> Self {
        self.offers.push(offer);
        self
    }

    /// Set the image URL.
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = image.into();
        self
    }

    /// Find the offer for a vendor.
    pub fn offer(&self, vendor_id: &VendorId) -> Option<&VendorOffer> {
        self.offers.iter().find(|o| &o.vendor_id == vendor_id)
    }

    /// True if any vendor sells this product in bulk.
    pub fn has_bulk_offer(&self) -> bool {
        self.offers.iter().any(|o| o.bulk.is_some())
    }
}

/// A vendor's price, stock and bulk terms for one product.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VendorOffer {
    pub vendor_id: VendorId,
    /// Price per unit.
    pub unit_price: Money,
    /// Units on hand.
    pub stock: i64,
    /// Display-only rating.
    #[serde(default)]
    pub rating: f32,
    /// Optional bundle pricing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bulk: Option<BulkTier>,
    /// Vendor-specific label (e.g. "Martillo Stanley").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl VendorOffer {
    /// Create an offer with no bulk tier.
    pub fn new(vendor_id: impl Into<VendorId>, unit_price: Money, stock: i64) -> Self {
        Self {
            vendor_id: vendor_id.into(),
            unit_price,
            stock,
            rating: 0.0,
            bulk: None,
            label: None,
        }
    }

    /// Attach a bulk tier.
    pub fn with_bulk(mut self, quantity: i64, price: Money) -> Self {
        self.bulk = Some(BulkTier::new(quantity, price, self.unit_price));
        self
    }

    pub fn with_rating(mut self, rating: f32) -> Self {
        self.rating = rating;
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Check if the offer can cover `quantity` units.
    pub fn can_fulfill(&self, quantity: i64) -> bool {
        quantity <= self.stock
    }

    pub fn is_out_of_stock(&self) -> bool {
        self.stock <= 0
    }
}

/// Fixed-size bundle pricing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BulkTier {
    /// Units per bundle (always greater than one).
    pub quantity: i64,
    /// Price of the whole bundle.
    pub price: Money,
    /// Precomputed `unit_price * quantity - price`.
    #[serde(default)]
    pub savings: Money,
}

impl BulkTier {
    /// Create a bulk tier, computing savings from the unit price.
    pub fn new(quantity: i64, price: Money, unit_price: Money) -> Self {
        Self {
            quantity,
            price,
            savings: unit_price * quantity - price,
        }
    }

    /// What the bundle would cost at the unit price.
    pub fn regular_total(&self, unit_price: Money) -> Money {
        unit_price * self.quantity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bulk_tier_savings() {
        let offer = VendorOffer::new("1", Money::from_cents(23), 5000)
            .with_bulk(100, Money::from_cents(1500));
        let bulk = offer.bulk.as_ref().unwrap();
        assert_eq!(bulk.savings, Money::from_cents(800));
        assert_eq!(bulk.regular_total(offer.unit_price), Money::from_cents(2300));
    }

    #[test]
    fn test_product_offer_lookup() {
        let product = Product::new("3", "Martillo", "Stanley", "Herramientas", WeightClass::Small)
            .with_offer(VendorOffer::new("1", Money::from_cents(1200), 25))
            .with_offer(VendorOffer::new("2", Money::from_cents(2500), 18));

        assert_eq!(
            product.offer(&VendorId::new("2")).map(|o| o.stock),
            Some(18)
        );
        assert!(product.offer(&VendorId::new("9")).is_none());
        assert!(!product.has_bulk_offer());
    }

    #[test]
    fn test_weight_class_serde() {
        let heavy: WeightClass = serde_json::from_str("\"heavy\"").unwrap();
        assert!(heavy.is_heavy());
        assert_eq!(serde_json::to_string(&WeightClass::Small).unwrap(), "\"small\"");
    }

    #[test]
    fn test_offer_stock() {
        let offer = VendorOffer::new("1", Money::from_cents(3000), 100);
        assert!(offer.can_fulfill(100));
        assert!(!offer.can_fulfill(101));
        assert!(!offer.is_out_of_stock());
    }
}
