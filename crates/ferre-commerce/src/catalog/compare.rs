//! Side-by-side comparison of vendor offers for one product.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::catalog::{CatalogStore, Product, VendorOffer, WeightClass};
use crate::ids::{ProductId, VendorId};
use crate::money::Money;

/// What a shopper saves by buying the bundle instead of single units.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BulkDiscount {
    pub bundle_quantity: i64,
    pub bundle_price: Money,
    /// Unit price times bundle quantity.
    pub regular_total: Money,
    pub savings: Money,
    /// Savings as a percentage of the regular total, two decimals.
    pub savings_percent: Decimal,
}

impl BulkDiscount {
    /// Derive the discount for an offer, if it has a bulk tier.
    pub fn from_offer(offer: &VendorOffer) -> Option<Self> {
        let bulk = offer.bulk.as_ref()?;
        let regular_total = bulk.regular_total(offer.unit_price);
        let savings = regular_total - bulk.price;
        let savings_percent = if regular_total.is_zero() {
            Decimal::ZERO
        } else {
            (savings.amount() / regular_total.amount() * Decimal::ONE_HUNDRED)
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        };
        Some(Self {
            bundle_quantity: bulk.quantity,
            bundle_price: bulk.price,
            regular_total,
            savings,
            savings_percent,
        })
    }
}

/// One vendor's column in the comparison.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OfferRow {
    pub vendor_id: VendorId,
    /// None when the vendor is missing from the catalog.
    pub vendor_name: Option<String>,
    pub delivery_time: Option<String>,
    pub label: Option<String>,
    pub unit_price: Money,
    pub stock: i64,
    pub rating: f32,
    /// True for every offer sharing the lowest unit price.
    pub is_lowest_unit_price: bool,
    pub bulk: Option<BulkDiscount>,
}

/// All offers for a product, in catalog order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OfferComparison {
    pub product_id: ProductId,
    pub product_name: String,
    pub weight_class: WeightClass,
    pub rows: Vec<OfferRow>,
}

impl OfferComparison {
    pub fn lowest_unit_price(&self) -> Option<Money> {
        self.rows.iter().map(|r| r.unit_price).min()
    }

    /// Row with the largest bulk savings, if any vendor sells in bulk.
    pub fn best_bulk(&self) -> Option<&OfferRow> {
        self.rows
            .iter()
            .filter(|r| r.bulk.is_some())
            .max_by_key(|r| r.bulk.as_ref().map(|b| b.savings))
    }
}

/// Compare every vendor offer for a product.
pub fn compare_offers<C: CatalogStore + ?Sized>(product: &Product, catalog: &C) -> OfferComparison {
    let lowest = product.offers.iter().map(|o| o.unit_price).min();

    let rows = product
        .offers
        .iter()
        .map(|offer| {
            let vendor = catalog.vendor(&offer.vendor_id);
            OfferRow {
                vendor_id: offer.vendor_id.clone(),
                vendor_name: vendor.map(|v| v.name.clone()),
                delivery_time: vendor.and_then(|v| v.delivery_time.clone()),
                label: offer.label.clone(),
                unit_price: offer.unit_price,
                stock: offer.stock,
                rating: offer.rating,
                is_lowest_unit_price: Some(offer.unit_price) == lowest,
                bulk: BulkDiscount::from_offer(offer),
            }
        })
        .collect();

    OfferComparison {
        product_id: product.id.clone(),
        product_name: product.name.clone(),
        weight_class: product.weight_class,
        rows,
    }
}

/// The offer with the lowest unit price; the first one wins ties.
pub fn cheapest_offer(product: &Product) -> Option<&VendorOffer> {
    product
        .offers
        .iter()
        .reduce(|best, o| if o.unit_price < best.unit_price { o } else { best })
}
