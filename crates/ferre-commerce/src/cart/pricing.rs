//! Cart totals.

use crate::cart::{CartLineItem, LineKey};
use crate::catalog::CatalogStore;
use crate::checkout::DeliveryTariff;
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// Totals for a cart snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartTotals {
    /// Sum of line totals, no validity filtering.
    pub subtotal: Money,
    /// Sum of quantities.
    pub item_count: i64,
    pub delivery_fee: Money,
    /// Subtotal plus delivery.
    pub grand_total: Money,
    /// Per-line breakdown.
    pub lines: Vec<LinePricing>,
}

impl CartTotals {
    /// Share of the grand total taken by delivery, in percent.
    pub fn delivery_share(&self) -> f64 {
        if self.grand_total.is_zero() {
            return 0.0;
        }
        let fee: f64 = self.delivery_fee.amount().try_into().unwrap_or(0.0);
        let total: f64 = self.grand_total.amount().try_into().unwrap_or(1.0);
        fee / total * 100.0
    }
}

/// Pricing breakdown for a single line.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LinePricing {
    pub key: LineKey,
    pub price: Money,
    pub quantity: i64,
    /// How many times `price` is charged.
    pub billable_units: i64,
    pub total: Money,
}

impl LinePricing {
    pub fn from_line(line: &CartLineItem) -> Self {
        Self {
            key: line.key(),
            price: line.price,
            quantity: line.quantity,
            billable_units: line.billable_units(),
            total: line.line_total(),
        }
    }

    /// Effective price per unit received.
    pub fn effective_unit_price(&self) -> Money {
        if self.quantity <= 0 {
            return self.price;
        }
        Money::new(self.total.amount() / rust_decimal::Decimal::from(self.quantity)).rounded()
    }
}

/// Compute totals for a cart snapshot. Pure and total.
pub fn aggregate<C: CatalogStore + ?Sized>(
    lines: &[CartLineItem],
    catalog: &C,
    tariff: &DeliveryTariff,
) -> CartTotals {
    let breakdown: Vec<LinePricing> = lines.iter().map(LinePricing::from_line).collect();

    let subtotal = breakdown
        .iter()
        .fold(Money::zero(), |acc, l| acc.saturating_add(&l.total));
    let item_count = lines
        .iter()
        .fold(0_i64, |acc, l| acc.saturating_add(l.quantity));
    let delivery_fee = tariff.fee_for_cart(lines, catalog);

    CartTotals {
        subtotal,
        item_count,
        delivery_fee,
        grand_total: subtotal.saturating_add(&delivery_fee),
        lines: breakdown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::Tier;
    use crate::catalog::{Catalog, CEMENT, CRUZVAL};
    use crate::ids::{ProductId, VendorId};

    fn cement(quantity: i64) -> CartLineItem {
        CartLineItem {
            product_id: ProductId::new(CEMENT),
            vendor_id: VendorId::new(CRUZVAL),
            tier: Tier::Unit,
            price: Money::from_cents(3000),
            quantity,
            name: "Bolsa de Cemento PACASMAYO".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_aggregate_heavy_cart() {
        let catalog = Catalog::demo().unwrap();
        let totals = aggregate(&[cement(12)], &catalog, &DeliveryTariff::default());

        assert_eq!(totals.subtotal, Money::from_cents(36000));
        assert_eq!(totals.item_count, 12);
        assert_eq!(totals.delivery_fee, Money::from_cents(4000));
        assert_eq!(totals.grand_total, Money::from_cents(40000));
        assert!((totals.delivery_share() - 10.0).abs() < 0.001);
    }

    #[test]
    fn test_aggregate_empty_cart() {
        let catalog = Catalog::demo().unwrap();
        let totals = aggregate(&[], &catalog, &DeliveryTariff::default());
        assert_eq!(totals.subtotal, Money::zero());
        assert_eq!(totals.item_count, 0);
        assert_eq!(totals.grand_total, totals.delivery_fee);
    }

    #[test]
    fn test_aggregate_is_idempotent() {
        let catalog = Catalog::demo().unwrap();
        let lines = vec![cement(3), cement(4)];
        let tariff = DeliveryTariff::default();
        assert_eq!(
            aggregate(&lines, &catalog, &tariff),
            aggregate(&lines, &catalog, &tariff)
        );
    }

    #[test]
    fn test_effective_unit_price() {
        let bulk = CartLineItem {
            tier: Tier::Bulk,
            price: Money::from_cents(1500),
            quantity: 100,
            bundle_size: Some(100),
            ..Default::default()
        };
        let pricing = LinePricing::from_line(&bulk);
        assert_eq!(pricing.effective_unit_price(), Money::from_cents(15));
    }
}
