//! Best-effort cart repair.
//!
//! Lines whose product or offer has disappeared are dropped. Everything else
//! is reloaded from the catalog: display fields, price for the line's tier,
//! and quantity clamped to stock. Repaired output is not guaranteed valid;
//! a line clamped to zero stays in the cart.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::cart::{CartLineItem, LineKey, Tier};
use crate::catalog::CatalogStore;
use crate::money::Money;

/// Why a line could not be repaired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DropReason {
    ProductNotFound,
    VendorOfferNotFound,
}

/// A change repair made to the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum RepairAction {
    Dropped {
        key: LineKey,
        reason: DropReason,
    },
    /// Billed amount changed. `from` and `to` are line totals at the
    /// requested quantity, so a corrected bundle size shows up here too.
    Repriced {
        key: LineKey,
        from: Money,
        to: Money,
    },
    Clamped {
        key: LineKey,
        requested: i64,
        available: i64,
    },
}

/// Repaired lines plus what was changed to get them.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RepairReport {
    pub lines: Vec<CartLineItem>,
    pub actions: Vec<RepairAction>,
}

impl RepairReport {
    pub fn is_unchanged(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn dropped(&self) -> usize {
        self.actions
            .iter()
            .filter(|a| matches!(a, RepairAction::Dropped { .. }))
            .count()
    }

    /// Lines repair left with nothing to buy.
    pub fn empty_lines(&self) -> impl Iterator<Item = &CartLineItem> {
        self.lines.iter().filter(|l| l.quantity <= 0)
    }
}

/// Reconciles cart lines with catalog truth.
#[derive(Debug, Clone, Copy)]
pub struct CartRepairer<'a, C: ?Sized> {
    catalog: &'a C,
}

impl<'a, C: CatalogStore + ?Sized> CartRepairer<'a, C> {
    pub fn new(catalog: &'a C) -> Self {
        Self { catalog }
    }

    /// Repair a cart, dropping lines that cannot be repaired.
    pub fn repair(&self, lines: &[CartLineItem]) -> Vec<CartLineItem> {
        self.repair_with_report(lines).lines
    }

    /// Repair a cart and record each change.
    pub fn repair_with_report(&self, lines: &[CartLineItem]) -> RepairReport {
        let mut report = RepairReport::default();
        for line in lines {
            if let Some(repaired) = self.repair_line_inner(line, &mut report.actions) {
                report.lines.push(repaired);
            }
        }
        report
    }

    /// Repair one line, or `None` when it must be dropped.
    pub fn repair_line(&self, line: &CartLineItem) -> Option<CartLineItem> {
        self.repair_line_inner(line, &mut Vec::new())
    }

    fn repair_line_inner(
        &self,
        line: &CartLineItem,
        actions: &mut Vec<RepairAction>,
    ) -> Option<CartLineItem> {
        let key = line.key();

        let Some(product) = self.catalog.product(&line.product_id) else {
            warn!(key = %key, "dropping line: product not in catalog");
            actions.push(RepairAction::Dropped {
                key,
                reason: DropReason::ProductNotFound,
            });
            return None;
        };
        let Some(offer) = product.offer(&line.vendor_id) else {
            warn!(key = %key, "dropping line: vendor has no offer");
            actions.push(RepairAction::Dropped {
                key,
                reason: DropReason::VendorOfferNotFound,
            });
            return None;
        };

        // Bulk lines without a bulk tier fall back to unit pricing.
        let (price, bundle_size) = match (line.tier, offer.bulk.as_ref()) {
            (Tier::Bulk, Some(bulk)) => (bulk.price, Some(bulk.quantity)),
            _ => (offer.unit_price, None),
        };
        let quantity = line.quantity.min(offer.stock);

        let from = line.line_total();
        let to = CartLineItem {
            price,
            bundle_size,
            ..line.clone()
        }
        .line_total();
        if price != line.price || from != to {
            actions.push(RepairAction::Repriced {
                key: key.clone(),
                from,
                to,
            });
        }
        if quantity < line.quantity {
            warn!(
                key = %key,
                requested = line.quantity,
                available = offer.stock,
                "clamping line to stock"
            );
            actions.push(RepairAction::Clamped {
                key: key.clone(),
                requested: line.quantity,
                available: offer.stock,
            });
        }

        debug!(key = %key, price = %price, quantity, "repaired line");

        Some(CartLineItem {
            product_id: product.id.clone(),
            vendor_id: offer.vendor_id.clone(),
            tier: line.tier,
            price,
            quantity,
            bundle_size,
            name: product.name.clone(),
            brand: product.brand.clone(),
            image: product.image.clone(),
            weight_class: product.weight_class,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, WeightClass, CEMENT, CRUZVAL, LEANDRO};
    use crate::ids::{ProductId, VendorId};

    fn line(product: &str, vendor: &str, tier: Tier, price: i64, quantity: i64) -> CartLineItem {
        CartLineItem {
            product_id: ProductId::new(product),
            vendor_id: VendorId::new(vendor),
            tier,
            price: Money::from_cents(price),
            quantity,
            name: "stale".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_repair_refreshes_display_and_price() {
        let catalog = Catalog::demo().unwrap();
        let repaired = CartRepairer::new(&catalog)
            .repair_line(&line(CEMENT, LEANDRO, Tier::Unit, 100, 2))
            .unwrap();

        assert_eq!(repaired.name, "Bolsa de Cemento PACASMAYO");
        assert_eq!(repaired.brand, "Pacasmayo");
        assert_eq!(repaired.weight_class, WeightClass::Heavy);
        assert_eq!(repaired.price, Money::from_cents(3450));
        assert_eq!(repaired.quantity, 2);
    }

    #[test]
    fn test_repair_bulk_price_and_bundle() {
        let catalog = Catalog::demo().unwrap();
        let repaired = CartRepairer::new(&catalog)
            .repair_line(&line("1", CRUZVAL, Tier::Bulk, 1, 100))
            .unwrap();
        assert_eq!(repaired.price, Money::from_cents(1500));
        assert_eq!(repaired.bundle_size, Some(100));
        assert_eq!(repaired.line_total(), Money::from_cents(1500));
    }

    #[test]
    fn test_repair_records_bundle_size_change() {
        let catalog = Catalog::demo().unwrap();
        let stale = line("1", CRUZVAL, Tier::Bulk, 1500, 100);
        assert_eq!(stale.bundle_size, None);

        let report = CartRepairer::new(&catalog).repair_with_report(&[stale]);
        assert!(!report.is_unchanged());
        assert_eq!(
            report.actions,
            vec![RepairAction::Repriced {
                key: LineKey::new("1", CRUZVAL, Tier::Bulk),
                from: Money::from_cents(150000),
                to: Money::from_cents(1500),
            }]
        );
        assert_eq!(report.lines[0].bundle_size, Some(100));
    }

    #[test]
    fn test_repair_of_priced_line_is_unchanged() {
        let catalog = Catalog::demo().unwrap();
        let priced = CartRepairer::new(&catalog)
            .repair_line(&line("1", CRUZVAL, Tier::Bulk, 1500, 100))
            .unwrap();
        let report = CartRepairer::new(&catalog).repair_with_report(&[priced]);
        assert!(report.is_unchanged());
    }

    #[test]
    fn test_repair_bulk_without_tier_falls_back_to_unit_price() {
        let catalog = Catalog::demo().unwrap();
        let repaired = CartRepairer::new(&catalog)
            .repair_line(&line("3", CRUZVAL, Tier::Bulk, 1, 2))
            .unwrap();
        assert_eq!(repaired.tier, Tier::Bulk);
        assert_eq!(repaired.price, Money::from_cents(1200));
        assert_eq!(repaired.bundle_size, None);
    }

    #[test]
    fn test_repair_drops_unrepairable_lines() {
        let catalog = Catalog::demo().unwrap();
        let lines = vec![
            line("3", CRUZVAL, Tier::Unit, 1200, 1),
            line("404", CRUZVAL, Tier::Unit, 1200, 1),
            line("3", "9", Tier::Unit, 1200, 1),
        ];

        let report = CartRepairer::new(&catalog).repair_with_report(&lines);
        assert_eq!(report.lines.len(), 1);
        assert_eq!(report.dropped(), 2);
        assert!(matches!(
            report.actions[0],
            RepairAction::Dropped {
                reason: DropReason::ProductNotFound,
                ..
            }
        ));
    }

    #[test]
    fn test_repair_clamps_to_stock() {
        let catalog = Catalog::demo().unwrap();
        let report = CartRepairer::new(&catalog).repair_with_report(&[line("3", LEANDRO, Tier::Unit, 2500, 30)]);

        assert_eq!(report.lines[0].quantity, 18);
        assert_eq!(
            report.actions,
            vec![RepairAction::Clamped {
                key: report.lines[0].key(),
                requested: 30,
                available: 18,
            }]
        );
    }

    #[test]
    fn test_repair_keeps_zero_quantity_lines() {
        let catalog = Catalog::demo().unwrap();
        let report = CartRepairer::new(&catalog).repair_with_report(&[line("3", CRUZVAL, Tier::Unit, 1200, 0)]);
        assert_eq!(report.lines.len(), 1);
        assert_eq!(report.empty_lines().count(), 1);
        assert!(report.is_unchanged());
    }
}
