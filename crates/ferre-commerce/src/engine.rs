//! The cart engine facade.
//!
//! Bundles a catalog and a delivery tariff and exposes every engine
//! operation over plain data.

use crate::cart::{aggregate, Cart, CartLineItem, CartTotals, LinePricer, Tier};
use crate::catalog::{compare_offers, CatalogStore, OfferComparison};
use crate::checkout::{DeliveryLine, DeliveryTariff};
use crate::error::CommerceError;
use crate::ids::{ProductId, VendorId};
use crate::money::Money;
use crate::validation::{CartRepairer, CartValidationSummary, CartValidator, RepairReport};

/// Pricing, validation and repair over one catalog.
#[derive(Debug, Clone)]
pub struct CartEngine<C> {
    catalog: C,
    tariff: DeliveryTariff,
}

impl<C: CatalogStore> CartEngine<C> {
    pub fn new(catalog: C) -> Self {
        Self {
            catalog,
            tariff: DeliveryTariff::default(),
        }
    }

    #[must_use]
    pub fn with_tariff(mut self, tariff: DeliveryTariff) -> Self {
        self.tariff = tariff;
        self
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    pub fn tariff(&self) -> &DeliveryTariff {
        &self.tariff
    }

    /// Price a selection. See [`LinePricer::price_selection`].
    pub fn price_selection(
        &self,
        product_id: &ProductId,
        vendor_id: &VendorId,
        tier: Tier,
        quantity: Option<i64>,
    ) -> Result<CartLineItem, CommerceError> {
        LinePricer::new(&self.catalog).price_selection(product_id, vendor_id, tier, quantity)
    }

    /// Price a selection and merge it into a copy of the cart.
    ///
    /// On failure no line is added and `cart` is left as it was.
    pub fn add_to_cart(
        &self,
        cart: &Cart,
        product_id: &ProductId,
        vendor_id: &VendorId,
        tier: Tier,
        quantity: Option<i64>,
    ) -> Result<Cart, CommerceError> {
        let line = self.price_selection(product_id, vendor_id, tier, quantity)?;
        Ok(cart.clone().with_line(line))
    }

    pub fn validate(&self, lines: &[CartLineItem]) -> CartValidationSummary {
        CartValidator::new(&self.catalog, &self.tariff).validate(lines)
    }

    pub fn repair(&self, lines: &[CartLineItem]) -> Vec<CartLineItem> {
        CartRepairer::new(&self.catalog).repair(lines)
    }

    pub fn repair_with_report(&self, lines: &[CartLineItem]) -> RepairReport {
        CartRepairer::new(&self.catalog).repair_with_report(lines)
    }

    pub fn aggregate(&self, lines: &[CartLineItem]) -> CartTotals {
        aggregate(lines, &self.catalog, &self.tariff)
    }

    /// Fee for lines whose weight class is already known.
    pub fn compute_delivery(&self, lines: &[DeliveryLine]) -> Money {
        self.tariff.fee(lines)
    }

    /// Fee for cart lines, resolving weight classes in the catalog.
    pub fn delivery_for_cart(&self, lines: &[CartLineItem]) -> Money {
        self.tariff.fee_for_cart(lines, &self.catalog)
    }

    /// Side-by-side offers for a product.
    pub fn compare(&self, product_id: &ProductId) -> Result<OfferComparison, CommerceError> {
        let product = self
            .catalog
            .product(product_id)
            .ok_or_else(|| CommerceError::ProductNotFound(product_id.clone()))?;
        Ok(compare_offers(product, &self.catalog))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, CEMENT, CRUZVAL};

    #[test]
    fn test_add_to_cart_merges_duplicates() {
        let engine = CartEngine::new(Catalog::demo().unwrap());
        let product = ProductId::new(CEMENT);
        let vendor = VendorId::new(CRUZVAL);

        let cart = engine
            .add_to_cart(&Cart::new(), &product, &vendor, Tier::Unit, Some(4))
            .and_then(|cart| engine.add_to_cart(&cart, &product, &vendor, Tier::Unit, Some(8)))
            .unwrap();

        assert_eq!(cart.unique_line_count(), 1);
        assert_eq!(cart.item_count(), 12);
        assert_eq!(engine.delivery_for_cart(cart.lines()), Money::from_cents(4000));
    }

    #[test]
    fn test_failed_add_leaves_no_line() {
        let engine = CartEngine::new(Catalog::demo().unwrap());
        let cart = Cart::new();
        let result = engine.add_to_cart(
            &cart,
            &ProductId::new("3"),
            &VendorId::new(CRUZVAL),
            Tier::Bulk,
            None,
        );
        assert!(matches!(result, Err(CommerceError::BulkUnavailable { .. })));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_custom_tariff_flows_through() {
        let tariff = DeliveryTariff {
            base_fee: Money::from_cents(700),
            ..DeliveryTariff::default()
        };
        let engine = CartEngine::new(Catalog::demo().unwrap()).with_tariff(tariff);
        assert_eq!(engine.aggregate(&[]).delivery_fee, Money::from_cents(700));
        assert_eq!(engine.validate(&[]).estimated_delivery, Money::from_cents(700));
    }

    #[test]
    fn test_compare_unknown_product() {
        let engine = CartEngine::new(Catalog::demo().unwrap());
        assert!(matches!(
            engine.compare(&ProductId::new("404")),
            Err(CommerceError::ProductNotFound(_))
        ));
    }

    #[test]
    fn test_engine_over_borrowed_catalog() {
        let catalog = Catalog::demo().unwrap();
        let engine = CartEngine::new(&catalog);
        assert_eq!(engine.compare(&ProductId::new("1")).unwrap().rows.len(), 2);
    }
}
