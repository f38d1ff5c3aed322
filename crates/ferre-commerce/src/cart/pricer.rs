//! Turn a shopper's selection into a priced line item.

use tracing::debug;

use crate::cart::{CartLineItem, Tier};
use crate::catalog::CatalogStore;
use crate::error::CommerceError;
use crate::ids::{ProductId, VendorId};

/// Resolves `(product, vendor, tier)` selections against a catalog.
#[derive(Debug, Clone, Copy)]
pub struct LinePricer<'a, C: ?Sized> {
    catalog: &'a C,
}

impl<'a, C: CatalogStore + ?Sized> LinePricer<'a, C> {
    pub fn new(catalog: &'a C) -> Self {
        Self { catalog }
    }

    /// Price one selection.
    ///
    /// Bulk selections take the offer's bundle quantity and ignore
    /// `quantity`. Unit selections use `quantity`, defaulting to one.
    ///
    /// # Errors
    ///
    /// `ProductNotFound`, `VendorOfferNotFound`, `BulkUnavailable` when the
    /// offer has no bulk tier, `InvalidQuantity` for a unit quantity ≤ 0.
    pub fn price_selection(
        &self,
        product_id: &ProductId,
        vendor_id: &VendorId,
        tier: Tier,
        quantity: Option<i64>,
    ) -> Result<CartLineItem, CommerceError> {
        let product = self
            .catalog
            .product(product_id)
            .ok_or_else(|| CommerceError::ProductNotFound(product_id.clone()))?;

        let offer = product
            .offer(vendor_id)
            .ok_or_else(|| CommerceError::VendorOfferNotFound {
                product_id: product_id.clone(),
                vendor_id: vendor_id.clone(),
            })?;

        let (price, quantity, bundle_size) = match tier {
            Tier::Bulk => {
                let bulk = offer
                    .bulk
                    .as_ref()
                    .ok_or_else(|| CommerceError::BulkUnavailable {
                        product_id: product_id.clone(),
                        vendor_id: vendor_id.clone(),
                    })?;
                (bulk.price, bulk.quantity, Some(bulk.quantity))
            }
            Tier::Unit => {
                let quantity = quantity.unwrap_or(1);
                if quantity <= 0 {
                    return Err(CommerceError::InvalidQuantity(quantity));
                }
                (offer.unit_price, quantity, None)
            }
        };

        debug!(
            product_id = %product_id,
            vendor_id = %vendor_id,
            tier = %tier,
            price = %price,
            quantity,
            "priced selection"
        );

        Ok(CartLineItem {
            product_id: product.id.clone(),
            vendor_id: offer.vendor_id.clone(),
            tier,
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
