//! Cart validation against the catalog.
//!
//! Every applicable check runs for every line, so a single pass reports all
//! the defects a line carries. Catalog-dependent checks are skipped once the
//! product (or the vendor's offer for it) cannot be resolved.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::cart::{CartLineItem, Tier};
use crate::catalog::CatalogStore;
use crate::checkout::DeliveryTariff;
use crate::money::{Money, PRICE_TOLERANCE};
use crate::validation::{Defect, LineField};

/// Validation result for one line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineValidation {
    /// Position of the line in the validated cart.
    pub index: usize,
    pub is_valid: bool,
    pub defects: Vec<Defect>,
    /// The line as submitted.
    pub line: CartLineItem,
    pub product_exists: bool,
    pub vendor_exists: bool,
    /// The vendor sells the product and the charged price is within tolerance.
    pub price_matches_catalog: bool,
}

/// Validation result for a whole cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartValidationSummary {
    pub is_valid: bool,
    pub total_errors: usize,
    pub items: Vec<LineValidation>,
    pub valid_items: usize,
    pub invalid_items: usize,
    pub total_items: usize,
    /// Sum of line totals over valid lines only.
    pub total_value: Money,
    /// Delivery fee over all lines, valid or not.
    pub estimated_delivery: Money,
}

impl CartValidationSummary {
    pub fn invalid_lines(&self) -> impl Iterator<Item = &LineValidation> {
        self.items.iter().filter(|item| !item.is_valid)
    }

    pub fn defects(&self) -> impl Iterator<Item = (usize, &Defect)> {
        self.items
            .iter()
            .flat_map(|item| item.defects.iter().map(move |d| (item.index, d)))
    }

    /// Whether repair could plausibly clear every defect.
    pub fn is_repairable(&self) -> bool {
        self.defects().all(|(_, d)| d.is_repairable())
    }
}

/// Checks cart lines against a catalog.
#[derive(Debug, Clone, Copy)]
pub struct CartValidator<'a, C: ?Sized> {
    catalog: &'a C,
    tariff: &'a DeliveryTariff,
}

impl<'a, C: CatalogStore + ?Sized> CartValidator<'a, C> {
    pub fn new(catalog: &'a C, tariff: &'a DeliveryTariff) -> Self {
        Self { catalog, tariff }
    }

    /// Validate a cart. Never fails; malformed lines surface as defects.
    pub fn validate(&self, lines: &[CartLineItem]) -> CartValidationSummary {
        let items: Vec<LineValidation> = lines
            .iter()
            .enumerate()
            .map(|(index, line)| self.validate_line(index, line))
            .collect();

        let valid_items = items.iter().filter(|i| i.is_valid).count();
        let total_errors = items.iter().map(|i| i.defects.len()).sum();
        // Valid bulk lines carry the catalog bundle size, so line_total bills as the catalog does.
        let total_value = items
            .iter()
            .filter(|i| i.is_valid)
            .fold(Money::zero(), |acc, i| acc.saturating_add(&i.line.line_total()));

        let summary = CartValidationSummary {
            is_valid: valid_items == items.len(),
            total_errors,
            valid_items,
            invalid_items: items.len() - valid_items,
            total_items: items.len(),
            total_value,
            estimated_delivery: self.tariff.fee_for_cart(lines, self.catalog),
            items,
        };

        info!(
            valid = summary.is_valid,
            lines = summary.total_items,
            errors = summary.total_errors,
            total_value = %summary.total_value,
            "validated cart"
        );
        summary
    }

    /// Validate a single line.
    pub fn validate_line(&self, index: usize, line: &CartLineItem) -> LineValidation {
        let mut defects = Vec::new();

        if line.product_id.is_blank() {
            defects.push(Defect::MissingField {
                field: LineField::ProductId,
            });
        }
        if line.vendor_id.is_blank() {
            defects.push(Defect::MissingField {
                field: LineField::VendorId,
            });
        }
        if line.name.trim().is_empty() {
            defects.push(Defect::MissingField {
                field: LineField::Name,
            });
        }

        if !line.price.is_positive() {
            defects.push(Defect::InvalidPrice {
                received: line.price,
            });
        }
        if line.quantity <= 0 {
            defects.push(Defect::InvalidQuantity {
                received: line.quantity,
            });
        }

        let product = if line.product_id.is_blank() {
            None
        } else {
            self.catalog.product(&line.product_id)
        };
        let mut price_matches_catalog = false;

        match product {
            None if !line.product_id.is_blank() => {
                defects.push(Defect::ProductNotFound {
                    product_id: line.product_id.clone(),
                });
            }
            None => {}
            Some(_) if line.vendor_id.is_blank() => {}
            Some(product) => match product.offer(&line.vendor_id) {
                None => defects.push(Defect::VendorDoesNotSellProduct {
                    vendor_id: line.vendor_id.clone(),
                }),
                Some(offer) => {
                    match (line.tier, offer.bulk.as_ref()) {
                        (Tier::Bulk, Some(bulk)) if line.bundle_size != Some(bulk.quantity) => {
                            // The bundle size drives billing, so compare what the line bills.
                            let catalog_line = CartLineItem {
                                price: bulk.price,
                                bundle_size: Some(bulk.quantity),
                                ..line.clone()
                            };
                            defects.push(Defect::PriceMismatch {
                                expected: catalog_line.line_total(),
                                received: line.line_total(),
                            });
                        }
                        (Tier::Bulk, None) => {}
                        (tier, bulk) => {
                            let expected = match (tier, bulk) {
                                (Tier::Bulk, Some(bulk)) => bulk.price,
                                _ => offer.unit_price,
                            };
                            if expected.within(&line.price, PRICE_TOLERANCE) {
                                price_matches_catalog = true;
                            } else {
                                defects.push(Defect::PriceMismatch {
                                    expected,
                                    received: line.price,
                                });
                            }
                        }
                    }

                    if line.quantity > offer.stock {
                        defects.push(Defect::InsufficientStock {
                            available: offer.stock,
                            requested: line.quantity,
                        });
                    }

                    if line.tier.is_bulk() && offer.bulk.is_none() {
                        defects.push(Defect::BulkUnavailable);
                    }
                }
            },
        }

        let vendor_exists = !line.vendor_id.is_blank() && self.catalog.vendor(&line.vendor_id).is_some();
        if !line.vendor_id.is_blank() && !vendor_exists {
            defects.push(Defect::VendorNotFound {
                vendor_id: line.vendor_id.clone(),
            });
        }

        if !defects.is_empty() {
            debug!(index, key = %line.key(), defects = defects.len(), "line has defects");
        }

        LineValidation {
            index,
            is_valid: defects.is_empty(),
            defects,
            line: line.clone(),
            product_exists: product.is_some(),
            vendor_exists,
            price_matches_catalog,
        }
    }
}
