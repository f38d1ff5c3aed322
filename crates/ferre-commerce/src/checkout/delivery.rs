//! Delivery tariff.
//!
//! One flat fee for small items, a higher one once the cart carries enough
//! heavy units to need a truck.

use crate::cart::CartLineItem;
use crate::catalog::{CatalogStore, WeightClass};
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// Weight class and quantity of one cart line, as the tariff sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryLine {
    pub weight_class: WeightClass,
    pub quantity: i64,
}

impl DeliveryLine {
    pub fn new(weight_class: WeightClass, quantity: i64) -> Self {
        Self {
            weight_class,
            quantity,
        }
    }
}

/// Delivery fee schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryTariff {
    /// Fee when the cart has no heavy items or fewer than the threshold.
    #[serde(default = "default_base_fee")]
    pub base_fee: Money,
    /// Fee once heavy units reach the threshold.
    #[serde(default = "default_heavy_fee")]
    pub heavy_fee: Money,
    /// Heavy units at which `heavy_fee` applies (inclusive).
    #[serde(default = "default_heavy_threshold")]
    pub heavy_threshold: i64,
}

fn default_base_fee() -> Money {
    Money::from_cents(1000)
}

fn default_heavy_fee() -> Money {
    Money::from_cents(4000)
}

fn default_heavy_threshold() -> i64 {
    10
}

impl Default for DeliveryTariff {
    fn default() -> Self {
        Self {
            base_fee: default_base_fee(),
            heavy_fee: default_heavy_fee(),
            heavy_threshold: default_heavy_threshold(),
        }
    }
}

impl DeliveryTariff {
    /// Fee for a set of lines.
    pub fn fee<'a>(&self, lines: impl IntoIterator<Item = &'a DeliveryLine>) -> Money {
        let heavy = lines
            .into_iter()
            .filter(|l| l.weight_class.is_heavy())
            .fold(None, |acc: Option<i64>, l| {
                Some(acc.unwrap_or(0).saturating_add(l.quantity))
            });
        self.fee_for_heavy(heavy)
    }

    /// Fee for a cart, resolving each line's weight class in the catalog.
    ///
    /// Lines whose product is unknown contribute nothing heavy.
    pub fn fee_for_cart<C: CatalogStore + ?Sized>(
        &self,
        lines: &[CartLineItem],
        catalog: &C,
    ) -> Money {
        let resolved: Vec<DeliveryLine> = lines
            .iter()
            .filter_map(|line| {
                catalog
                    .weight_class(&line.product_id)
                    .map(|wc| DeliveryLine::new(wc, line.quantity))
            })
            .collect();
        self.fee(&resolved)
    }

    /// Fee preview for a single product and quantity.
    pub fn fee_for_product(&self, weight_class: WeightClass, quantity: i64) -> Money {
        self.fee(&[DeliveryLine::new(weight_class, quantity)])
    }

    /// Human description of the fee that applies.
    pub fn describe(&self, weight_class: WeightClass, quantity: i64) -> String {
        let fee = self.fee_for_product(weight_class, quantity);
        match weight_class {
            WeightClass::Heavy if quantity >= self.heavy_threshold => {
                format!("{} ({}+ heavy units)", fee, self.heavy_threshold)
            }
            WeightClass::Heavy => {
                format!("{} (1-{} heavy units)", fee, self.heavy_threshold - 1)
            }
            WeightClass::Small => format!("{} (small items)", fee),
        }
    }

    fn fee_for_heavy(&self, heavy_units: Option<i64>) -> Money {
        match heavy_units {
            Some(units) if units >= self.heavy_threshold => self.heavy_fee,
            _ => self.base_fee,
        }
    }
}

/// Delivery fee under the standard tariff.
pub fn compute_delivery(lines: &[DeliveryLine]) -> Money {
    DeliveryTariff::default().fee(lines)
}
