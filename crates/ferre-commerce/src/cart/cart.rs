//! The cart collection.

use crate::cart::{CartLineItem, LineKey};
use crate::checkout::CartState;
use crate::error::CommerceError;
use serde::{Deserialize, Serialize};

/// A shopping cart: line items keyed by `(product, vendor, tier)`.
///
/// Cart is a value. Every mutation consumes the cart and returns the new
/// one, so a snapshot handed to validation or aggregation cannot change
/// underneath it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(transparent)]
pub struct Cart {
    lines: Vec<CartLineItem>,
}

impl Cart {
    /// An empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a cart from a snapshot, merging lines that share a key.
    pub fn from_lines(lines: impl IntoIterator<Item = CartLineItem>) -> Self {
        lines.into_iter().fold(Self::new(), Cart::with_line)
    }

    /// Add a line, incrementing quantity if a line with the same key exists.
    ///
    /// For bulk lines the increment is the new line's quantity, i.e. one more
    /// bundle's worth of units.
    #[must_use]
    pub fn with_line(mut self, line: CartLineItem) -> Self {
        let key = line.key();
        if let Some(existing) = self.lines.iter_mut().find(|l| l.matches(&key)) {
            existing.quantity = existing.quantity.saturating_add(line.quantity);
        } else {
            self.lines.push(line);
        }
        self
    }

    /// Set the quantity of a unit line.
    ///
    /// A quantity of zero or less removes the line. Bulk lines keep their
    /// bundle quantity and fail with `BulkQuantityFixed`.
    pub fn with_quantity(mut self, key: &LineKey, quantity: i64) -> Result<Self, CommerceError> {
        if key.tier.is_bulk() {
            return Err(CommerceError::BulkQuantityFixed(key.product_id.clone()));
        }
        if quantity <= 0 {
            return self.without_line(key);
        }

        let line = self
            .lines
            .iter_mut()
            .find(|l| l.matches(key))
            .ok_or_else(|| not_found(key))?;
        line.quantity = quantity;
        Ok(self)
    }

    /// Remove a line.
    pub fn without_line(mut self, key: &LineKey) -> Result<Self, CommerceError> {
        let len_before = self.lines.len();
        self.lines.retain(|l| !l.matches(key));
        if self.lines.len() == len_before {
            return Err(not_found(key));
        }
        Ok(self)
    }

    /// Drop lines whose quantity fell to zero or below.
    #[must_use]
    pub fn without_empty_lines(mut self) -> Self {
        self.lines.retain(|l| l.quantity > 0);
        self
    }

    /// Remove all lines.
    #[must_use]
    pub fn cleared(mut self) -> Self {
        self.lines.clear();
        self
    }

    pub fn lines(&self) -> &[CartLineItem] {
        &self.lines
    }

    pub fn into_lines(self) -> Vec<CartLineItem> {
        self.lines
    }

    pub fn line(&self, key: &LineKey) -> Option<&CartLineItem> {
        self.lines.iter().find(|l| l.matches(key))
    }

    /// Total units across all lines.
    pub fn item_count(&self) -> i64 {
        self.lines
            .iter()
            .fold(0_i64, |acc, l| acc.saturating_add(l.quantity))
    }

    pub fn unique_line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Resting lifecycle state of this cart.
    pub fn state(&self) -> CartState {
        if self.is_empty() {
            CartState::Empty
        } else {
            CartState::Populated
        }
    }
}

fn not_found(key: &LineKey) -> CommerceError {
    CommerceError::LineNotFound {
        product_id: key.product_id.clone(),
        vendor_id: key.vendor_id.clone(),
        tier: key.tier,
    }
}
