//! Cart lifecycle and the checkout step.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::info;

use crate::cart::Cart;
use crate::catalog::CatalogStore;
use crate::checkout::{Fulfillment, OrderDraft};
use crate::engine::CartEngine;
use crate::error::CommerceError;
use crate::validation::{CartValidationSummary, RepairReport};

/// Lifecycle state of a cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CartState {
    Empty,
    Populated,
    Validating,
    CheckedOut,
}

impl CartState {
    pub fn as_str(&self) -> &'static str {
        match self {
            CartState::Empty => "empty",
            CartState::Populated => "populated",
            CartState::Validating => "validating",
            CartState::CheckedOut => "checked_out",
        }
    }

    /// Apply an event, failing on transitions the lifecycle does not allow.
    pub fn transition(self, event: CartEvent) -> Result<CartState, CommerceError> {
        use CartEvent::*;
        use CartState::*;

        match (self, event) {
            (Empty, LineAdded) => Ok(Populated),
            (Populated, LineAdded | LineUpdated) => Ok(Populated),
            (Populated, LastLineRemoved) => Ok(Empty),
            (Populated, CheckoutRequested) => Ok(Validating),
            (Validating, DefectsFound) => Ok(Populated),
            (Validating, ValidationPassed) => Ok(CheckedOut),
            (CheckedOut, OrderPlaced) => Ok(Empty),
            (from, event) => Err(CommerceError::InvalidCartTransition {
                from: from.as_str().to_string(),
                event: event.as_str().to_string(),
            }),
        }
    }
}

impl fmt::Display for CartState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Events that move a cart through its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CartEvent {
    LineAdded,
    LineUpdated,
    LastLineRemoved,
    CheckoutRequested,
    DefectsFound,
    ValidationPassed,
    OrderPlaced,
}

impl CartEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            CartEvent::LineAdded => "line_added",
            CartEvent::LineUpdated => "line_updated",
            CartEvent::LastLineRemoved => "last_line_removed",
            CartEvent::CheckoutRequested => "checkout_requested",
            CartEvent::DefectsFound => "defects_found",
            CartEvent::ValidationPassed => "validation_passed",
            CartEvent::OrderPlaced => "order_placed",
        }
    }
}

/// Result of a checkout attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum CheckoutOutcome {
    /// Cart is valid; totals are locked in the draft.
    Ready(OrderDraft),
    /// Cart has defects; a repaired cart is proposed.
    Blocked {
        summary: CartValidationSummary,
        repaired: RepairReport,
    },
}

impl CheckoutOutcome {
    /// State the cart lands in after this outcome.
    pub fn state(&self) -> CartState {
        match self {
            CheckoutOutcome::Ready(_) => CartState::CheckedOut,
            CheckoutOutcome::Blocked { .. } => CartState::Populated,
        }
    }

    pub fn into_draft(self) -> Result<OrderDraft, CommerceError> {
        match self {
            CheckoutOutcome::Ready(draft) => Ok(draft),
            CheckoutOutcome::Blocked { summary, .. } => {
                Err(CommerceError::CheckoutBlocked(summary.total_errors))
            }
        }
    }
}

/// Drives a cart from `Populated` through validation to an order draft.
pub struct Checkout<'a, C> {
    engine: &'a CartEngine<C>,
}

impl<'a, C: CatalogStore> Checkout<'a, C> {
    pub fn new(engine: &'a CartEngine<C>) -> Self {
        Self { engine }
    }

    /// Validate the cart and, if clean, lock its totals into a draft.
    pub fn run(&self, cart: &Cart, fulfillment: Fulfillment) -> Result<CheckoutOutcome, CommerceError> {
        let state = cart.state().transition(CartEvent::CheckoutRequested)?;

        let summary = self.engine.validate(cart.lines());
        if !summary.is_valid {
            state.transition(CartEvent::DefectsFound)?;
            let repaired = self.engine.repair_with_report(cart.lines());
            info!(defects = summary.total_errors, "checkout blocked");
            return Ok(CheckoutOutcome::Blocked { summary, repaired });
        }

        state.transition(CartEvent::ValidationPassed)?;
        let totals = self.engine.aggregate(cart.lines());
        let draft = OrderDraft::new(cart.lines().to_vec(), totals, fulfillment);
        info!(order_id = %draft.id, grand_total = %draft.totals.grand_total, "checkout ready");
        Ok(CheckoutOutcome::Ready(draft))
    }

    /// Hand the draft over and clear the cart.
    pub fn place(&self, draft: &OrderDraft, cart: Cart) -> Result<Cart, CommerceError> {
        CartState::CheckedOut.transition(CartEvent::OrderPlaced)?;
        info!(order_id = %draft.id, lines = draft.lines.len(), "order placed");
        Ok(cart.cleared())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path_transitions() {
        let state = CartState::Empty
            .transition(CartEvent::LineAdded)
            .and_then(|s| s.transition(CartEvent::LineUpdated))
            .and_then(|s| s.transition(CartEvent::CheckoutRequested))
            .and_then(|s| s.transition(CartEvent::ValidationPassed))
            .and_then(|s| s.transition(CartEvent::OrderPlaced))
            .unwrap();
        assert_eq!(state, CartState::Empty);
    }

    #[test]
    fn test_defects_return_to_populated() {
        let state = CartState::Validating
            .transition(CartEvent::DefectsFound)
            .unwrap();
        assert_eq!(state, CartState::Populated);
    }

    #[test]
    fn test_empty_cart_cannot_check_out() {
        let result = CartState::Empty.transition(CartEvent::CheckoutRequested);
        assert!(matches!(
            result,
            Err(CommerceError::InvalidCartTransition { .. })
        ));
    }

    #[test]
    fn test_remove_last_line_empties() {
        assert_eq!(
            CartState::Populated.transition(CartEvent::LastLineRemoved),
            Ok(CartState::Empty)
        );
    }
}
