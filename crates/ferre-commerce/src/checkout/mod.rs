//! Checkout module.
//!
//! Contains the delivery tariff, the cart lifecycle and order drafts.

mod delivery;
mod flow;
mod order;

pub use delivery::{compute_delivery, DeliveryLine, DeliveryTariff};
pub use flow::{CartEvent, CartState, Checkout, CheckoutOutcome};
pub use order::{Fulfillment, OrderDraft};
