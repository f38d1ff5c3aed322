//! Shopping cart module.
//!
//! Contains line items, the cart collection, the line pricer and totals.

mod cart;
mod line;
mod pricer;
mod pricing;

pub use cart::Cart;
pub use line::{CartLineItem, LineKey, Tier};
pub use pricer::LinePricer;
pub use pricing::{aggregate, CartTotals, LinePricing};
