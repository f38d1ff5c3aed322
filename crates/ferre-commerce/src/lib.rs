//! Cart pricing and validation engine for Ferretería Online.
//!
//! This crate holds the pure, synchronous core of the storefront:
//!
//! - **Catalog**: Products, vendor offers, vendors, read-only lookup, offer comparison
//! - **Cart**: Line items, the cart collection, the line pricer, totals
//! - **Checkout**: Delivery tariff, cart lifecycle, order drafts
//! - **Validation**: Per-line defect reporting and best-effort repair
//!
//! # Example
//!
//! ```rust,ignore
//! use ferre_commerce::prelude::*;
//!
//! let engine = CartEngine::new(Catalog::demo()?);
//!
//! // 100 screws from Cruzval at the bulk price
//! let cart = engine.add_to_cart(
//!     &Cart::new(),
//!     &ProductId::new("1"),
//!     &VendorId::new(CRUZVAL),
//!     Tier::Bulk,
//!     None,
//! )?;
//!
//! let summary = engine.validate(cart.lines());
//! assert!(summary.is_valid);
//!
//! let totals = engine.aggregate(cart.lines());
//! println!("Total: {}", totals.grand_total); // S/ 25.00
//! ```

pub mod error;
pub mod ids;
pub mod money;

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod engine;
pub mod validation;

pub use engine::CartEngine;
pub use error::CommerceError;
pub use ids::*;
pub use money::{Money, PRICE_TOLERANCE};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::engine::CartEngine;
    pub use crate::error::CommerceError;
    pub use crate::ids::*;
    pub use crate::money::{Money, PRICE_TOLERANCE};

    // Catalog
    pub use crate::catalog::{
        BulkTier, Catalog, CatalogStore, OfferComparison, Product, Vendor, VendorOffer,
        WeightClass, CEMENT, CRUZVAL, LEANDRO,
    };

    // Cart
    pub use crate::cart::{Cart, CartLineItem, CartTotals, LineKey, LinePricer, Tier};

    // Checkout
    pub use crate::checkout::{
        compute_delivery, CartEvent, CartState, Checkout, CheckoutOutcome, DeliveryLine,
        DeliveryTariff, Fulfillment, OrderDraft,
    };

    // Validation
    pub use crate::validation::{
        CartRepairer, CartValidationSummary, CartValidator, Defect, DefectCategory,
        LineValidation, RepairReport,
    };
}
