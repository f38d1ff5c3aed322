//! Commerce error types.
//!
//! These are failures of a *request*: pricing a selection that cannot exist,
//! mutating a line that is not in the cart, loading an inconsistent catalog.
//! Drift between a held cart and the catalog is not an error; it is reported
//! as [`Defect`](crate::validation::Defect)s.

use crate::cart::Tier;
use crate::ids::{ProductId, VendorId};
use thiserror::Error;

/// Errors that can occur in cart and catalog operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CommerceError {
    /// Product not found in the catalog.
    #[error("Product not found: {0}")]
    ProductNotFound(ProductId),

    /// The vendor has no offer for the product.
    #[error("Vendor {vendor_id} has no offer for product {product_id}")]
    VendorOfferNotFound {
        product_id: ProductId,
        vendor_id: VendorId,
    },

    /// Bulk tier requested on an offer without one.
    #[error("Bulk purchase not available for product {product_id} at vendor {vendor_id}")]
    BulkUnavailable {
        product_id: ProductId,
        vendor_id: VendorId,
    },

    /// Quantity is not a positive integer.
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(i64),

    /// No line with the given key in the cart.
    #[error("Item not in cart: product {product_id}, vendor {vendor_id}, {tier}")]
    LineNotFound {
        product_id: ProductId,
        vendor_id: VendorId,
        tier: Tier,
    },

    /// Bulk lines carry a fixed quantity.
    #[error("Quantity of bulk line for product {0} is fixed")]
    BulkQuantityFixed(ProductId),

    /// Arithmetic overflow.
    #[error("Arithmetic overflow in money calculation")]
    Overflow,

    /// Two catalog products share an identifier.
    #[error("Duplicate product id in catalog: {0}")]
    DuplicateProduct(ProductId),

    /// Two catalog vendors share an identifier.
    #[error("Duplicate vendor id in catalog: {0}")]
    DuplicateVendor(VendorId),

    /// A product has no vendor offers.
    #[error("Product {0} has no vendor offers")]
    EmptyOffers(ProductId),

    /// An offer references a vendor that does not exist.
    #[error("Product {product_id} references unknown vendor {vendor_id}")]
    UnknownVendor {
        product_id: ProductId,
        vendor_id: VendorId,
    },

    /// An offer violates a pricing or stock invariant.
    #[error("Invalid offer for product {product_id} at vendor {vendor_id}: {reason}")]
    InvalidOffer {
        product_id: ProductId,
        vendor_id: VendorId,
        reason: String,
    },

    /// Checkout attempted on a cart with defects.
    #[error("Checkout blocked: {0} defect(s) in cart")]
    CheckoutBlocked(usize),

    /// Invalid cart lifecycle transition.
    #[error("Invalid cart transition from {from} on {event}")]
    InvalidCartTransition { from: String, event: String },

    /// Serialization error.
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for CommerceError {
    fn from(e: serde_json::Error) -> Self {
        CommerceError::SerializationError(e.to_string())
    }
}

impl From<toml::de::Error> for CommerceError {
    fn from(e: toml::de::Error) -> Self {
        CommerceError::SerializationError(e.to_string())
    }
}
