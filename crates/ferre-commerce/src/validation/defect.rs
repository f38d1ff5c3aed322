//! Structured validation defects.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::ids::{ProductId, VendorId};
use crate::money::Money;

/// A required line field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineField {
    ProductId,
    VendorId,
    Name,
}

impl LineField {
    pub fn as_str(&self) -> &'static str {
        match self {
            LineField::ProductId => "product_id",
            LineField::VendorId => "vendor_id",
            LineField::Name => "name",
        }
    }
}

impl fmt::Display for LineField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One validation failure on one cart line.
///
/// Defects are reported in a summary, never returned as `Err`.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "snake_case")]
pub enum Defect {
    #[error("Missing required field: {field}")]
    MissingField { field: LineField },

    #[error("Invalid price: {received}")]
    InvalidPrice { received: Money },

    #[error("Invalid quantity: {received}")]
    InvalidQuantity { received: i64 },

    #[error("Product {product_id} not found in catalog")]
    ProductNotFound { product_id: ProductId },

    #[error("Vendor {vendor_id} does not sell this product")]
    VendorDoesNotSellProduct { vendor_id: VendorId },

    #[error("Wrong price. Expected: {expected}, received: {received}")]
    PriceMismatch { expected: Money, received: Money },

    #[error("Insufficient stock. Available: {available}, requested: {requested}")]
    InsufficientStock { available: i64, requested: i64 },

    #[error("Bulk purchase not available for this product")]
    BulkUnavailable,

    #[error("Vendor {vendor_id} not found")]
    VendorNotFound { vendor_id: VendorId },
}

impl Defect {
    pub fn category(&self) -> DefectCategory {
        match self {
            Defect::MissingField { .. } => DefectCategory::MissingField,
            Defect::InvalidPrice { .. } => DefectCategory::InvalidPrice,
            Defect::InvalidQuantity { .. } => DefectCategory::InvalidQuantity,
            Defect::ProductNotFound { .. } => DefectCategory::ProductNotFound,
            Defect::VendorDoesNotSellProduct { .. } => DefectCategory::VendorDoesNotSellProduct,
            Defect::PriceMismatch { .. } => DefectCategory::PriceMismatch,
            Defect::InsufficientStock { .. } => DefectCategory::InsufficientStock,
            Defect::BulkUnavailable => DefectCategory::BulkUnavailable,
            Defect::VendorNotFound { .. } => DefectCategory::VendorNotFound,
        }
    }

    /// Whether repair can fix this defect by reloading the line from the catalog.
    pub fn is_repairable(&self) -> bool {
        match self {
            Defect::MissingField { field } => *field == LineField::Name,
            Defect::InvalidPrice { .. }
            | Defect::PriceMismatch { .. }
            | Defect::InsufficientStock { .. }
            | Defect::BulkUnavailable => true,
            Defect::InvalidQuantity { .. }
            | Defect::ProductNotFound { .. }
            | Defect::VendorDoesNotSellProduct { .. }
            | Defect::VendorNotFound { .. } => false,
        }
    }
}

/// Defect kinds, without their data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefectCategory {
    MissingField,
    InvalidPrice,
    InvalidQuantity,
    ProductNotFound,
    VendorDoesNotSellProduct,
    PriceMismatch,
    InsufficientStock,
    BulkUnavailable,
    VendorNotFound,
}

impl DefectCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            DefectCategory::MissingField => "missing_field",
            DefectCategory::InvalidPrice => "invalid_price",
            DefectCategory::InvalidQuantity => "invalid_quantity",
            DefectCategory::ProductNotFound => "product_not_found",
            DefectCategory::VendorDoesNotSellProduct => "vendor_does_not_sell_product",
            DefectCategory::PriceMismatch => "price_mismatch",
            DefectCategory::InsufficientStock => "insufficient_stock",
            DefectCategory::BulkUnavailable => "bulk_unavailable",
            DefectCategory::VendorNotFound => "vendor_not_found",
        }
    }
}

impl fmt::Display for DefectCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
