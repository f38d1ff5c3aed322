//! Product catalog module.
//!
//! Contains products, vendor offers, vendors, the read-only lookup trait and
//! offer comparison.

mod compare;
mod demo;
mod product;
mod store;
mod vendor;

pub use compare::{cheapest_offer, compare_offers, BulkDiscount, OfferComparison, OfferRow};
pub use demo::{CEMENT, CRUZVAL, LEANDRO};
pub use product::{BulkTier, Product, VendorOffer, WeightClass};
pub use store::{Catalog, CatalogFile, CatalogStore};
pub use vendor::Vendor;
