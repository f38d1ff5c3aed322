//! Read-only catalog lookup.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::catalog::{BulkTier, Product, Vendor, VendorOffer, WeightClass};
use crate::error::CommerceError;
use crate::ids::{ProductId, VendorId};

/// Synchronous, read-only access to products and vendors.
///
/// The engine treats the store as immutable for the duration of one call.
pub trait CatalogStore {
    /// Look up a product by id.
    fn product(&self, id: &ProductId) -> Option<&Product>;

    /// Look up a vendor by id.
    fn vendor(&self, id: &VendorId) -> Option<&Vendor>;

    /// Look up a product together with one vendor's offer for it.
    fn offer(&self, product_id: &ProductId, vendor_id: &VendorId) -> Option<(&Product, &VendorOffer)> {
        let product = self.product(product_id)?;
        product.offer(vendor_id).map(|offer| (product, offer))
    }

    /// Weight class of a product, if the product exists.
    fn weight_class(&self, product_id: &ProductId) -> Option<WeightClass> {
        self.product(product_id).map(|p| p.weight_class)
    }
}

impl<T: CatalogStore + ?Sized> CatalogStore for &T {
    fn product(&self, id: &ProductId) -> Option<&Product> {
        (**self).product(id)
    }

    fn vendor(&self, id: &VendorId) -> Option<&Vendor> {
        (**self).vendor(id)
    }
}

/// On-disk catalog layout (TOML or JSON).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogFile {
    #[serde(default)]
    pub vendors: Vec<Vendor>,
    #[serde(default)]
    pub products: Vec<Product>,
}

/// In-memory catalog indexed by id, preserving insertion order.
#[derive(Debug, Clone)]
pub struct Catalog {
    vendors: Vec<Vendor>,
    products: Vec<Product>,
    vendor_index: HashMap<VendorId, usize>,
    product_index: HashMap<ProductId, usize>,
}

impl Catalog {
    /// Build a catalog, checking its invariants.
    ///
    /// Bulk savings are recomputed from the unit price so that a file cannot
    /// carry stale figures.
    pub fn new(vendors: Vec<Vendor>, products: Vec<Product>) -> Result<Self, CommerceError> {
        let mut vendor_index = HashMap::with_capacity(vendors.len());
        for (idx, vendor) in vendors.iter().enumerate() {
            if vendor_index.insert(vendor.id.clone(), idx).is_some() {
                return Err(CommerceError::DuplicateVendor(vendor.id.clone()));
            }
        }

        let mut product_index = HashMap::with_capacity(products.len());
        let mut normalized = Vec::with_capacity(products.len());
        for (idx, mut product) in products.into_iter().enumerate() {
            if product_index.insert(product.id.clone(), idx).is_some() {
                return Err(CommerceError::DuplicateProduct(product.id));
            }
            if product.offers.is_empty() {
                return Err(CommerceError::EmptyOffers(product.id));
            }
            for offer in &mut product.offers {
                if !vendor_index.contains_key(&offer.vendor_id) {
                    return Err(CommerceError::UnknownVendor {
                        product_id: product.id.clone(),
                        vendor_id: offer.vendor_id.clone(),
                    });
                }
                check_offer(&product.id, offer)?;
                if let Some(bulk) = offer.bulk.as_mut() {
                    *bulk = BulkTier::new(bulk.quantity, bulk.price, offer.unit_price);
                }
            }
            normalized.push(product);
        }

        Ok(Self {
            vendors,
            products: normalized,
            vendor_index,
            product_index,
        })
    }

    /// Parse and check a JSON catalog.
    pub fn from_json(content: &str) -> Result<Self, CommerceError> {
        let file: CatalogFile = serde_json::from_str(content)?;
        Self::new(file.vendors, file.products)
    }

    /// Parse and check a TOML catalog.
    pub fn from_toml(content: &str) -> Result<Self, CommerceError> {
        let file: CatalogFile = toml::from_str(content)?;
        Self::new(file.vendors, file.products)
    }

    /// All products in insertion order.
    pub fn products(&self) -> impl Iterator<Item = &Product> {
        self.products.iter()
    }

    /// All vendors in insertion order.
    pub fn vendors(&self) -> impl Iterator<Item = &Vendor> {
        self.vendors.iter()
    }

    /// Products in a category (case-insensitive).
    pub fn by_category<'a>(&'a self, category: &'a str) -> impl Iterator<Item = &'a Product> + 'a {
        self.products
            .iter()
            .filter(move |p| p.category.eq_ignore_ascii_case(category))
    }

    /// Distinct categories in first-seen order.
    pub fn categories(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for product in &self.products {
            if !seen.contains(&product.category.as_str()) {
                seen.push(&product.category);
            }
        }
        seen
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Snapshot back into the file layout.
    pub fn to_file(&self) -> CatalogFile {
        CatalogFile {
            vendors: self.vendors.clone(),
            products: self.products.clone(),
        }
    }
}

impl CatalogStore for Catalog {
    fn product(&self, id: &ProductId) -> Option<&Product> {
        self.product_index.get(id).map(|&idx| &self.products[idx])
    }

    fn vendor(&self, id: &VendorId) -> Option<&Vendor> {
        self.vendor_index.get(id).map(|&idx| &self.vendors[idx])
    }
}

fn check_offer(product_id: &ProductId, offer: &VendorOffer) -> Result<(), CommerceError> {
    let invalid = |reason: &str| CommerceError::InvalidOffer {
        product_id: product_id.clone(),
        vendor_id: offer.vendor_id.clone(),
        reason: reason.to_string(),
    };

    if !offer.unit_price.is_positive() {
        return Err(invalid("unit price must be positive"));
    }
    if offer.stock < 0 {
        return Err(invalid("stock must not be negative"));
    }
    if let Some(bulk) = &offer.bulk {
        if bulk.quantity <= 1 {
            return Err(invalid("bulk quantity must be greater than one"));
        }
        if !bulk.price.is_positive() {
            return Err(invalid("bulk price must be positive"));
        }
        let regular = offer
            .unit_price
            .try_multiply(bulk.quantity)
            .ok_or(CommerceError::Overflow)?;
        if bulk.price >= regular {
            return Err(invalid("bulk price must be below unit price times bulk quantity"));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;

    fn vendors() -> Vec<Vendor> {
        vec![Vendor::new("1", "Ferretería Cruzval"), Vendor::new("2", "Ferretería Leandro")]
    }

    fn screws() -> Product {
        Product::new("1", "Tornillos 6.0 x 50", "Industrial", "Tornillería", WeightClass::Small)
            .with_offer(
                VendorOffer::new("1", Money::from_cents(23), 5000)
                    .with_bulk(100, Money::from_cents(1500)),
            )
    }

    #[test]
    fn test_catalog_lookup() {
        let catalog = Catalog::new(vendors(), vec![screws()]).unwrap();
        assert_eq!(catalog.len(), 1);
        assert!(catalog.product(&ProductId::new("1")).is_some());
        assert!(catalog.product(&ProductId::new("99")).is_none());
        assert_eq!(
            catalog.vendor(&VendorId::new("2")).map(|v| v.name.as_str()),
            Some("Ferretería Leandro")
        );
        let (_, offer) = catalog
            .offer(&ProductId::new("1"), &VendorId::new("1"))
            .unwrap();
        assert_eq!(offer.stock, 5000);
    }

    #[test]
    fn test_catalog_rejects_duplicate_product() {
        let result = Catalog::new(vendors(), vec![screws(), screws()]);
        assert!(matches!(result, Err(CommerceError::DuplicateProduct(_))));
    }

    #[test]
    fn test_catalog_rejects_unknown_vendor() {
        let product = Product::new("7", "Lija", "3M", "Pintura", WeightClass::Small)
            .with_offer(VendorOffer::new("9", Money::from_cents(150), 10));
        let result = Catalog::new(vendors(), vec![product]);
        assert!(matches!(result, Err(CommerceError::UnknownVendor { .. })));
    }

    #[test]
    fn test_catalog_rejects_empty_offers() {
        let product = Product::new("7", "Lija", "3M", "Pintura", WeightClass::Small);
        let result = Catalog::new(vendors(), vec![product]);
        assert!(matches!(result, Err(CommerceError::EmptyOffers(_))));
    }

    #[test]
    fn test_catalog_rejects_unprofitable_bulk() {
        let product = Product::new("7", "Clavos", "Industrial", "Tornillería", WeightClass::Small)
            .with_offer(
                VendorOffer::new("1", Money::from_cents(10), 100)
                    .with_bulk(100, Money::from_cents(1000)),
            );
        let result = Catalog::new(vendors(), vec![product]);
        assert!(matches!(result, Err(CommerceError::InvalidOffer { .. })));
    }

    #[test]
    fn test_catalog_from_toml_recomputes_savings() {
        let content = r#"
[[vendors]]
id = "1"
name = "Ferretería Cruzval"

[[products]]
id = "2"
name = "Clavo 2 pulgadas"
brand = "Industrial"
category = "Tornillería"
weight_class = "small"

[[products.offers]]
vendor_id = "1"
unit_price = "0.75"
stock = 8000

[products.offers.bulk]
quantity = 100
price = "30.00"
savings = "0"
"#;
        let catalog = Catalog::from_toml(content).unwrap();
        let product = catalog.product(&ProductId::new("2")).unwrap();
        let bulk = product.offers[0].bulk.as_ref().unwrap();
        assert_eq!(bulk.savings, Money::from_cents(4500));
    }

    #[test]
    fn test_catalog_categories() {
        let hammer = Product::new("3", "Martillo", "Stanley", "Herramientas Manuales", WeightClass::Small)
            .with_offer(VendorOffer::new("1", Money::from_cents(1200), 25));
        let catalog = Catalog::new(vendors(), vec![screws(), hammer]).unwrap();
        assert_eq!(catalog.categories(), vec!["Tornillería", "Herramientas Manuales"]);
        assert_eq!(catalog.by_category("tornillería").count(), 1);
    }
}
