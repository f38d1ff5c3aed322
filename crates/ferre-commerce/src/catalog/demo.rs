//! Built-in reference catalog: two ferreterías in Trujillo and six products.

use crate::catalog::{Catalog, Product, Vendor, VendorOffer, WeightClass};
use crate::error::CommerceError;
use crate::money::Money;

/// Vendor id of Ferretería Cruzval.
pub const CRUZVAL: &str = "1";
/// Vendor id of Ferretería Leandro.
pub const LEANDRO: &str = "2";

/// Product id of the heavy cement bag.
pub const CEMENT: &str = "6";

impl Catalog {
    /// The reference catalog used when no catalog file is configured.
    pub fn demo() -> Result<Self, CommerceError> {
        Catalog::new(demo_vendors(), demo_products())
    }
}

fn demo_vendors() -> Vec<Vendor> {
    vec![
        Vendor::new(CRUZVAL, "Ferretería Cruzval")
            .with_location("Av. Colibris #551, Victor Larco Herrera, Trujillo")
            .with_delivery_time("2-4 horas")
            .verified(),
        Vendor::new(LEANDRO, "Ferretería Leandro")
            .with_location("Av. Juan Pablo II #1520")
            .with_delivery_time("3-5 horas")
            .verified(),
    ]
}

fn demo_products() -> Vec<Product> {
    vec![
        Product::new("1", "Tornillos 6.0 x 50", "Industrial", "Tornillería", WeightClass::Small)
            .with_offer(
                VendorOffer::new(CRUZVAL, Money::from_cents(23), 5000)
                    .with_bulk(100, Money::from_cents(1500))
                    .with_rating(4.8),
            )
            .with_offer(
                VendorOffer::new(LEANDRO, Money::from_cents(80), 3200)
                    .with_bulk(100, Money::from_cents(5217))
                    .with_rating(4.6),
            )
            .with_specs(&["Acero galvanizado", "6.0mm x 50mm", "Rosca estándar"]),
        Product::new("2", "Clavo 2 pulgadas", "Industrial", "Tornillería", WeightClass::Small)
            .with_offer(
                VendorOffer::new(CRUZVAL, Money::from_cents(75), 8000)
                    .with_bulk(100, Money::from_cents(3000))
                    .with_rating(4.7),
            )
            .with_offer(
                VendorOffer::new(LEANDRO, Money::from_cents(30), 6500)
                    .with_bulk(100, Money::from_cents(1200))
                    .with_rating(4.5),
            )
            .with_specs(&["Acero al carbono", "2 pulgadas longitud", "Punta diamante"]),
        Product::new("3", "Martillo", "Stanley", "Herramientas Manuales", WeightClass::Small)
            .with_offer(
                VendorOffer::new(CRUZVAL, Money::from_cents(1200), 25)
                    .with_rating(4.6)
                    .with_label("Martillo pequeño"),
            )
            .with_offer(
                VendorOffer::new(LEANDRO, Money::from_cents(2500), 18)
                    .with_rating(4.8)
                    .with_label("Martillo Stanley"),
            )
            .with_specs(&["Mango antideslizante", "Cabeza forjada", "Peso balanceado"]),
        Product::new("4", "Destornillador", "Stanley", "Herramientas Manuales", WeightClass::Small)
            .with_offer(
                VendorOffer::new(CRUZVAL, Money::from_cents(550), 45)
                    .with_rating(4.4)
                    .with_label("Destornillador estrella"),
            )
            .with_offer(
                VendorOffer::new(LEANDRO, Money::from_cents(500), 38)
                    .with_rating(4.3)
                    .with_label("Destornillador Pretul 3 pulgadas"),
            )
            .with_specs(&["Punta magnética", "Mango ergonómico", "Acero templado"]),
        Product::new(
            "5",
            "Alicate Stanley 7 pulgadas",
            "Stanley",
            "Herramientas Manuales",
            WeightClass::Small,
        )
        .with_offer(VendorOffer::new(CRUZVAL, Money::from_cents(3500), 20).with_rating(4.9))
        .with_offer(VendorOffer::new(LEANDRO, Money::from_cents(3000), 15).with_rating(4.8))
        .with_specs(&["7 pulgadas", "Acero forjado", "Mandíbulas dentadas", "Mango aislado"]),
        Product::new(CEMENT, "Bolsa de Cemento PACASMAYO", "Pacasmayo", "Construcción", WeightClass::Heavy)
            .with_offer(
                VendorOffer::new(CRUZVAL, Money::from_cents(3000), 100)
                    .with_rating(4.7)
                    .with_label("Cemento PACASMAYO azul"),
            )
            .with_offer(
                VendorOffer::new(LEANDRO, Money::from_cents(3450), 85)
                    .with_rating(4.6)
                    .with_label("Cemento PACASMAYO azul"),
            )
            .with_specs(&["42.5kg", "Cemento Portland", "Alta resistencia", "Fraguado rápido"]),
    ]
}

impl Product {
    fn with_specs(mut self, specs: &[&str]) -> Self {
        self.specifications = specs.iter().map(|s| (*s).to_string()).collect();
        self
    }
}
