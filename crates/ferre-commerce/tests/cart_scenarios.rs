//! End-to-end cart scenarios against the demo and hand-built catalogs.

use ferre_commerce::prelude::*;
use ferre_commerce::validation::{DropReason, RepairAction};

fn engine() -> CartEngine<Catalog> {
    CartEngine::new(Catalog::demo().unwrap())
}

fn add(engine: &CartEngine<Catalog>, cart: &Cart, product: &str, vendor: &str, tier: Tier, qty: Option<i64>) -> Cart {
    engine
        .add_to_cart(cart, &ProductId::new(product), &VendorId::new(vendor), tier, qty)
        .unwrap()
}

#[test]
fn test_bulk_screws_scenario() {
    let engine = engine();
    let line = engine
        .price_selection(&ProductId::new("1"), &VendorId::new(CRUZVAL), Tier::Bulk, Some(7))
        .unwrap();
    assert_eq!(line.price, Money::from_cents(1500));
    assert_eq!(line.quantity, 100);

    let cart = Cart::new().with_line(line);
    assert_eq!(engine.delivery_for_cart(cart.lines()), Money::from_cents(1000));

    let totals = engine.aggregate(cart.lines());
    assert_eq!(totals.subtotal, Money::from_cents(1500));
    assert_eq!(totals.delivery_fee, Money::from_cents(1000));
    assert_eq!(totals.grand_total, Money::from_cents(2500));
}

#[test]
fn test_heavy_cement_scenario() {
    let engine = engine();
    let cart = add(&engine, &Cart::new(), CEMENT, CRUZVAL, Tier::Unit, Some(12));

    assert_eq!(engine.delivery_for_cart(cart.lines()), Money::from_cents(4000));
    let totals = engine.aggregate(cart.lines());
    assert_eq!(totals.subtotal, Money::from_cents(36000));
    assert_eq!(totals.grand_total, Money::from_cents(40000));
}

#[test]
fn test_heavy_threshold_boundary() {
    let engine = engine();
    let nine = add(&engine, &Cart::new(), CEMENT, LEANDRO, Tier::Unit, Some(9));
    let ten = add(&engine, &nine, CEMENT, LEANDRO, Tier::Unit, Some(1));

    assert_eq!(engine.delivery_for_cart(nine.lines()), Money::from_cents(1000));
    assert_eq!(engine.delivery_for_cart(ten.lines()), Money::from_cents(4000));
}

#[test]
fn test_priced_cart_is_valid() {
    let engine = engine();
    let cart = add(&engine, &Cart::new(), "1", CRUZVAL, Tier::Bulk, None);
    let cart = add(&engine, &cart, "2", LEANDRO, Tier::Unit, Some(40));
    let cart = add(&engine, &cart, "3", LEANDRO, Tier::Unit, None);
    let cart = add(&engine, &cart, CEMENT, CRUZVAL, Tier::Unit, Some(3));

    let summary = engine.validate(cart.lines());
    assert!(summary.is_valid);
    assert_eq!(summary.total_errors, 0);
    assert_eq!(summary.valid_items, 4);
    assert_eq!(
        summary.total_value,
        engine.aggregate(cart.lines()).subtotal
    );
}

#[test]
fn test_price_tolerance_boundary() {
    let engine = engine();
    let line = engine
        .price_selection(&ProductId::new("3"), &VendorId::new(CRUZVAL), Tier::Unit, Some(2))
        .unwrap();

    let off_by_two_cents = line.clone().with_price(Money::from_cents(1202));
    let summary = engine.validate(&[off_by_two_cents]);
    assert!(!summary.is_valid);
    assert!(summary
        .defects()
        .any(|(_, d)| d.category() == DefectCategory::PriceMismatch));

    let half_cent = line.with_price(Money::new("12.005".parse().unwrap()));
    let summary = engine.validate(&[half_cent]);
    assert!(summary.is_valid);
    assert!(summary.items[0].price_matches_catalog);
}

#[test]
fn test_repair_drops_only_unknown_product() {
    let engine = engine();
    let cart = add(&engine, &Cart::new(), "4", CRUZVAL, Tier::Unit, Some(2));
    let cart = add(&engine, &cart, "5", LEANDRO, Tier::Unit, Some(1));
    let ghost = CartLineItem {
        product_id: ProductId::new("999"),
        vendor_id: VendorId::new(CRUZVAL),
        price: Money::from_cents(100),
        quantity: 1,
        name: "Ghost".into(),
        ..Default::default()
    };
    let lines: Vec<CartLineItem> = cart
        .lines()
        .iter()
        .cloned()
        .chain(std::iter::once(ghost))
        .collect();

    let report = engine.repair_with_report(&lines);
    assert_eq!(report.lines, cart.lines());
    assert_eq!(report.dropped(), 1);
    assert!(matches!(
        report.actions.as_slice(),
        [RepairAction::Dropped {
            reason: DropReason::ProductNotFound,
            ..
        }]
    ));
}

#[test]
fn test_repair_clamps_to_stock() {
    let engine = engine();
    let line = engine
        .price_selection(&ProductId::new("3"), &VendorId::new(LEANDRO), Tier::Unit, Some(30))
        .unwrap();
    assert!(!engine.validate(&[line.clone()]).is_valid);

    let repaired = engine.repair(&[line]);
    assert_eq!(repaired.len(), 1);
    assert_eq!(repaired[0].quantity, 18);
    assert!(engine.validate(&repaired).is_valid);
}

#[test]
fn test_repair_keeps_line_with_no_stock() {
    let catalog = Catalog::new(
        vec![Vendor::new("v1", "Ferretería Sin Stock")],
        vec![Product::new("p1", "Lija", "3M", "Abrasivos", WeightClass::Small)
            .with_offer(VendorOffer::new("v1", Money::from_cents(250), 0))],
    )
    .unwrap();
    let engine = CartEngine::new(catalog);

    let line = CartLineItem {
        product_id: ProductId::new("p1"),
        vendor_id: VendorId::new("v1"),
        price: Money::from_cents(250),
        quantity: 4,
        name: "Lija".into(),
        ..Default::default()
    };

    let report = engine.repair_with_report(&[line]);
    assert_eq!(report.lines.len(), 1);
    assert_eq!(report.lines[0].quantity, 0);
    assert_eq!(report.empty_lines().count(), 1);

    // Still invalid, so checkout stays blocked until the shopper removes it.
    let summary = engine.validate(&report.lines);
    assert!(summary
        .defects()
        .any(|(_, d)| d.category() == DefectCategory::InvalidQuantity));

    let cleaned = Cart::from_lines(report.lines).without_empty_lines();
    assert!(cleaned.is_empty());
}

#[test]
fn test_bulk_without_tier() {
    let engine = engine();
    let err = engine
        .add_to_cart(&Cart::new(), &ProductId::new("5"), &VendorId::new(CRUZVAL), Tier::Bulk, None)
        .unwrap_err();
    assert!(matches!(err, CommerceError::BulkUnavailable { .. }));

    let forged = CartLineItem {
        product_id: ProductId::new("5"),
        vendor_id: VendorId::new(CRUZVAL),
        tier: Tier::Bulk,
        price: Money::from_cents(3500),
        quantity: 10,
        bundle_size: Some(10),
        name: "Alicate Stanley 7 pulgadas".into(),
        ..Default::default()
    };
    let summary = engine.validate(&[forged.clone()]);
    assert_eq!(
        summary.defects().map(|(_, d)| d.clone()).collect::<Vec<_>>(),
        vec![Defect::BulkUnavailable]
    );

    let repaired = engine.repair(&[forged]);
    assert_eq!(repaired[0].price, Money::from_cents(3500));
    assert_eq!(repaired[0].bundle_size, None);
}

#[test]
fn test_aggregate_is_idempotent() {
    let engine = engine();
    let cart = add(&engine, &Cart::new(), "2", CRUZVAL, Tier::Bulk, None);
    let cart = add(&engine, &cart, CEMENT, LEANDRO, Tier::Unit, Some(2));
    let snapshot = cart.clone();

    let first = engine.aggregate(cart.lines());
    let second = engine.aggregate(cart.lines());
    assert_eq!(first, second);
    assert_eq!(cart, snapshot);
}

#[test]
fn test_checkout_blocked_then_ready() {
    let engine = engine();
    let checkout = Checkout::new(&engine);
    let cart = add(&engine, &Cart::new(), "3", CRUZVAL, Tier::Unit, Some(40));

    let outcome = checkout.run(&cart, Fulfillment::StorePickup).unwrap();
    assert_eq!(outcome.state(), CartState::Populated);
    let CheckoutOutcome::Blocked { summary, repaired } = outcome else {
        panic!("expected checkout to be blocked");
    };
    assert_eq!(summary.total_errors, 1);
    assert_eq!(repaired.lines[0].quantity, 25);

    let cart = Cart::from_lines(repaired.lines);
    let outcome = checkout
        .run(
            &cart,
            Fulfillment::HomeDelivery {
                address: "Av. España 123, Trujillo".into(),
            },
        )
        .unwrap();
    assert_eq!(outcome.state(), CartState::CheckedOut);
    let draft = outcome.into_draft().unwrap();
    assert_eq!(draft.totals.grand_total, Money::from_cents(31000));
    assert!(draft.id.as_str().starts_with("ROF-"));

    let cart = checkout.place(&draft, cart).unwrap();
    assert!(cart.is_empty());
}

#[test]
fn test_checkout_rejects_empty_cart() {
    let engine = engine();
    let err = Checkout::new(&engine)
        .run(&Cart::new(), Fulfillment::StorePickup)
        .unwrap_err();
    assert!(matches!(err, CommerceError::InvalidCartTransition { .. }));
}

#[test]
fn test_malformed_snapshot_reports_defects() {
    let engine = engine();
    let snapshot = serde_json::json!([
        { "product_id": "3", "vendor_id": CRUZVAL, "name": "Martillo", "price": null, "quantity": 2 },
        { "product_id": "3", "vendor_id": LEANDRO, "name": "Martillo", "price": "25.00", "quantity": 2.5 },
        { "product_id": "5", "vendor_id": CRUZVAL, "name": "Alicate", "price": "abc", "quantity": "uno" }
    ]);
    let lines: Vec<CartLineItem> = serde_json::from_value(snapshot).unwrap();

    let summary = engine.validate(&lines);
    assert!(!summary.is_valid);
    assert_eq!(summary.invalid_items, 3);
    let has = |index: usize, category: DefectCategory| {
        summary.items[index]
            .defects
            .iter()
            .any(|d| d.category() == category)
    };
    assert!(has(0, DefectCategory::InvalidPrice));
    assert!(has(1, DefectCategory::InvalidQuantity));
    assert!(has(2, DefectCategory::InvalidPrice));
    assert!(has(2, DefectCategory::InvalidQuantity));
}
