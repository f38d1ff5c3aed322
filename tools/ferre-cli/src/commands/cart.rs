//! Cart commands.

use anyhow::Result;
use ferre_commerce::cart::{Cart, CartTotals, LineKey, Tier};
use ferre_commerce::checkout::{CartEvent, CartState};
use ferre_commerce::{ProductId, VendorId};
use serde_json::json;
use tracing::debug;

use super::{CartArgs, CartCommand};
use crate::context::Context;
use crate::output::status_badge;

/// Run the cart command.
pub fn run(args: CartArgs, ctx: &Context) -> Result<()> {
    match args.command {
        CartCommand::Add {
            product,
            vendor,
            bulk,
            qty,
        } => add(&product, &vendor, bulk, qty, ctx),
        CartCommand::Set {
            product,
            vendor,
            qty,
        } => set_quantity(&product, &vendor, qty, ctx),
        CartCommand::Remove {
            product,
            vendor,
            bulk,
        } => remove(&product, &vendor, bulk, ctx),
        CartCommand::Show => show(ctx),
        CartCommand::Clear => clear(ctx),
    }
}

fn tier(bulk: bool) -> Tier {
    if bulk {
        Tier::Bulk
    } else {
        Tier::Unit
    }
}

fn add(product: &str, vendor: &str, bulk: bool, qty: Option<i64>, ctx: &Context) -> Result<()> {
    let engine = ctx.engine()?;
    let carts = ctx.carts()?;
    let product_id = ProductId::new(product);
    let vendor_id = VendorId::new(vendor);

    let cart = carts.try_update(ctx.session(), |cart| -> Result<Cart> {
        let state = cart.state().transition(CartEvent::LineAdded)?;
        debug!(state = %state, "line added");
        Ok(engine.add_to_cart(&cart, &product_id, &vendor_id, tier(bulk), qty)?)
    })?;

    let key = LineKey::new(product_id, vendor_id, tier(bulk));
    if let Some(line) = cart.line(&key) {
        ctx.output.success(&format!(
            "{} × {} from vendor {} ({} each{})",
            line.quantity,
            line.name,
            line.vendor_id,
            line.price,
            if line.tier.is_bulk() { " bundle" } else { "" },
        ));
    }
    print_cart(&cart, &engine.aggregate(cart.lines()), ctx);
    Ok(())
}

fn set_quantity(product: &str, vendor: &str, qty: i64, ctx: &Context) -> Result<()> {
    let engine = ctx.engine()?;
    let carts = ctx.carts()?;
    let key = LineKey::new(product, vendor, Tier::Unit);

    let cart = carts.try_update(ctx.session(), |cart| -> Result<Cart> {
        let updated = cart.with_quantity(&key, qty)?;
        check_lifecycle(&updated)?;
        Ok(updated)
    })?;

    if qty <= 0 {
        ctx.output.success(&format!("Removed {}", key));
    } else {
        ctx.output.success(&format!("Set {} to {}", key, qty));
    }
    print_cart(&cart, &engine.aggregate(cart.lines()), ctx);
    Ok(())
}

fn remove(product: &str, vendor: &str, bulk: bool, ctx: &Context) -> Result<()> {
    let engine = ctx.engine()?;
    let carts = ctx.carts()?;
    let key = LineKey::new(product, vendor, tier(bulk));

    let cart = carts.try_update(ctx.session(), |cart| -> Result<Cart> {
        let updated = cart.without_line(&key)?;
        check_lifecycle(&updated)?;
        Ok(updated)
    })?;

    ctx.output.success(&format!("Removed {}", key));
    print_cart(&cart, &engine.aggregate(cart.lines()), ctx);
    Ok(())
}

fn show(ctx: &Context) -> Result<()> {
    let engine = ctx.engine()?;
    let cart = ctx.carts()?.get_or_default(ctx.session())?;
    print_cart(&cart, &engine.aggregate(cart.lines()), ctx);
    Ok(())
}

fn clear(ctx: &Context) -> Result<()> {
    let carts = ctx.carts()?;
    let cart = carts.update(ctx.session(), Cart::cleared)?;
    ctx.output.success("Cart cleared");
    if ctx.output.is_json() {
        ctx.output.json(&json!({ "state": cart.state(), "lines": cart.lines() }));
    }
    Ok(())
}

/// Record the lifecycle event for an edit of a populated cart.
fn check_lifecycle(updated: &Cart) -> Result<()> {
    let event = if updated.is_empty() {
        CartEvent::LastLineRemoved
    } else {
        CartEvent::LineUpdated
    };
    let state = CartState::Populated.transition(event)?;
    debug!(state = %state, event = event.as_str(), "cart updated");
    Ok(())
}

/// Print cart lines and totals.
pub fn print_cart(cart: &Cart, totals: &CartTotals, ctx: &Context) {
    if ctx.output.is_json() {
        ctx.output.json(&json!({
            "state": cart.state(),
            "lines": cart.lines(),
            "totals": totals,
        }));
        return;
    }

    ctx.output
        .header(&format!("Cart ({})", status_badge(cart.state().as_str())));
    if cart.is_empty() {
        ctx.output.info("Your cart is empty.");
        ctx.output
            .info("Run `ferre catalog list` and `ferre cart add <product> <vendor>`.");
        return;
    }

    let widths = [4, 6, 5, 34, 7, 12, 12, 12];
    ctx.output.table_row(
        &["ID", "VENDOR", "TIER", "PRODUCT", "QTY", "PRICE", "EACH", "TOTAL"],
        &widths,
    );
    for (line, pricing) in cart.lines().iter().zip(&totals.lines) {
        ctx.output.table_row(
            &[
                line.product_id.as_str(),
                line.vendor_id.as_str(),
                line.tier.as_str(),
                &line.name,
                &line.quantity.to_string(),
                &line.price.to_string(),
                &pricing.effective_unit_price().to_string(),
                &pricing.total.to_string(),
            ],
            &widths,
        );
    }

    ctx.output.info("");
    ctx.output.kv("items", &totals.item_count.to_string());
    ctx.output.kv("subtotal", &totals.subtotal.to_string());
    ctx.output.kv("delivery", &delivery_label(totals));
    ctx.output.kv("total", &totals.grand_total.to_string());
}

fn delivery_label(totals: &CartTotals) -> String {
    format!(
        "{} ({:.1}% of total)",
        totals.delivery_fee,
        totals.delivery_share()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use ferre_commerce::prelude::*;

    #[test]
    fn test_delivery_label() {
        let engine = CartEngine::new(Catalog::demo().unwrap());
        let line = engine
            .price_selection(&ProductId::new(CEMENT), &VendorId::new(CRUZVAL), Tier::Unit, Some(12))
            .unwrap();
        let totals = engine.aggregate(&[line]);
        assert_eq!(delivery_label(&totals), "S/ 40.00 (10.0% of total)");
    }

    #[test]
    fn test_bulk_line_effective_unit_price() {
        let engine = CartEngine::new(Catalog::demo().unwrap());
        let line = engine
            .price_selection(&ProductId::new("1"), &VendorId::new(CRUZVAL), Tier::Bulk, None)
            .unwrap();
        let totals = engine.aggregate(&[line]);
        assert_eq!(totals.lines[0].effective_unit_price(), Money::from_cents(15));
    }
}
