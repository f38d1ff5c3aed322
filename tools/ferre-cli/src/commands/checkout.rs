//! Check out the saved cart.

use anyhow::{bail, Result};
use dialoguer::{Confirm, Input};
use ferre_commerce::checkout::{Checkout, CheckoutOutcome, Fulfillment, OrderDraft};

use super::{repair, validate, CheckoutArgs};
use crate::context::Context;

/// Run the checkout command.
pub fn run(args: CheckoutArgs, ctx: &Context) -> Result<()> {
    let engine = ctx.engine()?;
    let carts = ctx.carts()?;

    let Some(record) = carts.get_versioned(ctx.session())? else {
        bail!("Your cart is empty. Add products with `ferre cart add`.");
    };
    let (cart, version) = (record.data, record.version);
    if cart.is_empty() {
        bail!("Your cart is empty. Add products with `ferre cart add`.");
    }

    let fulfillment = fulfillment(&args, ctx)?;
    let checkout = Checkout::new(&engine);

    // Step 1: validate
    ctx.output.step(1, 3, "Validating cart...");
    let spinner = ctx.output.spinner("Checking prices and stock...");
    let outcome = checkout.run(&cart, fulfillment)?;
    spinner.finish_and_clear();

    let draft = match outcome {
        CheckoutOutcome::Ready(draft) => draft,
        CheckoutOutcome::Blocked { summary, repaired } => {
            if ctx.output.is_json() {
                ctx.output.json(&serde_json::json!({
                    "status": "blocked",
                    "summary": summary,
                    "repaired": repaired,
                }));
            } else {
                validate::print_summary(&summary, ctx);
                repair::print_actions(&repaired, ctx);
            }
            bail!(
                "Checkout blocked by {} defect(s). Run `ferre repair` and try again.",
                summary.total_errors
            );
        }
    };

    // Step 2: confirm
    ctx.output.step(2, 3, "Order summary");
    print_draft(&draft, ctx);

    if !args.yes {
        if ctx.output.is_json() {
            bail!("Refusing to place an order without --yes in JSON mode");
        }
        let confirmed = Confirm::new()
            .with_prompt(format!(
                "Place order for {} ({})?",
                draft.totals.grand_total,
                draft.fulfillment.payment_label()
            ))
            .default(true)
            .interact()?;
        if !confirmed {
            ctx.output.info("Checkout cancelled.");
            return Ok(());
        }
    }

    // Step 3: place
    ctx.output.step(3, 3, "Placing order...");
    ctx.orders()?.save(draft.id.as_str(), draft.clone())?;
    let emptied = checkout.place(&draft, cart)?;
    carts.save_if_version(ctx.session(), emptied, version)?;

    if ctx.output.is_json() {
        ctx.output.json(&draft);
    } else {
        ctx.output.success(&format!("Order {} placed", draft.id));
        ctx.output
            .info(&format!("View it with `ferre orders show {}`.", draft.id));
    }

    Ok(())
}

fn fulfillment(args: &CheckoutArgs, ctx: &Context) -> Result<Fulfillment> {
    if args.pickup {
        return Ok(Fulfillment::StorePickup);
    }

    let address = match &args.address {
        Some(address) => address.clone(),
        None if ctx.output.is_json() => {
            bail!("Pass --address or --pickup in JSON mode");
        }
        None => Input::<String>::new()
            .with_prompt("Delivery address")
            .interact_text()?,
    };
    if address.trim().is_empty() {
        bail!("Delivery address must not be empty");
    }

    Ok(Fulfillment::HomeDelivery {
        address: address.trim().to_string(),
    })
}

/// Print an order draft.
pub fn print_draft(draft: &OrderDraft, ctx: &Context) {
    ctx.output.kv("order", draft.id.as_str());
    match &draft.fulfillment {
        Fulfillment::HomeDelivery { address } => ctx.output.kv("deliver to", address),
        Fulfillment::StorePickup => ctx.output.kv("pickup", "at the store"),
    }
    ctx.output.kv("payment", draft.fulfillment.payment_label());
    ctx.output.info("");

    for (line, pricing) in draft.lines.iter().zip(&draft.totals.lines) {
        ctx.output.list_item(&format!(
            "{} × {} [{}] = {}",
            line.quantity, line.name, line.vendor_id, pricing.total
        ));
    }

    ctx.output.info("");
    ctx.output.kv("subtotal", &draft.totals.subtotal.to_string());
    ctx.output
        .kv("delivery", &draft.totals.delivery_fee.to_string());
    ctx.output.kv("total", &draft.totals.grand_total.to_string());
}
