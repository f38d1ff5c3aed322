//! Repair the saved cart from catalog truth.

use anyhow::{bail, Result};
use dialoguer::Confirm;
use ferre_commerce::cart::Cart;
use ferre_commerce::validation::{DropReason, RepairAction, RepairReport};
use serde_json::json;
use tracing::info;

use super::RepairArgs;
use crate::context::Context;

/// Run the repair command.
pub fn run(args: RepairArgs, ctx: &Context) -> Result<()> {
    let engine = ctx.engine()?;
    let carts = ctx.carts()?;

    let (cart, version) = match carts.get_versioned(ctx.session())? {
        Some(record) => (record.data, record.version),
        None => (Cart::new(), 0),
    };

    let report = engine.repair_with_report(cart.lines());
    let mut repaired = Cart::from_lines(report.lines.clone());
    if args.drop_empty {
        repaired = repaired.without_empty_lines();
    }
    let changed = repaired != cart;

    if ctx.output.is_json() {
        ctx.output.json(&json!({
            "actions": report.actions,
            "lines": repaired.lines(),
            "changed": changed,
            "saved": changed && !args.dry_run && args.yes,
        }));
    } else {
        print_actions(&report, ctx);
    }

    if !changed {
        ctx.output.success("Cart already matches the catalog");
        return Ok(());
    }

    let empty = report.empty_lines().count();
    if empty > 0 && !args.drop_empty {
        ctx.output.warn(&format!(
            "{} line(s) have no stock left and stay in the cart. Use --drop-empty to remove them.",
            empty
        ));
    }

    if args.dry_run {
        ctx.output.info("Dry run, cart not saved.");
        return Ok(());
    }

    if !args.yes {
        if ctx.output.is_json() {
            bail!("Refusing to save a repaired cart without --yes in JSON mode");
        }
        let confirmed = Confirm::new()
            .with_prompt("Save the repaired cart?")
            .default(true)
            .interact()?;
        if !confirmed {
            ctx.output.info("Cart left unchanged.");
            return Ok(());
        }
    }

    carts.save_if_version(ctx.session(), repaired.clone(), version)?;
    info!(
        actions = report.actions.len(),
        lines = repaired.unique_line_count(),
        "cart repaired"
    );
    ctx.output.success(&format!(
        "Cart repaired: {} line(s), {} item(s)",
        repaired.unique_line_count(),
        repaired.item_count()
    ));

    Ok(())
}

/// Print what repair changed, or would change.
pub fn print_actions(report: &RepairReport, ctx: &Context) {
    if report.is_unchanged() {
        return;
    }

    ctx.output.header("Repairs");
    for action in &report.actions {
        ctx.output.list_item(&describe(action));
    }
}

fn describe(action: &RepairAction) -> String {
    match action {
        RepairAction::Dropped { key, reason } => {
            let why = match reason {
                DropReason::ProductNotFound => "product no longer in the catalog",
                DropReason::VendorOfferNotFound => "vendor no longer sells it",
            };
            format!("drop {}: {}", key, why)
        }
        RepairAction::Repriced { key, from, to } => {
            format!("reprice {}: {} -> {}", key, from, to)
        }
        RepairAction::Clamped {
            key,
            requested,
            available,
        } => format!("reduce {}: {} requested, {} in stock", key, requested, available),
    }
}
