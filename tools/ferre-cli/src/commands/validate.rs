//! Validate the saved cart against the catalog.

use anyhow::{bail, Result};
use ferre_commerce::validation::CartValidationSummary;

use super::ValidateArgs;
use crate::context::Context;
use crate::output::{format_defect, status_badge};

/// Run the validate command.
pub fn run(args: ValidateArgs, ctx: &Context) -> Result<()> {
    let engine = ctx.engine()?;
    let cart = ctx.carts()?.get_or_default(ctx.session())?;

    let spinner = ctx.output.spinner("Checking cart against the catalog...");
    let summary = engine.validate(cart.lines());
    spinner.finish_and_clear();

    if ctx.output.is_json() {
        ctx.output.json(&summary);
    } else {
        print_summary(&summary, ctx);
    }

    if !summary.is_valid && !args.no_fail {
        if summary.is_repairable() {
            bail!(
                "Cart has {} defect(s). Run `ferre repair` to reload prices and stock.",
                summary.total_errors
            );
        }
        bail!(
            "Cart has {} defect(s), some need manual changes. Run `ferre repair` to drop lines the catalog no longer carries.",
            summary.total_errors
        );
    }

    Ok(())
}

/// Print the validation checklist.
pub fn print_summary(summary: &CartValidationSummary, ctx: &Context) {
    let status = if summary.is_valid { "valid" } else { "invalid" };
    ctx.output
        .header(&format!("Validation ({})", status_badge(status)));

    ctx.output.kv(
        "lines",
        &format!(
            "{} valid, {} invalid, {} total",
            summary.valid_items, summary.invalid_items, summary.total_items
        ),
    );
    ctx.output.kv("valid value", &summary.total_value.to_string());
    ctx.output
        .kv("estimated delivery", &summary.estimated_delivery.to_string());

    if summary.is_valid {
        if summary.total_items == 0 {
            ctx.output.info("Nothing to validate, the cart is empty.");
        } else {
            ctx.output.success("Every line matches the catalog");
        }
        return;
    }

    ctx.output.info("");
    if ctx.output.is_verbose() {
        for item in summary.items.iter().filter(|item| item.is_valid) {
            ctx.output.list_item(&format!("{} ok", item.line.key()));
        }
    }
    for item in summary.invalid_lines() {
        let name = if item.line.name.is_empty() {
            item.line.product_id.as_str()
        } else {
            item.line.name.as_str()
        };
        ctx.output.list_item(&format!("{} ({})", name, item.line.key()));
        for defect in &item.defects {
            ctx.output.kv("defect", &format_defect(item.index, defect));
        }
    }
}
