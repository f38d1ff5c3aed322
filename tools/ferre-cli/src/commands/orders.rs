//! Placed order drafts.

use anyhow::{Context as _, Result};
use ferre_commerce::checkout::OrderDraft;

use super::{checkout, OrdersArgs, OrdersCommand};
use crate::context::Context;

/// Run the orders command.
pub fn run(args: OrdersArgs, ctx: &Context) -> Result<()> {
    match args.command.unwrap_or(OrdersCommand::List) {
        OrdersCommand::List => list(ctx),
        OrdersCommand::Show { id } => show(&id, ctx),
    }
}

fn list(ctx: &Context) -> Result<()> {
    let orders = ctx.orders()?;

    let mut drafts: Vec<OrderDraft> = Vec::new();
    for id in orders.ids()? {
        if let Some(draft) = orders.get(&id)? {
            drafts.push(draft);
        }
    }
    drafts.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    if ctx.output.is_json() {
        ctx.output.json(&drafts);
        return Ok(());
    }

    if drafts.is_empty() {
        ctx.output.info("No orders yet. Run `ferre checkout` to place one.");
        return Ok(());
    }

    ctx.output.header("Orders");
    let widths = [18, 17, 14, 12];
    ctx.output
        .table_row(&["ID", "DATE", "MODE", "TOTAL"], &widths);
    for draft in &drafts {
        ctx.output.table_row(
            &[
                draft.id.as_str(),
                &draft.created_at.format("%Y-%m-%d %H:%M").to_string(),
                draft.fulfillment.as_str(),
                &draft.totals.grand_total.to_string(),
            ],
            &widths,
        );
    }

    Ok(())
}

fn show(id: &str, ctx: &Context) -> Result<()> {
    let draft = ctx
        .orders()?
        .get(id)?
        .with_context(|| format!("Order not found: {}", id))?;

    if ctx.output.is_json() {
        ctx.output.json(&draft);
        return Ok(());
    }

    ctx.output.header(&format!(
        "Order {} ({})",
        draft.id,
        draft.created_at.format("%Y-%m-%d %H:%M UTC")
    ));
    checkout::print_draft(&draft, ctx);
    Ok(())
}
