//! Catalog browsing commands.

use anyhow::{bail, Result};
use ferre_commerce::catalog::{cheapest_offer, OfferRow, Product};
use ferre_commerce::ProductId;

use super::{CatalogArgs, CatalogCommand};
use crate::context::Context;
use crate::output::format_stock;

/// Run the catalog command.
pub fn run(args: CatalogArgs, ctx: &Context) -> Result<()> {
    match args.command {
        CatalogCommand::List { category } => list_products(category.as_deref(), ctx),
        CatalogCommand::Compare { product } => compare(&product, ctx),
    }
}

fn list_products(category: Option<&str>, ctx: &Context) -> Result<()> {
    let engine = ctx.engine()?;
    let catalog = engine.catalog();

    let products: Vec<&Product> = match category {
        Some(category) => catalog.by_category(category).collect(),
        None => catalog.products().collect(),
    };

    if products.is_empty() {
        match category {
            Some(category) => bail!(
                "No products in category '{}'. Categories: {}",
                category,
                catalog.categories().join(", ")
            ),
            None => {
                ctx.output.info("Catalog is empty.");
                return Ok(());
            }
        }
    }

    if ctx.output.is_json() {
        ctx.output.json(&products);
        return Ok(());
    }

    ctx.output.header("Catálogo");
    let widths = [4, 34, 12, 8, 12, 6];
    ctx.output
        .table_row(&["ID", "PRODUCT", "BRAND", "WEIGHT", "FROM", "BULK"], &widths);
    ctx.output.info(&"-".repeat(86));

    for product in &products {
        let from = cheapest_offer(product)
            .map(|o| o.unit_price.to_string())
            .unwrap_or_else(|| "-".to_string());
        let bulk = if product.has_bulk_offer() { "yes" } else { "-" };
        ctx.output.table_row(
            &[
                product.id.as_str(),
                &product.name,
                &product.brand,
                product.weight_class.as_str(),
                &from,
                bulk,
            ],
            &widths,
        );
    }

    ctx.output.info("");
    ctx.output
        .info(&format!("Total: {} product(s)", products.len()));
    ctx.output
        .info("Run `ferre catalog compare <ID>` to see every vendor's offer.");

    Ok(())
}

fn compare(product: &str, ctx: &Context) -> Result<()> {
    let engine = ctx.engine()?;
    let comparison = engine.compare(&ProductId::new(product))?;

    if ctx.output.is_json() {
        ctx.output.json(&comparison);
        return Ok(());
    }

    ctx.output.header(&comparison.product_name);
    ctx.output.kv(
        "delivery",
        &engine.tariff().describe(comparison.weight_class, 1),
    );
    ctx.output.info("");

    for row in &comparison.rows {
        print_offer(row, ctx);
    }

    Ok(())
}

fn print_offer(row: &OfferRow, ctx: &Context) {
    let marker = if row.is_lowest_unit_price {
        " (lowest price)"
    } else {
        ""
    };
    let name = row.vendor_name.as_deref().unwrap_or("unknown vendor");
    ctx.output
        .list_item(&format!("{} [{}]{}", name, row.vendor_id, marker));
    if let Some(label) = &row.label {
        ctx.output.kv("offer", label);
    }
    ctx.output.kv("unit price", &row.unit_price.to_string());
    ctx.output.kv("stock", &format_stock(row.stock));
    ctx.output.kv("rating", &format!("{:.1}", row.rating));
    if let Some(delivery_time) = &row.delivery_time {
        ctx.output.kv("delivery time", delivery_time);
    }
    if let Some(bulk) = &row.bulk {
        ctx.output.kv(
            "bulk",
            &format!(
                "{} units for {} (regular {}, save {} / {}%)",
                bulk.bundle_quantity,
                bulk.bundle_price,
                bulk.regular_total,
                bulk.savings,
                bulk.savings_percent
            ),
        );
    }
}
