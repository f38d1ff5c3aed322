//! CLI command implementations.

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod orders;
pub mod repair;
pub mod validate;

use clap::{Args, Subcommand};

/// Arguments for the catalog command.
#[derive(Args)]
pub struct CatalogArgs {
    #[command(subcommand)]
    pub command: CatalogCommand,
}

#[derive(Subcommand)]
pub enum CatalogCommand {
    /// List products.
    List {
        /// Only products in this category.
        #[arg(short, long)]
        category: Option<String>,
    },
    /// Compare vendor offers for a product.
    Compare {
        /// Product ID.
        product: String,
    },
}

/// Arguments for the cart command.
#[derive(Args)]
pub struct CartArgs {
    #[command(subcommand)]
    pub command: CartCommand,
}

#[derive(Subcommand)]
pub enum CartCommand {
    /// Add a product from a vendor.
    Add {
        /// Product ID.
        product: String,
        /// Vendor ID.
        vendor: String,
        /// Buy the vendor's bulk bundle.
        #[arg(long, conflicts_with = "qty")]
        bulk: bool,
        /// Units to add (unit purchases only).
        #[arg(short, long)]
        qty: Option<i64>,
    },
    /// Set the quantity of a unit line. Zero removes it.
    Set {
        /// Product ID.
        product: String,
        /// Vendor ID.
        vendor: String,
        /// New quantity.
        #[arg(allow_negative_numbers = true)]
        qty: i64,
    },
    /// Remove a line.
    Remove {
        /// Product ID.
        product: String,
        /// Vendor ID.
        vendor: String,
        /// Remove the bulk line instead of the unit line.
        #[arg(long)]
        bulk: bool,
    },
    /// Show the cart with totals.
    Show,
    /// Remove every line.
    Clear,
}

/// Arguments for the validate command.
#[derive(Args)]
pub struct ValidateArgs {
    /// Exit successfully even when defects are found.
    #[arg(long)]
    pub no_fail: bool,
}

/// Arguments for the repair command.
#[derive(Args)]
pub struct RepairArgs {
    /// Skip confirmation prompt.
    #[arg(short, long)]
    pub yes: bool,

    /// Also remove lines left with zero quantity.
    #[arg(long)]
    pub drop_empty: bool,

    /// Show the proposed repair without saving it.
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the checkout command.
#[derive(Args)]
pub struct CheckoutArgs {
    /// Pick up at the store instead of home delivery.
    #[arg(long, conflicts_with = "address")]
    pub pickup: bool,

    /// Delivery address.
    #[arg(short, long)]
    pub address: Option<String>,

    /// Skip confirmation prompt.
    #[arg(short, long)]
    pub yes: bool,
}

/// Arguments for the orders command.
#[derive(Args)]
pub struct OrdersArgs {
    #[command(subcommand)]
    pub command: Option<OrdersCommand>,
}

#[derive(Subcommand)]
pub enum OrdersCommand {
    /// List placed orders.
    List,
    /// Show one order.
    Show {
        /// Order ID (ROF-...).
        id: String,
    },
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration.
    Show,
    /// Get a config value.
    Get {
        /// Config key (dot-separated).
        key: String,
    },
    /// Initialize a new config file.
    Init {
        /// Force overwrite existing config.
        #[arg(short, long)]
        force: bool,
    },
    /// Validate the config file.
    Validate,
}
