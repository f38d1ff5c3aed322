//! Ferre CLI - Terminal storefront for the Ferretería Online cart engine.
//!
//! Commands:
//! - `ferre catalog` - Browse products and compare vendor offers
//! - `ferre cart` - Add, update and remove cart lines
//! - `ferre validate` - Check the cart against the catalog
//! - `ferre repair` - Reload prices and stock into the cart
//! - `ferre checkout` - Validate and place an order
//! - `ferre orders` - List placed orders
//! - `ferre config` - Manage configuration

mod commands;
mod config;
mod context;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{
    CartArgs, CatalogArgs, CheckoutArgs, ConfigArgs, OrdersArgs, RepairArgs, ValidateArgs,
};
use config::{LogFormat, LoggingConfig};

/// Ferre CLI - Shop hardware from several vendors in one cart
#[derive(Parser)]
#[command(name = "ferre")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse the catalog
    Catalog(CatalogArgs),

    /// Edit the cart
    Cart(CartArgs),

    /// Validate the cart against the catalog
    Validate(ValidateArgs),

    /// Repair the cart from catalog prices and stock
    Repair(RepairArgs),

    /// Validate the cart and place an order
    Checkout(CheckoutArgs),

    /// Show placed orders
    Orders(OrdersArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup output formatting
    let output = output::Output::new(cli.verbose, cli.json);

    // Load config
    let config_path = cli.config.as_deref();
    let ctx = context::Context::load(config_path, output)?;

    init_tracing(&ctx.config.logging, cli.verbose)?;
    if let Some(path) = &ctx.config_path {
        ctx.output
            .debug(&format!("Using config: {}", path.display()));
    }

    // Execute command
    let result = match cli.command {
        Commands::Catalog(args) => commands::catalog::run(args, &ctx),
        Commands::Cart(args) => commands::cart::run(args, &ctx),
        Commands::Validate(args) => commands::validate::run(args, &ctx),
        Commands::Repair(args) => commands::repair::run(args, &ctx),
        Commands::Checkout(args) => commands::checkout::run(args, &ctx),
        Commands::Orders(args) => commands::orders::run(args, &ctx),
        Commands::Config(args) => commands::config::run(args, &ctx),
    };

    if let Err(e) = result {
        ctx.output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}

/// Install the log subscriber. `RUST_LOG` wins over the config level;
/// `--verbose` wins over both.
fn init_tracing(logging: &LoggingConfig, verbose: bool) -> Result<()> {
    let filter = if verbose {
        EnvFilter::try_new("debug")?
    } else {
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&logging.level))?
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match logging.format {
        LogFormat::Human => builder.with_target(false).init(),
        LogFormat::Json => builder.json().init(),
    }

    Ok(())
}
