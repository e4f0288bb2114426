//! Yard CLI - Command line tool for lumber and sheet-good catalogs.
//!
//! Commands:
//! - `yard select` - Resolve attribute choices to a variant
//! - `yard price` - Price a quantity across facilities
//! - `yard quantity` - Step to the next purchasable quantity
//! - `yard id` - Compute stable ids for a group's variants
//! - `yard config` - Manage configuration

mod commands;
mod config;
mod context;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{ConfigArgs, IdArgs, PriceArgs, QuantityArgs, SelectArgs};

/// Yard CLI - Resolve and price lumber and sheet-good variants
#[derive(Parser)]
#[command(name = "yard")]
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
    /// Resolve attribute choices to a variant
    Select(SelectArgs),

    /// Price a quantity across supplying facilities
    Price(PriceArgs),

    /// Find the next purchasable quantity
    Quantity(QuantityArgs),

    /// Compute stable ids for every key in a group
    Id(IdArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let output = output::Output::new(cli.verbose, cli.json);

    let config_path = cli.config.as_deref();
    let ctx = context::Context::load(config_path, output)?;

    let result = match cli.command {
        Commands::Select(args) => commands::select::run(args, &ctx).await,
        Commands::Price(args) => commands::price::run(args, &ctx).await,
        Commands::Quantity(args) => commands::quantity::run(args, &ctx).await,
        Commands::Id(args) => commands::id::run(args, &ctx).await,
        Commands::Config(args) => commands::config::run(args, &ctx).await,
    };

    if let Err(e) = result {
        ctx.output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}
