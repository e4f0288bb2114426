//! CLI command implementations.

pub mod config;
pub mod id;
pub mod price;
pub mod quantity;
pub mod select;

use std::sync::Arc;

use anyhow::{anyhow, bail, Result};
use clap::{Args, Subcommand, ValueEnum};
use yard_catalog::catalog::Attribute;
use yard_catalog::pricing::Direction;
use yard_catalog::session::ShopperSession;

use crate::context::Context;

/// Which group to open and the choices to apply.
#[derive(Args, Debug, Clone)]
pub struct SelectionArgs {
    /// Product-group id, or a single product id with --product.
    pub group: String,

    /// Treat the id as a single product instead of a product group.
    #[arg(long)]
    pub product: bool,

    /// Attribute choice as attr=value (e.g., -s length=96 -s grade=#2).
    #[arg(short = 's', long = "choose", value_parser = parse_choice)]
    pub choices: Vec<(Attribute, String)>,

    /// Catalog file (default: catalog.path from config).
    #[arg(long)]
    pub catalog: Option<String>,
}

/// Arguments for the select command.
#[derive(Args)]
pub struct SelectArgs {
    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Pick each option from a prompt.
    #[arg(short, long)]
    pub interactive: bool,
}

/// Arguments for the price command.
#[derive(Args)]
pub struct PriceArgs {
    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Quantity to price (default: first purchasable quantity).
    #[arg(short, long)]
    pub quantity: Option<u64>,

    /// Show every facility's total, not just the best.
    #[arg(long)]
    pub all: bool,
}

/// Step direction.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepDirection {
    Up,
    Down,
}

impl From<StepDirection> for Direction {
    fn from(direction: StepDirection) -> Self {
        match direction {
            StepDirection::Up => Direction::Up,
            StepDirection::Down => Direction::Down,
        }
    }
}

/// Arguments for the quantity command.
#[derive(Args)]
pub struct QuantityArgs {
    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Quantity to start from (default: current session quantity).
    #[arg(long)]
    pub from: Option<u64>,

    /// Direction to search.
    #[arg(short, long, value_enum, default_value = "up")]
    pub direction: StepDirection,

    /// Number of increment/decrement steps to take after settling.
    #[arg(long, default_value = "0")]
    pub steps: u32,
}

/// Arguments for the id command.
#[derive(Args)]
pub struct IdArgs {
    /// Product-group id, or a single product id with --product.
    pub group: String,

    /// Treat the id as a single product instead of a product group.
    #[arg(long)]
    pub product: bool,

    /// Catalog file (default: catalog.path from config).
    #[arg(long)]
    pub catalog: Option<String>,

    /// Also print the canonical string each id is hashed from.
    #[arg(long)]
    pub canonical: bool,
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
        /// Config key (e.g., pricing.search_limit).
        key: String,
    },
    /// Set a config value.
    Set {
        /// Config key.
        key: String,
        /// Value to set.
        value: String,
    },
    /// Initialize a new config file.
    Init {
        /// Catalog file to point at.
        #[arg(long, default_value = "catalog.json")]
        catalog: String,
        /// Overwrite existing config.
        #[arg(short, long)]
        force: bool,
    },
    /// Validate configuration.
    Validate,
}

/// Parse `attr=value`.
pub fn parse_choice(input: &str) -> Result<(Attribute, String), String> {
    let (key, value) = input
        .split_once('=')
        .ok_or_else(|| format!("expected attr=value, got '{}'", input))?;
    let attribute = Attribute::from_key(key.trim())
        .ok_or_else(|| format!("unknown attribute '{}'", key.trim()))?;
    Ok((attribute, value.trim().to_string()))
}

/// Load the group and open a session with the requested choices applied.
pub async fn open_session(args: &SelectionArgs, ctx: &Context) -> Result<ShopperSession> {
    let group = ctx
        .load_group(args.catalog.as_deref(), &args.group, args.product)
        .await?;
    let category = group.category();
    ctx.output.debug(&format!(
        "Loaded {} ({}, {} keys)",
        group.id(),
        category,
        group.len()
    ));

    for (attribute, _) in &args.choices {
        if !category.identifying_attributes().contains(attribute) {
            bail!("{} does not apply to {} products", attribute, category);
        }
    }

    let mut session = ShopperSession::with_options(
        Arc::new(group),
        ctx.policy(),
        ctx.session_options(&args.group),
    )?;

    // Earlier selectors narrow later ones, so apply in cascade order.
    for attribute in category.identifying_attributes() {
        let Some((_, input)) = args.choices.iter().rev().find(|(a, _)| a == attribute) else {
            continue;
        };
        let Some(selector) = session.selectors().iter().find(|s| s.attribute == *attribute)
        else {
            ctx.output
                .warn(&format!("{} has a single option here; ignoring '{}'", attribute, input));
            continue;
        };
        let value = selector.option_matching(input).cloned().ok_or_else(|| {
            let options: Vec<String> = selector.options.iter().map(|o| selector.label(o)).collect();
            anyhow!(
                "'{}' is not available for {}. Options: {}",
                input,
                selector.display_name,
                options.join(", ")
            )
        })?;
        session.select_option(*attribute, value)?;
    }

    Ok(session)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_choice() {
        assert_eq!(
            parse_choice("length=96").unwrap(),
            (Attribute::Length, "96".to_string())
        );
        assert_eq!(
            parse_choice("FingerJoint = No").unwrap(),
            (Attribute::FingerJoint, "No".to_string())
        );
        assert_eq!(
            parse_choice("grade=#2=x").unwrap(),
            (Attribute::Grade, "#2=x".to_string())
        );
    }

    #[test]
    fn test_parse_choice_errors() {
        assert!(parse_choice("length").unwrap_err().contains("attr=value"));
        assert!(parse_choice("color=red").unwrap_err().contains("color"));
    }
}
