//! Tiered pricing over the variants at one resolved key.
//!
//! Contains the pricing engine, quotes, and discount suggestions.

mod engine;
mod quote;

pub use engine::{cost_for_variant, Direction, PricingConfig, PricingEngine};
pub use quote::{Quote, Suggestion};

use rust_decimal::Decimal;

/// Tolerance used when comparing average unit prices.
pub const DEFAULT_EPSILON: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Upper bound on upward quantity scans when no variant caps inventory.
pub const DEFAULT_SEARCH_LIMIT: u64 = 100_000;
