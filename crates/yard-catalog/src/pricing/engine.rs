//! Best-price search, purchasable quantities, and discount suggestions.

use std::collections::BTreeSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Quote, Suggestion, DEFAULT_EPSILON, DEFAULT_SEARCH_LIMIT};
use crate::catalog::Variant;
use crate::error::PricingError;
use crate::events::{CatalogEvent, EventSink, TracingSink};

/// Pricing knobs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingConfig {
    /// Tolerance when comparing average unit prices.
    pub epsilon: Decimal,
    /// Ceiling on upward scans when inventory is unbounded.
    pub search_limit: u64,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            epsilon: DEFAULT_EPSILON,
            search_limit: DEFAULT_SEARCH_LIMIT,
        }
    }
}

/// Which way a quantity search moves first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

/// Cost of `quantity` pieces from one variant, filling from the largest
/// pack size down.
pub fn cost_for_variant(variant: &Variant, quantity: u64) -> Result<Decimal, PricingError> {
    let mut remaining = quantity;
    let mut total = Decimal::ZERO;
    for tier in variant.tiers().iter().rev() {
        let packs = remaining / tier.pack_size;
        remaining %= tier.pack_size;
        total += tier.pack_price() * Decimal::from(packs);
    }

    if remaining != 0 {
        return Err(PricingError::Indivisible {
            quantity,
            remainder: remaining,
        });
    }
    Ok(total)
}

/// Prices quantities across every facility variant at one key.
///
/// All queries are pure functions of the variants and the quantity;
/// nothing is cached between calls.
pub struct PricingEngine<'a> {
    variants: &'a [Variant],
    config: PricingConfig,
    sink: &'a dyn EventSink,
}

impl<'a> PricingEngine<'a> {
    pub fn new(variants: &'a [Variant]) -> Self {
        Self {
            variants,
            config: PricingConfig::default(),
            sink: &TracingSink,
        }
    }

    pub fn with_config(mut self, config: PricingConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_sink(mut self, sink: &'a dyn EventSink) -> Self {
        self.sink = sink;
        self
    }

    pub fn variants(&self) -> &'a [Variant] {
        self.variants
    }

    pub fn config(&self) -> &PricingConfig {
        &self.config
    }

    /// Cheapest total for `quantity`, or `None` when no variant can supply it.
    ///
    /// A variant is eligible when the quantity is a multiple of its smallest
    /// pack size and its inventory covers the quantity. Ties keep the
    /// earlier variant.
    pub fn best_price(&self, quantity: u64) -> Option<Quote<'a>> {
        let mut best: Option<Quote<'a>> = None;
        for variant in self.variants {
            if !variant.can_supply(quantity) {
                continue;
            }

            let total = match cost_for_variant(variant, quantity) {
                Ok(total) => total,
                Err(_) => {
                    self.sink.emit(&CatalogEvent::IndivisibleQuantity {
                        variant: variant.id().to_string(),
                        quantity,
                    });
                    continue;
                }
            };

            if best.map_or(true, |b| total < b.total) {
                best = Some(Quote {
                    quantity,
                    total,
                    variant,
                });
            }
        }
        best
    }

    pub fn is_purchasable(&self, quantity: u64) -> bool {
        quantity > 0 && self.best_price(quantity).is_some()
    }

    /// Largest inventory cap, or `None` if any variant is unlimited.
    pub fn max_inventory(&self) -> Option<u64> {
        self.variants
            .iter()
            .map(Variant::inventory)
            .try_fold(0u64, |max, inventory| inventory.map(|i| max.max(i)))
    }

    /// Distinct pack sizes across all variants, ascending.
    pub fn pack_sizes(&self) -> Vec<u64> {
        self.variants
            .iter()
            .flat_map(|v| v.tiers().iter().map(|t| t.pack_size))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Pack sizes as a label, e.g. "1pc, 12pc, 50pc".
    pub fn pack_sizes_label(&self) -> String {
        self.pack_sizes()
            .iter()
            .map(|size| format!("{size}pc"))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Nearest purchasable quantity from `start`, moving in `direction`.
    ///
    /// Moving up is capped by the largest inventory (or `search_limit`
    /// steps when inventory is unbounded); past the cap the search turns
    /// back down. Moving down stops at 1 and then turns back up.
    pub fn next_allowed_quantity(&self, start: u64, direction: Direction) -> Option<u64> {
        let ceiling = self.ceiling(start);
        let found = match direction {
            Direction::Up => {
                let from = start.max(1);
                self.scan_up(from, ceiling)
                    .or_else(|| self.scan_down(from.saturating_sub(1).min(ceiling)))
            }
            Direction::Down => self
                .scan_down(start.min(ceiling))
                .or_else(|| self.scan_up(1, ceiling)),
        };

        if found.is_none() {
            self.sink.emit(&CatalogEvent::QuantitySearchExhausted {
                start,
                limit: ceiling,
            });
        }
        found
    }

    /// At most one larger quantity whose average unit price beats the
    /// current one by more than epsilon.
    pub fn discount_suggestion(&self, current: u64) -> Option<Suggestion> {
        if current == 0 {
            return None;
        }
        let current_avg = self.best_price(current)?.unit_average();
        let epsilon = self.config.epsilon;
        let span = self
            .variants
            .iter()
            .map(Variant::largest_pack)
            .max()
            .unwrap_or(0);

        for quantity in (current + 1)..=current.saturating_add(span) {
            let Some(quote) = self.best_price(quantity) else {
                continue;
            };
            if quote.unit_average() >= current_avg - epsilon {
                continue;
            }
            let savings = current_avg * Decimal::from(quantity) - quote.total;
            if savings > epsilon {
                return Some(Suggestion {
                    quantity,
                    total: quote.total,
                    savings,
                });
            }
        }
        None
    }

    fn ceiling(&self, start: u64) -> u64 {
        self.max_inventory()
            .unwrap_or_else(|| start.max(1).saturating_add(self.config.search_limit))
    }

    fn scan_up(&self, from: u64, to: u64) -> Option<u64> {
        (from.max(1)..=to).find(|&q| self.is_purchasable(q))
    }

    fn scan_down(&self, from: u64) -> Option<u64> {
        (1..=from).rev().find(|&q| self.is_purchasable(q))
    }
}
