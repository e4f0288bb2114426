//! Money type for representing monetary values.
//!
//! Amounts are exact decimals, so tier arithmetic like `12 * 8.15` never
//! picks up binary floating-point error.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Supported currencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Currency {
    #[default]
    USD,
    CAD,
    EUR,
    GBP,
}

impl Currency {
    /// Get the currency code (e.g., "USD").
    pub fn code(&self) -> &'static str {
        match self {
            Currency::USD => "USD",
            Currency::CAD => "CAD",
            Currency::EUR => "EUR",
            Currency::GBP => "GBP",
        }
    }

    /// Get the currency symbol (e.g., "$").
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::USD => "$",
            Currency::CAD => "CA$",
            Currency::EUR => "\u{20ac}",
            Currency::GBP => "\u{00a3}",
        }
    }

    /// Parse a currency code string.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_uppercase().as_str() {
            "USD" => Some(Currency::USD),
            "CAD" => Some(Currency::CAD),
            "EUR" => Some(Currency::EUR),
            "GBP" => Some(Currency::GBP),
            _ => None,
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A monetary value with currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Money {
    /// Exact amount in major units (e.g., dollars).
    pub amount: Decimal,
    /// The currency.
    pub currency: Currency,
}

impl Money {
    /// Create a new Money value.
    pub fn new(amount: Decimal, currency: Currency) -> Self {
        Self { amount, currency }
    }

    /// Amount rounded half-up to cents.
    pub fn rounded(&self) -> Decimal {
        self.amount
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    }

    /// Format as a display string (e.g., "$49.99").
    pub fn display(&self) -> String {
        let rounded = self.rounded();
        if rounded.is_sign_negative() && !rounded.is_zero() {
            format!("-{}{:.2}", self.currency.symbol(), rounded.abs())
        } else {
            format!("{}{:.2}", self.currency.symbol(), rounded.abs())
        }
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_display() {
        let m = Money::new(Decimal::new(4999, 2), Currency::USD);
        assert_eq!(m.display(), "$49.99");

        let m = Money::new(Decimal::from(500), Currency::USD);
        assert_eq!(m.display(), "$500.00");
    }

    #[test]
    fn test_money_display_rounds_half_up() {
        let m = Money::new(Decimal::new(12345, 3), Currency::USD);
        assert_eq!(m.display(), "$12.35");
    }

    #[test]
    fn test_money_display_symbols() {
        let m = Money::new(Decimal::new(24005, 3), Currency::GBP);
        assert_eq!(m.display(), "\u{00a3}24.01");
        assert_eq!(m.to_string(), m.display());

        let m = Money::new(Decimal::new(-5, 1), Currency::CAD);
        assert_eq!(m.display(), "-CA$0.50");
    }

    #[test]
    fn test_currency_from_code() {
        assert_eq!(Currency::from_code("usd"), Some(Currency::USD));
        assert_eq!(Currency::from_code("CAD"), Some(Currency::CAD));
        assert_eq!(Currency::from_code("XYZ"), None);
    }
}
