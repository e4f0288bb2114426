//! Pricing results.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::catalog::Variant;
use crate::money::{Currency, Money};

/// Cheapest total for a quantity and the variant that provides it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Quote<'a> {
    pub quantity: u64,
    pub total: Decimal,
    pub variant: &'a Variant,
}

impl Quote<'_> {
    /// Average price per piece; zero for an empty quote.
    pub fn unit_average(&self) -> Decimal {
        if self.quantity == 0 {
            return Decimal::ZERO;
        }
        self.total / Decimal::from(self.quantity)
    }

    pub fn money(&self, currency: Currency) -> Money {
        Money::new(self.total, currency)
    }
}

/// A larger quantity with a lower average unit price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Suggestion {
    /// Quantity to round up to.
    pub quantity: u64,
    /// Best total at that quantity.
    pub total: Decimal,
    /// Saved against buying `quantity` pieces at the current average.
    pub savings: Decimal,
}

impl Suggestion {
    /// Shopper-facing message, e.g. "Save $4.00 by rounding up to 12 pieces".
    pub fn message(&self, currency: Currency) -> String {
        format!(
            "Save {} by rounding up to {} pieces",
            Money::new(self.savings, currency).display(),
            self.quantity
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suggestion_message() {
        let s = Suggestion {
            quantity: 12,
            total: Decimal::from(96),
            savings: Decimal::new(24005, 3),
        };
        assert_eq!(
            s.message(Currency::USD),
            "Save $24.01 by rounding up to 12 pieces"
        );
        assert_eq!(
            s.message(Currency::GBP),
            "Save £24.01 by rounding up to 12 pieces"
        );
    }
}
