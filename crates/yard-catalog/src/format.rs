//! Distance formatting for option labels and detail tables.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Fractions are reduced from 32nds of an inch.
const FRACTION_DENOMINATOR: u64 = 32;

/// Format a distance given in inches (or millimetres when `metric`).
///
/// Imperial output is whole feet, whole inches and a reduced fraction of
/// 32nds, omitting zero parts: `30` is `2ft. 6in.`, `6.5` is `6-1/2in.`.
pub fn format_distance(distance: Decimal, metric: bool) -> String {
    if metric {
        return format!("{}mm", distance.normalize());
    }

    let twelve = Decimal::from(12);
    let feet = (distance / twelve).floor().to_u64().unwrap_or(0);
    let remaining = distance % twelve;
    let whole_inches = remaining.floor();
    let fractional = remaining - whole_inches;
    let whole_inches = whole_inches.to_u64().unwrap_or(0);

    let mut fraction = String::new();
    if fractional > Decimal::ZERO {
        let numerator = (fractional * Decimal::from(FRACTION_DENOMINATOR))
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_u64()
            .unwrap_or(0);
        let divisor = gcd(numerator, FRACTION_DENOMINATOR);
        if numerator / divisor > 0 {
            fraction = format!("{}/{}", numerator / divisor, FRACTION_DENOMINATOR / divisor);
        }
    }

    let mut result = String::new();
    if feet > 0 {
        result.push_str(&format!("{}ft.", feet));
    }

    let mut has_inches = false;
    if whole_inches > 0 {
        has_inches = true;
        if !result.is_empty() {
            result.push(' ');
        }
        result.push_str(&whole_inches.to_string());
    }

    if !fraction.is_empty() {
        if has_inches {
            result.push('-');
        } else if !result.is_empty() {
            result.push(' ');
        }
        has_inches = true;
        result.push_str(&fraction);
    }

    if has_inches {
        result.push_str("in.");
    }

    result
}

fn gcd(a: u64, b: u64) -> u64 {
    if b == 0 {
        a
    } else {
        gcd(b, a % b)
    }
}
