//! Attribute values.

use rust_decimal::Decimal;
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// The value a variant holds for one identifying attribute.
///
/// `Absent` is its own bucket: variants missing an attribute group
/// together and render as `None`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(untagged)]
pub enum AttrValue {
    Absent,
    Number(Decimal),
    Text(String),
    Flag(bool),
}

impl AttrValue {
    /// Text value, with empty strings reading as absent.
    pub fn text(value: Option<&str>) -> Self {
        match value {
            Some(s) if !s.is_empty() => AttrValue::Text(s.to_string()),
            _ => AttrValue::Absent,
        }
    }

    /// Numeric value, with zero reading as absent.
    pub fn number(value: Decimal) -> Self {
        if value.is_zero() {
            AttrValue::Absent
        } else {
            AttrValue::Number(value.normalize())
        }
    }

    /// Flag value, with `false` reading as absent.
    pub fn flag(value: bool) -> Self {
        if value {
            AttrValue::Flag(true)
        } else {
            AttrValue::Absent
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, AttrValue::Absent)
    }

    pub fn as_number(&self) -> Option<Decimal> {
        match self {
            AttrValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Parse user input: `None` is absent, numbers and booleans are typed,
    /// anything else is text.
    pub fn parse(input: &str) -> Self {
        let input = input.trim();
        if input.is_empty() || input == "None" {
            return AttrValue::Absent;
        }
        if let Ok(n) = Decimal::from_str(input) {
            return AttrValue::number(n);
        }
        match input {
            "true" => AttrValue::Flag(true),
            "false" => AttrValue::Absent,
            _ => AttrValue::Text(input.to_string()),
        }
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrValue::Absent => write!(f, "None"),
            AttrValue::Number(n) => write!(f, "{}", n.normalize()),
            AttrValue::Text(s) => write!(f, "{}", s),
            AttrValue::Flag(b) => write!(f, "{}", b),
        }
    }
}

impl From<&str> for AttrValue {
    fn from(s: &str) -> Self {
        AttrValue::text(Some(s))
    }
}

impl From<Decimal> for AttrValue {
    fn from(n: Decimal) -> Self {
        AttrValue::number(n)
    }
}

impl From<i64> for AttrValue {
    fn from(n: i64) -> Self {
        AttrValue::number(Decimal::from(n))
    }
}

/// Sort selector options: numeric ascending when every value is a number,
/// otherwise by display string.
pub fn sort_options(values: &mut [AttrValue]) {
    let all_numeric = values.iter().all(|v| matches!(v, AttrValue::Number(_)));
    if all_numeric {
        values.sort_by(|a, b| match (a, b) {
            (AttrValue::Number(x), AttrValue::Number(y)) => x.cmp(y),
            _ => Ordering::Equal,
        });
    } else {
        values.sort_by_cached_key(|v| v.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_buckets() {
        assert_eq!(AttrValue::text(None), AttrValue::Absent);
        assert_eq!(AttrValue::text(Some("")), AttrValue::Absent);
        assert_eq!(AttrValue::flag(false), AttrValue::Absent);
        assert_eq!(AttrValue::number(Decimal::ZERO), AttrValue::Absent);
        assert_eq!(AttrValue::Absent.to_string(), "None");
    }

    #[test]
    fn test_numbers_compare_by_value() {
        assert_eq!(
            AttrValue::number(Decimal::new(960, 1)),
            AttrValue::number(Decimal::from(96))
        );
    }

    #[test]
    fn test_numeric_sort() {
        let mut values = vec![
            AttrValue::from(120),
            AttrValue::from(96),
            AttrValue::from(144),
        ];
        sort_options(&mut values);
        assert_eq!(
            values,
            vec![AttrValue::from(96), AttrValue::from(120), AttrValue::from(144)]
        );
    }

    #[test]
    fn test_mixed_sort_is_lexicographic() {
        let mut values = vec![
            AttrValue::from("SPF"),
            AttrValue::Absent,
            AttrValue::from("Douglas Fir"),
        ];
        sort_options(&mut values);
        assert_eq!(
            values,
            vec![
                AttrValue::from("Douglas Fir"),
                AttrValue::Absent,
                AttrValue::from("SPF")
            ]
        );
    }

    #[test]
    fn test_parse_input() {
        assert_eq!(AttrValue::parse("None"), AttrValue::Absent);
        assert_eq!(AttrValue::parse("96"), AttrValue::from(96));
        assert_eq!(AttrValue::parse("true"), AttrValue::Flag(true));
        assert_eq!(AttrValue::parse("#2"), AttrValue::from("#2"));
    }
}
