//! Stable variant ids.
//!
//! A variant's stable id is derived only from its category and identifying
//! attributes, so every facility selling the same configuration lands on
//! the same key.

use rust_decimal::Decimal;
use sha2::{Digest, Sha256};

use crate::catalog::{Attribute, Variant};

/// Hex characters kept from the digest.
pub const STABLE_ID_LEN: usize = 10;

/// The string that gets hashed: category name followed by each identifying
/// attribute value, `#`-separated.
pub fn canonical_key(variant: &Variant) -> String {
    let category = variant.category();
    let mut key = category.as_str().to_string();

    for attr in category.identifying_attributes() {
        match attr {
            Attribute::Length | Attribute::Width | Attribute::Thickness => {
                if let Some(value) = variant.dimension(*attr) {
                    key.push_str(&dimension_text(value));
                }
            }
            Attribute::Metric => {
                key.push_str(if variant.is_metric() { "true" } else { "false" });
            }
            _ => {
                if let Some(text) = variant.text_attribute(*attr) {
                    key.push_str(text);
                }
            }
        }
        key.push('#');
    }

    key.pop();
    key
}

/// First ten hex characters of the SHA-256 of [`canonical_key`].
pub fn stable_id(variant: &Variant) -> String {
    let digest = Sha256::digest(canonical_key(variant).as_bytes());
    let hex = format!("{:x}", digest);
    hex[..STABLE_ID_LEN].to_string()
}

/// Integers keep one decimal place (`96.0`); others use their shortest form.
fn dimension_text(value: Decimal) -> String {
    let value = value.normalize();
    if value.fract().is_zero() {
        format!("{}.0", value.trunc())
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{
        CategoryDetails, Dimensions, LumberDetails, PriceTier, SheetGoodDetails,
    };

    fn stud(species: &str, facility: &str, price: i64) -> Variant {
        Variant::new(
            format!("lumber#{}#x", facility),
            facility,
            CategoryDetails::Lumber(LumberDetails {
                profile: Some("2x4".to_string()),
                grade: Some("#2".to_string()),
                species: Some(species.to_string()),
                finger_joint: Some("No".to_string()),
                ..Default::default()
            }),
            Dimensions::new(Decimal::from(96), Decimal::new(35, 1), Decimal::new(15, 1)),
            vec![PriceTier::new(Decimal::from(price), 1)],
        )
        .unwrap()
    }

    #[test]
    fn test_lumber_canonical_key() {
        let v = stud("SPF", "f1", 5);
        assert_eq!(canonical_key(&v), "lumber96.0#2x4##2#SPF#No###");
    }

    #[test]
    fn test_sheet_good_canonical_key() {
        let v = Variant::new(
            "p",
            "f1",
            CategoryDetails::SheetGood(SheetGoodDetails {
                panel_type: Some("Plywood".to_string()),
                ..Default::default()
            }),
            Dimensions::new(Decimal::from(96), Decimal::from(48), Decimal::new(71875, 5)),
            vec![PriceTier::new(Decimal::from(40), 1)],
        )
        .unwrap();
        assert_eq!(
            canonical_key(&v),
            "sheet_good96.0#48.0#0.71875###Plywood######false"
        );
    }

    #[test]
    fn test_stable_id_shape() {
        let id = stable_id(&stud("SPF", "f1", 5));
        assert_eq!(id.len(), STABLE_ID_LEN);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_stable_id_ignores_facility_and_price() {
        assert_eq!(stable_id(&stud("SPF", "f1", 5)), stable_id(&stud("SPF", "f2", 7)));
        assert_ne!(stable_id(&stud("SPF", "f1", 5)), stable_id(&stud("Hem Fir", "f1", 5)));
    }
}
